// handlers/properties.rs - /properties handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, RawQuery, State};
use axum::Json;

use crate::app::AppState;
use crate::database::models::Listing;
use crate::error::ApiError;
use crate::filter::SearchParams;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::CreatePropertyRequest;

/// GET /properties - Search listings
///
/// Every query parameter is optional; values that do not parse leave that
/// filter unset, and repeated keys never reject the request. Responds with a
/// bare JSON array ordered by property id.
pub async fn list(State(state): State<AppState>, RawQuery(query): RawQuery) -> ApiResult<Vec<Listing>> {
    let params = SearchParams::from_query(query.as_deref().unwrap_or_default());
    let listings = state
        .search
        .search(&params)
        .await
        .map_err(|e| ApiError::from_service("fetching properties", e))?;
    Ok(ApiResponse::success(listings))
}

/// GET /properties/:id - Single listing or 404
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Listing> {
    let id = ApiError::parse_id(&id, "property")?;
    let listing = state
        .search
        .find(id)
        .await
        .map_err(|e| ApiError::from_service("retrieving property", e))?;
    Ok(ApiResponse::success(listing))
}

/// POST /properties - Create a listing, geocoding its address
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreatePropertyRequest>, JsonRejection>,
) -> ApiResult<Listing> {
    let Json(request) = payload?;
    let listing = state
        .properties
        .create(request)
        .await
        .map_err(|e| ApiError::from_service("creating property", e))?;
    Ok(ApiResponse::created(listing))
}

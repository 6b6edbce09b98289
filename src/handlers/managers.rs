// handlers/managers.rs - /managers handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use crate::app::AppState;
use crate::database::models::{Listing, Manager, ManagerProfile};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::CreateManagerRequest;

/// GET /managers/:cognitoId
pub async fn show(State(state): State<AppState>, Path(cognito_id): Path<String>) -> ApiResult<Manager> {
    let manager = state
        .managers
        .get(&cognito_id)
        .await
        .map_err(|e| ApiError::from_service("fetching manager", e))?;
    Ok(ApiResponse::success(manager))
}

/// POST /managers
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateManagerRequest>, JsonRejection>,
) -> ApiResult<Manager> {
    let Json(request) = payload?;
    let manager = state
        .managers
        .create(request)
        .await
        .map_err(|e| ApiError::from_service("creating manager", e))?;
    Ok(ApiResponse::created(manager))
}

/// PUT /managers/:cognitoId
pub async fn update(
    State(state): State<AppState>,
    Path(cognito_id): Path<String>,
    payload: Result<Json<ManagerProfile>, JsonRejection>,
) -> ApiResult<Manager> {
    let Json(profile) = payload?;
    let manager = state
        .managers
        .update(&cognito_id, profile)
        .await
        .map_err(|e| ApiError::from_service("updating manager", e))?;
    Ok(ApiResponse::success(manager))
}

/// GET /managers/:cognitoId/properties - Listings owned by the manager
pub async fn properties(State(state): State<AppState>, Path(cognito_id): Path<String>) -> ApiResult<Vec<Listing>> {
    let listings = state
        .properties
        .by_manager(&cognito_id)
        .await
        .map_err(|e| ApiError::from_service("fetching manager properties", e))?;
    Ok(ApiResponse::success(listings))
}

// handlers/tenants.rs - /tenants handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use crate::app::AppState;
use crate::database::models::{Listing, TenantProfile, TenantWithFavorites};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::CreateTenantRequest;

/// GET /tenants/:cognitoId - Tenant with favorite properties
pub async fn show(State(state): State<AppState>, Path(cognito_id): Path<String>) -> ApiResult<TenantWithFavorites> {
    let tenant = state
        .tenants
        .get(&cognito_id)
        .await
        .map_err(|e| ApiError::from_service("fetching tenant", e))?;
    Ok(ApiResponse::success(tenant))
}

/// POST /tenants
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateTenantRequest>, JsonRejection>,
) -> ApiResult<TenantWithFavorites> {
    let Json(request) = payload?;
    let tenant = state
        .tenants
        .create(request)
        .await
        .map_err(|e| ApiError::from_service("creating tenant", e))?;
    Ok(ApiResponse::created(tenant))
}

/// PUT /tenants/:cognitoId
pub async fn update(
    State(state): State<AppState>,
    Path(cognito_id): Path<String>,
    payload: Result<Json<TenantProfile>, JsonRejection>,
) -> ApiResult<TenantWithFavorites> {
    let Json(profile) = payload?;
    let tenant = state
        .tenants
        .update(&cognito_id, profile)
        .await
        .map_err(|e| ApiError::from_service("updating tenant", e))?;
    Ok(ApiResponse::success(tenant))
}

/// GET /tenants/:cognitoId/current-residences
pub async fn current_residences(
    State(state): State<AppState>,
    Path(cognito_id): Path<String>,
) -> ApiResult<Vec<Listing>> {
    let residences = state
        .tenants
        .current_residences(&cognito_id)
        .await
        .map_err(|e| ApiError::from_service("fetching residences", e))?;
    Ok(ApiResponse::success(residences))
}

/// POST /tenants/:cognitoId/favorites/:propertyId
pub async fn add_favorite(
    State(state): State<AppState>,
    Path((cognito_id, property_id)): Path<(String, String)>,
) -> ApiResult<TenantWithFavorites> {
    let property_id = ApiError::parse_id(&property_id, "property")?;
    let tenant = state
        .tenants
        .add_favorite(&cognito_id, property_id)
        .await
        .map_err(|e| ApiError::from_service("adding favorite property", e))?;
    Ok(ApiResponse::success(tenant))
}

/// DELETE /tenants/:cognitoId/favorites/:propertyId
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path((cognito_id, property_id)): Path<(String, String)>,
) -> ApiResult<TenantWithFavorites> {
    let property_id = ApiError::parse_id(&property_id, "property")?;
    let tenant = state
        .tenants
        .remove_favorite(&cognito_id, property_id)
        .await
        .map_err(|e| ApiError::from_service("removing favorite property", e))?;
    Ok(ApiResponse::success(tenant))
}

// handlers/leases.rs - /leases handlers

use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::models::{LeaseWithRelations, Payment};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /leases - All leases with tenant and property
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<LeaseWithRelations>> {
    let leases = state
        .leases
        .list()
        .await
        .map_err(|e| ApiError::from_service("fetching leases", e))?;
    Ok(ApiResponse::success(leases))
}

/// GET /leases/:id/payments
pub async fn payments(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Vec<Payment>> {
    let id = ApiError::parse_id(&id, "lease")?;
    let payments = state
        .leases
        .payments(id)
        .await
        .map_err(|e| ApiError::from_service("fetching lease payments", e))?;
    Ok(ApiResponse::success(payments))
}

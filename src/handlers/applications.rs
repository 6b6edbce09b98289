// handlers/applications.rs - /applications handlers

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::{Application, ApplicationSummary};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{ApplicationService, CreateApplicationRequest, StatusUpdate};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationQuery {
    pub user_id: Option<String>,
    /// `tenant` or `manager`; omitted lists every application
    pub user_type: Option<String>,
}

/// GET /applications?userId=&userType=
///
/// A repeated `userId` or `userType` is ambiguous and answers a JSON 400.
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ApplicationQuery>, QueryRejection>,
) -> ApiResult<Vec<ApplicationSummary>> {
    let Query(query) = query?;
    let scope = ApplicationService::scope(query.user_id.as_deref(), query.user_type.as_deref())?;
    let applications = state
        .applications
        .list(&scope)
        .await
        .map_err(|e| ApiError::from_service("retrieving applications", e))?;
    Ok(ApiResponse::success(applications))
}

/// POST /applications - Submit a pending application
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateApplicationRequest>, JsonRejection>,
) -> ApiResult<Application> {
    let Json(request) = payload?;
    let application = state
        .applications
        .create(request)
        .await
        .map_err(|e| ApiError::from_service("creating application", e))?;
    Ok(ApiResponse::created(application))
}

/// PUT /applications/:id/status
///
/// Approval creates the lease and records the tenant as a resident in one
/// transaction. Decided applications answer 409.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult<Application> {
    let id = ApiError::parse_id(&id, "application")?;
    let Json(update) = payload?;
    let application = state
        .applications
        .update_status(id, update.status)
        .await
        .map_err(|e| ApiError::from_service("updating application status", e))?;
    Ok(ApiResponse::success(application))
}

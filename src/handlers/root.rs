// handlers/root.rs - service banner and health

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - Service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "RentAvenue API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "properties": "/properties[/:id]",
            "tenants": "/tenants/:cognitoId[/current-residences|/favorites/:propertyId]",
            "managers": "/managers/:cognitoId[/properties]",
            "leases": "/leases[/:id/payments]",
            "applications": "/applications[/:id/status]",
            "health": "/health",
        }
    }))
}

/// GET /health - Store connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                })),
            )
        }
    }
}

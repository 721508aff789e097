use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::schema::ResourceType;

/// GET / - Service banner
pub async fn root() -> Json<Value> {
    let resources: Vec<String> = ResourceType::ALL
        .iter()
        .map(|r| format!("/api/v1/{}[/:id]", r.plural()))
        .collect();

    Json(json!({
        "status": "success",
        "data": {
            "name": "Guardpost API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Security staffing records: clients, locations, guards and zones",
            "endpoints": resources
        }
    }))
}

/// GET /health - Storage ping
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    if let Err(e) = state.service.health_check().await {
        tracing::error!("Health check failed: {}", e);
        return Err(ApiError::service_unavailable("database unavailable"));
    }

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "database": "ok"
    })))
}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::schema::ResourceType;

use super::utils::{no_record, parse_body, parse_id, parse_resource};

/// GET /api/v1/:resource/:id - Get a single record; clients include their locations
pub async fn get(State(state): State<AppState>, Path((resource, id)): Path<(String, String)>) -> ApiResult<Value> {
    let resource = parse_resource(&resource)?;
    let id = parse_id(&id)?;

    let populate_virtuals = resource == ResourceType::Client;
    let record = state
        .service
        .find_by_id(resource, id, populate_virtuals)
        .await?
        .ok_or_else(|| no_record(resource))?;

    Ok(ApiResponse::success(json!({
        resource.singular(): record.to_api_output()
    })))
}

/// PUT /api/v1/:resource/:id - Replace a record
pub async fn put(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let resource = parse_resource(&resource)?;
    let id = parse_id(&id)?;
    let input = parse_body(payload)?;

    let record = state
        .service
        .update_by_id(resource, id, input)
        .await?
        .ok_or_else(|| no_record(resource))?;

    Ok(ApiResponse::success(json!({
        resource.singular(): record.to_api_output()
    })))
}

/// DELETE /api/v1/:resource/:id - Delete a record
pub async fn delete(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> ApiResult<()> {
    let resource = parse_resource(&resource)?;
    let id = parse_id(&id)?;

    if !state.service.delete_by_id(resource, id).await? {
        return Err(no_record(resource));
    }
    Ok(ApiResponse::no_content())
}

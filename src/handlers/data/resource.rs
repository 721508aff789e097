use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::record::Record;
use crate::filter::Filter;
use crate::middleware::{ApiResponse, ApiResult};

use super::utils::{parse_body, parse_resource};

/// GET /api/v1/:resource - List every record of a resource type
pub async fn get(State(state): State<AppState>, Path(resource): Path<String>) -> ApiResult<Value> {
    let resource = parse_resource(&resource)?;
    let records = state.service.find(resource, Filter::new()).await?;

    Ok(ApiResponse::success(json!({
        resource.plural(): Record::to_api_output_array(&records)
    })))
}

/// POST /api/v1/:resource - Create a record
pub async fn post(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let resource = parse_resource(&resource)?;
    let input = parse_body(payload)?;
    let record = state.service.create(resource, input).await?;

    Ok(ApiResponse::created(json!({
        resource.singular(): record.to_api_output()
    })))
}

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::record::input_from_json;
use crate::error::ApiError;
use crate::schema::ResourceType;

/// Resolve the `:resource` path segment (plural form)
pub fn parse_resource(segment: &str) -> Result<ResourceType, ApiError> {
    ResourceType::from_plural(segment)
        .ok_or_else(|| ApiError::not_found(format!("Can't find /api/v1/{} on this server", segment)))
}

/// Resolve the `:id` path segment
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid id: {}", raw)))
}

/// Request body as raw record input
pub fn parse_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, ApiError> {
    let Json(json) = payload.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;
    Ok(input_from_json(json)?)
}

/// Not-found error for a by-id operation
pub fn no_record(resource: ResourceType) -> ApiError {
    ApiError::not_found(format!("No {} with ID was found", resource))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_segments() {
        assert_eq!(parse_resource("guards").unwrap(), ResourceType::Guard);
        assert!(matches!(parse_resource("guard"), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn ids_must_be_uuids() {
        assert!(parse_id("9f2c7a0e-4b7d-4a39-9e55-1f1d6f0f3c11").is_ok());
        assert!(matches!(parse_id("42"), Err(ApiError::BadRequest(_))));
    }
}

// Ring 1: Input Validation - required fields
use async_trait::async_trait;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::schema::validate::is_missing;
use crate::types::Operation;

/// Reports the first missing required field in declaration order
#[derive(Default)]
pub struct RequiredFieldValidator;

#[async_trait]
impl Observer for RequiredFieldValidator {
    fn name(&self) -> &'static str {
        "RequiredFieldValidator"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::InputValidation
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }

    fn priority(&self) -> u8 {
        10
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let missing = ctx
            .resource
            .fields()
            .iter()
            .filter(|spec| spec.required)
            .find(|spec| is_missing(ctx.input.get(spec.name)));

        match missing {
            Some(spec) => Err(ObserverError::MissingField(spec.name.to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::schema::ResourceType;
    use serde_json::{json, Value};
    use std::sync::Arc;

    async fn check(resource: ResourceType, input: Value) -> Result<(), ObserverError> {
        let Value::Object(input) = input else { unreachable!() };
        let mut ctx = ObserverContext::create(Arc::new(MemoryStore::new()), resource, input);
        RequiredFieldValidator.execute(&mut ctx).await
    }

    #[tokio::test]
    async fn reports_only_the_first_missing_field() {
        let err = check(ResourceType::Client, json!({"name": "Acme"})).await.unwrap_err();
        assert_eq!(err, ObserverError::MissingField("contactPerson".into()));

        let err = check(
            ResourceType::Client,
            json!({"name": "Acme", "contactPerson": "Ada Obi", "email": "", "rate": 10}),
        )
        .await
        .unwrap_err();
        assert_eq!(err, ObserverError::MissingField("email".into()));
    }

    #[tokio::test]
    async fn location_order() {
        let err = check(ResourceType::Location, json!({"name": "Gate", "client": "x"}))
            .await
            .unwrap_err();
        assert_eq!(err, ObserverError::MissingField("area".into()));
    }

    #[tokio::test]
    async fn guard_order() {
        let mut guard = json!({
            "name": "Musa Bello",
            "dateOfBirth": "1990-01-01",
            "address": "12 Marina",
            "gender": "Male",
            "shift": "Day",
            "passportPicture": "musa.jpg"
        });
        // strip fields from the back so each earlier one is reported in turn
        let order = ["passportPicture", "shift", "gender", "address", "dateOfBirth", "name"];
        for field in order {
            if let Value::Object(fields) = &mut guard {
                fields.remove(field);
            }
            let err = check(ResourceType::Guard, guard.clone()).await.unwrap_err();
            assert_eq!(err, ObserverError::MissingField(field.into()));
        }
    }

    #[tokio::test]
    async fn each_guard_field_is_required() {
        let complete = json!({
            "name": "Musa Bello",
            "dateOfBirth": "1990-01-01",
            "address": "12 Marina",
            "gender": "Male",
            "shift": "Day",
            "passportPicture": "musa.jpg"
        });
        for field in ["name", "dateOfBirth", "address", "gender", "shift", "passportPicture"] {
            let mut input = complete.clone();
            if let Value::Object(fields) = &mut input {
                fields.remove(field);
            }
            let err = check(ResourceType::Guard, input).await.unwrap_err();
            assert_eq!(err, ObserverError::MissingField(field.into()));
        }
    }

    #[tokio::test]
    async fn optional_fields_may_be_absent() {
        let ok = check(
            ResourceType::Guard,
            json!({
                "name": "Musa Bello",
                "dateOfBirth": "1990-01-01",
                "address": "12 Marina",
                "gender": "Male",
                "shift": "Day",
                "passportPicture": "musa.jpg"
            }),
        )
        .await;
        assert!(ok.is_ok());
    }
}

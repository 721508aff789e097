// Ring 0: Data Preparation - strict schema, string normalization
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::database::record::SYSTEM_FIELDS;
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::schema::FieldSpec;
use crate::types::Operation;

/// Keeps only declared writable fields, then trims and lowercases strings
/// where the field declaration asks for it
#[derive(Default)]
pub struct FieldSanitizer;

#[async_trait]
impl Observer for FieldSanitizer {
    fn name(&self) -> &'static str {
        "FieldSanitizer"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::DataPreparation
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let resource = ctx.resource;
        let mut sanitized = Map::new();

        for (key, value) in std::mem::take(&mut ctx.input) {
            match resource.field(&key) {
                Some(spec) => {
                    sanitized.insert(key, normalize(spec, value));
                }
                None if SYSTEM_FIELDS.contains(&key.as_str()) => {
                    tracing::debug!("Ignoring system field '{}' in {} input", key, resource);
                }
                None => {
                    tracing::debug!("Dropping undeclared field '{}' from {} input", key, resource);
                }
            }
        }

        ctx.input = sanitized;
        Ok(())
    }
}

fn normalize(spec: &FieldSpec, value: Value) -> Value {
    match value {
        Value::String(s) => {
            let s = if spec.trim { s.trim().to_string() } else { s };
            let s = if spec.lowercase { s.to_lowercase() } else { s };
            Value::String(s)
        }
        other => other,
    }
}

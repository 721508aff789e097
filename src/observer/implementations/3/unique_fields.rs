// Ring 3: Business - uniqueness against stored records
use async_trait::async_trait;

use crate::filter::Filter;
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::types::Operation;

/// Rejects a write whose unique field value is already held by another record.
///
/// The store enforces the same constraints on write; this check reports the
/// conflict before anything is persisted and names the offending field.
#[derive(Default)]
pub struct UniqueFieldValidator;

#[async_trait]
impl Observer for UniqueFieldValidator {
    fn name(&self) -> &'static str {
        "UniqueFieldValidator"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Business
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        for spec in ctx.resource.unique_fields() {
            let Some(value) = ctx.input.get(spec.name) else {
                continue;
            };

            let holders = ctx
                .store
                .find(ctx.resource, &Filter::eq(spec.name, value.clone()))
                .await?;

            if holders.iter().any(|r| Some(r.id) != ctx.record_id) {
                tracing::debug!("Duplicate {} on {}: {}", spec.name, ctx.resource, value);
                return Err(ObserverError::DuplicateKey(spec.name.to_string()));
            }
        }
        Ok(())
    }
}

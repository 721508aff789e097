// Ring 2: Security - target record must exist before an update is validated further
use async_trait::async_trait;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::types::Operation;

#[derive(Default)]
pub struct RecordExistenceCheck;

#[async_trait]
impl Observer for RecordExistenceCheck {
    fn name(&self) -> &'static str {
        "RecordExistenceCheck"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Security
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        op == Operation::Update
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let Some(id) = ctx.record_id else {
            return Err(ObserverError::NotFound(not_found_message(ctx)));
        };

        match ctx.store.find_by_id(ctx.resource, id).await? {
            Some(_) => Ok(()),
            None => Err(ObserverError::NotFound(not_found_message(ctx))),
        }
    }
}

fn not_found_message(ctx: &ObserverContext) -> String {
    format!("No {} with ID was found", ctx.resource)
}

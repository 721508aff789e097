// Ring 1: Input Validation - formats, enums, length bounds, casts
use async_trait::async_trait;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::schema::validate::{check_field, is_blank};
use crate::types::Operation;

/// Checks every present field against its declaration and stores the
/// normalized value back into the input. Blank optional fields are dropped.
#[derive(Default)]
pub struct FieldFormatValidator;

#[async_trait]
impl Observer for FieldFormatValidator {
    fn name(&self) -> &'static str {
        "FieldFormatValidator"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::InputValidation
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }

    fn priority(&self) -> u8 {
        20
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        for spec in ctx.resource.fields() {
            let Some(value) = ctx.input.get(spec.name) else {
                continue;
            };

            if !spec.required && is_blank(Some(value)) {
                ctx.input.remove(spec.name);
                continue;
            }

            let normalized = check_field(spec, value).map_err(|message| ObserverError::format(spec.name, message))?;
            ctx.input.insert(spec.name.to_string(), normalized);
        }
        Ok(())
    }
}

// Ring 4: Enrichment - derived guard slug
use async_trait::async_trait;
use serde_json::Value;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::schema::ResourceType;
use crate::types::Operation;

/// Recomputes `slug` from `name` on every guard save
#[derive(Default)]
pub struct GuardSlugObserver;

#[async_trait]
impl Observer for GuardSlugObserver {
    fn name(&self) -> &'static str {
        "GuardSlugObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Enrichment
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }

    fn applies_to_resource(&self, resource: ResourceType) -> bool {
        resource == ResourceType::Guard
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let slug = slugify(ctx.input.get("name").and_then(Value::as_str).unwrap_or_default());
        ctx.input.insert("slug".to_string(), Value::String(slug));
        Ok(())
    }
}

/// Lowercase, whitespace runs become `-`, anything but letters, digits, `-` and `_` dropped
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("-")
}

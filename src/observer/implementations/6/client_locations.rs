// Ring 6: Post-Database - virtual client locations
use async_trait::async_trait;
use serde_json::Value;

use crate::filter::Filter;
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::schema::ResourceType;
use crate::types::Operation;

/// Attaches every Location whose `client` is this client. Only runs when the
/// caller asked for virtuals; the result is never stored.
#[derive(Default)]
pub struct ClientLocationsPopulator;

#[async_trait]
impl Observer for ClientLocationsPopulator {
    fn name(&self) -> &'static str {
        "ClientLocationsPopulator"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::PostDatabase
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        op == Operation::Select
    }

    fn applies_to_resource(&self, resource: ResourceType) -> bool {
        resource == ResourceType::Client
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        if !ctx.populate_virtuals {
            return Ok(());
        }

        let store = ctx.store.clone();
        for client in ctx.records.iter_mut() {
            let filter = Filter::eq("client", client.id.to_string());
            let locations: Vec<Value> = store
                .find(ResourceType::Location, &filter)
                .await?
                .iter()
                .map(|l| l.to_api_output())
                .collect();
            client.set("locations", locations);
        }
        Ok(())
    }
}

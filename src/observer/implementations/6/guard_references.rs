// Ring 6: Post-Database - inline guard zone and locations on read and update
use async_trait::async_trait;
use serde_json::Value;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::schema::ResourceType;
use crate::types::Operation;

/// Replaces stored reference ids with the referenced documents.
///
/// `locations` keeps only members that still exist; a dangling `zone`
/// becomes null. Referenced documents are inlined as stored, one level deep.
/// Runs after reads and updates; a freshly created guard keeps its raw ids.
#[derive(Default)]
pub struct GuardReferencePopulator;

#[async_trait]
impl Observer for GuardReferencePopulator {
    fn name(&self) -> &'static str {
        "GuardReferencePopulator"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::PostDatabase
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Select | Operation::Update)
    }

    fn applies_to_resource(&self, resource: ResourceType) -> bool {
        resource == ResourceType::Guard
    }

    fn priority(&self) -> u8 {
        10
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let store = ctx.store.clone();

        for guard in ctx.records.iter_mut() {
            if guard.get("zone").is_some() {
                let zone = match guard.reference_id("zone") {
                    Some(zone_id) => store.find_by_id(ResourceType::Zone, zone_id).await?,
                    None => None,
                };
                let zone = zone.map(|z| z.to_api_output()).unwrap_or(Value::Null);
                guard.set("zone", zone);
            }

            if guard.get("locations").is_some() {
                let ids = guard.reference_ids("locations");
                let found = store.find_by_ids(ResourceType::Location, &ids).await?;
                // keep the guard's own ordering
                let locations: Vec<Value> = ids
                    .iter()
                    .filter_map(|id| found.iter().find(|l| l.id == *id))
                    .map(|l| l.to_api_output())
                    .collect();
                guard.set("locations", locations);
            }
        }
        Ok(())
    }
}

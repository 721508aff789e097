// Ring 5: Database - the single store call for each operation
use async_trait::async_trait;

use crate::database::record::Record;
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::types::Operation;

/// Performs the store call and leaves the stored records in `ctx.records`
#[derive(Default)]
pub struct StoreExecutor;

#[async_trait]
impl Observer for StoreExecutor {
    fn name(&self) -> &'static str {
        "StoreExecutor"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Database
    }

    fn applies_to_operation(&self, _op: Operation) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let resource = ctx.resource;
        let store = ctx.store.clone();

        match ctx.operation {
            Operation::Create => {
                let record = Record::new(std::mem::take(&mut ctx.input));
                let stored = store.insert(resource, record).await?;
                tracing::info!("Created {} {}", resource, stored.id);
                ctx.records = vec![stored];
            }
            Operation::Update => {
                let id = require_id(ctx)?;
                let fields = std::mem::take(&mut ctx.input);
                match store.replace(resource, id, fields).await? {
                    Some(updated) => {
                        tracing::info!("Updated {} {}", resource, id);
                        ctx.records = vec![updated];
                    }
                    None => return Err(not_found(ctx)),
                }
            }
            Operation::Delete => {
                let id = require_id(ctx)?;
                ctx.deleted = store.delete(resource, id).await?;
                if ctx.deleted {
                    tracing::info!("Deleted {} {}", resource, id);
                }
            }
            Operation::Select => {
                ctx.records = match ctx.record_id {
                    Some(id) => store.find_by_id(resource, id).await?.into_iter().collect(),
                    None => store.find(resource, &ctx.filter).await?,
                };
                tracing::debug!("Selected {} {} record(s)", ctx.records.len(), resource);
            }
        }
        Ok(())
    }
}

fn require_id(ctx: &ObserverContext) -> Result<uuid::Uuid, ObserverError> {
    ctx.record_id.ok_or_else(|| not_found(ctx))
}

fn not_found(ctx: &ObserverContext) -> ObserverError {
    ObserverError::NotFound(format!("No {} with ID was found", ctx.resource))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::store::RecordStore;
    use crate::filter::Filter;
    use crate::schema::ResourceType;
    use serde_json::{json, Map, Value};
    use std::sync::Arc;
    use uuid::Uuid;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn create_then_select() {
        let store = Arc::new(MemoryStore::new());
        let mut ctx = ObserverContext::create(store.clone(), ResourceType::Zone, fields(json!({"name": "Harbour"})));
        StoreExecutor.execute(&mut ctx).await.unwrap();
        assert_eq!(ctx.records.len(), 1);
        let id = ctx.records[0].id;

        let mut ctx = ObserverContext::select_by_id(store.clone(), ResourceType::Zone, id);
        StoreExecutor.execute(&mut ctx).await.unwrap();
        assert_eq!(ctx.records[0].get_str("name"), Some("Harbour"));

        let mut ctx = ObserverContext::select(store, ResourceType::Zone, Filter::eq("name", "Nowhere"));
        StoreExecutor.execute(&mut ctx).await.unwrap();
        assert!(ctx.records.is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_record_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let mut ctx = ObserverContext::update(store, ResourceType::Client, Uuid::new_v4(), Map::new());
        let err = StoreExecutor.execute(&mut ctx).await.unwrap_err();
        assert_eq!(err, ObserverError::NotFound("No client with ID was found".into()));
    }

    #[tokio::test]
    async fn delete_reports_whether_removed() {
        let store = Arc::new(MemoryStore::new());
        let record = Record::new(Map::new());
        let id = record.id;
        store.insert(ResourceType::Location, record).await.unwrap();

        let mut ctx = ObserverContext::delete(store.clone(), ResourceType::Location, id);
        StoreExecutor.execute(&mut ctx).await.unwrap();
        assert!(ctx.deleted);

        let mut ctx = ObserverContext::delete(store, ResourceType::Location, id);
        StoreExecutor.execute(&mut ctx).await.unwrap();
        assert!(!ctx.deleted);
    }
}

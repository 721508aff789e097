use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::record::Record;
use crate::database::store::RecordStore;
use crate::filter::Filter;
use crate::schema::ResourceType;

/// In-process store used by tests and `--memory` runs.
///
/// Collections keep insertion order. A single write lock covers the unique
/// check and the write, so concurrent inserts cannot both claim a unique value.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<ResourceType, Vec<Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// First unique field of `fields` already held by another record
    fn conflicting_field(
        resource: ResourceType,
        existing: &[Record],
        fields: &Map<String, Value>,
        own_id: Uuid,
    ) -> Option<&'static str> {
        resource.unique_fields().map(|f| f.name).find(|name| {
            fields.get(*name).map_or(false, |value| {
                existing
                    .iter()
                    .any(|r| r.id != own_id && r.get(name) == Some(value))
            })
        })
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, resource: ResourceType, record: Record) -> Result<Record, DatabaseError> {
        let mut collections = self.collections.write().await;
        let collection = collections.entry(resource).or_default();

        if collection.iter().any(|r| r.id == record.id) {
            return Err(DatabaseError::QueryError(format!("duplicate id {}", record.id)));
        }
        if let Some(field) = Self::conflicting_field(resource, collection, &record.fields, record.id) {
            return Err(DatabaseError::DuplicateKey(field.to_string()));
        }

        collection.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, resource: ResourceType, id: Uuid) -> Result<Option<Record>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&resource)
            .and_then(|c| c.iter().find(|r| r.id == id))
            .cloned())
    }

    async fn find(&self, resource: ResourceType, filter: &Filter) -> Result<Vec<Record>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&resource)
            .map(|c| c.iter().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_by_ids(&self, resource: ResourceType, ids: &[Uuid]) -> Result<Vec<Record>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&resource)
            .map(|c| c.iter().filter(|r| ids.contains(&r.id)).cloned().collect())
            .unwrap_or_default())
    }

    async fn replace(
        &self,
        resource: ResourceType,
        id: Uuid,
        fields: Map<String, Value>,
    ) -> Result<Option<Record>, DatabaseError> {
        let mut collections = self.collections.write().await;
        let Some(collection) = collections.get_mut(&resource) else {
            return Ok(None);
        };

        if let Some(field) = Self::conflicting_field(resource, collection, &fields, id) {
            return Err(DatabaseError::DuplicateKey(field.to_string()));
        }

        Ok(collection.iter_mut().find(|r| r.id == id).map(|record| {
            record.fields = fields;
            record.clone()
        }))
    }

    async fn delete(&self, resource: ResourceType, id: Uuid) -> Result<bool, DatabaseError> {
        let mut collections = self.collections.write().await;
        let Some(collection) = collections.get_mut(&resource) else {
            return Ok(false);
        };
        let before = collection.len();
        collection.retain(|r| r.id != id);
        Ok(collection.len() < before)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

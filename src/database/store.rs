use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::record::Record;
use crate::filter::Filter;
use crate::schema::ResourceType;

/// Persistence seam for every resource type.
///
/// Each call is atomic for the single record it touches; there are no
/// cross-record transactions. Implementations enforce the unique constraints
/// declared in the schema and report violations as [`DatabaseError::DuplicateKey`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record
    async fn insert(&self, resource: ResourceType, record: Record) -> Result<Record, DatabaseError>;

    async fn find_by_id(&self, resource: ResourceType, id: Uuid) -> Result<Option<Record>, DatabaseError>;

    /// Records matching every equality condition in the filter, in storage order
    async fn find(&self, resource: ResourceType, filter: &Filter) -> Result<Vec<Record>, DatabaseError>;

    /// Records whose id is in `ids`; unknown ids are skipped
    async fn find_by_ids(&self, resource: ResourceType, ids: &[Uuid]) -> Result<Vec<Record>, DatabaseError>;

    /// Replace the whole document body, keeping id and creation time.
    /// Returns `None` when the id does not exist.
    async fn replace(
        &self,
        resource: ResourceType,
        id: Uuid,
        fields: Map<String, Value>,
    ) -> Result<Option<Record>, DatabaseError>;

    /// Returns whether a record was removed
    async fn delete(&self, resource: ResourceType, id: Uuid) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Release connections; called once on shutdown
    async fn close(&self) {}
}

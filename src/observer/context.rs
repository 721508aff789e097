use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::database::record::Record;
use crate::database::store::RecordStore;
use crate::filter::Filter;
use crate::observer::traits::ObserverRing;
use crate::schema::ResourceType;
use crate::types::Operation;

/// State that flows through the observer pipeline for one operation
pub struct ObserverContext {
    // Core request data
    pub operation: Operation,
    pub resource: ResourceType,

    /// Storage handle shared by every observer in this run
    pub store: Arc<dyn RecordStore>,

    /// Target record for by-id operations
    pub record_id: Option<Uuid>,

    /// Write input; sanitized and normalized in place by the pre-database rings
    pub input: Map<String, Value>,

    /// SELECT-specific: equality filter for list queries
    pub filter: Filter,

    /// Resolve virtual reverse references (Client → Locations) on read
    pub populate_virtuals: bool,

    // Results after the store call (populated by Ring 5)
    pub records: Vec<Record>,
    pub deleted: bool,

    // Performance tracking
    pub start_time: Instant,
    pub current_ring: Option<ObserverRing>,
}

impl ObserverContext {
    fn new(operation: Operation, resource: ResourceType, store: Arc<dyn RecordStore>) -> Self {
        Self {
            operation,
            resource,
            store,
            record_id: None,
            input: Map::new(),
            filter: Filter::new(),
            populate_virtuals: false,
            records: Vec::new(),
            deleted: false,
            start_time: Instant::now(),
            current_ring: None,
        }
    }

    pub fn create(store: Arc<dyn RecordStore>, resource: ResourceType, input: Map<String, Value>) -> Self {
        Self {
            input,
            ..Self::new(Operation::Create, resource, store)
        }
    }

    pub fn update(
        store: Arc<dyn RecordStore>,
        resource: ResourceType,
        id: Uuid,
        input: Map<String, Value>,
    ) -> Self {
        Self {
            record_id: Some(id),
            input,
            ..Self::new(Operation::Update, resource, store)
        }
    }

    pub fn delete(store: Arc<dyn RecordStore>, resource: ResourceType, id: Uuid) -> Self {
        Self {
            record_id: Some(id),
            ..Self::new(Operation::Delete, resource, store)
        }
    }

    pub fn select(store: Arc<dyn RecordStore>, resource: ResourceType, filter: Filter) -> Self {
        Self {
            filter,
            ..Self::new(Operation::Select, resource, store)
        }
    }

    pub fn select_by_id(store: Arc<dyn RecordStore>, resource: ResourceType, id: Uuid) -> Self {
        Self {
            record_id: Some(id),
            ..Self::new(Operation::Select, resource, store)
        }
    }

    pub fn with_virtuals(mut self, populate: bool) -> Self {
        self.populate_virtuals = populate;
        self
    }

    /// Get total execution time
    pub fn execution_time(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}

impl std::fmt::Debug for ObserverContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverContext")
            .field("operation", &self.operation)
            .field("resource", &self.resource)
            .field("record_id", &self.record_id)
            .field("records", &self.records.len())
            .field("current_ring", &self.current_ring)
            .finish()
    }
}

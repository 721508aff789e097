use async_trait::async_trait;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::schema::ResourceType;
use crate::types::Operation;

/// Observer rings in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ObserverRing {
    DataPreparation = 0, // Keep declared fields, trim, lowercase
    InputValidation = 1, // Required fields, formats
    Security = 2,        // Existence of the target record
    Business = 3,        // Unique constraints
    Enrichment = 4,      // Derived fields
    Database = 5,        // Store execution
    PostDatabase = 6,    // Reference population, virtual fields
}

impl ObserverRing {
    /// Rings before the store call; a failure here means nothing was written
    pub fn is_pre_database(&self) -> bool {
        (*self as u8) < (ObserverRing::Database as u8)
    }

    /// Get all rings for an operation type
    pub fn for_operation(operation: Operation) -> &'static [ObserverRing] {
        use ObserverRing::*;

        match operation {
            Operation::Select => &[Database, PostDatabase],
            Operation::Delete => &[Database],
            Operation::Create | Operation::Update => &[
                DataPreparation,
                InputValidation,
                Security,
                Business,
                Enrichment,
                Database,
                PostDatabase,
            ],
        }
    }
}

/// A single pipeline stage
#[async_trait]
pub trait Observer: Send + Sync {
    /// Observer name for logging and debugging
    fn name(&self) -> &'static str;

    /// Which ring this observer belongs to
    fn ring(&self) -> ObserverRing;

    /// Check if observer applies to this operation
    fn applies_to_operation(&self, op: Operation) -> bool;

    /// Check if observer applies to this resource type
    fn applies_to_resource(&self, _resource: ResourceType) -> bool {
        true
    }

    /// Priority within ring (lower numbers execute first)
    fn priority(&self) -> u8 {
        50
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError>;
}

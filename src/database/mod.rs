pub mod manager;
pub mod memory;
pub mod record;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use record::{Record, RecordError};
pub use repository::Repository;
pub use store::RecordStore;

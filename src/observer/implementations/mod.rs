// Observer implementations organized by rings
// Each ring handles a specific phase of a record operation

use crate::observer::traits::Observer;

// Ring 0: Data Preparation - strict schema, trimming
#[path = "0/field_sanitizer.rs"]
pub mod field_sanitizer;

// Ring 1: Input Validation - required fields, then formats
#[path = "1/required_fields.rs"]
pub mod required_fields;
#[path = "1/field_format.rs"]
pub mod field_format;

// Ring 2: Security - update target must exist
#[path = "2/record_existence.rs"]
pub mod record_existence;

// Ring 3: Business - unique constraints
#[path = "3/unique_fields.rs"]
pub mod unique_fields;

// Ring 4: Enrichment - derived fields written to storage
#[path = "4/guard_slug.rs"]
pub mod guard_slug;

// Ring 5: Database - store call
#[path = "5/store_executor.rs"]
pub mod store_executor;

// Ring 6: Post-Database - reference resolution and read-time fields
#[path = "6/guard_references.rs"]
pub mod guard_references;
#[path = "6/client_locations.rs"]
pub mod client_locations;
#[path = "6/guard_age.rs"]
pub mod guard_age;

pub use client_locations::ClientLocationsPopulator;
pub use field_format::FieldFormatValidator;
pub use field_sanitizer::FieldSanitizer;
pub use guard_age::GuardAgeObserver;
pub use guard_references::GuardReferencePopulator;
pub use guard_slug::{slugify, GuardSlugObserver};
pub use record_existence::RecordExistenceCheck;
pub use required_fields::RequiredFieldValidator;
pub use store_executor::StoreExecutor;
pub use unique_fields::UniqueFieldValidator;

/// Every built-in observer, in registration order
pub fn default_observers() -> Vec<Box<dyn Observer>> {
    vec![
        Box::new(FieldSanitizer),
        Box::new(RequiredFieldValidator),
        Box::new(FieldFormatValidator),
        Box::new(RecordExistenceCheck),
        Box::new(UniqueFieldValidator),
        Box::new(GuardSlugObserver),
        Box::new(StoreExecutor),
        Box::new(GuardReferencePopulator),
        Box::new(ClientLocationsPopulator),
        Box::new(GuardAgeObserver),
    ]
}

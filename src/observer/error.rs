use thiserror::Error;

use crate::database::manager::DatabaseError;

/// Failures raised by pipeline observers. The first one aborts the operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ObserverError {
    #[error("Please provide a {0}")]
    MissingField(String),

    #[error("{message}")]
    ValidationFormat { field: String, message: String },

    #[error("Duplicate value for unique field '{0}'")]
    DuplicateKey(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Timeout error: {0}")]
    Timeout(String),
}

impl ObserverError {
    pub fn format(field: impl Into<String>, message: impl Into<String>) -> Self {
        ObserverError::ValidationFormat {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Convert from storage errors; unique violations keep their field
impl From<DatabaseError> for ObserverError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::DuplicateKey(field) => ObserverError::DuplicateKey(field),
            other => ObserverError::Storage(other.to_string()),
        }
    }
}

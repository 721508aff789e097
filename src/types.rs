/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Record operations supported throughout the system
/// Used by both the observer pipeline and the store executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Select,
}

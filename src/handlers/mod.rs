// handlers/mod.rs
//
// Public endpoints (banner, health) and the record API under /api/v1
pub mod data;
pub mod health;

pub use health::{health, root};

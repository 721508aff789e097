use serde_json::Value;

/// Parameterized SQL produced by a [`crate::filter::Filter`]
#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

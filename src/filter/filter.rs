use serde_json::{Map, Value};

use crate::database::record::Record;
use crate::filter::types::SqlResult;

/// Equality filter over top-level document fields.
///
/// An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Map<String, Value>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter with a single `field == value` condition
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().and_eq(field, value)
    }

    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// In-memory evaluation against a stored record
    pub fn matches(&self, record: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| record.get(field) == Some(expected))
    }

    /// SELECT over a document table. Conditions become a single JSONB
    /// containment test so the whole filter binds as one parameter.
    pub fn to_sql(&self, quoted_table: &str) -> SqlResult {
        let base = format!("SELECT id, data, created_at FROM {}", quoted_table);
        if self.is_empty() {
            return SqlResult { query: base, params: vec![] };
        }

        SqlResult {
            query: format!("{} WHERE data @> $1", base),
            params: vec![Value::Object(self.conditions.clone())],
        }
    }
}

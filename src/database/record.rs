use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Field names that belong to the store and are never accepted from API input
pub const SYSTEM_FIELDS: &[&str] = &["id", "_id", "createdAt", "slug", "__v"];

/// Errors that can occur while turning request input into record fields
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),
}

/// A stored document of one resource type
///
/// `fields` holds the document body exactly as persisted. Post-database observers
/// work on a copy of it, so inlined references and virtual fields never flow back
/// into storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub fields: Map<String, Value>,
}

impl Record {
    /// New record with a fresh id, stamped now
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            fields,
        }
    }

    /// Rebuild a record loaded from storage
    pub fn from_parts(id: Uuid, created_at: DateTime<Utc>, fields: Map<String, Value>) -> Self {
        Self { id, created_at, fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Id stored in a single-reference field
    pub fn reference_id(&self, key: &str) -> Option<Uuid> {
        self.get_str(key).and_then(|s| Uuid::parse_str(s).ok())
    }

    /// Ids stored in a reference-list field, in stored order
    pub fn reference_ids(&self, key: &str) -> Vec<Uuid> {
        match self.fields.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|s| Uuid::parse_str(s).ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Wire form: `id` followed by the document fields. Creation time stays internal.
    pub fn to_api_output(&self) -> Value {
        let mut output = Map::with_capacity(self.fields.len() + 1);
        output.insert("id".to_string(), Value::String(self.id.to_string()));
        for (key, value) in &self.fields {
            if key != "id" {
                output.insert(key.clone(), value.clone());
            }
        }
        Value::Object(output)
    }

    pub fn to_api_output_array(records: &[Record]) -> Value {
        Value::Array(records.iter().map(Record::to_api_output).collect())
    }
}

/// Accept a request body as raw record input. Anything but a JSON object is rejected.
pub fn input_from_json(json: Value) -> Result<Map<String, Value>, RecordError> {
    match json {
        Value::Object(map) => Ok(map),
        other => Err(RecordError::InvalidJson(format!(
            "Expected JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

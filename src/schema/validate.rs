//! Per-field checks used by the validation observers.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Number, Value};
use uuid::Uuid;
use validator::{ValidateEmail, ValidateLength};

use super::{FieldKind, FieldSpec};

/// A required field counts as missing when absent, null, blank, zero or false
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Bool(b)) => !b,
        _ => is_blank(value),
    }
}

/// Absent, null or a whitespace-only string
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

pub fn is_valid_email(candidate: &str) -> bool {
    candidate.validate_email()
}

/// Check a present value against its declared kind and return the normalized
/// value to store. The error is a client-facing message.
pub fn check_field(spec: &FieldSpec, value: &Value) -> Result<Value, String> {
    match spec.kind {
        FieldKind::Text { min_len, max_len } => {
            let text = coerce_text(spec, value)?;
            if !text.validate_length(min_len.map(|m| m as u64), None, None) {
                if let Some(min) = min_len {
                    return Err(format!("{} must be at least {} characters", spec.name, min));
                }
            }
            if !text.validate_length(None, max_len.map(|m| m as u64), None) {
                if let Some(max) = max_len {
                    return Err(format!("{} must be at most {} characters", spec.name, max));
                }
            }
            Ok(Value::String(text))
        }
        FieldKind::Email => {
            let text = coerce_text(spec, value)?;
            if !is_valid_email(&text) {
                return Err("Please provide a valid email".to_string());
            }
            Ok(Value::String(text))
        }
        FieldKind::Number => coerce_number(value)
            .map(Value::Number)
            .ok_or_else(|| format!("{} must be a number", spec.name)),
        FieldKind::Date => coerce_date(value)
            .map(|date| Value::String(format_timestamp(&date)))
            .ok_or_else(|| format!("{} must be a valid date", spec.name)),
        FieldKind::Enum(allowed) => {
            let text = coerce_text(spec, value)?;
            if allowed.contains(&text.as_str()) {
                Ok(Value::String(text))
            } else {
                Err(format!("{} must be one of: {}", spec.name, allowed.join(", ")))
            }
        }
        FieldKind::Reference(_) => coerce_reference(spec, value).map(|id| Value::String(id.to_string())),
        FieldKind::ReferenceList(_) => {
            let items = match value {
                Value::Array(items) => items.clone(),
                // a lone id is accepted as a one-element list
                Value::String(_) => vec![value.clone()],
                _ => return Err(format!("{} must be a list of ids", spec.name)),
            };
            items
                .iter()
                .map(|item| coerce_reference(spec, item).map(|id| Value::String(id.to_string())))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
    }
}

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC)
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn coerce_text(spec: &FieldSpec, value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(format!("{} must be a string", spec.name)),
    }
}

fn coerce_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Some(Number::from(i))
            } else {
                s.parse::<f64>().ok().and_then(Number::from_f64)
            }
        }
        _ => None,
    }
}

fn coerce_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

fn coerce_reference(spec: &FieldSpec, value: &Value) -> Result<Uuid, String> {
    value
        .as_str()
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .ok_or_else(|| format!("Invalid {}: {}", spec.name, value))
}

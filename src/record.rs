//! Dynamic records: the row type every resource shares.
//!
//! A [`Record`] is a stable identifier plus a field-name to scalar-value
//! mapping. The identifier is assigned by the server on create and never
//! changes; every other field is mutable through the edit dialog.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TabulaError};

/// Server-assigned record identifier.
///
/// Endpoints disagree on whether ids are JSON numbers or strings, so both
/// are accepted and compared as distinct values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Str(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Str(s)
    }
}

/// A single scalar field value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Empty for validation purposes: null or blank text. A false checkbox
    /// and the number zero are present values, not empty ones.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Display form used for search matching, table cells, and export.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            FieldValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

/// Field-name to value mapping, as sent to and received from the server.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// One persisted business entity (client, task, project, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub fields: FieldMap,
}

impl Record {
    pub fn new(id: impl Into<RecordId>, fields: FieldMap) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Build a record from a JSON object. The `id` key is required; the
    /// remaining scalar entries become fields. Nested arrays and objects
    /// are not part of the row model and are skipped.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(TabulaError::MalformedResponse(format!(
                "expected a JSON object for a record, got {value}"
            )));
        };

        let mut id = None;
        let mut fields = FieldMap::new();
        for (key, entry) in map {
            if key == "id" {
                id = Some(match entry {
                    Value::Number(n) if n.is_i64() => {
                        RecordId::Int(n.as_i64().unwrap_or_default())
                    }
                    Value::String(s) => RecordId::Str(s),
                    other => {
                        return Err(TabulaError::MalformedResponse(format!(
                            "record id must be an integer or string, got {other}"
                        )));
                    }
                });
                continue;
            }
            let field = match entry {
                Value::Null => FieldValue::Null,
                Value::Bool(b) => FieldValue::Bool(b),
                Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or_default()),
                Value::String(s) => FieldValue::Text(s),
                Value::Array(_) | Value::Object(_) => continue,
            };
            fields.insert(key, field);
        }

        let id = id.ok_or_else(|| {
            TabulaError::MalformedResponse("record is missing an 'id' field".to_string())
        })?;
        Ok(Record { id, fields })
    }

    /// Flatten back into a single JSON object with the id inlined.
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert(
            "id".to_string(),
            match &self.id {
                RecordId::Int(n) => Value::from(*n),
                RecordId::Str(s) => Value::from(s.clone()),
            },
        );
        for (key, value) in &self.fields {
            let entry = match value {
                FieldValue::Null => Value::Null,
                FieldValue::Bool(b) => Value::from(*b),
                FieldValue::Number(n) => Value::from(*n),
                FieldValue::Text(s) => Value::from(s.clone()),
            };
            map.insert(key.clone(), entry);
        }
        Value::Object(map)
    }
}

impl Serialize for Record {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Record::from_json(value).map_err(serde::de::Error::custom)
    }
}

//! Lookup records.
//!
//! A record is an open JSON object. Which fields matter is decided by the
//! configuration (the match field and the return fields), not by a schema.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LookupError, Result};

/// An immutable, ordered snapshot of records.
pub type RecordSet = Arc<[Record]>;

/// A single lookup record: a mapping from field name to JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create a record from a JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Get the display string of a field; missing fields are empty.
    pub fn field_string(&self, field: &str) -> String {
        self.get(field).map(value_to_string).unwrap_or_default()
    }

    /// The underlying JSON object.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for Record {
    type Error = LookupError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(LookupError::payload(format!(
                "expected a record object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

/// The display string of a JSON value.
///
/// Strings are used as-is, numbers and booleans use their JSON text, `null`
/// is empty, arrays join their elements with `,` and objects render as
/// compact JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Turn a JSON array of objects into a record set.
pub fn records_from_value(value: Value) -> Result<RecordSet> {
    let Value::Array(items) = value else {
        return Err(LookupError::payload(format!(
            "expected an array of records, found {}",
            json_kind(&value)
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(fields) => Ok(Record(fields)),
            other => Err(LookupError::payload(format!(
                "record {index} is {}, expected an object",
                json_kind(&other)
            ))),
        })
        .collect::<Result<Vec<_>>>()
        .map(RecordSet::from)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

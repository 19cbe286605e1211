//! Parameter bag
//!
//! The resolved, user-supplied values for one invocation. Values are scalars,
//! timestamps, or nested collections (e.g. `additionalRegisterFields`).
//! Mappings address nested values with dot paths such as
//! `additionalRegistrantsFields.attendedLive.attended_live_timestamp`.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "JsonValue", into = "JsonValue")]
pub enum ParamValue {
    /// Explicitly unset
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// A point in time; sent as RFC 3339 unless a transform converts it
    Timestamp(DateTime<Utc>),
    List(Vec<ParamValue>),
    /// Nested group of parameters
    Collection(ParameterBag),
}

impl ParamValue {
    /// Check if the value counts as unset
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get as a nested collection
    pub fn as_collection(&self) -> Option<&ParameterBag> {
        match self {
            Self::Collection(bag) => Some(bag),
            _ => None,
        }
    }

    /// Convert to the JSON value sent on the wire
    pub fn to_json(&self) -> JsonValue {
        JsonValue::from(self.clone())
    }
}

impl From<JsonValue> for ParamValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => Self::Number(n),
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            JsonValue::Object(map) => Self::Collection(ParameterBag(
                map.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
            )),
        }
    }
}

impl From<ParamValue> for JsonValue {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Null => JsonValue::Null,
            ParamValue::Bool(b) => JsonValue::Bool(b),
            ParamValue::Number(n) => JsonValue::Number(n),
            ParamValue::String(s) => JsonValue::String(s),
            ParamValue::Timestamp(ts) => {
                JsonValue::String(ts.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            ParamValue::List(items) => {
                JsonValue::Array(items.into_iter().map(JsonValue::from).collect())
            }
            ParamValue::Collection(bag) => JsonValue::Object(
                bag.0
                    .into_iter()
                    .map(|(k, v)| (k, JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<ParameterBag> for ParamValue {
    fn from(value: ParameterBag) -> Self {
        Self::Collection(value)
    }
}

/// Resolved parameters for one invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterBag(BTreeMap<String, ParamValue>);

impl ParameterBag {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from a JSON object
    pub fn from_json(value: JsonValue) -> Result<Self> {
        match ParamValue::from(value) {
            ParamValue::Collection(bag) => Ok(bag),
            ParamValue::Null => Ok(Self::new()),
            other => Err(Error::invalid_value(
                "parameters",
                format!("expected a JSON object, got {}", other.to_json()),
            )),
        }
    }

    /// Insert a value, replacing any previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a top-level value
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Resolve a dot path through nested collections
    pub fn lookup(&self, path: &str) -> Option<&ParamValue> {
        let mut parts = path.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.as_collection()?.0.get(part)?;
        }
        Some(current)
    }

    /// Resolve a dot path, treating explicit nulls as absent
    pub fn present(&self, path: &str) -> Option<&ParamValue> {
        self.lookup(path).filter(|v| !v.is_null())
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the bag has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over top-level entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }
}

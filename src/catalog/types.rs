//! Operation descriptor types
//!
//! Declarative descriptor types for YAML parsing. One descriptor is one row
//! of the routing table: method, path, parameter-to-body mappings and an
//! optional pagination rule.

use crate::params::ParamValue;
use crate::types::{JsonValue, Method, Operation, OperationKey, Resource};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Transform
// ============================================================================

/// Pure conversion applied to a parameter before it lands in the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// Timestamp to Unix epoch seconds
    EpochSeconds,
}

/// Accepted layouts for naive (zone-less) timestamps, read as UTC
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

impl Transform {
    /// Apply the transform to a parameter value
    pub fn apply(self, value: &ParamValue) -> JsonValue {
        match self {
            Transform::EpochSeconds => epoch_seconds(value),
        }
    }
}

/// Numbers are taken as epoch seconds already; unparseable strings pass through.
fn epoch_seconds(value: &ParamValue) -> JsonValue {
    match value {
        ParamValue::Timestamp(ts) => JsonValue::from(ts.timestamp()),
        ParamValue::String(s) => parse_epoch_seconds(s)
            .map_or_else(|| JsonValue::String(s.clone()), JsonValue::from),
        other => other.to_json(),
    }
}

/// Parse a timestamp string into epoch seconds
pub fn parse_epoch_seconds(input: &str) -> Option<i64> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.timestamp());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt.and_utc().timestamp());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

// ============================================================================
// Field Mapping
// ============================================================================

/// Maps one parameter (dot path into the bag) onto one body key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FieldMapping {
    /// Parameter path, e.g. `additionalRegisterFields.lastName`
    pub param: String,
    /// JSON body key, e.g. `last_name`
    pub body_key: String,
    /// Optional conversion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

impl FieldMapping {
    /// Create a plain mapping
    pub fn new(param: impl Into<String>, body_key: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            body_key: body_key.into(),
            transform: None,
        }
    }

    /// Attach a transform
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Render a parameter value for the body
    pub fn render(&self, value: &ParamValue) -> JsonValue {
        match self.transform {
            Some(transform) => transform.apply(value),
            None => value.to_json(),
        }
    }
}

// ============================================================================
// Pagination Rule
// ============================================================================

/// Where page information lives in a paginated response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PaginationRule {
    /// Query parameter carrying the next page number
    #[serde(default = "default_page_param")]
    pub page_param: String,
    /// Dot path to the page number the response reports
    #[serde(default = "default_current_page_path")]
    pub current_page_path: String,
    /// Dot path to the next page URL (null on the last page)
    #[serde(default = "default_next_page_url_path")]
    pub next_page_url_path: String,
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_current_page_path() -> String {
    "registrants.current_page".to_string()
}

fn default_next_page_url_path() -> String {
    "registrants.next_page_url".to_string()
}

impl Default for PaginationRule {
    fn default() -> Self {
        Self {
            page_param: default_page_param(),
            current_page_path: default_current_page_path(),
            next_page_url_path: default_next_page_url_path(),
        }
    }
}

// ============================================================================
// Operation Descriptor
// ============================================================================

/// Static description of one API operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OperationDescriptor {
    pub resource: Resource,
    pub operation: Operation,
    #[serde(default)]
    pub method: Method,
    /// Path appended to the base URL
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Applied in order; a repeated body key keeps the last present value
    #[serde(default)]
    pub fields: Vec<FieldMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationRule>,
    /// Dot path to the record array in the response body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_path: Option<String>,
}

/// A body key written by more than one mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateBodyKey {
    pub body_key: String,
    /// Parameters that write the key, in mapping order
    pub params: Vec<String>,
}

impl OperationDescriptor {
    /// Create a POST descriptor without mappings
    pub fn new(resource: Resource, operation: Operation, path: impl Into<String>) -> Self {
        Self {
            resource,
            operation,
            method: Method::POST,
            path: path.into(),
            description: None,
            fields: Vec::new(),
            pagination: None,
            records_path: None,
        }
    }

    /// Add a field mapping
    #[must_use]
    pub fn field(mut self, mapping: FieldMapping) -> Self {
        self.fields.push(mapping);
        self
    }

    /// Enable pagination
    #[must_use]
    pub fn paginated(mut self, rule: PaginationRule) -> Self {
        self.pagination = Some(rule);
        self
    }

    /// Set the record path
    #[must_use]
    pub fn with_records_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = Some(path.into());
        self
    }

    /// Catalog key for this descriptor
    pub fn key(&self) -> OperationKey {
        OperationKey::new(self.resource, self.operation)
    }

    /// Whether the operation supports pagination at all
    pub fn is_paginated(&self) -> bool {
        self.pagination.is_some()
    }

    /// Every body key the descriptor can emit, excluding `api_key`
    pub fn body_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.fields.iter().map(|f| f.body_key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Body keys written by more than one mapping
    pub fn duplicate_body_keys(&self) -> Vec<DuplicateBodyKey> {
        let mut by_key: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for mapping in &self.fields {
            by_key
                .entry(mapping.body_key.as_str())
                .or_default()
                .push(mapping.param.clone());
        }

        by_key
            .into_iter()
            .filter(|(_, params)| params.len() > 1)
            .map(|(key, params)| DuplicateBodyKey {
                body_key: key.to_string(),
                params,
            })
            .collect()
    }
}

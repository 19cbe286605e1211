//! Common types used throughout the connector
//!
//! This module contains shared type definitions, type aliases,
//! and the identifiers used to address operations in the catalog.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Query string parameters, ordered so rendered requests are deterministic
pub type QueryMap = BTreeMap<String, String>;

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://api.webinarjam.com";

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    GET,
    #[default]
    POST,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::GET => f.write_str("GET"),
            Method::POST => f.write_str("POST"),
        }
    }
}

// ============================================================================
// Platform
// ============================================================================

/// The two products served by the API host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Platform {
    /// Live webinars
    #[default]
    WebinarJam,
    /// Automated (evergreen) webinars
    EverWebinar,
}

impl Platform {
    /// Path used to verify an API key for this platform
    pub fn check_path(self) -> &'static str {
        match self {
            Platform::WebinarJam => "/webinarjam/webinars",
            Platform::EverWebinar => "/everwebinar/webinars",
        }
    }

    /// Stable identifier used in YAML tables and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::WebinarJam => "webinarJam",
            Platform::EverWebinar => "everWebinar",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "webinarjam" => Ok(Platform::WebinarJam),
            "everwebinar" => Ok(Platform::EverWebinar),
            _ => Err(Error::invalid_value(
                "platform",
                format!("expected webinarJam or everWebinar, got '{s}'"),
            )),
        }
    }
}

// ============================================================================
// Resource / Operation
// ============================================================================

/// API resource an operation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    /// Shared lookups (countries and states)
    General,
    /// WebinarJam webinars and registrants
    WebinarJam,
    /// EverWebinar webinars and registrants
    EverWebinar,
}

impl Resource {
    /// Stable identifier used in YAML tables and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::General => "general",
            Resource::WebinarJam => "webinarJam",
            Resource::EverWebinar => "everWebinar",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "general" => Ok(Resource::General),
            "webinarjam" => Ok(Resource::WebinarJam),
            "everwebinar" => Ok(Resource::EverWebinar),
            _ => Err(Error::invalid_value(
                "resource",
                format!("expected general, webinarJam or everWebinar, got '{s}'"),
            )),
        }
    }
}

/// Operation name within a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Get,
    GetMany,
    Register,
    GetRegistrants,
    Unsubscribe,
    GetCountries,
}

impl Operation {
    /// Stable identifier used in YAML tables and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::GetMany => "getMany",
            Operation::Register => "register",
            Operation::GetRegistrants => "getRegistrants",
            Operation::Unsubscribe => "unsubscribe",
            Operation::GetCountries => "getCountries",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Operation::Get),
            "getmany" => Ok(Operation::GetMany),
            "register" => Ok(Operation::Register),
            "getregistrants" => Ok(Operation::GetRegistrants),
            "unsubscribe" => Ok(Operation::Unsubscribe),
            "getcountries" => Ok(Operation::GetCountries),
            _ => Err(Error::invalid_value(
                "operation",
                format!("unknown operation '{s}'"),
            )),
        }
    }
}

/// Catalog key: one row of the routing table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationKey {
    pub resource: Resource,
    pub operation: Operation,
}

impl OperationKey {
    /// Create a new key
    pub fn new(resource: Resource, operation: Operation) -> Self {
        Self {
            resource,
            operation,
        }
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource, self.operation)
    }
}

//! Operation catalog
//!
//! The routing table mapping `(resource, operation)` to an
//! [`OperationDescriptor`]. The request builder interprets descriptors;
//! nothing in this module knows about individual operations.
//!
//! # Overview
//!
//! - `OperationDescriptor` - method, path, field mappings, pagination rule
//! - `Catalog` - lookup table, loadable from YAML
//! - Built-in tables for WebinarJam and EverWebinar

mod builtin;
mod types;

pub use builtin::{get_builtin, is_builtin, list_builtin};
pub use types::{
    parse_epoch_seconds, DuplicateBodyKey, FieldMapping, OperationDescriptor, PaginationRule,
    Transform,
};

use crate::error::{Error, Result};
use crate::types::{Operation, OperationKey, Platform, Resource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// On-disk layout of a routing table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Table name
    pub name: String,
    /// Platform the table targets
    #[serde(default)]
    pub platform: Option<Platform>,
    /// Rows
    #[serde(default)]
    pub operations: Vec<OperationDescriptor>,
}

/// Lookup table of operation descriptors
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    operations: BTreeMap<OperationKey, OperationDescriptor>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding every built-in table
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::new();
        for name in list_builtin() {
            if let Some(yaml) = get_builtin(name) {
                catalog.merge(Self::from_yaml_str(yaml)?);
            }
        }
        Ok(catalog)
    }

    /// Parse a single YAML table
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        let mut catalog = Self::new();

        for descriptor in file.operations {
            validate_descriptor(&descriptor)?;
            let key = descriptor.key();
            if catalog.operations.insert(key, descriptor).is_some() {
                return Err(Error::config(format!(
                    "Table '{}' defines {key} more than once",
                    file.name
                )));
            }
        }

        Ok(catalog)
    }

    /// Load a table by built-in name or file path
    ///
    /// ```ignore
    /// let catalog = Catalog::load("everwebinar")?;
    /// let catalog = Catalog::load("./my-table.yaml")?;
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy();

        if !path_str.contains('/')
            && !path_str.contains('\\')
            && !path_str.ends_with(".yaml")
            && !path_str.ends_with(".yml")
        {
            if let Some(yaml) = get_builtin(&path_str) {
                return Self::from_yaml_str(yaml);
            }
        }

        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config(format!(
                    "Table '{}' not found. Built-in tables: {}. Or provide a path to a YAML file.",
                    path.display(),
                    list_builtin().join(", ")
                ))
            } else {
                Error::config(format!(
                    "Failed to read table file '{}': {e}",
                    path.display()
                ))
            }
        })?;

        Self::from_yaml_str(&content)
    }

    /// Insert a descriptor, returning the one it replaced
    pub fn insert(&mut self, descriptor: OperationDescriptor) -> Option<OperationDescriptor> {
        self.operations.insert(descriptor.key(), descriptor)
    }

    /// Merge another catalog; its rows win on conflict
    pub fn merge(&mut self, other: Catalog) {
        for (key, descriptor) in other.operations {
            if self.operations.insert(key, descriptor).is_some() {
                debug!("Catalog row {key} overridden");
            }
        }
    }

    /// Look up a descriptor
    pub fn get(&self, resource: Resource, operation: Operation) -> Result<&OperationDescriptor> {
        self.lookup(&OperationKey::new(resource, operation))
            .ok_or_else(|| Error::unknown_operation(resource.as_str(), operation.as_str()))
    }

    /// Look up a descriptor by key
    pub fn lookup(&self, key: &OperationKey) -> Option<&OperationDescriptor> {
        self.operations.get(key)
    }

    /// Iterate over rows in key order
    pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.operations.values()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if there are no rows
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Every repeated body key across all rows
    pub fn duplicate_body_keys(&self) -> Vec<(OperationKey, DuplicateBodyKey)> {
        self.operations
            .iter()
            .flat_map(|(key, d)| d.duplicate_body_keys().into_iter().map(move |dup| (*key, dup)))
            .collect()
    }
}

fn validate_descriptor(descriptor: &OperationDescriptor) -> Result<()> {
    let key = descriptor.key();
    if !descriptor.path.starts_with('/') {
        return Err(Error::invalid_value(
            format!("{key}.path"),
            format!("must start with '/', got '{}'", descriptor.path),
        ));
    }
    if let Some(mapping) = descriptor
        .fields
        .iter()
        .find(|m| m.param.is_empty() || m.body_key.is_empty())
    {
        return Err(Error::invalid_value(
            format!("{key}.fields"),
            format!(
                "empty param or body key in mapping '{}' -> '{}'",
                mapping.param, mapping.body_key
            ),
        ));
    }
    Ok(())
}

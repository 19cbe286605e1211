//! Built-in routing tables embedded in the binary
//!
//! The WebinarJam and EverWebinar tables ship as YAML files, so adding an
//! operation means adding a row, not code.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Built-in routing table YAML definitions
pub static BUILTIN_TABLES: LazyLock<BTreeMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut m = BTreeMap::new();
        m.insert("webinarjam", include_str!("../../connectors/webinarjam.yaml"));
        m.insert(
            "everwebinar",
            include_str!("../../connectors/everwebinar.yaml"),
        );
        m
    });

/// Get a built-in table by name
pub fn get_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_TABLES.get(name.to_ascii_lowercase().as_str()).copied()
}

/// Check if a name refers to a built-in table
pub fn is_builtin(name: &str) -> bool {
    get_builtin(name).is_some()
}

/// List all built-in table names
pub fn list_builtin() -> Vec<&'static str> {
    BUILTIN_TABLES.keys().copied().collect()
}

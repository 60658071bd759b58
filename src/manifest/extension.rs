//! Required runtime extensions
//!
//! Declares a capability the execution environment must support before it
//! may run the bundle. Entries use the same single-key grammar as mixin
//! declarations (serde impls in [`super::serialization`]) and keep their
//! declared order.

use std::collections::BTreeMap;

use serde_yaml::Value;

/// A capability the execution environment must provide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequiredExtension {
    pub name: String,

    /// Extension-specific configuration
    pub config: Option<BTreeMap<String, Value>>,
}

impl RequiredExtension {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: None,
        }
    }
}

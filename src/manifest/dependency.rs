//! Bundle dependencies
//!
//! Dependencies keep their declaration order from the source document; the
//! execution engine installs them in that order.

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

/// Another bundle this bundle requires, referenced by image tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    /// Dependency name, referenced by template variables and parameter
    /// sources.
    pub name: String,

    /// Bundle image reference of the dependency.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,

    /// Parameter values forwarded into the dependency, in declaration order.
    #[serde(default, skip_serializing_if = "Mapping::is_empty")]
    pub parameters: Mapping,
}

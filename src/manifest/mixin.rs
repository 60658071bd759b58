//! Mixin declarations
//!
//! A declaration is either a bare mixin name or a single-key mapping of the
//! name to the mixin's configuration:
//!
//! ```yaml
//! mixins:
//! - exec
//! - az:
//!     extensions:
//!     - iot
//! ```
//!
//! The serde impls live in [`super::serialization`].

use serde_yaml::Value;

/// Declares that the manifest is allowed to use a mixin, with optional
/// configuration handed to the mixin's runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct MixinDeclaration {
    /// Mixin name
    pub name: String,

    /// Arbitrary configuration for the mixin
    pub config: Option<Value>,
}

impl MixinDeclaration {
    /// Create a declaration without configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: None,
        }
    }

    /// Create a declaration carrying configuration
    pub fn with_config(name: impl Into<String>, config: Value) -> Self {
        Self {
            name: name.into(),
            config: Some(config),
        }
    }
}

//! Parameter definitions

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::validation::ValidationErrors;
use crate::error::{Result, StevedoreError};
use crate::manifest::Manifest;

/// A parameter the bundle accepts, injected into the execution environment
/// at the declared destination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,

    #[serde(flatten)]
    pub schema: Schema,

    #[serde(default, skip_serializing_if = "Location::is_empty")]
    pub destination: Location,

    /// Populate this parameter from another component's output instead of
    /// user input.
    #[serde(default, skip_serializing_if = "ParameterSource::is_empty")]
    pub source: ParameterSource,

    /// Actions this parameter applies to; empty means all actions.
    #[serde(rename = "applyTo", default, skip_serializing_if = "Vec::is_empty")]
    pub apply_to: Vec<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
}

impl ParameterDefinition {
    /// A file-typed parameter must say where the file lands.
    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();

        if self.schema.is_file() && self.destination.path.as_deref().unwrap_or("").is_empty() {
            errors.absorb(StevedoreError::MissingParameterDestination {
                name: self.name.clone(),
            });
        }

        errors.into_result()
    }

    /// Infer which actions the parameter applies to when the author didn't
    /// say. A value sourced from another component's output cannot exist yet
    /// during install, so such parameters apply to every other action.
    /// Explicit author choices and defaulted parameters are left alone.
    pub fn update_apply_to(&mut self, manifest: &Manifest) {
        if !self.apply_to.is_empty() {
            return;
        }
        if self.schema.default.is_some() {
            return;
        }
        if self.source.output.is_none() {
            return;
        }
        self.apply_to = manifest
            .get_action_names()
            .into_iter()
            .filter(|action| action != "install")
            .collect();
    }
}

/// The structural sub-schema of a parameter or output value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Schema {
    pub fn is_file(&self) -> bool {
        self.schema_type.as_deref() == Some("file")
    }
}

/// Where a value lands in the execution environment: an environment
/// variable, a file path, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Location {
    pub fn is_empty(&self) -> bool {
        self.env.is_none() && self.path.is_none()
    }
}

/// Reference to an output of this bundle or of one of its dependencies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl ParameterSource {
    pub fn is_empty(&self) -> bool {
        self.dependency.is_none() && self.output.is_none()
    }
}

/// Convert a parameter name to its environment variable form.
pub fn param_to_env_var(name: &str) -> String {
    name.to_uppercase().replace(['-', '.'], "_")
}

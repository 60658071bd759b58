//! Output definitions

use serde::{Deserialize, Serialize};

use crate::error::validation::ValidationErrors;
use crate::error::{Result, StevedoreError};
use crate::manifest::parameter::Schema;

/// A value the bundle produces, collected from a file the mixins write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputDefinition {
    pub name: String,

    #[serde(flatten)]
    pub schema: Schema,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
}

impl OutputDefinition {
    /// Outputs are read back from disk, so the path is required.
    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();

        if self.path.as_deref().unwrap_or("").is_empty() {
            errors.absorb(StevedoreError::MissingOutputPath {
                name: self.name.clone(),
            });
        }

        errors.into_result()
    }
}

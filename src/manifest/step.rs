//! Actions and steps
//!
//! An action is an ordered sequence of steps; each step hands an opaque body
//! to exactly one mixin. The step's YAML form is the mapping itself
//! (`- exec: {...}`), so cardinality is enforced by validation rather than
//! the type system: the raw decoded form may legitimately be malformed
//! input under test.

use std::collections::BTreeMap;

use serde_yaml::Value;

use crate::error::{Result, StevedoreError};
use crate::manifest::Manifest;

/// A named lifecycle operation: an ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Action {
    pub steps: Vec<Step>,
}

impl Action {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Validate every step against the manifest's declared mixins.
    ///
    /// Stops at the first failure; the manifest-level pass aggregates one
    /// failure per action. An action with no steps at all is an empty step.
    pub fn validate(&self, manifest: &Manifest) -> Result<()> {
        if self.steps.is_empty() {
            return Err(StevedoreError::EmptyStep);
        }
        for step in &self.steps {
            step.validate(manifest)?;
        }
        Ok(())
    }
}

impl From<Vec<Step>> for Action {
    fn from(steps: Vec<Step>) -> Self {
        Self { steps }
    }
}

/// One unit of work within an action.
///
/// `data` maps the mixin name to the opaque step body passed to that mixin.
/// `None` means the step decoded from a null document node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    pub data: Option<BTreeMap<String, Value>>,
}

impl Step {
    /// The name of the mixin this step is dispatched to: the sole key of
    /// the step mapping. `None` until the step has data.
    pub fn mixin_name(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.keys().next())
            .map(String::as_str)
    }

    /// The optional human-readable description nested inside the step body.
    pub fn description(&self) -> Option<String> {
        let data = self.data.as_ref()?;
        let (_, body) = data.iter().next()?;
        body.get("description")?.as_str().map(ToString::to_string)
    }

    /// Check the step maps to exactly one declared mixin.
    pub fn validate(&self, manifest: &Manifest) -> Result<()> {
        let data = self.data.as_ref();
        match data.map_or(0, BTreeMap::len) {
            0 => Err(StevedoreError::NoMixinSpecified),
            1 => {
                // Guarded by the length match above.
                let name = self.mixin_name().unwrap_or_default();
                if manifest.mixins.iter().any(|mixin| mixin.name == name) {
                    Ok(())
                } else {
                    Err(StevedoreError::MixinNotDeclared {
                        name: name.to_string(),
                    })
                }
            }
            _ => Err(StevedoreError::MultipleMixinsSpecified),
        }
    }
}

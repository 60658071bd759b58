//! Manifest model for stevedore.yaml documents
//!
//! The pipeline is strictly top-to-bottom: decode ([`Manifest::unmarshal`]),
//! derive defaults ([`Manifest::set_defaults`]), validate
//! ([`Manifest::validate`]). The templated-output indexes are read-only
//! views computed on demand from an already-validated manifest.

pub mod credential;
pub mod dependency;
pub mod extension;
pub mod image;
pub mod mixin;
pub mod output;
pub mod parameter;
pub mod serialization;
pub mod step;

mod tests;

// Re-export commonly used types
pub use credential::CredentialDefinition;
pub use dependency::Dependency;
pub use extension::RequiredExtension;
pub use image::MappedImage;
pub use mixin::MixinDeclaration;
pub use output::OutputDefinition;
pub use parameter::{Location, ParameterDefinition, ParameterSource, Schema, param_to_env_var};
pub use step::{Action, Step};

use std::collections::BTreeMap;

use serde_yaml::Value;

use crate::error::validation::ValidationErrors;
use crate::error::{Result, StevedoreError};
use crate::reference::ImageReference;
use crate::template::{self, TemplateVariableReference};

/// The conventional manifest file name.
pub const MANIFEST_FILE_NAME: &str = "stevedore.yaml";

/// A bundle manifest.
///
/// Scalar fields use the empty string for "not set", matching the source
/// document where the keys are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub name: String,
    pub description: String,

    /// Semantic version of the bundle
    pub version: String,

    /// Registry-qualified image reference for the published bundle, from
    /// the manifest's `tag` key. May omit the tag suffix; see
    /// [`Manifest::set_defaults`].
    pub bundle_tag: String,

    /// Installer image reference, derived from `bundle_tag`
    pub image: String,

    /// Dockerfile template used when building the installer image
    pub dockerfile: String,

    pub mixins: Vec<MixinDeclaration>,

    pub install: Action,
    pub upgrade: Action,
    pub uninstall: Action,

    /// User-defined actions beyond the three built-ins, decoded from
    /// unrecognized top-level keys holding step sequences
    pub custom_actions: BTreeMap<String, Action>,

    pub parameters: Vec<ParameterDefinition>,
    pub credentials: Vec<CredentialDefinition>,
    pub outputs: Vec<OutputDefinition>,

    /// Dependencies in declaration order; order is how they are installed
    pub dependencies: Vec<Dependency>,

    /// Images the bundle references at run time, keyed by logical name
    pub images: BTreeMap<String, MappedImage>,

    /// Unrecognized top-level keys, preserved verbatim
    pub custom: BTreeMap<String, Value>,

    /// Extensions the execution environment must support, in declared order
    pub required: Vec<RequiredExtension>,

    /// Template variables used by the document, in first-occurrence order.
    /// Derived at decode time, never serialized.
    pub template_variables: Vec<String>,
}

/// A templated reference to one output of one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyOutputReference {
    pub dependency: String,
    pub output: String,
}

impl Manifest {
    /// Decode a manifest document and record the template variables it uses.
    pub fn unmarshal(data: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(data)?;
        let mut manifest: Manifest = serde_yaml::from_value(document.clone())?;
        manifest.template_variables = template::extract_variables(&document);
        Ok(manifest)
    }

    /// Decode, derive defaults, and validate in one call.
    pub fn load(data: &str) -> Result<Self> {
        let mut manifest = Self::unmarshal(data)?;
        manifest.set_defaults()?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Fill in the bundle tag and installer image from the version.
    ///
    /// Does nothing until a bundle tag is set. An untagged bundle tag gets
    /// `:v<version>`; the installer image is the bundle repository with
    /// `-installer` appended to its last path segment, carrying the same
    /// tag. Deterministic and idempotent.
    pub fn set_defaults(&mut self) -> Result<()> {
        if self.bundle_tag.is_empty() {
            return Ok(());
        }

        let reference = ImageReference::parse(&self.bundle_tag)?;
        let tagged = match reference.tag() {
            Some(_) => reference,
            None => reference.with_tag(&format!("v{}", self.version))?,
        };
        self.bundle_tag = tagged.to_string();

        let installer = tagged.with_repository_suffix("-installer")?;
        self.image = installer.to_string();

        Ok(())
    }

    /// Walk the whole manifest and report every violation found, aggregated
    /// into a single error. Never stops at the first failure.
    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();

        if self.dockerfile == "Dockerfile" {
            errors.absorb(StevedoreError::ReservedDockerfileName);
        }

        if !self.version.is_empty() {
            if let Err(err) = semver::Version::parse(&self.version) {
                errors.absorb(StevedoreError::InvalidVersion {
                    version: self.version.clone(),
                    reason: err.to_string(),
                });
            }
        }

        if let Err(err) = self.install.validate(self) {
            errors.push(format!("validation of action \"install\" failed: {err}"));
        }
        // Upgrade is optional; install and uninstall are not.
        if !self.upgrade.is_empty() {
            if let Err(err) = self.upgrade.validate(self) {
                errors.push(format!("validation of action \"upgrade\" failed: {err}"));
            }
        }
        if let Err(err) = self.uninstall.validate(self) {
            errors.push(format!("validation of action \"uninstall\" failed: {err}"));
        }
        for (name, action) in &self.custom_actions {
            if let Err(err) = action.validate(self) {
                errors.push(format!("validation of action \"{name}\" failed: {err}"));
            }
        }

        for parameter in &self.parameters {
            if let Err(err) = parameter.validate() {
                errors.absorb(err);
            }
        }
        for output in &self.outputs {
            if let Err(err) = output.validate() {
                errors.absorb(err);
            }
        }
        for image in self.images.values() {
            if let Err(err) = image.validate() {
                errors.absorb(err);
            }
        }

        errors.into_result()
    }

    /// Look up an action by name, built-in or custom.
    pub fn get_action(&self, name: &str) -> Option<&Action> {
        match name {
            "install" => Some(&self.install),
            "upgrade" => Some(&self.upgrade),
            "uninstall" => Some(&self.uninstall),
            custom => self.custom_actions.get(custom),
        }
    }

    /// The sorted names of every action this manifest declares: built-ins
    /// with at least one step, plus all custom actions. Computed freshly on
    /// each call.
    pub fn get_action_names(&self) -> Vec<String> {
        let built_ins = [
            ("install", &self.install),
            ("upgrade", &self.upgrade),
            ("uninstall", &self.uninstall),
        ];

        let mut names: Vec<String> = built_ins
            .into_iter()
            .filter(|(_, action)| !action.is_empty())
            .map(|(name, _)| name.to_string())
            .collect();
        names.extend(self.custom_actions.keys().cloned());
        names.sort();
        names
    }

    /// Declared outputs whose value is produced via templating, keyed by
    /// output name. A referenced but undeclared output is omitted, since an
    /// explicit parameter may supply it instead.
    pub fn get_templated_outputs(&self) -> BTreeMap<String, OutputDefinition> {
        let mut outputs = BTreeMap::new();
        for variable in &self.template_variables {
            if let Some(TemplateVariableReference::Output(name)) =
                TemplateVariableReference::parse(variable)
            {
                if let Some(definition) = self.outputs.iter().find(|output| output.name == name) {
                    outputs.insert(name, definition.clone());
                }
            }
        }
        outputs
    }

    /// Dependency outputs referenced via templating, keyed
    /// `<dependency>.<output>`. References to undeclared dependencies are
    /// omitted.
    pub fn get_templated_dependency_outputs(&self) -> BTreeMap<String, DependencyOutputReference> {
        let mut outputs = BTreeMap::new();
        for variable in &self.template_variables {
            if let Some(TemplateVariableReference::DependencyOutput { dependency, output }) =
                TemplateVariableReference::parse(variable)
            {
                if self.dependencies.iter().any(|dep| dep.name == dependency) {
                    outputs.insert(
                        format!("{dependency}.{output}"),
                        DependencyOutputReference { dependency, output },
                    );
                }
            }
        }
        outputs
    }
}

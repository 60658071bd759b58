//! Error types and handling for Stevedore
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`manifest`]: Manifest loading and decoding errors
//! - [`reference`]: Image reference errors
//! - [`validation`]: The aggregated validation error collector

// Declare submodules
pub mod manifest;
pub mod reference;
pub mod validation;

// Re-export convenience constructors from submodules (used in tests only)
#[allow(unused_imports)]
pub use manifest::{
    not_found as manifest_not_found, parse_failed as manifest_parse_failed, unreachable_url,
};
#[allow(unused_imports)]
pub use reference::{invalid as invalid_reference, invalid_digest};
pub use validation::ValidationErrors;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Stevedore operations
#[derive(Error, Diagnostic, Debug)]
pub enum StevedoreError {
    // Loader errors, surfaced by the byte-acquisition collaborator
    #[error("the specified stevedore configuration file {path} does not exist")]
    #[diagnostic(
        code(stevedore::manifest::not_found),
        help("Check that the path points at your stevedore.yaml")
    )]
    ManifestNotFound { path: String },

    #[error("could not reach url {url}")]
    #[diagnostic(code(stevedore::manifest::unreachable_url))]
    UrlUnreachable { url: String, reason: String },

    // Decode errors
    #[error("could not parse manifest: {reason}")]
    #[diagnostic(code(stevedore::manifest::parse_failed))]
    ManifestParseFailed { reason: String },

    // Manifest-level validation errors
    #[error(
        "Dockerfile template cannot be named 'Dockerfile' because that is the filename generated during stevedore build"
    )]
    #[diagnostic(code(stevedore::manifest::reserved_dockerfile))]
    ReservedDockerfileName,

    #[error("invalid semantic version {version}: {reason}")]
    #[diagnostic(
        code(stevedore::manifest::invalid_version),
        help("Bundle versions follow semantic versioning, e.g. 0.1.0 or 1.2.3-beta.1")
    )]
    InvalidVersion { version: String, reason: String },

    // Step validation errors
    #[error("no mixin specified")]
    #[diagnostic(code(stevedore::step::no_mixin))]
    NoMixinSpecified,

    #[error("more than one mixin specified")]
    #[diagnostic(code(stevedore::step::multiple_mixins))]
    MultipleMixinsSpecified,

    #[error("mixin ({name}) was not declared")]
    #[diagnostic(
        code(stevedore::step::undeclared_mixin),
        help("Declare the mixin in the manifest's mixins section")
    )]
    MixinNotDeclared { name: String },

    #[error("found an empty step")]
    #[diagnostic(code(stevedore::step::empty))]
    EmptyStep,

    // Parameter and output validation errors
    #[error("no destination path supplied for parameter {name}")]
    #[diagnostic(code(stevedore::parameter::missing_destination))]
    MissingParameterDestination { name: String },

    #[error("no path supplied for output {name}")]
    #[diagnostic(code(stevedore::output::missing_path))]
    MissingOutputPath { name: String },

    // Image reference errors
    #[error("invalid image reference {reference}: {reason}")]
    #[diagnostic(code(stevedore::reference::invalid))]
    InvalidImageReference { reference: String, reason: String },

    #[error("invalid image digest {digest}: expected sha256 followed by 64 hex characters")]
    #[diagnostic(code(stevedore::reference::invalid_digest))]
    InvalidImageDigest { digest: String },

    // Aggregated validation failures, see [`validation::ValidationErrors`]
    #[error(transparent)]
    #[diagnostic(code(stevedore::manifest::validation_failed))]
    ValidationFailed(#[from] ValidationErrors),
}

impl From<serde_yaml::Error> for StevedoreError {
    fn from(err: serde_yaml::Error) -> Self {
        StevedoreError::ManifestParseFailed {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, StevedoreError>;

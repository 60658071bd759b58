//! Credential definitions
//!
//! Every credential named by a manifest is required: the manifest is the
//! source of truth for what the bundle needs, so decoding always forces
//! `required` on (see [`super::serialization`]).

use crate::manifest::parameter::Location;

/// A credential the bundle needs, injected at the declared destination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredentialDefinition {
    pub name: String,

    pub required: bool,

    /// Destination fields (`env`, `path`) appear inline in the credential
    /// mapping.
    pub destination: Location,
}

impl CredentialDefinition {
    pub fn new(name: impl Into<String>, destination: Location) -> Self {
        Self {
            name: name.into(),
            required: true,
            destination,
        }
    }
}

//! Image map entries
//!
//! The `images` section maps logical names to container images the bundle
//! references at run time, pinned by digest when reproducibility matters.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reference;

/// A referenced container image, optionally pinned to a digest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappedImage {
    pub repository: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl MappedImage {
    /// Check the repository name grammar and, when present, the digest
    /// format. A missing digest is valid.
    pub fn validate(&self) -> Result<()> {
        if let Some(digest) = &self.digest {
            reference::validate_digest(digest)?;
        }
        reference::validate_repository(&self.repository)
    }
}

//! Container image reference parsing
//!
//! A reference is `repository[:tag][@digest]`. The repository may carry a
//! registry prefix (host, optionally with a port), so a colon only counts as
//! the tag separator when it appears after the last slash.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, StevedoreError};

#[allow(clippy::unwrap_used)]
static PATH_COMPONENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:(?:\.|_|__|-+)[a-z0-9]+)*$").unwrap());

#[allow(clippy::unwrap_used)]
static DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9](?:[a-zA-Z0-9.-]*[a-zA-Z0-9])?(?::[0-9]+)?$").unwrap()
});

#[allow(clippy::unwrap_used)]
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._-]{0,127}$").unwrap());

#[allow(clippy::unwrap_used)]
static DIGEST: Lazy<Regex> = Lazy::new(|| Regex::new(r"^sha256:[0-9a-f]{64}$").unwrap());

/// A parsed container image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    repository: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl ImageReference {
    /// Parse a reference of the form `repository[:tag][@digest]`.
    pub fn parse(raw: &str) -> Result<Self> {
        let (rest, digest) = match raw.split_once('@') {
            Some((rest, digest)) => (rest, Some(digest.to_string())),
            None => (raw, None),
        };

        if let Some(digest) = &digest {
            validate_digest(digest)?;
        }

        // A colon before the last slash belongs to a registry port.
        let last_slash = rest.rfind('/');
        let (repository, tag) = match rest.rfind(':') {
            Some(colon) if last_slash.is_none_or(|slash| colon > slash) => {
                (&rest[..colon], Some(rest[colon + 1..].to_string()))
            }
            _ => (rest, None),
        };

        validate_repository(repository).map_err(|_| StevedoreError::InvalidImageReference {
            reference: raw.to_string(),
            reason: "invalid repository name".to_string(),
        })?;

        if let Some(tag) = &tag {
            if !TAG.is_match(tag) {
                return Err(StevedoreError::InvalidImageReference {
                    reference: raw.to_string(),
                    reason: format!("invalid tag {tag}"),
                });
            }
        }

        Ok(Self {
            repository: repository.to_string(),
            tag,
            digest,
        })
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Returns a copy of this reference carrying the given tag.
    pub fn with_tag(&self, tag: &str) -> Result<Self> {
        if !TAG.is_match(tag) {
            return Err(StevedoreError::InvalidImageReference {
                reference: self.repository.clone(),
                reason: format!("invalid tag {tag}"),
            });
        }
        Ok(Self {
            repository: self.repository.clone(),
            tag: Some(tag.to_string()),
            digest: self.digest.clone(),
        })
    }

    /// Returns a copy with `suffix` appended to the final path segment of
    /// the repository, preserving any registry prefix.
    pub fn with_repository_suffix(&self, suffix: &str) -> Result<Self> {
        let repository = format!("{}{suffix}", self.repository);
        validate_repository(&repository)?;
        Ok(Self {
            repository,
            tag: self.tag.clone(),
            digest: self.digest.clone(),
        })
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repository)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{tag}")?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{digest}")?;
        }
        Ok(())
    }
}

/// Validate an image repository name: an optional registry host first
/// segment, then lowercase path components separated by single slashes.
pub fn validate_repository(repository: &str) -> Result<()> {
    let invalid = |reason: &str| StevedoreError::InvalidImageReference {
        reference: repository.to_string(),
        reason: reason.to_string(),
    };

    if repository.is_empty() {
        return Err(invalid("repository is empty"));
    }

    let segments: Vec<&str> = repository.split('/').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(invalid("repository contains an empty path segment"));
    }

    let mut components = segments.as_slice();
    if segments.len() > 1 && is_registry(segments[0]) {
        if !DOMAIN.is_match(segments[0]) {
            return Err(invalid("invalid registry host"));
        }
        components = &segments[1..];
    }

    for component in components {
        if !PATH_COMPONENT.is_match(component) {
            return Err(invalid("invalid repository path component"));
        }
    }

    Ok(())
}

/// Validate an image digest: `sha256:` followed by 64 lowercase hex characters.
pub fn validate_digest(digest: &str) -> Result<()> {
    if DIGEST.is_match(digest) {
        Ok(())
    } else {
        Err(StevedoreError::InvalidImageDigest {
            digest: digest.to_string(),
        })
    }
}

// The first segment is a registry host only when it could not be a plain
// repository component: it contains a dot or a port, or is "localhost".
fn is_registry(segment: &str) -> bool {
    segment == "localhost" || segment.contains('.') || segment.contains(':')
}

//! Image reference errors

use super::StevedoreError;

/// Creates an invalid image reference error
pub fn invalid(reference: impl Into<String>, reason: impl Into<String>) -> StevedoreError {
    StevedoreError::InvalidImageReference {
        reference: reference.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid image digest error
pub fn invalid_digest(digest: impl Into<String>) -> StevedoreError {
    StevedoreError::InvalidImageDigest {
        digest: digest.into(),
    }
}

//! Manifest loading and decoding errors

use super::StevedoreError;

/// Creates a manifest not found error
pub fn not_found(path: impl Into<String>) -> StevedoreError {
    StevedoreError::ManifestNotFound { path: path.into() }
}

/// Creates an unreachable url error
pub fn unreachable_url(url: impl Into<String>, reason: impl Into<String>) -> StevedoreError {
    StevedoreError::UrlUnreachable {
        url: url.into(),
        reason: reason.into(),
    }
}

/// Creates a manifest parse failed error
pub fn parse_failed(reason: impl Into<String>) -> StevedoreError {
    StevedoreError::ManifestParseFailed {
        reason: reason.into(),
    }
}

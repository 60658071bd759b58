//! Aggregated validation failures
//!
//! Validation walks the whole manifest and reports every violation it finds
//! in one pass, so callers never have to re-validate to discover the next
//! problem.

use std::fmt;

use miette::Diagnostic;

use super::StevedoreError;

/// An ordered collection of validation failure messages.
///
/// A single failure displays as just its message. Multiple failures display
/// as a banner with one bullet per failure:
///
/// ```text
/// 2 errors occurred:
///     * no mixin specified
///     * no path supplied for output msg
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record a failure message.
    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Record a failure from another validation scope.
    ///
    /// An already-aggregated error is flattened so its individual messages
    /// become bullets here rather than one nested banner.
    pub fn absorb(&mut self, error: StevedoreError) {
        match error {
            StevedoreError::ValidationFailed(inner) => self.errors.extend(inner.errors),
            other => self.errors.push(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Fails with the collected messages when any failure was recorded.
    pub fn into_result(self) -> Result<(), StevedoreError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(StevedoreError::ValidationFailed(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [only] = self.errors.as_slice() {
            return write!(f, "{only}");
        }
        writeln!(f, "{} errors occurred:", self.errors.len())?;
        for error in &self.errors {
            writeln!(f, "\t* {error}")?;
        }
        writeln!(f)
    }
}

impl std::error::Error for ValidationErrors {}

impl Diagnostic for ValidationErrors {}

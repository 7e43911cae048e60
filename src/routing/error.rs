//! Mapping table errors.

use thiserror::Error;

/// Errors raised while building or querying a mapping table.
///
/// A request path that no pattern accepts is not an error; see
/// [`Resolution::NoMatch`](crate::routing::Resolution::NoMatch).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Pattern string matches none of the recognized shapes.
    #[error("invalid url pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },

    /// Same literal pattern registered twice in one table.
    #[error("url pattern {pattern:?} is already registered")]
    DuplicatePattern { pattern: String },

    /// Resolution found the table in a state registration should have ruled out.
    #[error("mapping table inconsistency: {0}")]
    InternalConsistency(String),
}

impl MappingError {
    pub(crate) fn invalid(pattern: &str, reason: &'static str) -> Self {
        MappingError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        }
    }

    /// Static label for metrics.
    pub fn code(&self) -> &'static str {
        match self {
            MappingError::InvalidPattern { .. } => "invalid_pattern",
            MappingError::DuplicatePattern { .. } => "duplicate_pattern",
            MappingError::InternalConsistency(_) => "internal_consistency",
        }
    }
}

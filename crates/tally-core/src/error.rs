//! Reporter errors

use crate::outcome::Outcome;
use thiserror::Error;

/// Errors returned by [`Reporter`](crate::Reporter) operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("invalid test case: {0}")]
    InvalidCase(#[from] InvalidCase),

    #[error("run already finalized; cannot record '{name}'")]
    RunFinalized { name: String },
}

/// The rule a rejected `record` call broke
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCase {
    #[error("test name must not be empty")]
    EmptyName,

    #[error("'{name}' has outcome {outcome} but no detail")]
    MissingDetail { name: String, outcome: Outcome },

    #[error("'{name}' passed but carries a detail")]
    UnexpectedDetail { name: String },

    #[error("'{name}' was already recorded in this run")]
    DuplicateName { name: String },
}

/// Result type for reporter operations
pub type ReportResult<T> = Result<T, ReportError>;

impl ReportError {
    /// Whether this error rejected malformed input
    pub fn is_invalid_case(&self) -> bool {
        matches!(self, ReportError::InvalidCase(_))
    }

    /// Whether this error rejected a write to a finalized run
    pub fn is_run_finalized(&self) -> bool {
        matches!(self, ReportError::RunFinalized { .. })
    }
}

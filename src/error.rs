// src/error.rs

//! Error types for recipe evaluation and cooking

use crate::recipe::Phase;
use thiserror::Error;

/// Errors produced while evaluating or cooking a recipe
///
/// Every variant is fatal to the current invocation. Nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// A user override named an option the recipe does not declare
    #[error("Unknown option '{0}'")]
    UnknownOption(String),

    /// A user override value is outside the option's declared domain
    #[error("Invalid value '{value}' for option '{option}'")]
    InvalidOptionValue { option: String, value: String },

    /// A predicate referenced an option missing from the resolved configuration
    #[error("Condition references undefined option '{0}'")]
    UndefinedOptionReference(String),

    /// The recipe failed a static invariant or platform check
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The external build tool returned a non-zero exit status
    #[error("{phase} phase failed with exit status {exit_status}")]
    ExternalBuildFailure { phase: Phase, exit_status: i32 },

    /// The dependency cache could not provide a requirement
    #[error("Dependency unavailable: {name}/{version}")]
    DependencyUnavailable { name: String, version: String },

    /// A phase was requested out of sequence
    #[error("Cannot run {attempted} phase from state {state}")]
    PhaseOrder {
        attempted: Phase,
        state: crate::recipe::PhaseState,
    },

    /// Recipe or profile text could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Filesystem or process I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_failure_message_carries_phase_and_status() {
        let err = Error::ExternalBuildFailure {
            phase: Phase::Build,
            exit_status: 2,
        };
        assert_eq!(err.to_string(), "build phase failed with exit status 2");
    }

    #[test]
    fn test_invalid_value_message() {
        let err = Error::InvalidOptionValue {
            option: "shared".to_string(),
            value: "maybe".to_string(),
        };
        assert!(err.to_string().contains("'maybe'"));
        assert!(err.to_string().contains("'shared'"));
    }
}

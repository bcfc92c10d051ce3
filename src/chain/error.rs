//! Errors raised while building or evaluating chains.

use crate::core::MutationError;
use thiserror::Error;

/// Errors surfaced by the registry, the chain builder and the evaluator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChainError {
    #[error("Unknown operation '{name}'")]
    UnknownOperation { name: String },

    #[error("Operation '{operation}' has no stage '{stage}' (expected one of: {})", .expected.join(", "))]
    UnknownStage {
        operation: String,
        stage: String,
        expected: Vec<String>,
    },

    #[error("Operation '{operation}' needs another argument group (stages: {})", .stages.join(", "))]
    IncompleteOperation {
        operation: String,
        stages: Vec<String>,
    },

    #[error("Operation '{operation}' was already complete; no further stage expected")]
    AlreadyComplete { operation: String },

    #[error("Invalid arguments for '{operation}': {reason}")]
    InvalidArguments { operation: String, reason: String },

    /// A mutation failed while computing its patch. Passed through unchanged.
    #[error(transparent)]
    Evaluation(#[from] MutationError),
}

impl ChainError {
    pub(crate) fn invalid_arguments(operation: &str, reason: impl Into<String>) -> Self {
        ChainError::InvalidArguments {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }
}

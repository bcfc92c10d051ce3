//! Registry build errors.

use thiserror::Error;

/// Errors that can occur when building an operation registry.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Operation '{name}' registered twice")]
    DuplicateOperation { name: String },

    #[error("No operations registered. Call .register(name, factory) or .with_builtins()")]
    EmptyRegistry,
}

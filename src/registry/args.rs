//! Argument helpers for operation factories.
//!
//! Factories receive their arguments as a JSON slice. These helpers check
//! arity and shape, reporting failures as `ChainError::InvalidArguments`.

use crate::chain::ChainError;
use crate::core::kind_of;
use serde_json::Value;

/// Require exactly `expected` arguments.
pub fn expect_arity(operation: &str, args: &[Value], expected: usize) -> Result<(), ChainError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ChainError::invalid_arguments(
            operation,
            format!("expected {expected} argument(s), got {}", args.len()),
        ))
    }
}

/// Read a state key (a string) at `index`.
pub fn key_arg(operation: &str, args: &[Value], index: usize) -> Result<String, ChainError> {
    match args.get(index) {
        Some(Value::String(key)) => Ok(key.clone()),
        Some(other) => Err(ChainError::invalid_arguments(
            operation,
            format!("argument {index} must be a state key, got {}", kind_of(other)),
        )),
        None => Err(ChainError::invalid_arguments(
            operation,
            format!("missing argument {index}"),
        )),
    }
}

/// Read any value at `index`.
pub fn value_arg(operation: &str, args: &[Value], index: usize) -> Result<Value, ChainError> {
    args.get(index)
        .cloned()
        .ok_or_else(|| ChainError::invalid_arguments(operation, format!("missing argument {index}")))
}

//! Chain builder.
//!
//! A chain is an immutable list of bound mutations. Every extension returns
//! a new chain, so a chain can be shared and extended from several places
//! without affecting the others.
//!
//! Chains are extended either by name through [`Chain::extend`] (the
//! registry acts as the capability table) or through the typed shorthands
//! for the built-in operations.

pub mod builder;
pub mod error;
pub mod pending;
pub mod shorthand;

pub use builder::Chain;
pub use error::ChainError;
pub use pending::{Extended, PendingChain};
pub use shorthand::{decrement, increment, nullify, push_item, set_field, update_loading};

use serde_json::Value;

/// Start a chain with the operation registered as `name` in the global
/// registry.
///
/// # Example
///
/// ```
/// use chainable::chain::start;
/// use serde_json::json;
///
/// let chain = start("nullify", vec![json!("xyz")])
///     .unwrap()
///     .into_chain()
///     .unwrap();
/// assert_eq!(chain.len(), 1);
/// ```
pub fn start(name: &str, args: Vec<Value>) -> Result<Extended, ChainError> {
    Chain::empty().extend(name, args)
}

//! Chainable: composable, declarative state mutation chains
//!
//! A chain is an immutable, ordered list of named operations such as
//! "set field X" or "increment field Y". Evaluating a chain against a state
//! never mutates the state: it yields a *patch*, a mapping of keys to new
//! values, which the evaluator shallow-merges into a fresh state snapshot.
//!
//! # Core Concepts
//!
//! - **Registry**: Read-only table of operation factories, keyed by name
//! - **Bound mutation**: Pure state-to-patch function tagged with the
//!   operation name and arguments that produced it
//! - **Chain**: Immutable sequence of bound mutations; extending a chain
//!   always returns a new one
//! - **Analyse / Exec**: Introspection of a chain, and evaluation into a
//!   new state
//!
//! # Example
//!
//! ```rust
//! use chainable::{analyse, exec, set_field, State};
//! use serde_json::{json, Value};
//!
//! let transform = set_field("foo", "bar")
//!     .unwrap()
//!     .and_then()
//!     .increment("num")
//!     .unwrap()
//!     .and_then()
//!     .nullify("num")
//!     .unwrap();
//!
//! let mut state = State::new();
//! state.insert("num".into(), json!(33));
//!
//! // Last write wins
//! let patch = transform.apply(&state).unwrap();
//! assert_eq!(patch.get("num"), Some(&Value::Null));
//!
//! assert_eq!(
//!     serde_json::to_value(analyse(&transform)).unwrap(),
//!     json!([
//!         { "setField": ["foo", "bar"] },
//!         { "increment": ["num"] },
//!         { "nullify": ["num"] }
//!     ])
//! );
//!
//! let next = exec(&state, &transform).unwrap();
//! assert_eq!(Value::Object(next), json!({ "num": null, "foo": "bar" }));
//! ```

pub mod chain;
pub mod core;
pub mod eval;
pub mod history;
pub mod registry;

// Re-export commonly used types
pub use chain::{
    decrement, increment, nullify, push_item, set_field, update_loading, Chain, ChainError,
    Extended, PendingChain,
};
pub use self::core::{BoundMutation, MutationError, Patch, State};
pub use eval::{analyse, exec, exec_with_action, OperationRecord};
pub use registry::{Registry, RegistryBuilder};

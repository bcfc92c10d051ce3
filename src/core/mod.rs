//! Core value types for mutation chains.
//!
//! This module contains the pure building blocks:
//! - `State` and `Patch` with their shallow-merge semantics
//! - `BoundMutation`, a state-to-patch function tagged with its origin
//!
//! Nothing in this module has side effects.

mod mutation;
mod patch;

pub(crate) use mutation::kind_of;
pub use mutation::{BoundMutation, MutationError, MutationFn, UNNAMED};
pub use patch::{Patch, State};

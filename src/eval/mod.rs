//! Introspection and evaluation of finished chains.

mod analyse;
mod exec;

pub use analyse::{analyse, OperationRecord};
pub use exec::{exec, exec_with_action};
pub(crate) use exec::merge;

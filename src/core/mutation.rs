//! Bound mutations: pure state-to-patch functions tagged with their origin.

use super::patch::{Patch, State};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Name reported for mutations that carry no tag.
pub const UNNAMED: &str = "?";

/// Pure function computing a patch from a state and an action.
///
/// Implementations must not depend on anything but their inputs and the
/// values captured when the mutation was bound.
pub type MutationFn = Arc<dyn Fn(&State, &Value) -> Result<Patch, MutationError> + Send + Sync>;

/// Failures raised while a mutation computes its patch.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MutationError {
    #[error("state key '{key}' is not set")]
    MissingKey { key: String },

    #[error("state key '{key}' holds {found}, expected a number")]
    NotANumber { key: String, found: &'static str },

    #[error("state key '{key}' holds {found}, expected an array")]
    NotAnArray { key: String, found: &'static str },

    #[error("numeric overflow updating state key '{key}'")]
    Overflow { key: String },

    #[error("{0}")]
    Custom(String),
}

impl MutationError {
    pub fn custom(message: impl Into<String>) -> Self {
        MutationError::Custom(message.into())
    }
}

/// Short JSON type name, used in error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A mutation paired with the operation name and arguments that produced it.
///
/// The tags are fixed at creation time and exist only for introspection;
/// evaluation never reads them.
///
/// # Example
///
/// ```rust
/// use chainable::core::{BoundMutation, Patch, State};
/// use serde_json::{json, Value};
/// use std::sync::Arc;
///
/// let mutation = BoundMutation::tagged(
///     "setField",
///     vec![json!("foo"), json!("bar")],
///     Arc::new(|_state: &State, _action: &Value| Ok(Patch::single("foo", "bar"))),
/// );
///
/// assert_eq!(mutation.name(), Some("setField"));
/// let patch = mutation.apply(&State::new(), &Value::Null).unwrap();
/// assert_eq!(patch.get("foo"), Some(&json!("bar")));
/// ```
#[derive(Clone)]
pub struct BoundMutation {
    name: Option<String>,
    args: Vec<Value>,
    apply: MutationFn,
}

impl BoundMutation {
    /// Create a mutation tagged with its operation name and arguments.
    pub fn tagged(name: impl Into<String>, args: Vec<Value>, apply: MutationFn) -> Self {
        Self {
            name: Some(name.into()),
            args,
            apply,
        }
    }

    /// Create a mutation with no tags.
    ///
    /// Introspection reports these as [`UNNAMED`] with no arguments.
    pub fn anonymous<F>(apply: F) -> Self
    where
        F: Fn(&State, &Value) -> Result<Patch, MutationError> + Send + Sync + 'static,
    {
        Self {
            name: None,
            args: Vec::new(),
            apply: Arc::new(apply),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Compute this mutation's patch (pure).
    pub fn apply(&self, state: &State, action: &Value) -> Result<Patch, MutationError> {
        (self.apply)(state, action)
    }
}

impl fmt::Debug for BoundMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMutation")
            .field("name", &self.name.as_deref().unwrap_or(UNNAMED))
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_mutation_keeps_metadata() {
        let mutation = BoundMutation::tagged(
            "nullify",
            vec![json!("xyz")],
            Arc::new(|_: &State, _: &Value| Ok(Patch::single("xyz", Value::Null))),
        );

        assert_eq!(mutation.name(), Some("nullify"));
        assert_eq!(mutation.args(), &[json!("xyz")]);
    }

    #[test]
    fn anonymous_mutation_has_no_tags() {
        let mutation = BoundMutation::anonymous(|_, _| Ok(Patch::new()));

        assert_eq!(mutation.name(), None);
        assert!(mutation.args().is_empty());
        assert!(format!("{mutation:?}").contains(UNNAMED));
    }

    #[test]
    fn apply_reads_state_and_action() {
        let mutation = BoundMutation::anonymous(|state: &State, action: &Value| {
            let base = state.get("num").and_then(Value::as_i64).unwrap_or(0);
            let step = action.get("by").and_then(Value::as_i64).unwrap_or(1);
            Ok(Patch::single("num", base + step))
        });

        let mut state = State::new();
        state.insert("num".into(), json!(10));

        let patch = mutation.apply(&state, &json!({ "by": 5 })).unwrap();
        assert_eq!(patch.get("num"), Some(&json!(15)));
        // Input untouched
        assert_eq!(state.get("num"), Some(&json!(10)));
    }

    #[test]
    fn clones_share_the_same_function() {
        let mutation = BoundMutation::anonymous(|_, _| Ok(Patch::single("a", 1)));
        let cloned = mutation.clone();

        assert_eq!(
            mutation.apply(&State::new(), &Value::Null).unwrap(),
            cloned.apply(&State::new(), &Value::Null).unwrap()
        );
    }

    #[test]
    fn errors_render_readable_messages() {
        let err = MutationError::NotANumber {
            key: "num".into(),
            found: kind_of(&json!("x")),
        };
        assert_eq!(
            err.to_string(),
            "state key 'num' holds a string, expected a number"
        );
    }
}

//! Immutable chains of bound mutations.

use crate::chain::error::ChainError;
use crate::chain::pending::{Extended, PendingChain};
use crate::core::{BoundMutation, Patch, State, UNNAMED};
use crate::registry::{Registry, Resolution};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// An ordered, immutable sequence of bound mutations.
///
/// Evaluating a chain runs every mutation against the same input state and
/// action, then merges their patches in sequence order (last write wins).
/// Extending a chain never touches it: every extension returns a new chain.
///
/// # Example
///
/// ```rust
/// use chainable::{set_field, State};
/// use serde_json::json;
///
/// let transform = set_field("foo", "bar")
///     .unwrap()
///     .and_then()
///     .increment("num")
///     .unwrap()
///     .and_then()
///     .nullify("xyz")
///     .unwrap();
///
/// let mut state = State::new();
/// state.insert("num".into(), json!(33));
///
/// let patch = transform.apply(&state).unwrap();
/// assert_eq!(patch.keys().collect::<Vec<_>>(), vec!["foo", "num", "xyz"]);
/// assert_eq!(patch.get("num"), Some(&json!(34)));
/// ```
#[derive(Clone)]
pub struct Chain {
    registry: Arc<Registry>,
    mutations: Vec<BoundMutation>,
}

impl Chain {
    /// Create a chain over the global registry.
    pub fn new(mutations: Vec<BoundMutation>) -> Self {
        Self::with_registry(Registry::global(), mutations)
    }

    /// Create a chain with no mutations.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Create a chain whose extensions resolve against `registry`.
    pub fn with_registry(registry: Arc<Registry>, mutations: Vec<BoundMutation>) -> Self {
        Self {
            registry,
            mutations,
        }
    }

    /// The mutations in construction order.
    pub fn mutations(&self) -> &[BoundMutation] {
        &self.mutations
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Names of the operations this chain can be extended with.
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.registry.names()
    }

    /// The chaining surface. Returns this chain.
    pub fn and_then(&self) -> &Self {
        self
    }

    /// Alias of [`Chain::and_then`].
    pub fn and(&self) -> &Self {
        self.and_then()
    }

    /// Return a new chain with `mutation` appended.
    pub fn with_mutation(&self, mutation: BoundMutation) -> Chain {
        let mut mutations = self.mutations.clone();
        mutations.push(mutation);
        Self {
            registry: Arc::clone(&self.registry),
            mutations,
        }
    }

    /// Extend with the operation registered as `name`.
    ///
    /// Returns [`Extended::Pending`] when the operation needs another
    /// argument group before it can be appended.
    pub fn extend(&self, name: &str, args: Vec<Value>) -> Result<Extended, ChainError> {
        let resolution = self.registry.invoke(name, args)?;
        Ok(self.attach(resolution))
    }

    /// Extend with a single-stage operation.
    pub fn then(&self, name: &str, args: Vec<Value>) -> Result<Chain, ChainError> {
        self.extend(name, args)?.into_chain()
    }

    pub(crate) fn attach(&self, resolution: Resolution) -> Extended {
        match resolution {
            Resolution::Bound(mutation) => {
                tracing::trace!(
                    operation = mutation.name().unwrap_or(UNNAMED),
                    position = self.mutations.len(),
                    "extending chain"
                );
                Extended::Done(self.with_mutation(mutation))
            }
            Resolution::Pending(operation) => {
                Extended::Pending(PendingChain::new(self.clone(), operation))
            }
        }
    }

    /// Evaluate every mutation against `state` and `action`, merging the
    /// resulting patches in order.
    ///
    /// Mutations do not see each other's output. The first failure aborts
    /// the evaluation and no partial patch is returned.
    pub fn evaluate(&self, state: &State, action: &Value) -> Result<Patch, ChainError> {
        let mut patch = Patch::new();
        for (position, mutation) in self.mutations.iter().enumerate() {
            let change = mutation.apply(state, action).inspect_err(|err| {
                tracing::debug!(
                    operation = mutation.name().unwrap_or(UNNAMED),
                    position,
                    error = %err,
                    "mutation failed"
                );
            })?;
            patch.absorb(change);
        }
        tracing::trace!(
            mutations = self.mutations.len(),
            keys = patch.len(),
            "evaluated chain"
        );
        Ok(patch)
    }

    /// Evaluate with no action.
    pub fn apply(&self, state: &State) -> Result<Patch, ChainError> {
        self.evaluate(state, &Value::Null)
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.mutations
                    .iter()
                    .map(|m| (m.name().unwrap_or(UNNAMED), m.args())),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MutationError;
    use serde_json::json;

    fn state(value: Value) -> State {
        match value {
            Value::Object(map) => map,
            _ => panic!("test state must be an object"),
        }
    }

    #[test]
    fn empty_chain_yields_empty_patch() {
        let chain = Chain::empty();

        assert!(chain.is_empty());
        assert!(chain.apply(&state(json!({ "a": 1 }))).unwrap().is_empty());
    }

    #[test]
    fn and_and_and_then_are_the_same_surface() {
        let chain = Chain::empty();

        assert!(std::ptr::eq(chain.and(), chain.and_then()));
        assert!(std::ptr::eq(chain.and_then(), &chain));
    }

    #[test]
    fn extension_leaves_original_untouched() {
        let first = Chain::empty()
            .then("setField", vec![json!("foo"), json!("bar")])
            .unwrap();
        let second = first.then("nullify", vec![json!("foo")]).unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert_eq!(
            first.apply(&State::new()).unwrap().get("foo"),
            Some(&json!("bar"))
        );
        assert_eq!(
            second.apply(&State::new()).unwrap().get("foo"),
            Some(&Value::Null)
        );
    }

    #[test]
    fn mutations_see_original_state_only() {
        let chain = Chain::empty()
            .then("increment", vec![json!("num")])
            .unwrap()
            .then("increment", vec![json!("num")])
            .unwrap();

        let patch = chain.apply(&state(json!({ "num": 1 }))).unwrap();
        assert_eq!(patch.get("num"), Some(&json!(2)));
    }

    #[test]
    fn action_is_passed_to_every_mutation() {
        let echo = BoundMutation::anonymous(|_: &State, action: &Value| {
            Ok(crate::core::Patch::single("seen", action.clone()))
        });
        let chain = Chain::new(vec![echo]);

        let patch = chain
            .evaluate(&State::new(), &json!({ "type": "PING" }))
            .unwrap();
        assert_eq!(patch.get("seen"), Some(&json!({ "type": "PING" })));
    }

    #[test]
    fn failure_discards_partial_patch() {
        let chain = Chain::empty()
            .then("setField", vec![json!("foo"), json!("bar")])
            .unwrap()
            .then("increment", vec![json!("missing")])
            .unwrap();

        let err = chain.apply(&State::new()).unwrap_err();
        assert_eq!(
            err,
            ChainError::Evaluation(MutationError::MissingKey {
                key: "missing".into()
            })
        );
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let err = Chain::empty().then("explode", vec![]).unwrap_err();
        assert!(matches!(err, ChainError::UnknownOperation { name } if name == "explode"));
    }

    #[test]
    fn then_refuses_multi_stage_operations() {
        let err = Chain::empty()
            .then("pushItem", vec![json!(1)])
            .unwrap_err();
        assert_eq!(
            err,
            ChainError::IncompleteOperation {
                operation: "pushItem".into(),
                stages: vec!["to".into()],
            }
        );
    }

    #[test]
    fn operations_mirror_the_registry() {
        let chain = Chain::empty();
        let names: Vec<_> = chain.operations().collect();

        assert!(names.contains(&"setField"));
        assert_eq!(names.len(), chain.registry().len());
    }

    #[test]
    fn debug_lists_operations() {
        let chain = Chain::empty()
            .then("nullify", vec![json!("xyz")])
            .unwrap();
        let rendered = format!("{chain:?}");
        assert!(rendered.contains("nullify"));
        assert!(rendered.contains("xyz"));
    }
}

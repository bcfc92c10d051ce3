//! Operation factory registry.
//!
//! Maps operation names to factories. Calling a factory with arguments
//! yields either a finished mutation or an intermediate table of named
//! stages that needs one more argument group (e.g. `pushItem(x).to(key)`).
//!
//! The registry is the capability table shared by every chain: the names
//! it holds are exactly the operations a chain can be extended with. It is
//! assembled once through [`RegistryBuilder`] and is read-only afterwards.

pub mod args;
pub mod builder;
pub mod builtins;
pub mod error;

pub use builder::RegistryBuilder;
pub use error::BuildError;

use crate::chain::ChainError;
use crate::core::{BoundMutation, MutationError, MutationFn, Patch, State};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Factory for a registered operation.
pub type Factory = fn(&[Value]) -> Result<Step, ChainError>;

/// Continuation for one named stage of a multi-stage operation.
pub type Stage = Arc<dyn Fn(&[Value]) -> Result<Step, ChainError> + Send + Sync>;

static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();

/// Outcome of calling a factory or a stage.
#[derive(Clone)]
pub enum Step {
    /// The operation is fully bound.
    Direct(MutationFn),

    /// Another argument group is required, through one of the named stages.
    NeedsMore(Intermediate),
}

impl Step {
    /// Wrap a closure as a finished step.
    pub fn direct<F>(apply: F) -> Self
    where
        F: Fn(&State, &Value) -> Result<Patch, MutationError> + Send + Sync + 'static,
    {
        Step::Direct(Arc::new(apply))
    }
}

/// Named stages offered by a partially applied operation.
#[derive(Clone, Default)]
pub struct Intermediate {
    stages: BTreeMap<&'static str, Stage>,
}

impl Intermediate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named stage.
    pub fn stage<F>(mut self, name: &'static str, next: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Step, ChainError> + Send + Sync + 'static,
    {
        self.stages.insert(name, Arc::new(next));
        self
    }

    pub fn stage_names(&self) -> Vec<String> {
        self.stages.keys().map(|name| name.to_string()).collect()
    }

    /// Run the stage called `name`, or `None` if there is no such stage.
    pub fn call(&self, name: &str, args: &[Value]) -> Option<Result<Step, ChainError>> {
        self.stages.get(name).map(|stage| stage(args))
    }
}

impl fmt::Debug for Intermediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intermediate")
            .field("stages", &self.stages.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A factory call after tagging.
#[derive(Clone, Debug)]
pub enum Resolution {
    Bound(BoundMutation),
    Pending(PendingOperation),
}

impl Resolution {
    /// Tag a step with the operation that produced it.
    ///
    /// Only the outer argument group is recorded. Arguments passed to later
    /// stages are not part of the tag.
    fn tag(name: String, args: Vec<Value>, step: Step) -> Self {
        match step {
            Step::Direct(apply) => Resolution::Bound(BoundMutation::tagged(name, args, apply)),
            Step::NeedsMore(next) => Resolution::Pending(PendingOperation { name, args, next }),
        }
    }
}

/// An operation waiting for its next argument group.
#[derive(Clone, Debug)]
pub struct PendingOperation {
    name: String,
    args: Vec<Value>,
    next: Intermediate,
}

impl PendingOperation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn stages(&self) -> Vec<String> {
        self.next.stage_names()
    }

    /// Supply the next argument group through `stage`.
    pub fn resolve(self, stage: &str, args: Vec<Value>) -> Result<Resolution, ChainError> {
        let step = self
            .next
            .call(stage, &args)
            .ok_or_else(|| ChainError::UnknownStage {
                operation: self.name.clone(),
                stage: stage.to_string(),
                expected: self.next.stage_names(),
            })??;
        Ok(Resolution::tag(self.name, self.args, step))
    }
}

/// Read-only table of operation factories.
///
/// # Example
///
/// ```rust
/// use chainable::registry::{Registry, Resolution};
/// use serde_json::json;
///
/// let registry = Registry::global();
/// assert!(registry.contains("setField"));
///
/// match registry.invoke("setField", vec![json!("foo"), json!("bar")]).unwrap() {
///     Resolution::Bound(mutation) => assert_eq!(mutation.name(), Some("setField")),
///     Resolution::Pending(_) => unreachable!(),
/// }
/// ```
#[derive(Clone)]
pub struct Registry {
    factories: BTreeMap<String, Factory>,
}

impl Registry {
    pub(crate) fn from_factories(factories: BTreeMap<String, Factory>) -> Self {
        Self { factories }
    }

    /// Registry holding the built-in operations.
    pub fn builtins() -> Self {
        Self::from_factories(
            builtins::TABLE
                .iter()
                .map(|(name, factory)| (name.to_string(), *factory))
                .collect(),
        )
    }

    /// The process-wide registry of built-in operations.
    ///
    /// Initialized on first use; read-only afterwards.
    pub fn global() -> Arc<Registry> {
        Arc::clone(GLOBAL.get_or_init(|| {
            let registry = Registry::builtins();
            tracing::debug!(operations = registry.len(), "initialized global registry");
            Arc::new(registry)
        }))
    }

    /// Registered operation names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Call the factory registered as `name` and tag the result.
    pub fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Resolution, ChainError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ChainError::UnknownOperation {
                name: name.to_string(),
            })?;
        tracing::trace!(operation = name, args = args.len(), "invoking factory");
        let step = factory(&args)?;
        Ok(Resolution::tag(name.to_string(), args, step))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("operations", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn global_registry_holds_builtins() {
        let registry = Registry::global();
        let names: Vec<_> = registry.names().collect();

        assert_eq!(
            names,
            vec![
                "decrement",
                "increment",
                "nullify",
                "pushItem",
                "setField",
                "updateLoading"
            ]
        );
    }

    #[test]
    fn global_registry_is_shared() {
        assert!(Arc::ptr_eq(&Registry::global(), &Registry::global()));
    }

    #[test]
    fn unknown_name_fails() {
        let err = Registry::builtins()
            .invoke("explode", vec![])
            .unwrap_err();
        assert_eq!(
            err,
            ChainError::UnknownOperation {
                name: "explode".into()
            }
        );
    }

    #[test]
    fn invoke_tags_name_and_args() {
        let Resolution::Bound(mutation) = Registry::builtins()
            .invoke("setField", vec![json!("foo"), json!("bar")])
            .unwrap()
        else {
            panic!("setField is single-stage");
        };

        assert_eq!(mutation.name(), Some("setField"));
        assert_eq!(mutation.args(), &[json!("foo"), json!("bar")]);
    }

    #[test]
    fn pending_operation_keeps_outer_args_only() {
        let Resolution::Pending(pending) = Registry::builtins()
            .invoke("pushItem", vec![json!("milk")])
            .unwrap()
        else {
            panic!("pushItem needs a second stage");
        };
        assert_eq!(pending.name(), "pushItem");
        assert_eq!(pending.stages(), vec!["to".to_string()]);

        let Resolution::Bound(mutation) = pending.resolve("to", vec![json!("list")]).unwrap()
        else {
            panic!("to() completes pushItem");
        };
        assert_eq!(mutation.name(), Some("pushItem"));
        assert_eq!(mutation.args(), &[json!("milk")]);
    }

    #[test]
    fn unknown_stage_lists_expected() {
        let Resolution::Pending(pending) = Registry::builtins()
            .invoke("pushItem", vec![json!(1)])
            .unwrap()
        else {
            panic!("pushItem needs a second stage");
        };

        let err = pending.resolve("into", vec![json!("list")]).unwrap_err();
        assert_eq!(
            err,
            ChainError::UnknownStage {
                operation: "pushItem".into(),
                stage: "into".into(),
                expected: vec!["to".into()],
            }
        );
        assert_eq!(
            err.to_string(),
            "Operation 'pushItem' has no stage 'into' (expected one of: to)"
        );
    }

    #[test]
    fn stages_may_nest() {
        fn between(args: &[Value]) -> Result<Step, ChainError> {
            let low = args::value_arg("between", args, 0)?;
            Ok(Step::NeedsMore(Intermediate::new().stage("and", move |args| {
                let high = args::value_arg("between", args, 0)?;
                let low = low.clone();
                Ok(Step::NeedsMore(Intermediate::new().stage("into", move |args| {
                    let key = args::key_arg("between", args, 0)?;
                    let range = json!([low.clone(), high.clone()]);
                    Ok(Step::direct(move |_: &State, _: &Value| {
                        Ok(Patch::single(key.clone(), range.clone()))
                    }))
                })))
            })))
        }

        let registry = RegistryBuilder::new()
            .register("between", between)
            .build()
            .unwrap();

        let Resolution::Pending(first) = registry.invoke("between", vec![json!(1)]).unwrap() else {
            panic!("expected pending");
        };
        let Resolution::Pending(second) = first.resolve("and", vec![json!(5)]).unwrap() else {
            panic!("expected pending");
        };
        let Resolution::Bound(mutation) = second.resolve("into", vec![json!("range")]).unwrap()
        else {
            panic!("expected bound");
        };

        let patch = mutation.apply(&State::new(), &Value::Null).unwrap();
        assert_eq!(patch.get("range"), Some(&json!([1, 5])));
        assert_eq!(mutation.args(), &[json!(1)]);
    }
}

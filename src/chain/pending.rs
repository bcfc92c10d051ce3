//! Chains waiting on a multi-stage operation.

use crate::chain::builder::Chain;
use crate::chain::error::ChainError;
use crate::core::UNNAMED;
use crate::registry::PendingOperation;
use serde_json::Value;

/// Result of extending a chain by name.
#[derive(Clone, Debug)]
pub enum Extended {
    /// The operation was appended.
    Done(Chain),

    /// The operation needs another argument group first.
    Pending(PendingChain),
}

impl Extended {
    pub fn is_done(&self) -> bool {
        matches!(self, Extended::Done(_))
    }

    /// The extended chain, or `IncompleteOperation` if a stage is still due.
    pub fn into_chain(self) -> Result<Chain, ChainError> {
        match self {
            Extended::Done(chain) => Ok(chain),
            Extended::Pending(pending) => Err(ChainError::IncompleteOperation {
                operation: pending.operation().to_string(),
                stages: pending.stages(),
            }),
        }
    }

    /// The pending chain, or `AlreadyComplete` if nothing is due.
    pub fn into_pending(self) -> Result<PendingChain, ChainError> {
        match self {
            Extended::Pending(pending) => Ok(pending),
            Extended::Done(chain) => Err(ChainError::AlreadyComplete {
                operation: chain
                    .mutations()
                    .last()
                    .and_then(|m| m.name())
                    .unwrap_or(UNNAMED)
                    .to_string(),
            }),
        }
    }
}

/// A chain plus an operation that still needs an argument group.
///
/// The base chain is not extended until the final stage is supplied.
#[derive(Clone, Debug)]
pub struct PendingChain {
    base: Chain,
    operation: PendingOperation,
}

impl PendingChain {
    pub(crate) fn new(base: Chain, operation: PendingOperation) -> Self {
        Self { base, operation }
    }

    /// The chain the operation will be appended to.
    pub fn base(&self) -> &Chain {
        &self.base
    }

    pub fn operation(&self) -> &str {
        self.operation.name()
    }

    /// Stage names accepted next.
    pub fn stages(&self) -> Vec<String> {
        self.operation.stages()
    }

    /// Supply the next argument group through `stage`.
    pub fn stage(self, stage: &str, args: Vec<Value>) -> Result<Extended, ChainError> {
        let resolution = self.operation.resolve(stage, args)?;
        Ok(self.base.attach(resolution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;
    use serde_json::json;

    fn state(value: Value) -> State {
        match value {
            Value::Object(map) => map,
            _ => panic!("test state must be an object"),
        }
    }

    #[test]
    fn pending_chain_completes_through_stage() {
        let pending = Chain::empty()
            .extend("pushItem", vec![json!("milk")])
            .unwrap()
            .into_pending()
            .unwrap();

        assert_eq!(pending.operation(), "pushItem");
        assert_eq!(pending.stages(), vec!["to".to_string()]);
        assert!(pending.base().is_empty());

        let chain = pending
            .stage("to", vec![json!("groceries")])
            .unwrap()
            .into_chain()
            .unwrap();

        let patch = chain
            .apply(&state(json!({ "groceries": ["eggs"] })))
            .unwrap();
        assert_eq!(patch.get("groceries"), Some(&json!(["eggs", "milk"])));
    }

    #[test]
    fn base_chain_is_not_extended_by_pending() {
        let base = Chain::empty()
            .then("setField", vec![json!("a"), json!(1)])
            .unwrap();
        let pending = base
            .extend("pushItem", vec![json!(2)])
            .unwrap()
            .into_pending()
            .unwrap();

        assert_eq!(base.len(), 1);
        assert_eq!(pending.base().len(), 1);

        let done = pending
            .stage("to", vec![json!("list")])
            .unwrap()
            .into_chain()
            .unwrap();
        assert_eq!(done.len(), 2);
        assert_eq!(base.len(), 1);
    }

    #[test]
    fn into_pending_on_done_fails() {
        let err = Chain::empty()
            .extend("nullify", vec![json!("x")])
            .unwrap()
            .into_pending()
            .unwrap_err();

        assert_eq!(
            err,
            ChainError::AlreadyComplete {
                operation: "nullify".into()
            }
        );
    }

    #[test]
    fn unknown_stage_is_rejected() {
        let pending = Chain::empty()
            .extend("pushItem", vec![json!(1)])
            .unwrap()
            .into_pending()
            .unwrap();

        assert!(matches!(
            pending.stage("onto", vec![json!("list")]),
            Err(ChainError::UnknownStage { .. })
        ));
    }
}

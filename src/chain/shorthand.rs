//! Typed shorthands for the built-in operations.
//!
//! Each shorthand dispatches by name through the chain's registry, so a
//! chain over a registry without the operation fails with
//! `UnknownOperation`.

use crate::chain::builder::Chain;
use crate::chain::error::ChainError;
use crate::chain::pending::PendingChain;
use crate::registry::builtins::{
    DECREMENT, INCREMENT, NULLIFY, PUSH_ITEM, SET_FIELD, TO, UPDATE_LOADING,
};
use serde_json::Value;

impl Chain {
    /// Append `setField(key, value)`.
    pub fn set_field(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Chain, ChainError> {
        self.then(SET_FIELD, vec![Value::String(key.into()), value.into()])
    }

    /// Append `increment(key)`.
    pub fn increment(&self, key: impl Into<String>) -> Result<Chain, ChainError> {
        self.then(INCREMENT, vec![Value::String(key.into())])
    }

    /// Append `decrement(key)`.
    pub fn decrement(&self, key: impl Into<String>) -> Result<Chain, ChainError> {
        self.then(DECREMENT, vec![Value::String(key.into())])
    }

    /// Append `nullify(key)`.
    pub fn nullify(&self, key: impl Into<String>) -> Result<Chain, ChainError> {
        self.then(NULLIFY, vec![Value::String(key.into())])
    }

    /// Append `updateLoading()`.
    pub fn update_loading(&self) -> Result<Chain, ChainError> {
        self.then(UPDATE_LOADING, Vec::new())
    }

    /// Start `pushItem(item)`; finish with [`PendingChain::to`].
    pub fn push_item(&self, item: impl Into<Value>) -> Result<PendingChain, ChainError> {
        self.extend(PUSH_ITEM, vec![item.into()])?.into_pending()
    }
}

impl PendingChain {
    /// Finish `pushItem` with the target key.
    pub fn to(self, key: impl Into<String>) -> Result<Chain, ChainError> {
        self.stage(TO, vec![Value::String(key.into())])?
            .into_chain()
    }
}

/// Start a chain with `setField(key, value)`.
pub fn set_field(key: impl Into<String>, value: impl Into<Value>) -> Result<Chain, ChainError> {
    Chain::empty().set_field(key, value)
}

/// Start a chain with `increment(key)`.
pub fn increment(key: impl Into<String>) -> Result<Chain, ChainError> {
    Chain::empty().increment(key)
}

/// Start a chain with `decrement(key)`.
pub fn decrement(key: impl Into<String>) -> Result<Chain, ChainError> {
    Chain::empty().decrement(key)
}

/// Start a chain with `nullify(key)`.
pub fn nullify(key: impl Into<String>) -> Result<Chain, ChainError> {
    Chain::empty().nullify(key)
}

/// Start a chain with `updateLoading()`.
pub fn update_loading() -> Result<Chain, ChainError> {
    Chain::empty().update_loading()
}

/// Start a chain with `pushItem(item)`.
pub fn push_item(item: impl Into<Value>) -> Result<PendingChain, ChainError> {
    Chain::empty().push_item(item)
}

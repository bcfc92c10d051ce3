//! Audit trail of executed chains.
//!
//! Every `exec_recorded` call produces an [`ExecRecord`] describing which
//! operations ran and what patch they produced. Histories are immutable:
//! recording returns a new history.

pub mod error;
pub mod snapshot;

pub use error::SnapshotError;
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};

use crate::chain::{Chain, ChainError};
use crate::core::{Patch, State};
use crate::eval::{analyse, merge, OperationRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

/// One evaluated chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecRecord {
    /// Unique record identifier
    pub id: Uuid,
    /// When the chain was executed
    pub timestamp: DateTime<Utc>,
    /// Operations of the chain, as reported by `analyse`
    pub operations: Vec<OperationRecord>,
    /// Patch merged into the state
    pub patch: Patch,
}

impl ExecRecord {
    pub fn new(operations: Vec<OperationRecord>, patch: Patch) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            operations,
            patch,
        }
    }
}

/// Ordered history of executed chains.
///
/// # Example
///
/// ```rust
/// use chainable::history::{exec_recorded, ExecHistory};
/// use chainable::{set_field, State};
///
/// let history = ExecHistory::new();
/// let chain = set_field("foo", "bar").unwrap();
///
/// let (state, updated) = exec_recorded(&State::new(), &chain, &history).unwrap();
///
/// assert_eq!(state.len(), 1);
/// assert_eq!(updated.len(), 1);
/// assert!(history.is_empty()); // Original unchanged
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecHistory {
    records: Vec<ExecRecord>,
}

impl ExecHistory {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record an execution, returning a new history.
    pub fn record(&self, record: ExecRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    pub fn records(&self) -> &[ExecRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&ExecRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// State keys changed by any recorded patch, in first-touched order.
    pub fn touched_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for key in self.records.iter().flat_map(|r| r.patch.keys()) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Time between the first and last record, regardless of which came
    /// first on the wall clock.
    ///
    /// Returns `None` for an empty history.
    pub fn span(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        let elapsed = if last.timestamp >= first.timestamp {
            last.timestamp.signed_duration_since(first.timestamp)
        } else {
            first.timestamp.signed_duration_since(last.timestamp)
        };
        elapsed.to_std().ok()
    }
}

/// Execute `chain` and record the execution.
///
/// Returns the new state and the extended history. On failure nothing is
/// recorded.
pub fn exec_recorded(
    state: &State,
    chain: &Chain,
    history: &ExecHistory,
) -> Result<(State, ExecHistory), ChainError> {
    exec_recorded_with_action(state, chain, &Value::Null, history)
}

/// Like [`exec_recorded`], passing `action` to every mutation.
pub fn exec_recorded_with_action(
    state: &State,
    chain: &Chain,
    action: &Value,
    history: &ExecHistory,
) -> Result<(State, ExecHistory), ChainError> {
    let (next, patch) = merge(state, chain, action)?;
    let record = ExecRecord::new(analyse(chain), patch);
    tracing::debug!(record = %record.id, operations = record.operations.len(), "recorded execution");
    Ok((next, history.record(record)))
}

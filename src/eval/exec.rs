//! Evaluating chains into new states.

use crate::chain::{Chain, ChainError};
use crate::core::{Patch, State};
use serde_json::Value;

/// Evaluate `chain` against `state` and shallow-merge the patch into a copy
/// of `state`.
///
/// Patch values overwrite same-keyed state values; other keys pass through.
/// `state` is never modified. Evaluation errors propagate unchanged.
///
/// # Example
///
/// ```
/// use chainable::{exec, set_field, State};
/// use serde_json::{json, Value};
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
/// let Value::Object(state) = json!({ "num": 88, "be": "free", "foo": "bra" }) else {
///     unreachable!()
/// };
///
/// let next = exec(&state, &transform).unwrap();
/// assert_eq!(
///     Value::Object(next),
///     json!({ "num": 89, "be": "free", "foo": "bar", "xyz": null })
/// );
/// ```
pub fn exec(state: &State, chain: &Chain) -> Result<State, ChainError> {
    exec_with_action(state, chain, &Value::Null)
}

/// Like [`exec`], passing `action` to every mutation.
pub fn exec_with_action(state: &State, chain: &Chain, action: &Value) -> Result<State, ChainError> {
    merge(state, chain, action).map(|(next, _)| next)
}

/// Evaluate `chain` and merge its patch, returning the new state together
/// with the patch that produced it.
pub(crate) fn merge(
    state: &State,
    chain: &Chain,
    action: &Value,
) -> Result<(State, Patch), ChainError> {
    let patch = chain.evaluate(state, action)?;
    tracing::debug!(
        mutations = chain.len(),
        changed = patch.len(),
        "merged chain patch into state"
    );
    Ok((patch.apply_to(state), patch))
}

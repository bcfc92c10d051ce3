//! Patches: the net effect of a chain of mutations.
//!
//! A patch is an ordered mapping of state keys to new values. Patches never
//! touch state directly; they are merged into a base state by the evaluator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arbitrary key-value state snapshot.
///
/// The library treats state as opaque input for mutations. Key order is
/// preserved, so merges are observable in insertion order.
pub type State = Map<String, Value>;

/// Ordered mapping from state key to new value.
///
/// Keys are unique. A key keeps the position where it was first produced,
/// even when a later merge overwrites its value.
///
/// # Example
///
/// ```rust
/// use chainable::core::Patch;
/// use serde_json::json;
///
/// let first = Patch::new().set("foo", "bar").set("num", 1);
/// let second = Patch::new().set("num", json!(null));
///
/// let merged = first.merge(second);
/// assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["foo", "num"]);
/// assert_eq!(merged.get("num"), Some(&json!(null)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch(Map<String, Value>);

impl Patch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Create a patch holding a single entry.
    pub fn single(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().set(key, value)
    }

    /// Return this patch with `key` set to `value`.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Merge `other` on top of this patch.
    ///
    /// For keys present in both, the value from `other` wins. The position
    /// of an existing key is left where it was.
    pub fn merge(mut self, other: Patch) -> Self {
        self.absorb(other);
        self
    }

    pub(crate) fn absorb(&mut self, other: Patch) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    /// Look up the new value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shallow-merge this patch into a copy of `state`.
    ///
    /// Patch values overwrite same-keyed state values; every other state
    /// key passes through unchanged. `state` itself is not modified.
    pub fn apply_to(&self, state: &State) -> State {
        let mut next = state.clone();
        for (key, value) in &self.0 {
            next.insert(key.clone(), value.clone());
        }
        next
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Patch {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Patch> for Value {
    fn from(patch: Patch) -> Self {
        Value::Object(patch.0)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Patch {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Patch::new(), |patch, (key, value)| patch.set(key, value))
    }
}

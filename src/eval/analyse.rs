//! Introspection of chains.

use crate::chain::Chain;
use crate::core::UNNAMED;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One operation of a chain with the arguments it was created from.
///
/// Serializes as the single-key mapping `{name: args}`.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationRecord {
    pub name: String,
    pub args: Vec<Value>,
}

impl OperationRecord {
    pub fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl Serialize for OperationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.args)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for OperationRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Map::<String, Value>::deserialize(deserializer)?;
        if entries.len() != 1 {
            return Err(de::Error::invalid_length(
                entries.len(),
                &"a single {name: args} entry",
            ));
        }
        let Some((name, args)) = entries.into_iter().next() else {
            return Err(de::Error::custom("empty operation record"));
        };
        let args = match args {
            Value::Array(args) => args,
            other => {
                return Err(de::Error::invalid_type(
                    de::Unexpected::Other(crate::core::kind_of(&other)),
                    &"an argument list",
                ))
            }
        };
        Ok(Self { name, args })
    }
}

/// List the operations composing `chain`, in construction order.
///
/// Nothing is merged or deduplicated: an operation used twice appears
/// twice. Untagged mutations are reported as `"?"` with no arguments.
///
/// # Example
///
/// ```
/// use chainable::{analyse, set_field};
/// use serde_json::json;
///
/// let transform = set_field("foo", "bar")
///     .unwrap()
///     .and_then()
///     .increment("num")
///     .unwrap();
///
/// assert_eq!(
///     serde_json::to_value(analyse(&transform)).unwrap(),
///     json!([{ "setField": ["foo", "bar"] }, { "increment": ["num"] }])
/// );
/// ```
pub fn analyse(chain: &Chain) -> Vec<OperationRecord> {
    chain
        .mutations()
        .iter()
        .map(|mutation| {
            OperationRecord::new(mutation.name().unwrap_or(UNNAMED), mutation.args().to_vec())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BoundMutation, Patch, State};
    use serde_json::json;

    #[test]
    fn analyse_mirrors_construction_order() {
        let chain = Chain::empty()
            .set_field("foo", "bar")
            .unwrap()
            .and_then()
            .increment("num")
            .unwrap()
            .and_then()
            .nullify("num")
            .unwrap();

        assert_eq!(
            analyse(&chain),
            vec![
                OperationRecord::new("setField", vec![json!("foo"), json!("bar")]),
                OperationRecord::new("increment", vec![json!("num")]),
                OperationRecord::new("nullify", vec![json!("num")]),
            ]
        );
    }

    #[test]
    fn anonymous_mutations_fall_back() {
        let chain = Chain::new(vec![BoundMutation::anonymous(|_: &State, _: &Value| {
            Ok(Patch::new())
        })]);

        assert_eq!(analyse(&chain), vec![OperationRecord::new(UNNAMED, vec![])]);
    }

    #[test]
    fn empty_chain_has_no_records() {
        assert!(analyse(&Chain::empty()).is_empty());
    }

    #[test]
    fn record_serializes_as_single_entry_map() {
        let record = OperationRecord::new("increment", vec![json!("num")]);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, json!({ "increment": ["num"] }));

        let back: OperationRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn record_rejects_malformed_input() {
        assert!(serde_json::from_value::<OperationRecord>(json!({})).is_err());
        assert!(serde_json::from_value::<OperationRecord>(json!({ "a": [], "b": [] })).is_err());
        assert!(serde_json::from_value::<OperationRecord>(json!({ "a": "x" })).is_err());
    }
}

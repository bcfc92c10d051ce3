//! Built-in operations.
//!
//! | name | arguments | patch |
//! |------|-----------|-------|
//! | `setField` | key, value | `{key: value}` |
//! | `increment` | key | `{key: state[key] + 1}` |
//! | `decrement` | key | `{key: state[key] - 1}` |
//! | `nullify` | key | `{key: null}` |
//! | `updateLoading` | | `{loading: state.requestCount > 0}` |
//! | `pushItem` | item, then `to(key)` | `{key: [...state[key], item]}` |

use super::args::{expect_arity, key_arg, value_arg};
use super::{Factory, Intermediate, Step};
use crate::chain::ChainError;
use crate::core::{kind_of, MutationError, Patch, State};
use serde_json::{Number, Value};

pub const SET_FIELD: &str = "setField";
pub const INCREMENT: &str = "increment";
pub const DECREMENT: &str = "decrement";
pub const NULLIFY: &str = "nullify";
pub const UPDATE_LOADING: &str = "updateLoading";
pub const PUSH_ITEM: &str = "pushItem";

/// Stage name completing `pushItem`.
pub const TO: &str = "to";

pub(crate) const TABLE: &[(&str, Factory)] = &[
    (SET_FIELD, set_field),
    (INCREMENT, increment),
    (DECREMENT, decrement),
    (NULLIFY, nullify),
    (UPDATE_LOADING, update_loading),
    (PUSH_ITEM, push_item),
];

fn set_field(args: &[Value]) -> Result<Step, ChainError> {
    expect_arity(SET_FIELD, args, 2)?;
    let key = key_arg(SET_FIELD, args, 0)?;
    let value = value_arg(SET_FIELD, args, 1)?;
    Ok(Step::direct(move |_: &State, _: &Value| {
        Ok(Patch::single(key.clone(), value.clone()))
    }))
}

fn increment(args: &[Value]) -> Result<Step, ChainError> {
    expect_arity(INCREMENT, args, 1)?;
    let key = key_arg(INCREMENT, args, 0)?;
    Ok(Step::direct(move |state: &State, _: &Value| {
        shift(state, &key, 1)
    }))
}

fn decrement(args: &[Value]) -> Result<Step, ChainError> {
    expect_arity(DECREMENT, args, 1)?;
    let key = key_arg(DECREMENT, args, 0)?;
    Ok(Step::direct(move |state: &State, _: &Value| {
        shift(state, &key, -1)
    }))
}

fn nullify(args: &[Value]) -> Result<Step, ChainError> {
    expect_arity(NULLIFY, args, 1)?;
    let key = key_arg(NULLIFY, args, 0)?;
    Ok(Step::direct(move |_: &State, _: &Value| {
        Ok(Patch::single(key.clone(), Value::Null))
    }))
}

fn update_loading(args: &[Value]) -> Result<Step, ChainError> {
    expect_arity(UPDATE_LOADING, args, 0)?;
    Ok(Step::direct(|state: &State, _: &Value| {
        let loading = match state.get("requestCount") {
            None | Some(Value::Null) => false,
            Some(Value::Number(count)) => count.as_f64().is_some_and(|n| n > 0.0),
            Some(other) => {
                return Err(MutationError::NotANumber {
                    key: "requestCount".into(),
                    found: kind_of(other),
                })
            }
        };
        Ok(Patch::single("loading", loading))
    }))
}

fn push_item(args: &[Value]) -> Result<Step, ChainError> {
    expect_arity(PUSH_ITEM, args, 1)?;
    let item = value_arg(PUSH_ITEM, args, 0)?;
    Ok(Step::NeedsMore(Intermediate::new().stage(
        TO,
        move |args: &[Value]| {
            expect_arity(PUSH_ITEM, args, 1)?;
            let key = key_arg(PUSH_ITEM, args, 0)?;
            let item = item.clone();
            Ok(Step::direct(move |state: &State, _: &Value| {
                append(state, &key, &item)
            }))
        },
    )))
}

/// Add `delta` to the number stored at `key`.
fn shift(state: &State, key: &str, delta: i64) -> Result<Patch, MutationError> {
    let current = state.get(key).ok_or_else(|| MutationError::MissingKey {
        key: key.to_string(),
    })?;
    let Value::Number(number) = current else {
        return Err(MutationError::NotANumber {
            key: key.to_string(),
            found: kind_of(current),
        });
    };

    let next = if number.is_f64() {
        number
            .as_f64()
            .and_then(|n| Number::from_f64(n + delta as f64))
            .map(Value::Number)
    } else {
        number
            .as_i64()
            .map(i128::from)
            .or_else(|| number.as_u64().map(i128::from))
            .and_then(|n| integer(n + i128::from(delta)))
    }
    .ok_or_else(|| MutationError::Overflow {
        key: key.to_string(),
    })?;

    Ok(Patch::single(key, next))
}

/// JSON integer for `n`, or `None` outside the `i64`/`u64` range.
fn integer(n: i128) -> Option<Value> {
    match i64::try_from(n) {
        Ok(n) => Some(Value::from(n)),
        Err(_) => u64::try_from(n).ok().map(Value::from),
    }
}

/// Copy the array at `key` with `item` appended.
fn append(state: &State, key: &str, item: &Value) -> Result<Patch, MutationError> {
    match state.get(key) {
        Some(Value::Array(items)) => {
            let mut items = items.clone();
            items.push(item.clone());
            Ok(Patch::single(key, items))
        }
        Some(other) => Err(MutationError::NotAnArray {
            key: key.to_string(),
            found: kind_of(other),
        }),
        None => Err(MutationError::MissingKey {
            key: key.to_string(),
        }),
    }
}

//! Counter Reducer
//!
//! This example drives a tiny reducer with declarative mutation chains.
//!
//! Key concepts:
//! - Chains describe changes; they never mutate state
//! - `exec` merges the resulting patch into a new state
//! - `analyse` lists what a chain will do, for logging
//!
//! Run with: cargo run --example counter_reducer

use chainable::history::{exec_recorded_with_action, ExecHistory, Snapshot};
use chainable::{analyse, increment, set_field, Chain, ChainError, State};
use serde_json::{json, Value};

fn reducer_for(action: &Value) -> Result<Chain, ChainError> {
    match action.get("type").and_then(Value::as_str) {
        Some("INCREMENT") => increment("count")?
            .and_then()
            .push_item(action.clone())?
            .to("log"),
        Some("DECREMENT") => Chain::empty()
            .decrement("count")?
            .and()
            .push_item(action.clone())?
            .to("log"),
        Some("RESET") => set_field("count", 0)?.and_then().set_field("log", json!([])),
        _ => Ok(Chain::empty()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Counter Reducer Example ===\n");

    let Value::Object(mut state) = json!({ "count": 0, "log": [] }) else {
        unreachable!("literal is an object");
    };
    let mut history = ExecHistory::new();

    let actions = [
        json!({ "type": "INCREMENT" }),
        json!({ "type": "INCREMENT" }),
        json!({ "type": "DECREMENT" }),
        json!({ "type": "UNKNOWN" }),
    ];

    for action in &actions {
        let chain = reducer_for(action)?;
        println!("{} -> {}", action["type"], serde_json::to_string(&analyse(&chain))?);

        let (next, recorded) = exec_recorded_with_action(&state, &chain, action, &history)?;
        state = next;
        history = recorded;
    }

    println!("\nFinal count: {}", state["count"]);
    println!("Touched keys: {:?}", history.touched_keys());

    let reset = reducer_for(&json!({ "type": "RESET" }))?;
    let cleared: State = chainable::exec(&state, &reset)?;
    println!("After reset: {}", Value::Object(cleared));

    let snapshot = Snapshot::new(state, history);
    println!("\nSnapshot:\n{}", snapshot.to_json_pretty()?);

    println!("\n=== Example Complete ===");
    Ok(())
}

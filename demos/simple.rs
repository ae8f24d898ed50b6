//! Deep clone, deep equality and nullish detection on a cyclic graph.
//!
//! Run with: cargo run --example simple

use deep_value::{clone_deep, deep_equal, find_cycle, has_nullish, value, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Two teams that point at each other
    let red = value!({ "name": "red", "score": 3, "captain": null });
    let blue = value!({ "name": "blue", "score": 5, "captain": "Ada" });
    red.set_field("rival", blue.clone());
    blue.set_field("rival", red.clone());
    let league = value!({ "season": 2024 });
    league.set_field("teams", Value::array(vec![red.clone(), blue.clone()]));

    println!("League: {}\n", league);
    if let Some(node) = find_cycle(&league) {
        println!("Cycle found at node {}", node);
    }

    // Copy the whole graph, cycles included
    let copy = clone_deep(&league);
    let copied_red = copy.get("teams").and_then(|teams| teams.at(0));
    let copied_blue = copy.get("teams").and_then(|teams| teams.at(1));
    let rival_of_red = copied_red.as_ref().and_then(|team| team.get("rival"));
    assert_eq!(
        rival_of_red.and_then(|v| v.node_id()),
        copied_blue.as_ref().and_then(|v| v.node_id())
    );
    assert_ne!(copy.node_id(), league.node_id());
    println!("✓ Clone keeps the red/blue cycle and shares no node with the original");

    assert!(deep_equal(&league, &copy));
    println!("✓ Clone is deeply equal to the original");

    blue.set_field("score", Value::from(6));
    assert!(!deep_equal(&league, &copy));
    println!("✓ Changing the original does not touch the clone");

    // red.captain is null
    assert!(has_nullish(&league));
    red.set_field("captain", Value::from("Grace"));
    assert!(!has_nullish(&league));
    println!("✓ Nullish detection terminates on the cyclic league");

    Ok(())
}

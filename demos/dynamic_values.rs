//! Building graphs at runtime and rewriting them with transforms.
//!
//! Run with: cargo run --example dynamic_values

use deep_value::{
    clean, from_value, map_key, remove_undefined, replace_strings, to_value, value, CleanOptions,
    Value,
};
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Service {
    name: String,
    host: String,
    port: u16,
    tags: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = value!({
        "name": "billing",
        "host": "${DB_HOST}",
        "port": 5432,
        "tags": ["${REGION}", "primary"],
        "owner": undefined,
        "notes": "",
        "retries": null
    });
    println!("Raw config: {}\n", config);

    // Fill in placeholders
    let resolved = replace_strings(
        &config,
        &[("DB_HOST", "db.internal"), ("REGION", "eu-west")],
        "${",
    );
    println!("Resolved: {}", resolved);

    // Drop undefined fields only, then every nullish or empty leaf
    let without_undefined = remove_undefined(&resolved);
    assert!(without_undefined.get("owner").is_none());
    assert!(without_undefined.get("retries").is_some());

    let cleaned = clean(&resolved, &CleanOptions::default());
    println!("Cleaned: {}", cleaned);

    // Rewrite every "name" field at any depth
    let renamed = map_key(&cleaned, "name", |v| {
        v.as_str()
            .map(|s| Value::from(s.to_uppercase()))
            .unwrap_or_else(|| v.clone())
    });
    println!("Renamed: {}\n", renamed);

    // Back into a typed struct
    let service: Service = from_value(&renamed)?;
    assert_eq!(
        service,
        Service {
            name: "BILLING".to_string(),
            host: "db.internal".to_string(),
            port: 5432,
            tags: vec!["eu-west".to_string(), "primary".to_string()],
        }
    );
    println!("Typed: {:?}", service);

    // And a struct back into a graph
    let value = to_value(&service)?;
    assert_eq!(value.get("port").and_then(|v| v.as_i64()), Some(5432));
    println!("✓ Struct and graph agree");

    Ok(())
}

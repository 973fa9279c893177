use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{display_value, flatten};

/// Columns shown for the review queue, in order.
const QUEUE_COLUMNS: &[&str] = &[
    "row_index",
    "submitted_at",
    "full_name",
    "loan_type",
    "amount",
    "term_months",
    "collateral_type",
    "status",
];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else if let Some(Value::Array(apps)) = map.get("applications") {
                if let Some(Value::Object(stats)) = map.get("stats") {
                    print_fields(stats);
                    println!();
                }
                print_queue(apps);
            } else {
                print_fields(map);
            }
        }
        Value::Array(arr) => print_queue(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_fields(res_map),
        other => println!("{}", other),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow().bold());
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten(map) {
        let shown = display_value(&key, &val);
        builder.push_record([key, shown]);
    }
    println!("{}", Table::from(builder));
}

fn print_queue(arr: &[Value]) {
    if arr.is_empty() {
        println!("(no applications)");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(QUEUE_COLUMNS.iter().copied());
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = QUEUE_COLUMNS
                .iter()
                .map(|col| map.get(*col).map(|v| display_value(col, v)).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use portfolio_risk_core::numeric::{format_money, format_pct};

use super::{flatten, leaf_key, scalar_text};

/// Fields rendered as currency in tables.
const MONEY_FIELDS: [&str; 5] = [
    "dollar_amount",
    "dollar_impact",
    "portfolio_value",
    "projected_value",
    "total_value",
];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    print_flat_object(result);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
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

fn print_flat_object(value: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten(value) {
        let shown = display_value(&key, &val);
        builder.push_record([key, shown]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h).map(|v| display_value(h, v)).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", scalar_text(item));
        }
    }
}

/// Percentages and currency get human formatting; everything else is shown raw.
fn display_value(key: &str, value: &Value) -> String {
    let text = scalar_text(value);
    let Ok(number) = text.parse::<Decimal>() else {
        return text;
    };
    let leaf = leaf_key(key);
    if leaf.ends_with("_pct") {
        format_pct(number)
    } else if MONEY_FIELDS.contains(&leaf) {
        format_money(number)
    } else {
        text
    }
}

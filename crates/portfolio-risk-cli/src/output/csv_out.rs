use serde_json::Value;
use std::io;

use super::{flatten, scalar_text};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let result = map.get("result").unwrap_or(value);
            if let Some(Value::Array(results)) = result.get("results") {
                // Scenario comparison: one row per scenario
                write_array_csv(&mut wtr, results);
            } else {
                write_field_value_csv(&mut wtr, result);
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&scalar_text(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_field_value_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in flatten(value) {
        let _ = wtr.write_record([key, scalar_text(&val)]);
    }
}

/// Headers come from the first row's flattened keys; nested scenario detail
/// such as per-category impacts is kept to the top-level scalar columns.
fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(first) = arr.first() else {
        return;
    };

    if first.is_object() {
        let headers: Vec<String> = top_level_columns(first);
        let _ = wtr.write_record(&headers);

        for item in arr {
            let row: Vec<String> = headers
                .iter()
                .map(|h| item.get(h).map(scalar_text).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&scalar_text(item)]);
        }
    }
}

fn top_level_columns(row: &Value) -> Vec<String> {
    row.as_object()
        .map(|map| {
            map.iter()
                .filter(|(_, v)| !v.is_object() && !is_nested_array(v))
                .map(|(k, _)| k.clone())
                .collect()
        })
        .unwrap_or_default()
}

fn is_nested_array(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().any(|v| v.is_object() || v.is_array()))
}

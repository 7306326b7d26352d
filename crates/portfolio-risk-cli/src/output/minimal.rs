use serde_json::Value;

use super::{flatten, leaf_key, scalar_text};

/// Key answer fields, most important first.
const PRIORITY_KEYS: [&str; 6] = [
    "overall_risk",
    "overall_diversification",
    "total_impact_pct",
    "worst_case",
    "valid",
    "normalized",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields at any depth in order of priority,
/// then falls back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_text(value));
}

fn minimal_text(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if result_obj.is_object() {
        let flat = flatten(result_obj);
        for key in &PRIORITY_KEYS {
            let hit = flat
                .iter()
                .find(|(path, val)| leaf_key(path) == *key && !val.is_null());
            if let Some((_, val)) = hit {
                return scalar_text(val);
            }
        }
        if let Some((key, val)) = flat.first() {
            return format!("{}: {}", key, scalar_text(val));
        }
    }

    match result_obj {
        Value::Array(_) => serde_json::to_string(result_obj).unwrap_or_default(),
        other => scalar_text(other),
    }
}

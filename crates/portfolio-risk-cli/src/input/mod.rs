pub mod file;
pub mod stdin;

use serde_json::Value;

use portfolio_risk_core::validation::HoldingDraft;

/// Read the command payload from `--input`, falling back to piped stdin.
pub fn read_payload(path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_value(path);
    }
    stdin::read_stdin()?.ok_or_else(|| "Provide --input <file> or pipe JSON via stdin".into())
}

/// Holding drafts from either a bare array or an object with a `holdings` key.
pub fn holding_drafts(payload: &Value) -> Result<Vec<HoldingDraft>, Box<dyn std::error::Error>> {
    let list = match payload {
        Value::Array(_) => payload,
        Value::Object(map) => map
            .get("holdings")
            .ok_or("Input object must contain a 'holdings' array")?,
        _ => {
            return Err(
                "Expected a JSON array of holdings or an object with a 'holdings' key".into(),
            )
        }
    };
    let drafts: Vec<HoldingDraft> = serde_json::from_value(list.clone())
        .map_err(|e| format!("Malformed holdings: {}", e))?;
    Ok(drafts)
}

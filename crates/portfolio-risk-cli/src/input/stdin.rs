use serde_json::Value;
use std::io::{self, Read};

/// Read a piped payload from stdin. Returns None for an interactive terminal
/// or empty input.
///
/// JSON is tried first; YAML is accepted as a fallback so piped input matches
/// what `--input` accepts.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_payload(&buffer)
}

fn parse_payload(text: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => match serde_yaml::from_str::<Value>(trimmed) {
            // A bare YAML scalar means the text was neither a JSON nor a YAML document
            Ok(value) if value.is_object() || value.is_array() => Ok(Some(value)),
            _ => Err(format!("Failed to parse stdin as JSON or YAML: {}", json_err).into()),
        },
    }
}

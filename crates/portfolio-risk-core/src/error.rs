use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum PortfolioRiskError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Validation failed with {} error(s): {}", errors.len(), summarize(errors))]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PortfolioRiskError {
    fn from(e: serde_json::Error) -> Self {
        PortfolioRiskError::SerializationError(e.to_string())
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

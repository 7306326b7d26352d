//! Structural validation of portfolio holdings.
//!
//! Every check returns a list of [`ValidationError`]s rather than failing;
//! an empty list means the check ran and found nothing. Callers decide which
//! kinds are fatal for the operation at hand.

pub mod checks;
pub mod draft;
pub mod limits;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use checks::*;
pub use draft::{draft_allocation_total, parse_drafts, validate_drafts, HoldingDraft};
pub use limits::ValidationLimits;

/// The closed set of problems the validator can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    InvalidAllocationSum,
    UnsupportedAssetType,
    InvalidSymbolFormat,
    MissingRequiredField,
    ConcentrationWarning,
    InvalidAssetCount,
    InvalidAllocationValue,
    AmountMismatch,
    /// Dollar amounts whose total cannot be represented
    InvalidDollarAmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks the operation that requested validation
    Error,
    /// Advisory only
    Warning,
}

impl ValidationErrorKind {
    pub fn severity(&self) -> Severity {
        match self {
            ValidationErrorKind::ConcentrationWarning | ValidationErrorKind::AmountMismatch => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

/// One finding: what went wrong, a readable message and the offending field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
    pub field: String,
}

impl ValidationError {
    pub fn new(
        kind: ValidationErrorKind,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            field: field.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.kind.severity() == Severity::Warning
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.field)
    }
}

/// Combined result of running the structural checks over a holding set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

impl ValidationReport {
    /// Split findings by severity, preserving order within each bucket.
    pub fn from_findings(findings: Vec<ValidationError>) -> Self {
        let (warnings, errors): (Vec<_>, Vec<_>) =
            findings.into_iter().partition(ValidationError::is_warning);
        Self { errors, warnings }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use portfolio_risk_core::holdings::AssetType;
use portfolio_risk_core::types::Percent;
use portfolio_risk_core::validation::{
    check_asset_type, check_symbol_format, draft_allocation_total, validate_drafts,
    ValidationError,
};

use crate::input;
use crate::settings::Settings;

/// Arguments for holdings validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to JSON/YAML file with holdings (array, or object with a "holdings" key)
    #[arg(long)]
    pub input: Option<String>,

    /// Treat advisory warnings as failures
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for a standalone symbol check
#[derive(Args)]
pub struct CheckSymbolArgs {
    /// Ticker symbol, e.g. "BRK.B"
    pub symbol: String,
}

/// Arguments for a standalone asset type check
#[derive(Args)]
pub struct CheckTypeArgs {
    /// Asset type token, e.g. "etf" or "MUTUAL_FUND"
    pub asset_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ValidationOutput {
    valid: bool,
    holdings_count: usize,
    allocation_total: Option<Percent>,
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenCheckOutput {
    input: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalized: Option<String>,
    errors: Vec<ValidationError>,
}

pub fn run_validate(
    args: ValidateArgs,
    settings: &Settings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let payload = input::read_payload(args.input.as_deref())?;
    let drafts = input::holding_drafts(&payload)?;
    let report = validate_drafts(&drafts, &settings.validation);

    let valid = if args.strict {
        report.is_clean()
    } else {
        report.is_valid()
    };
    tracing::info!(
        valid,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validation finished"
    );

    let output = ValidationOutput {
        valid,
        holdings_count: drafts.len(),
        allocation_total: draft_allocation_total(&drafts),
        errors: report.errors,
        warnings: report.warnings,
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_check_symbol(args: CheckSymbolArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let errors = check_symbol_format(&args.symbol);
    let output = TokenCheckOutput {
        valid: errors.is_empty(),
        normalized: None,
        input: args.symbol,
        errors,
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_check_type(args: CheckTypeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let errors = check_asset_type(&args.asset_type);
    let normalized = AssetType::from_str(&args.asset_type)
        .ok()
        .map(|t| t.as_str().to_string());
    let output = TokenCheckOutput {
        valid: errors.is_empty(),
        normalized,
        input: args.asset_type,
        errors,
    };
    Ok(serde_json::to_value(output)?)
}

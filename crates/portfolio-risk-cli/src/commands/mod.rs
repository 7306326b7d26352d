pub mod portfolio;
pub mod scenario;
pub mod validate;

use serde_json::Value;

use portfolio_risk_core::holdings::AssetHolding;
use portfolio_risk_core::validation::{
    parse_drafts, validate_drafts, HoldingDraft, ValidationLimits,
};
use portfolio_risk_core::PortfolioRiskError;

use crate::input;

/// Parse the payload's holdings without running the portfolio-level checks.
pub(crate) fn parse_holdings(
    payload: &Value,
) -> Result<Vec<AssetHolding>, Box<dyn std::error::Error>> {
    into_holdings(input::holding_drafts(payload)?)
}

fn into_holdings(
    drafts: Vec<HoldingDraft>,
) -> Result<Vec<AssetHolding>, Box<dyn std::error::Error>> {
    let holdings =
        parse_drafts(drafts).map_err(|errors| PortfolioRiskError::ValidationFailed { errors })?;
    Ok(holdings)
}

/// Parse and validate; hard errors abort, warnings are logged. Parse errors
/// and portfolio-level errors are reported together.
pub(crate) fn validated_holdings(
    payload: &Value,
    limits: &ValidationLimits,
) -> Result<Vec<AssetHolding>, Box<dyn std::error::Error>> {
    let drafts = input::holding_drafts(payload)?;
    let report = validate_drafts(&drafts, limits);
    for warning in &report.warnings {
        tracing::warn!(field = %warning.field, "{}", warning.message);
    }
    if !report.is_valid() {
        return Err(PortfolioRiskError::ValidationFailed {
            errors: report.errors,
        }
        .into());
    }
    into_holdings(drafts)
}

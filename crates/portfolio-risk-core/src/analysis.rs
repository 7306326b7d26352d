use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PortfolioRiskError;
use crate::holdings::AssetHolding;
use crate::numeric::saturating_sum;
use crate::risk_profile::{
    allocation_breakdown, compute_diversification, compute_risk_profile, AllocationBreakdown,
    DiversificationAnalysis, RiskProfile,
};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::validation::{validate_holdings, ValidationError, ValidationLimits};
use crate::PortfolioRiskResult;

/// Input for the combined validate-then-score pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioAnalysisInput {
    pub holdings: Vec<AssetHolding>,
    #[serde(default)]
    pub limits: ValidationLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    pub risk_profile: RiskProfile,
    pub diversification: DiversificationAnalysis,
    pub breakdown: AllocationBreakdown,
    pub total_value: Money,
    pub holdings_count: usize,
    /// Advisory findings that did not block scoring
    pub validation_warnings: Vec<ValidationError>,
}

/// Validate the holdings, then compute the risk profile, diversification and
/// allocation breakdown. Hard validation errors abort; advisory findings are
/// reported as envelope warnings.
pub fn analyze_portfolio(
    input: &PortfolioAnalysisInput,
) -> PortfolioRiskResult<ComputationOutput<PortfolioAnalysis>> {
    let start = Instant::now();

    let report = validate_holdings(&input.holdings, &input.limits);
    if !report.is_valid() {
        tracing::warn!(errors = report.errors.len(), "portfolio failed validation");
        return Err(PortfolioRiskError::ValidationFailed {
            errors: report.errors,
        });
    }

    let warnings: Vec<String> = report.warnings.iter().map(|w| w.message.clone()).collect();
    let risk_profile = compute_risk_profile(&input.holdings);
    let diversification = compute_diversification(&input.holdings);
    let breakdown = allocation_breakdown(&input.holdings);

    let output = PortfolioAnalysis {
        risk_profile,
        diversification,
        breakdown,
        total_value: saturating_sum(input.holdings.iter().map(|h| h.dollar_amount)),
        holdings_count: input.holdings.len(),
        validation_warnings: report.warnings,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Portfolio risk profile (HHI concentration, weighted volatility and credit) and diversification scoring",
        &serde_json::json!({
            "overall_weights": {
                "concentration": "0.4",
                "volatility": "0.4",
                "credit": "0.2",
            },
            "default_volatility_pct": "15",
            "allocation_tolerance": input.limits.allocation_tolerance.to_string(),
            "max_single_allocation_pct": input.limits.max_single_allocation_pct.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

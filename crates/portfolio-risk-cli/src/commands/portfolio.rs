use clap::Args;
use serde_json::Value;

use portfolio_risk_core::analysis::{analyze_portfolio, PortfolioAnalysisInput};
use portfolio_risk_core::risk_profile::{compute_diversification, compute_risk_profile};

use super::{parse_holdings, validated_holdings};
use crate::input;
use crate::settings::Settings;

/// Arguments shared by the profile, diversification and analyze commands
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to JSON/YAML file with holdings (array, or object with a "holdings" key)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_profile(
    args: PortfolioArgs,
    settings: &Settings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let payload = input::read_payload(args.input.as_deref())?;
    let holdings = validated_holdings(&payload, &settings.validation)?;
    let profile = compute_risk_profile(&holdings);
    Ok(serde_json::to_value(profile)?)
}

pub fn run_diversification(
    args: PortfolioArgs,
    settings: &Settings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let payload = input::read_payload(args.input.as_deref())?;
    let holdings = validated_holdings(&payload, &settings.validation)?;
    let analysis = compute_diversification(&holdings);
    Ok(serde_json::to_value(analysis)?)
}

pub fn run_analyze(
    args: PortfolioArgs,
    settings: &Settings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let payload = input::read_payload(args.input.as_deref())?;
    let input = PortfolioAnalysisInput {
        holdings: parse_holdings(&payload)?,
        limits: settings.validation.clone(),
    };
    let output = analyze_portfolio(&input)?;
    Ok(serde_json::to_value(output)?)
}

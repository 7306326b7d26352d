use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use portfolio_risk_core::scenarios::{
    builtin_scenarios, compare_scenarios, find_builtin, run_scenario_analysis,
    ScenarioAnalysisInput, ScenarioComparisonInput, ScenarioDefinition,
};
use portfolio_risk_core::types::Money;

use super::validated_holdings;
use crate::input;
use crate::settings::Settings;

/// Arguments for a single scenario run
#[derive(Args)]
pub struct ScenarioArgs {
    /// Path to JSON/YAML file with holdings; may also carry a "scenario" object
    #[arg(long)]
    pub input: Option<String>,

    /// Built-in scenario name (see `prisk scenarios`), e.g. "Recession"
    #[arg(long, conflicts_with = "scenario_file")]
    pub scenario: Option<String>,

    /// Path to a JSON/YAML scenario definition
    #[arg(long)]
    pub scenario_file: Option<String>,

    /// Portfolio value for dollar impacts (defaults to the sum of dollar amounts)
    #[arg(long)]
    pub portfolio_value: Option<Decimal>,
}

/// Arguments for ranking several scenarios
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON/YAML file with holdings
    #[arg(long)]
    pub input: Option<String>,

    /// Comma-separated built-in scenario names; all built-ins when omitted
    #[arg(long, value_delimiter = ',', conflicts_with = "scenarios_file")]
    pub scenarios: Option<Vec<String>>,

    /// Path to a JSON/YAML array of scenario definitions
    #[arg(long)]
    pub scenarios_file: Option<String>,

    /// Portfolio value for dollar impacts (defaults to the sum of dollar amounts)
    #[arg(long)]
    pub portfolio_value: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ScenarioSummary {
    name: String,
    description: String,
    categories: usize,
}

fn unknown_scenario(name: &str) -> Box<dyn std::error::Error> {
    let available: Vec<String> = builtin_scenarios().into_iter().map(|s| s.name).collect();
    format!(
        "Unknown scenario '{}'. Available: {}",
        name,
        available.join(", ")
    )
    .into()
}

fn resolve_scenario(
    args: &ScenarioArgs,
    payload: &Value,
) -> Result<ScenarioDefinition, Box<dyn std::error::Error>> {
    if let Some(ref name) = args.scenario {
        return find_builtin(name).ok_or_else(|| unknown_scenario(name));
    }
    if let Some(ref path) = args.scenario_file {
        return input::file::read_typed(path);
    }
    match payload.get("scenario") {
        Some(value) => Ok(serde_json::from_value(value.clone())?),
        None => Err(
            "Provide --scenario <name>, --scenario-file, or a 'scenario' object in the input"
                .into(),
        ),
    }
}

/// Command line first, then the payload, then the settings file.
fn resolve_portfolio_value(
    flag: Option<Money>,
    payload: &Value,
    settings: &Settings,
) -> Result<Option<Money>, Box<dyn std::error::Error>> {
    if flag.is_some() {
        return Ok(flag);
    }
    if let Some(value) = payload.get("portfolio_value").filter(|v| !v.is_null()) {
        return Ok(Some(serde_json::from_value(value.clone())?));
    }
    Ok(settings.scenarios.default_portfolio_value)
}

pub fn run_scenario(
    args: ScenarioArgs,
    settings: &Settings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let payload = input::read_payload(args.input.as_deref())?;
    let holdings = validated_holdings(&payload, &settings.validation)?;
    let scenario = resolve_scenario(&args, &payload)?;
    let portfolio_value = resolve_portfolio_value(args.portfolio_value, &payload, settings)?;
    tracing::info!(scenario = %scenario.name, holdings = holdings.len(), "running scenario");

    let input = ScenarioAnalysisInput {
        holdings,
        scenario,
        portfolio_value,
    };
    let output = run_scenario_analysis(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_compare(
    args: CompareArgs,
    settings: &Settings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let payload = input::read_payload(args.input.as_deref())?;
    let holdings = validated_holdings(&payload, &settings.validation)?;

    let scenarios: Vec<ScenarioDefinition> = if let Some(ref path) = args.scenarios_file {
        input::file::read_typed(path)?
    } else if let Some(ref names) = args.scenarios {
        names
            .iter()
            .map(|name| find_builtin(name).ok_or_else(|| unknown_scenario(name)))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        builtin_scenarios()
    };
    let portfolio_value = resolve_portfolio_value(args.portfolio_value, &payload, settings)?;
    tracing::info!(
        scenarios = scenarios.len(),
        holdings = holdings.len(),
        "comparing scenarios"
    );

    let input = ScenarioComparisonInput {
        holdings,
        scenarios,
        portfolio_value,
    };
    let output = compare_scenarios(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_list_scenarios() -> Result<Value, Box<dyn std::error::Error>> {
    let summaries: Vec<ScenarioSummary> = builtin_scenarios()
        .into_iter()
        .map(|s| ScenarioSummary {
            categories: s.impacts.len(),
            name: s.name,
            description: s.description,
        })
        .collect();
    Ok(serde_json::to_value(summaries)?)
}

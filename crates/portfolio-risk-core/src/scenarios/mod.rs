pub mod impact;
pub mod library;

pub use impact::{
    asset_impact, compare_scenarios, portfolio_impact, run_scenario, run_scenario_analysis,
    CategoryImpact, ImpactRange, ScenarioAnalysisInput, ScenarioComparison,
    ScenarioComparisonInput, ScenarioDefinition, ScenarioImpact, DEFAULT_VOLATILITY_MULTIPLIER,
};
pub use library::{builtin_scenarios, find_builtin};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::PortfolioRiskError;
use crate::holdings::{AssetCategory, AssetHolding};
use crate::numeric::{checked_sum, clamp, fraction, midpoint, saturating_sum};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::PortfolioRiskResult;

pub const DEFAULT_VOLATILITY_MULTIPLIER: Decimal = dec!(1);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Expected percentage move of a category under a scenario, `[min_pct, max_pct]`.
///
/// `min_pct <= max_pct` always holds: construction goes through
/// [`ImpactRange::new`] and deserialization applies the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds", into = "RangeBounds")]
pub struct ImpactRange {
    min_pct: Percent,
    max_pct: Percent,
}

/// Wire shape of [`ImpactRange`].
#[derive(Clone, Copy, Serialize, Deserialize)]
struct RangeBounds {
    min_pct: Percent,
    max_pct: Percent,
}

impl TryFrom<RangeBounds> for ImpactRange {
    type Error = PortfolioRiskError;

    fn try_from(bounds: RangeBounds) -> Result<Self, Self::Error> {
        ImpactRange::new(bounds.min_pct, bounds.max_pct)
    }
}

impl From<ImpactRange> for RangeBounds {
    fn from(range: ImpactRange) -> Self {
        RangeBounds {
            min_pct: range.min_pct,
            max_pct: range.max_pct,
        }
    }
}

impl ImpactRange {
    pub fn new(min_pct: Percent, max_pct: Percent) -> PortfolioRiskResult<Self> {
        if min_pct > max_pct {
            return Err(PortfolioRiskError::InvalidInput {
                field: "impact_range".into(),
                reason: format!("min_pct {min_pct} exceeds max_pct {max_pct}"),
            });
        }
        Ok(Self { min_pct, max_pct })
    }

    pub fn min_pct(&self) -> Percent {
        self.min_pct
    }

    pub fn max_pct(&self) -> Percent {
        self.max_pct
    }

    pub fn midpoint(&self) -> Percent {
        midpoint(self.min_pct, self.max_pct)
    }

    pub fn contains(&self, value: Percent) -> bool {
        value >= self.min_pct && value <= self.max_pct
    }
}

/// A category's range plus the scenario author's note on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryImpact {
    pub min_pct: Percent,
    pub max_pct: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl CategoryImpact {
    pub fn range(&self) -> PortfolioRiskResult<ImpactRange> {
        ImpactRange::new(self.min_pct, self.max_pct)
    }
}

/// A hypothetical economic scenario, expressed as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Categories the scenario has an opinion on; absent categories are unaffected
    pub impacts: BTreeMap<AssetCategory, CategoryImpact>,
}

impl ScenarioDefinition {
    pub fn validate(&self) -> PortfolioRiskResult<()> {
        if self.name.trim().is_empty() {
            return Err(PortfolioRiskError::InvalidInput {
                field: "scenario.name".into(),
                reason: "Scenario name must not be empty".into(),
            });
        }
        for (category, impact) in &self.impacts {
            if impact.min_pct > impact.max_pct {
                return Err(PortfolioRiskError::InvalidInput {
                    field: format!("scenario.impacts.{category}"),
                    reason: format!(
                        "min_pct {} exceeds max_pct {}",
                        impact.min_pct, impact.max_pct
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn category_ranges(&self) -> PortfolioRiskResult<BTreeMap<AssetCategory, ImpactRange>> {
        self.impacts
            .iter()
            .map(|(category, impact)| Ok((*category, impact.range()?)))
            .collect()
    }
}

/// One held category's share of the scenario outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryImpactResult {
    pub category: AssetCategory,
    pub label: String,
    pub allocation_pct: Percent,
    pub range: ImpactRange,
    /// Expected move of the category itself
    pub impact_pct: Percent,
    /// impact_pct weighted by the category's allocation
    pub contribution_pct: Percent,
    pub dollar_impact: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioImpact {
    pub scenario_name: String,
    pub total_impact_pct: Percent,
    pub portfolio_value: Money,
    pub dollar_impact: Money,
    pub projected_value: Money,
    pub category_impacts: Vec<CategoryImpactResult>,
    /// Held categories the scenario says nothing about; they contribute zero
    pub uncovered_categories: Vec<AssetCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioAnalysisInput {
    pub holdings: Vec<AssetHolding>,
    pub scenario: ScenarioDefinition,
    /// Defaults to the sum of the holdings' dollar amounts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_value: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparisonInput {
    pub holdings: Vec<AssetHolding>,
    pub scenarios: Vec<ScenarioDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_value: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    /// Worst outcome first
    pub results: Vec<ScenarioImpact>,
    pub worst_case: String,
    pub best_case: String,
    pub average_impact_pct: Percent,
}

// ---------------------------------------------------------------------------
// Core formulas
// ---------------------------------------------------------------------------

/// Midpoint of the range scaled by `volatility_multiplier`, clamped back into
/// the range so the multiplier can never leave the author's bounds.
pub fn asset_impact(range: &ImpactRange, volatility_multiplier: Decimal) -> Percent {
    clamp(
        range.midpoint().saturating_mul(volatility_multiplier),
        range.min_pct,
        range.max_pct,
    )
}

/// Allocation-weighted impact across all holdings. Holdings whose category is
/// missing from the map contribute zero.
///
/// Saturates at Decimal's bounds for out-of-range allocations.
pub fn portfolio_impact(
    holdings: &[AssetHolding],
    category_map: &BTreeMap<AssetCategory, ImpactRange>,
) -> Percent {
    saturating_sum(holdings.iter().filter_map(|h| {
        category_map.get(&h.category).map(|range| {
            asset_impact(range, DEFAULT_VOLATILITY_MULTIPLIER).saturating_mul(h.weight())
        })
    }))
}

fn out_of_range(field: &str, what: &str) -> PortfolioRiskError {
    PortfolioRiskError::InvalidInput {
        field: field.into(),
        reason: format!("{what} is too large to represent"),
    }
}

/// Sum of the holdings' dollar amounts.
pub fn default_portfolio_value(holdings: &[AssetHolding]) -> PortfolioRiskResult<Money> {
    checked_sum(holdings.iter().map(|h| h.dollar_amount))
        .ok_or_else(|| out_of_range("holdings.dollar_amount", "Total of dollar amounts"))
}

/// `pct` percent of `value`.
fn dollars_of(pct: Percent, value: Money, field: &str) -> PortfolioRiskResult<Money> {
    fraction(pct)
        .checked_mul(value)
        .ok_or_else(|| out_of_range(field, "Dollar impact"))
}

/// Apply one scenario to a holding set. Does not validate the scenario beyond
/// its ranges; fails only when a range is inverted or a dollar figure cannot
/// be represented.
pub fn run_scenario(
    holdings: &[AssetHolding],
    scenario: &ScenarioDefinition,
    portfolio_value: Option<Money>,
) -> PortfolioRiskResult<ScenarioImpact> {
    let value = match portfolio_value {
        Some(value) => value,
        None => default_portfolio_value(holdings)?,
    };
    let ranges = scenario.category_ranges()?;
    let total_impact_pct = portfolio_impact(holdings, &ranges);

    let mut held: BTreeMap<AssetCategory, Percent> = BTreeMap::new();
    for h in holdings {
        let total = held.entry(h.category).or_default();
        *total = total.saturating_add(h.allocation_pct);
    }

    let mut category_impacts = Vec::new();
    let mut uncovered_categories = Vec::new();
    for (category, allocation_pct) in held {
        let Some(impact) = scenario.impacts.get(&category) else {
            uncovered_categories.push(category);
            continue;
        };
        let range = impact.range()?;
        let impact_pct = asset_impact(&range, DEFAULT_VOLATILITY_MULTIPLIER);
        let contribution_pct = impact_pct.saturating_mul(fraction(allocation_pct));
        category_impacts.push(CategoryImpactResult {
            category,
            label: category.label().to_string(),
            allocation_pct,
            range,
            impact_pct,
            contribution_pct,
            dollar_impact: dollars_of(
                contribution_pct,
                value,
                &format!("category_impacts.{category}.dollar_impact"),
            )?,
            rationale: impact.rationale.clone(),
        });
    }

    let dollar_impact = dollars_of(total_impact_pct, value, "dollar_impact")?;
    let projected_value = value
        .checked_add(dollar_impact)
        .ok_or_else(|| out_of_range("projected_value", "Projected value"))?;
    tracing::debug!(
        scenario = %scenario.name,
        impact_pct = %total_impact_pct,
        "ran scenario"
    );

    Ok(ScenarioImpact {
        scenario_name: scenario.name.clone(),
        total_impact_pct,
        portfolio_value: value,
        dollar_impact,
        projected_value,
        category_impacts,
        uncovered_categories,
    })
}

// ---------------------------------------------------------------------------
// Envelope entry points
// ---------------------------------------------------------------------------

const EMPTY_PORTFOLIO_WARNING: &str = "Portfolio holds no assets; scenario impact is zero";

fn coverage_warning(impact: &ScenarioImpact) -> Option<String> {
    if impact.uncovered_categories.is_empty() {
        return None;
    }
    Some(format!(
        "Scenario '{}' does not cover held categories: {}",
        impact.scenario_name,
        impact
            .uncovered_categories
            .iter()
            .map(AssetCategory::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    ))
}

/// Validate the scenario and run it, wrapped in the standard envelope.
pub fn run_scenario_analysis(
    input: &ScenarioAnalysisInput,
) -> PortfolioRiskResult<ComputationOutput<ScenarioImpact>> {
    let start = Instant::now();
    input.scenario.validate()?;
    if let Some(value) = input.portfolio_value {
        if value < Decimal::ZERO {
            return Err(PortfolioRiskError::InvalidInput {
                field: "portfolio_value".into(),
                reason: "Portfolio value must not be negative".into(),
            });
        }
    }

    let impact = run_scenario(&input.holdings, &input.scenario, input.portfolio_value)?;
    let mut warnings = Vec::new();
    if input.holdings.is_empty() {
        warnings.push(EMPTY_PORTFOLIO_WARNING.to_string());
    }
    warnings.extend(coverage_warning(&impact));

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Scenario impact: clamped range midpoint per category, allocation-weighted",
        &serde_json::json!({
            "scenario": input.scenario.name,
            "holdings": input.holdings.len(),
            "volatility_multiplier": DEFAULT_VOLATILITY_MULTIPLIER.to_string(),
            "portfolio_value": impact.portfolio_value.to_string(),
        }),
        warnings,
        elapsed,
        impact,
    ))
}

/// Run several scenarios against the same holdings and rank them worst first.
pub fn compare_scenarios(
    input: &ScenarioComparisonInput,
) -> PortfolioRiskResult<ComputationOutput<ScenarioComparison>> {
    let start = Instant::now();
    if input.scenarios.is_empty() {
        return Err(PortfolioRiskError::InsufficientData(
            "At least one scenario required".into(),
        ));
    }
    for scenario in &input.scenarios {
        scenario.validate()?;
    }

    let mut warnings = Vec::new();
    let mut results: Vec<ScenarioImpact> = input
        .scenarios
        .iter()
        .map(|s| run_scenario(&input.holdings, s, input.portfolio_value))
        .collect::<PortfolioRiskResult<_>>()?;
    if input.holdings.is_empty() {
        warnings.push(EMPTY_PORTFOLIO_WARNING.to_string());
    }
    warnings.extend(results.iter().filter_map(coverage_warning));

    // Stable sort keeps definition order between equal outcomes
    results.sort_by(|a, b| a.total_impact_pct.cmp(&b.total_impact_pct));

    let total = saturating_sum(results.iter().map(|r| r.total_impact_pct));
    let average_impact_pct = total / Decimal::from(results.len());
    let worst_case = results
        .first()
        .map(|r| r.scenario_name.clone())
        .unwrap_or_default();
    let best_case = results
        .last()
        .map(|r| r.scenario_name.clone())
        .unwrap_or_default();

    let output = ScenarioComparison {
        results,
        worst_case,
        best_case,
        average_impact_pct,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Scenario comparison ranked by total impact",
        &serde_json::json!({
            "num_scenarios": input.scenarios.len(),
            "holdings": input.holdings.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

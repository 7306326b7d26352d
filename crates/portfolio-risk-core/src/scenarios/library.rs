use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::impact::{CategoryImpact, ScenarioDefinition};
use crate::holdings::AssetCategory;
use crate::holdings::AssetCategory::*;

// ---------------------------------------------------------------------------
// Built-in hypothetical scenarios
// ---------------------------------------------------------------------------

/// (category, min %, max %, rationale)
type Row = (AssetCategory, i64, i64, &'static str);

fn scenario(name: &str, description: &str, rows: &[Row]) -> ScenarioDefinition {
    let impacts: BTreeMap<AssetCategory, CategoryImpact> = rows
        .iter()
        .map(|(category, min, max, rationale)| {
            (
                *category,
                CategoryImpact {
                    min_pct: Decimal::from(*min),
                    max_pct: Decimal::from(*max),
                    rationale: Some((*rationale).to_string()),
                },
            )
        })
        .collect();
    ScenarioDefinition {
        name: name.into(),
        description: description.into(),
        impacts,
    }
}

/// The predefined scenarios shipped with the engine.
pub fn builtin_scenarios() -> Vec<ScenarioDefinition> {
    vec![
        scenario(
            "Recession",
            "Broad economic contraction with falling earnings and rate cuts",
            &[
                (UsLargeCap, -35, -20, "Earnings contraction"),
                (UsMidCap, -40, -25, "Earnings contraction"),
                (UsSmallCap, -45, -25, "Credit-sensitive smaller firms"),
                (InternationalDeveloped, -35, -20, "Global demand slump"),
                (EmergingMarkets, -45, -25, "Capital flight"),
                (GovernmentBond, 3, 10, "Flight to quality, rate cuts"),
                (CorporateBond, -5, 3, "Spread widening offsets lower rates"),
                (HighYieldBond, -20, -8, "Rising defaults"),
                (MunicipalBond, -3, 4, "Tax revenue pressure"),
                (InternationalBond, -2, 5, "Rate cuts abroad"),
                (Tips, 0, 5, "Falling real yields"),
                (RealEstate, -35, -15, "Vacancies and refinancing stress"),
                (Commodities, -30, -10, "Demand destruction"),
                (Gold, 5, 20, "Safe-haven demand"),
                (Cash, 0, 1, "Capital preserved"),
            ],
        ),
        scenario(
            "Inflation Surge",
            "Sustained high inflation forcing tighter monetary policy",
            &[
                (UsLargeCap, -15, -5, "Margin compression"),
                (UsMidCap, -18, -5, "Margin compression"),
                (UsSmallCap, -20, -5, "Higher financing costs"),
                (InternationalDeveloped, -15, -5, "Margin compression"),
                (EmergingMarkets, -20, -5, "Stronger dollar"),
                (GovernmentBond, -12, -4, "Rising nominal yields"),
                (CorporateBond, -12, -5, "Rising yields"),
                (HighYieldBond, -10, -3, "Rising yields, nominal revenue growth"),
                (MunicipalBond, -10, -3, "Rising yields"),
                (InternationalBond, -10, -3, "Rising yields"),
                (Tips, 2, 8, "Inflation indexation"),
                (RealEstate, -5, 10, "Rents reprice with inflation"),
                (Commodities, 10, 30, "Real asset demand"),
                (Gold, 8, 25, "Inflation hedge"),
                (Cash, 1, 3, "Higher short rates"),
            ],
        ),
        scenario(
            "Rate Shock",
            "Rapid 200bp rise in interest rates across the curve",
            &[
                (UsLargeCap, -15, -5, "Valuation multiple compression"),
                (UsMidCap, -18, -6, "Valuation multiple compression"),
                (UsSmallCap, -22, -8, "Floating-rate debt burden"),
                (InternationalDeveloped, -12, -4, "Spillover from US rates"),
                (EmergingMarkets, -20, -8, "Dollar funding stress"),
                (GovernmentBond, -12, -6, "Duration loss"),
                (CorporateBond, -14, -7, "Duration loss and spread widening"),
                (HighYieldBond, -10, -4, "Refinancing risk"),
                (MunicipalBond, -10, -5, "Duration loss"),
                (InternationalBond, -10, -4, "Duration loss"),
                (Tips, -8, -2, "Rising real yields"),
                (RealEstate, -20, -8, "Cap rate expansion"),
                (Commodities, -5, 5, "Mixed demand signal"),
                (Gold, -8, 0, "Higher opportunity cost"),
                (Cash, 1, 2, "Higher short rates"),
            ],
        ),
        scenario(
            "Market Rally",
            "Strong risk-on environment with rising earnings",
            &[
                (UsLargeCap, 15, 30, "Earnings growth"),
                (UsMidCap, 18, 35, "Earnings growth"),
                (UsSmallCap, 20, 40, "High beta to growth"),
                (InternationalDeveloped, 12, 25, "Global recovery"),
                (EmergingMarkets, 15, 35, "Capital inflows"),
                (GovernmentBond, -3, 2, "Reduced safe-haven demand"),
                (CorporateBond, 0, 5, "Spread tightening"),
                (HighYieldBond, 5, 12, "Spread tightening"),
                (MunicipalBond, -1, 3, "Stable credit"),
                (InternationalBond, -2, 3, "Stable yields"),
                (Tips, -2, 3, "Stable real yields"),
                (RealEstate, 10, 25, "Occupancy recovery"),
                (Commodities, 5, 15, "Demand growth"),
                (Gold, -5, 5, "Reduced hedging demand"),
                (Cash, 0, 1, "Flat"),
            ],
        ),
        scenario(
            "Emerging Markets Crisis",
            "Currency and debt crisis concentrated in emerging economies",
            &[
                (UsLargeCap, -12, -3, "Contagion"),
                (UsMidCap, -14, -4, "Contagion"),
                (UsSmallCap, -15, -5, "Risk-off selling"),
                (InternationalDeveloped, -15, -5, "Trade exposure"),
                (EmergingMarkets, -40, -20, "Currency collapse"),
                (GovernmentBond, 2, 6, "Flight to quality"),
                (CorporateBond, -3, 2, "Modest spread widening"),
                (HighYieldBond, -12, -4, "Risk-off spread widening"),
                (InternationalBond, -8, 0, "Sovereign stress"),
                (Commodities, -20, -8, "Falling EM demand"),
                (Gold, 5, 15, "Safe-haven demand"),
                (Cash, 0, 1, "Capital preserved"),
            ],
        ),
    ]
}

/// Look up a built-in scenario by name, ignoring case and surrounding whitespace.
pub fn find_builtin(name: &str) -> Option<ScenarioDefinition> {
    let wanted = name.trim();
    builtin_scenarios()
        .into_iter()
        .find(|s| s.name.eq_ignore_ascii_case(wanted))
}

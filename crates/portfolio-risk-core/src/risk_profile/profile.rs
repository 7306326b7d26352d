use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::credit::holding_credit_score;
use crate::holdings::{AssetHolding, Region};
use crate::numeric::{allocation_weighted_sum, clamp, saturating_sum, share_of};
use crate::types::{Percent, Score};

pub const SCORE_MIN: Score = dec!(1);
pub const SCORE_MAX: Score = dec!(10);
/// Scales an HHI of 1.0 (single holding) to the top of the 0-10 range
pub const HHI_SCALE: Decimal = dec!(10);
/// Used for holdings with no historical volatility on record
pub const DEFAULT_VOLATILITY_PCT: Percent = dec!(15);
/// Maps the 5%-30% volatility band onto the 1-10 scale
pub const VOLATILITY_DIVISOR: Decimal = dec!(3);
pub const CONCENTRATION_WEIGHT: Decimal = dec!(0.4);
pub const VOLATILITY_WEIGHT: Decimal = dec!(0.4);
pub const CREDIT_WEIGHT: Decimal = dec!(0.2);

/// Coarse band for the overall risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    Elevated,
    High,
}

impl RiskLevel {
    pub fn from_score(score: Score) -> Self {
        if score <= dec!(3) {
            RiskLevel::Low
        } else if score <= dec!(5) {
            RiskLevel::Moderate
        } else if score <= dec!(7) {
            RiskLevel::Elevated
        } else {
            RiskLevel::High
        }
    }
}

/// Multi-factor risk profile of a holding set.
///
/// Sector concentration and geographic risk are percentages and are reported
/// for diagnosis only; they do not feed the overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    /// 0.4 x concentration + 0.4 x volatility + 0.2 x credit, in [1, 10]
    pub overall_risk: Score,
    /// HHI x 10, capped at 10
    pub concentration_risk: Score,
    /// Largest single-sector allocation, 0-100
    pub sector_concentration: Percent,
    /// Share of allocation in the largest region, 0-100
    pub geographic_risk: Percent,
    /// Weighted volatility / 3, in [1, 10]
    pub volatility_score: Score,
    /// Weighted credit score, capped at 10
    pub credit_risk: Score,
    pub herfindahl_index: Decimal,
    pub risk_level: RiskLevel,
}

/// Herfindahl-Hirschman index of allocation fractions: 0 diversified, 1 single holding.
///
/// Saturates on out-of-range allocations; the score derived from it is capped.
pub fn herfindahl_index(holdings: &[AssetHolding]) -> Decimal {
    saturating_sum(holdings.iter().map(|h| {
        let w = h.weight();
        w.saturating_mul(w)
    }))
}

pub fn concentration_risk(holdings: &[AssetHolding]) -> Score {
    herfindahl_index(holdings)
        .saturating_mul(HHI_SCALE)
        .min(SCORE_MAX)
}

/// Largest summed allocation across declared sectors. Holdings without a
/// sector belong to no bucket.
pub fn sector_concentration(holdings: &[AssetHolding]) -> Percent {
    let mut sectors: BTreeMap<&str, Percent> = BTreeMap::new();
    for h in holdings {
        if let Some(sector) = h.declared_sector() {
            let total = sectors.entry(sector).or_default();
            *total = total.saturating_add(h.allocation_pct);
        }
    }
    sectors.into_values().max().unwrap_or(Decimal::ZERO)
}

pub fn geographic_risk(holdings: &[AssetHolding]) -> Percent {
    let mut regions: BTreeMap<Region, Percent> = BTreeMap::new();
    for h in holdings {
        let total = regions.entry(h.region).or_default();
        *total = total.saturating_add(h.allocation_pct);
    }
    let total = saturating_sum(regions.values().copied());
    let largest = regions.values().copied().max().unwrap_or(Decimal::ZERO);
    share_of(largest, total)
}

pub fn weighted_volatility(holdings: &[AssetHolding]) -> Percent {
    allocation_weighted_sum(holdings.iter().map(|h| {
        (
            h.volatility_pct.unwrap_or(DEFAULT_VOLATILITY_PCT),
            h.allocation_pct,
        )
    }))
}

pub fn volatility_score(holdings: &[AssetHolding]) -> Score {
    clamp(
        weighted_volatility(holdings) / VOLATILITY_DIVISOR,
        SCORE_MIN,
        SCORE_MAX,
    )
}

pub fn credit_risk(holdings: &[AssetHolding]) -> Score {
    allocation_weighted_sum(
        holdings
            .iter()
            .map(|h| (holding_credit_score(h), h.allocation_pct)),
    )
    .min(SCORE_MAX)
}

pub fn overall_risk_score(concentration: Score, volatility: Score, credit: Score) -> Score {
    let weighted = saturating_sum([
        CONCENTRATION_WEIGHT * concentration,
        VOLATILITY_WEIGHT * volatility,
        CREDIT_WEIGHT * credit,
    ]);
    clamp(weighted, SCORE_MIN, SCORE_MAX)
}

/// Compute the full risk profile. Never fails: an empty holding set is a
/// zero-holdings portfolio whose raw sums are all zero, so only the clamped
/// scores (volatility, overall) sit at their floor of 1.
pub fn compute_risk_profile(holdings: &[AssetHolding]) -> RiskProfile {
    let herfindahl = herfindahl_index(holdings);
    let concentration = herfindahl.saturating_mul(HHI_SCALE).min(SCORE_MAX);
    let volatility = volatility_score(holdings);
    let credit = credit_risk(holdings);
    let overall = overall_risk_score(concentration, volatility, credit);

    let profile = RiskProfile {
        overall_risk: overall,
        concentration_risk: concentration,
        sector_concentration: sector_concentration(holdings),
        geographic_risk: geographic_risk(holdings),
        volatility_score: volatility,
        credit_risk: credit,
        herfindahl_index: herfindahl,
        risk_level: RiskLevel::from_score(overall),
    };
    tracing::debug!(
        holdings = holdings.len(),
        overall = %profile.overall_risk,
        "computed risk profile"
    );
    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holdings::{AssetCategory, AssetType};
    use pretty_assertions::assert_eq;

    fn etf(symbol: &str, pct: Decimal) -> AssetHolding {
        AssetHolding::new(
            symbol,
            symbol,
            AssetType::Etf,
            AssetCategory::UsLargeCap,
            Region::Us,
            pct,
            pct * dec!(1000),
        )
    }

    fn bond(symbol: &str, pct: Decimal, rating: Option<&str>) -> AssetHolding {
        let h = AssetHolding::new(
            symbol,
            symbol,
            AssetType::Bond,
            AssetCategory::CorporateBond,
            Region::Us,
            pct,
            pct * dec!(1000),
        );
        match rating {
            Some(r) => h.with_credit_rating(r),
            None => h,
        }
    }

    #[test]
    fn test_single_holding_concentration_is_ten() {
        let p = compute_risk_profile(&[etf("VTI", dec!(100))]);
        assert_eq!(p.concentration_risk, dec!(10));
        assert_eq!(p.herfindahl_index, Decimal::ONE);
    }

    #[test]
    fn test_equal_weights_concentration() {
        let h: Vec<_> = (0..4).map(|i| etf(&format!("E{i}"), dec!(25))).collect();
        assert_eq!(concentration_risk(&h), dec!(2.5));

        let h: Vec<_> = (0..5).map(|i| etf(&format!("E{i}"), dec!(20))).collect();
        assert_eq!(concentration_risk(&h), dec!(2));
    }

    #[test]
    fn test_sector_concentration_ignores_undeclared() {
        let h = vec![
            etf("A", dec!(30)).with_sector("Technology"),
            etf("B", dec!(25)).with_sector("Technology"),
            etf("C", dec!(20)).with_sector("Healthcare"),
            etf("D", dec!(25)),
        ];
        assert_eq!(sector_concentration(&h), dec!(55));
        assert_eq!(sector_concentration(&[etf("X", dec!(100))]), Decimal::ZERO);
    }

    #[test]
    fn test_geographic_risk() {
        let mut intl = etf("VXUS", dec!(40));
        intl.region = Region::DevelopedInternational;
        let h = vec![etf("VTI", dec!(60)), intl];
        assert_eq!(geographic_risk(&h), dec!(60));
        assert_eq!(geographic_risk(&[etf("VTI", dec!(100))]), dec!(100));
    }

    #[test]
    fn test_volatility_default_and_clamp() {
        // Default 15% -> 5
        assert_eq!(volatility_score(&[etf("A", dec!(100))]), dec!(5));
        // 60% -> 20 -> clamped to 10
        let wild = etf("A", dec!(100)).with_volatility(dec!(60));
        assert_eq!(volatility_score(&[wild]), dec!(10));
        // 1.5% -> 0.5 -> clamped to 1
        let calm = etf("A", dec!(100)).with_volatility(dec!(1.5));
        assert_eq!(volatility_score(&[calm]), dec!(1));
    }

    #[test]
    fn test_volatility_weighted() {
        let h = vec![
            etf("A", dec!(50)).with_volatility(dec!(24)),
            etf("B", dec!(50)).with_volatility(dec!(6)),
        ];
        assert_eq!(weighted_volatility(&h), dec!(15));
    }

    #[test]
    fn test_extreme_volatility_saturates_to_top_score() {
        let h = vec![
            etf("A", dec!(50)).with_volatility(Decimal::MAX),
            etf("B", dec!(50)).with_volatility(Decimal::MAX),
            etf("C", dec!(0)).with_volatility(Decimal::MAX),
        ];
        let p = compute_risk_profile(&h);
        assert_eq!(p.volatility_score, SCORE_MAX);
        assert!(p.overall_risk <= SCORE_MAX);
    }

    #[test]
    fn test_extreme_allocations_do_not_overflow() {
        let mut a = etf("A", dec!(50)).with_sector("Technology");
        let mut b = etf("B", dec!(50)).with_sector("Technology");
        a.allocation_pct = Decimal::MAX;
        b.allocation_pct = Decimal::MAX;
        let p = compute_risk_profile(&[a, b]);
        assert_eq!(p.concentration_risk, SCORE_MAX);
        assert_eq!(p.sector_concentration, Decimal::MAX);
        assert_eq!(p.overall_risk, SCORE_MAX);
    }

    #[test]
    fn test_credit_all_cash() {
        let cash = AssetHolding::new(
            "CASH",
            "Cash",
            AssetType::Cash,
            AssetCategory::Cash,
            Region::Us,
            dec!(100),
            dec!(10000),
        );
        assert_eq!(credit_risk(&[cash]), dec!(1));
    }

    #[test]
    fn test_credit_bonds() {
        assert_eq!(credit_risk(&[bond("B", dec!(100), None)]), dec!(3));
        assert_eq!(credit_risk(&[bond("B", dec!(100), Some("D"))]), dec!(10));
        let mixed = vec![
            bond("A", dec!(50), Some("AAA")),
            bond("B", dec!(50), Some("BB")),
        ];
        assert_eq!(credit_risk(&mixed), dec!(3.5));
    }

    #[test]
    fn test_overall_blend() {
        // 0.4*10 + 0.4*5 + 0.2*2 = 6.4
        let p = compute_risk_profile(&[etf("VTI", dec!(100))]);
        assert_eq!(p.overall_risk, dec!(6.4));
        assert_eq!(p.risk_level, RiskLevel::Elevated);
    }

    #[test]
    fn test_overall_clamped() {
        assert_eq!(overall_risk_score(dec!(0), dec!(1), dec!(0)), dec!(1));
        assert_eq!(overall_risk_score(dec!(10), dec!(10), dec!(10)), dec!(10));
        assert_eq!(overall_risk_score(dec!(100), dec!(100), dec!(100)), dec!(10));
    }

    #[test]
    fn test_empty_portfolio_is_degenerate_not_error() {
        let p = compute_risk_profile(&[]);
        assert_eq!(p.concentration_risk, Decimal::ZERO);
        assert_eq!(p.sector_concentration, Decimal::ZERO);
        assert_eq!(p.geographic_risk, Decimal::ZERO);
        assert_eq!(p.credit_risk, Decimal::ZERO);
        assert_eq!(p.volatility_score, dec!(1));
        assert_eq!(p.overall_risk, dec!(1));
        assert_eq!(p.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_risk_level_bands() {
        assert_eq!(RiskLevel::from_score(dec!(3)), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(dec!(4.2)), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(dec!(7)), RiskLevel::Elevated);
        assert_eq!(RiskLevel::from_score(dec!(7.01)), RiskLevel::High);
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::holdings::AssetHolding;
use crate::types::Score;

pub const DIVERSIFICATION_MAX: Score = dec!(10);
pub const ASSET_TYPE_POINTS: Decimal = dec!(2);
pub const SECTOR_POINTS: Decimal = dec!(1.5);
pub const REGION_POINTS: Decimal = dec!(2.5);
/// Sub-scores below this trigger a recommendation
pub const RECOMMENDATION_THRESHOLD: Score = dec!(6);

pub const ASSET_TYPE_RECOMMENDATION: &str =
    "Diversify across more asset types, such as bonds, real estate or cash alongside equities";
pub const SECTOR_RECOMMENDATION: &str =
    "Spread holdings across more sectors to reduce exposure to any single industry";
pub const GEOGRAPHIC_RECOMMENDATION: &str =
    "Add international or emerging-market exposure to reduce geographic concentration";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversificationAnalysis {
    pub asset_type_diversification: Score,
    pub sector_diversification: Score,
    pub geographic_diversification: Score,
    /// Unweighted mean of the three sub-scores
    pub overall_diversification: Score,
    /// Ordered asset type, sector, geographic
    pub recommendations: Vec<String>,
}

fn points(count: usize, per_item: Decimal) -> Score {
    (Decimal::from(count) * per_item).min(DIVERSIFICATION_MAX)
}

pub fn compute_diversification(holdings: &[AssetHolding]) -> DiversificationAnalysis {
    let asset_types: BTreeSet<_> = holdings.iter().map(|h| h.asset_type).collect();
    let sectors: BTreeSet<_> = holdings.iter().filter_map(|h| h.declared_sector()).collect();
    let regions: BTreeSet<_> = holdings.iter().map(|h| h.region).collect();

    let asset_type_diversification = points(asset_types.len(), ASSET_TYPE_POINTS);
    let sector_diversification = points(sectors.len(), SECTOR_POINTS);
    let geographic_diversification = points(regions.len(), REGION_POINTS);
    let overall_diversification =
        (asset_type_diversification + sector_diversification + geographic_diversification)
            / dec!(3);

    let recommendations = [
        (asset_type_diversification, ASSET_TYPE_RECOMMENDATION),
        (sector_diversification, SECTOR_RECOMMENDATION),
        (geographic_diversification, GEOGRAPHIC_RECOMMENDATION),
    ]
    .into_iter()
    .filter(|(score, _)| *score < RECOMMENDATION_THRESHOLD)
    .map(|(_, text)| text.to_string())
    .collect();

    DiversificationAnalysis {
        asset_type_diversification,
        sector_diversification,
        geographic_diversification,
        overall_diversification,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holdings::{AssetCategory, AssetType, Region};

    fn holding(asset_type: AssetType, region: Region, sector: Option<&str>) -> AssetHolding {
        let h = AssetHolding::new(
            "SYM",
            "Holding",
            asset_type,
            AssetCategory::UsLargeCap,
            region,
            dec!(10),
            dec!(1000),
        );
        match sector {
            Some(s) => h.with_sector(s),
            None => h,
        }
    }

    #[test]
    fn test_single_holding_scores() {
        let d = compute_diversification(&[holding(AssetType::Equity, Region::Us, Some("Tech"))]);
        assert_eq!(d.asset_type_diversification, dec!(2));
        assert_eq!(d.sector_diversification, dec!(1.5));
        assert_eq!(d.geographic_diversification, dec!(2.5));
        assert_eq!(d.overall_diversification, dec!(2));
        assert_eq!(d.recommendations.len(), 3);
        assert_eq!(d.recommendations[0], ASSET_TYPE_RECOMMENDATION);
        assert_eq!(d.recommendations[2], GEOGRAPHIC_RECOMMENDATION);
    }

    #[test]
    fn test_sector_only_counts_declared() {
        let h = vec![
            holding(AssetType::Equity, Region::Us, None),
            holding(AssetType::Equity, Region::Us, Some("Energy")),
            holding(AssetType::Equity, Region::Us, Some("Energy")),
        ];
        assert_eq!(compute_diversification(&h).sector_diversification, dec!(1.5));
    }

    #[test]
    fn test_caps_at_ten() {
        let h: Vec<_> = AssetType::ALL
            .iter()
            .map(|t| holding(*t, Region::Us, None))
            .collect();
        assert_eq!(compute_diversification(&h).asset_type_diversification, dec!(10));
    }

    #[test]
    fn test_threshold_is_strict() {
        // 3 types -> 6, 4 sectors -> 6, 3 regions -> 7.5: nothing below 6
        let h = vec![
            holding(AssetType::Equity, Region::Us, Some("Tech")),
            holding(AssetType::Bond, Region::DevelopedInternational, Some("Energy")),
            holding(AssetType::Cash, Region::EmergingMarkets, Some("Utilities")),
            holding(AssetType::Equity, Region::Us, Some("Financials")),
        ];
        let d = compute_diversification(&h);
        assert_eq!(d.asset_type_diversification, dec!(6));
        assert_eq!(d.sector_diversification, dec!(6));
        assert_eq!(d.geographic_diversification, dec!(7.5));
        assert!(d.recommendations.is_empty());
    }

    #[test]
    fn test_empty_holdings() {
        let d = compute_diversification(&[]);
        assert_eq!(d.overall_diversification, Decimal::ZERO);
        assert_eq!(d.recommendations.len(), 3);
    }
}

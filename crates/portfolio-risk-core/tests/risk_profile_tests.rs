use portfolio_risk_core::holdings::{AssetCategory, AssetHolding, AssetType, Region};
use portfolio_risk_core::risk_profile::{compute_diversification, compute_risk_profile};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Risk profile and diversification over realistic holding sets
// ===========================================================================

fn holding(
    symbol: &str,
    asset_type: AssetType,
    category: AssetCategory,
    region: Region,
    pct: Decimal,
) -> AssetHolding {
    AssetHolding::new(symbol, symbol, asset_type, category, region, pct, pct * dec!(1000))
}

fn balanced_portfolio() -> Vec<AssetHolding> {
    vec![
        holding("AAPL", AssetType::Equity, AssetCategory::UsLargeCap, Region::Us, dec!(20))
            .with_sector("Technology")
            .with_volatility(dec!(28)),
        holding("VEA", AssetType::Etf, AssetCategory::InternationalDeveloped, Region::DevelopedInternational, dec!(20))
            .with_sector("Financials")
            .with_volatility(dec!(18)),
        holding("VWO", AssetType::MutualFund, AssetCategory::EmergingMarkets, Region::EmergingMarkets, dec!(20))
            .with_sector("Industrials")
            .with_volatility(dec!(24)),
        holding("LQD", AssetType::Bond, AssetCategory::CorporateBond, Region::Us, dec!(20))
            .with_credit_rating("A-")
            .with_volatility(dec!(8)),
        holding("GLD", AssetType::Commodity, AssetCategory::Gold, Region::Global, dec!(20))
            .with_sector("Materials")
            .with_volatility(dec!(16)),
    ]
}

// ---------------------------------------------------------------------------
// Concentration
// ---------------------------------------------------------------------------

#[test]
fn test_single_asset_concentration_exactly_ten() {
    let p = compute_risk_profile(&[holding(
        "SPY",
        AssetType::Etf,
        AssetCategory::UsLargeCap,
        Region::Us,
        dec!(100),
    )]);
    assert_eq!(p.concentration_risk, dec!(10));
}

#[test]
fn test_equal_weights_give_ten_over_n() {
    for n in [2usize, 4, 5, 10] {
        let pct = dec!(100) / Decimal::from(n);
        let h: Vec<_> = (0..n)
            .map(|i| {
                holding(
                    &format!("S{i}"),
                    AssetType::Equity,
                    AssetCategory::UsLargeCap,
                    Region::Us,
                    pct,
                )
            })
            .collect();
        let expected = dec!(10) / Decimal::from(n);
        assert_eq!(compute_risk_profile(&h).concentration_risk, expected, "n = {n}");
    }
}

// ---------------------------------------------------------------------------
// Full profile
// ---------------------------------------------------------------------------

#[test]
fn test_balanced_portfolio_profile() {
    let p = compute_risk_profile(&balanced_portfolio());

    // HHI = 5 * 0.04 = 0.2
    assert_eq!(p.concentration_risk, dec!(2));
    assert_eq!(p.sector_concentration, dec!(20));
    // US holds 40 of 100
    assert_eq!(p.geographic_risk, dec!(40));
    // (28 + 18 + 24 + 8 + 16) / 5 = 18.8 -> / 3
    assert_eq!(p.volatility_score, dec!(18.8) / dec!(3));
    // equity 2, etf 2, fund 2, A- bond 3, commodity 3 -> 12 / 5
    assert_eq!(p.credit_risk, dec!(2.4));

    let expected_overall =
        dec!(0.4) * dec!(2) + dec!(0.4) * (dec!(18.8) / dec!(3)) + dec!(0.2) * dec!(2.4);
    assert_eq!(p.overall_risk, expected_overall);
}

#[test]
fn test_overall_within_bounds_for_extremes() {
    let extremes = [
        holding("JUNK", AssetType::Bond, AssetCategory::HighYieldBond, Region::EmergingMarkets, dec!(100))
            .with_credit_rating("C")
            .with_volatility(dec!(300)),
        holding("CASH", AssetType::Cash, AssetCategory::Cash, Region::Us, dec!(100))
            .with_volatility(Decimal::ZERO),
    ];
    for h in extremes {
        let p = compute_risk_profile(std::slice::from_ref(&h));
        assert!(p.overall_risk >= dec!(1) && p.overall_risk <= dec!(10));
    }

    let many: Vec<_> = (0..50)
        .map(|i| {
            holding(&format!("C{i}"), AssetType::Cash, AssetCategory::Cash, Region::Us, dec!(2))
                .with_volatility(Decimal::ZERO)
        })
        .collect();
    assert_eq!(compute_risk_profile(&many).overall_risk, dec!(1));
}

#[test]
fn test_credit_for_pure_portfolios() {
    let cash = holding("CASH", AssetType::Cash, AssetCategory::Cash, Region::Us, dec!(100));
    assert_eq!(compute_risk_profile(&[cash]).credit_risk, dec!(1));

    let unrated = vec![
        holding("B1", AssetType::Bond, AssetCategory::GovernmentBond, Region::Us, dec!(50)),
        holding("B2", AssetType::Bond, AssetCategory::MunicipalBond, Region::Us, dec!(50)),
    ];
    assert_eq!(compute_risk_profile(&unrated).credit_risk, dec!(3));

    let unrecognized: Vec<_> = unrated
        .into_iter()
        .map(|h| h.with_credit_rating("NR"))
        .collect();
    assert_eq!(compute_risk_profile(&unrecognized).credit_risk, dec!(10));
}

#[test]
fn test_profile_is_deterministic() {
    let h = balanced_portfolio();
    let first = compute_risk_profile(&h);
    let second = compute_risk_profile(&h);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

// ---------------------------------------------------------------------------
// Diversification
// ---------------------------------------------------------------------------

#[test]
fn test_five_types_four_sectors_four_regions() {
    let d = compute_diversification(&balanced_portfolio());
    assert_eq!(d.asset_type_diversification, dec!(10));
    assert_eq!(d.sector_diversification, dec!(6));
    assert_eq!(d.geographic_diversification, dec!(10));
    assert_eq!(d.overall_diversification, dec!(26) / dec!(3));
    assert!(d.recommendations.is_empty());
}

#[test]
fn test_concentrated_portfolio_gets_all_recommendations_in_order() {
    let h = vec![
        holding("MSFT", AssetType::Equity, AssetCategory::UsLargeCap, Region::Us, dec!(50))
            .with_sector("Technology"),
        holding("NVDA", AssetType::Equity, AssetCategory::UsLargeCap, Region::Us, dec!(50))
            .with_sector("Technology"),
    ];
    let d = compute_diversification(&h);
    assert_eq!(d.recommendations.len(), 3);
    assert!(d.recommendations[0].contains("asset types"));
    assert!(d.recommendations[1].contains("sectors"));
    assert!(d.recommendations[2].contains("international"));
}

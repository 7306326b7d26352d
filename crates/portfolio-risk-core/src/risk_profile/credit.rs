use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::holdings::{AssetHolding, AssetType};

pub const EQUITY_CREDIT_SCORE: Decimal = dec!(2);
pub const CASH_CREDIT_SCORE: Decimal = dec!(1);
/// REITs, commodities and anything else without issuer credit exposure
pub const OTHER_CREDIT_SCORE: Decimal = dec!(3);
/// Bond with no rating at all: assumed investment grade
pub const UNRATED_BOND_CREDIT_SCORE: Decimal = dec!(3);
/// Bond whose rating string matches none of the rules
pub const UNRECOGNIZED_RATING_CREDIT_SCORE: Decimal = dec!(10);

/// Ordered (pattern, score) rules, tested top-down by substring containment.
/// More specific patterns come first since "A" is contained in "AA" and "AAA".
pub const RATING_RULES: [(&str, Decimal); 9] = [
    ("AAA", dec!(1)),
    ("AA+", dec!(1)),
    ("AA", dec!(2)),
    ("A+", dec!(2)),
    ("A", dec!(3)),
    ("BBB+", dec!(3)),
    ("BBB", dec!(4)),
    ("BB", dec!(6)),
    ("B", dec!(8)),
];

/// Score a bond by its rating string. Blank ratings count as unrated.
pub fn bond_rating_score(rating: Option<&str>) -> Decimal {
    let normalized = match rating.map(str::trim).filter(|r| !r.is_empty()) {
        Some(r) => r.to_uppercase(),
        None => return UNRATED_BOND_CREDIT_SCORE,
    };
    RATING_RULES
        .iter()
        .find(|(pattern, _)| normalized.contains(*pattern))
        .map(|(_, score)| *score)
        .unwrap_or(UNRECOGNIZED_RATING_CREDIT_SCORE)
}

/// Per-holding credit score on the 1-10 scale.
pub fn holding_credit_score(holding: &AssetHolding) -> Decimal {
    match holding.asset_type {
        AssetType::Bond => bond_rating_score(holding.credit_rating.as_deref()),
        AssetType::Equity | AssetType::Etf | AssetType::MutualFund => EQUITY_CREDIT_SCORE,
        AssetType::Cash => CASH_CREDIT_SCORE,
        AssetType::Reit | AssetType::Commodity => OTHER_CREDIT_SCORE,
    }
}

use rust_decimal::Decimal;
use std::str::FromStr;

use super::limits::ValidationLimits;
use super::{ValidationError, ValidationErrorKind, ValidationReport};
use crate::holdings::{AssetHolding, AssetType};
use crate::numeric::{checked_sum, fraction, HUNDRED};
use crate::types::{Money, Percent};

pub const SYMBOL_MAX_LEN: usize = 20;

/// Sum of all allocation percentages; `None` when the sum leaves Decimal's range.
pub fn allocation_total(holdings: &[AssetHolding]) -> Option<Percent> {
    checked_sum(holdings.iter().map(|h| h.allocation_pct))
}

/// The set must sum to 100 within tolerance. Fails as a whole, never per asset.
pub fn check_allocation_sum(
    holdings: &[AssetHolding],
    limits: &ValidationLimits,
) -> Vec<ValidationError> {
    check_allocation_total(allocation_total(holdings), limits)
}

/// The sum check over an already computed total. `None` is a sum that overflowed.
pub fn check_allocation_total(
    total: Option<Percent>,
    limits: &ValidationLimits,
) -> Vec<ValidationError> {
    let got = match total {
        Some(total) if limits.allocation_within_tolerance(total) => return Vec::new(),
        Some(total) => format!("{}%", total.normalize()),
        None => "a total out of range".to_string(),
    };
    vec![ValidationError::new(
        ValidationErrorKind::InvalidAllocationSum,
        "allocation_pct",
        format!("Allocation percentages must sum to 100% (got {got})"),
    )]
}

/// Raw asset-type token, matched case-insensitively against the supported set.
pub fn check_asset_type(token: &str) -> Vec<ValidationError> {
    match AssetType::from_str(token) {
        Ok(_) => Vec::new(),
        Err(_) => vec![ValidationError::new(
            ValidationErrorKind::UnsupportedAssetType,
            "asset_type",
            format!(
                "Unsupported asset type '{}'; expected one of: {}",
                token.trim(),
                AssetType::ALL
                    .iter()
                    .map(AssetType::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        )],
    }
}

/// 1-20 characters, each an ASCII letter, digit, '.' or '-'.
///
/// Lower-case letters are accepted; upper-casing is left to the caller.
pub fn check_symbol_format(symbol: &str) -> Vec<ValidationError> {
    check_symbol_at(symbol, "symbol")
}

fn check_symbol_at(symbol: &str, field: &str) -> Vec<ValidationError> {
    let len_ok = (1..=SYMBOL_MAX_LEN).contains(&symbol.chars().count());
    let chars_ok = symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if len_ok && chars_ok {
        return Vec::new();
    }
    vec![ValidationError::new(
        ValidationErrorKind::InvalidSymbolFormat,
        field,
        format!(
            "Invalid symbol '{symbol}': use 1-{SYMBOL_MAX_LEN} letters, digits, '.' or '-'"
        ),
    )]
}

pub fn check_asset_count(
    holdings: &[AssetHolding],
    limits: &ValidationLimits,
) -> Vec<ValidationError> {
    check_holding_count(holdings.len(), limits)
}

/// The count check for callers that only know how many holdings were submitted.
pub fn check_holding_count(n: usize, limits: &ValidationLimits) -> Vec<ValidationError> {
    if n >= limits.min_assets && n <= limits.max_assets {
        return Vec::new();
    }
    vec![ValidationError::new(
        ValidationErrorKind::InvalidAssetCount,
        "holdings",
        format!(
            "Portfolio must hold between {} and {} assets (got {n})",
            limits.min_assets, limits.max_assets
        ),
    )]
}

pub(crate) fn allocation_value_finding(
    index: usize,
    symbol: &str,
    allocation_pct: Percent,
) -> Option<ValidationError> {
    if allocation_pct >= Decimal::ZERO && allocation_pct <= HUNDRED {
        return None;
    }
    Some(ValidationError::new(
        ValidationErrorKind::InvalidAllocationValue,
        format!("holdings[{index}].allocation_pct"),
        format!(
            "Allocation for {symbol} must be between 0% and 100% (got {}%)",
            allocation_pct.normalize()
        ),
    ))
}

pub(crate) fn concentration_finding(
    index: usize,
    symbol: &str,
    allocation_pct: Percent,
    limits: &ValidationLimits,
) -> Option<ValidationError> {
    if allocation_pct <= limits.max_single_allocation_pct {
        return None;
    }
    Some(ValidationError::new(
        ValidationErrorKind::ConcentrationWarning,
        format!("holdings[{index}].allocation_pct"),
        format!(
            "{symbol} is {}% of the portfolio, above the recommended maximum of {}%",
            allocation_pct.normalize(),
            limits.max_single_allocation_pct.normalize()
        ),
    ))
}

/// Each allocation must lie in [0, 100]. Negative weights are rejected, not clamped.
pub fn check_allocation_values(holdings: &[AssetHolding]) -> Vec<ValidationError> {
    holdings
        .iter()
        .enumerate()
        .filter_map(|(i, h)| allocation_value_finding(i, &h.symbol, h.allocation_pct))
        .collect()
}

/// Advisory: one warning per holding above the recommended single-asset maximum.
pub fn check_concentration(
    holdings: &[AssetHolding],
    limits: &ValidationLimits,
) -> Vec<ValidationError> {
    holdings
        .iter()
        .enumerate()
        .filter_map(|(i, h)| concentration_finding(i, &h.symbol, h.allocation_pct, limits))
        .collect()
}

/// Advisory: dollar amounts should match `allocation / 100 * total_value`.
pub fn check_amount_consistency(
    holdings: &[AssetHolding],
    total_value: Money,
    limits: &ValidationLimits,
) -> Vec<ValidationError> {
    if total_value <= Decimal::ZERO {
        return Vec::new();
    }
    holdings
        .iter()
        .enumerate()
        .filter_map(|(i, h)| {
            let expected = fraction(h.allocation_pct).checked_mul(total_value);
            if let Some(expected) = expected {
                if limits.amount_within_tolerance(expected, h.dollar_amount) {
                    return None;
                }
            }
            let expected = expected.map_or_else(
                || "out of range".to_string(),
                |e| e.round_dp(2).normalize().to_string(),
            );
            Some(ValidationError::new(
                ValidationErrorKind::AmountMismatch,
                format!("holdings[{i}].dollar_amount"),
                format!(
                    "{} dollar amount {} does not match {}% of {} (expected {expected})",
                    h.symbol,
                    h.dollar_amount.normalize(),
                    h.allocation_pct.normalize(),
                    total_value.normalize(),
                ),
            ))
        })
        .collect()
}

/// The holdings' dollar amounts must have a representable total.
pub fn check_dollar_total(holdings: &[AssetHolding]) -> Result<Money, ValidationError> {
    checked_sum(holdings.iter().map(|h| h.dollar_amount)).ok_or_else(|| {
        ValidationError::new(
            ValidationErrorKind::InvalidDollarAmount,
            "dollar_amount",
            "Dollar amounts are too large to total",
        )
    })
}

/// Run every structural check over a holding set.
///
/// Amount consistency is measured against the sum of the holdings' dollar
/// amounts, and only once the allocations balance to 100.
pub fn validate_holdings(holdings: &[AssetHolding], limits: &ValidationLimits) -> ValidationReport {
    let mut findings = Vec::new();
    findings.extend(check_asset_count(holdings, limits));
    for (i, h) in holdings.iter().enumerate() {
        findings.extend(check_symbol_at(&h.symbol, &format!("holdings[{i}].symbol")));
    }
    findings.extend(check_allocation_values(holdings));
    let sum_errors = if holdings.is_empty() {
        Vec::new()
    } else {
        check_allocation_sum(holdings, limits)
    };
    let balanced = sum_errors.is_empty();
    findings.extend(sum_errors);
    findings.extend(check_concentration(holdings, limits));

    if balanced {
        match check_dollar_total(holdings) {
            Ok(total_value) => {
                findings.extend(check_amount_consistency(holdings, total_value, limits))
            }
            Err(overflow) => findings.push(overflow),
        }
    }

    let report = ValidationReport::from_findings(findings);
    tracing::debug!(
        holdings = holdings.len(),
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated holdings"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holdings::{AssetCategory, Region};
    use rust_decimal_macros::dec;

    fn holding(symbol: &str, pct: Decimal) -> AssetHolding {
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

    fn limits() -> ValidationLimits {
        ValidationLimits::default()
    }

    #[test]
    fn test_allocation_sum_exact() {
        let h = vec![holding("A", dec!(60)), holding("B", dec!(40))];
        assert!(check_allocation_sum(&h, &limits()).is_empty());
    }

    #[test]
    fn test_allocation_sum_within_tolerance() {
        let low = vec![holding("A", dec!(59.98)), holding("B", dec!(40))];
        let high = vec![holding("A", dec!(60.02)), holding("B", dec!(40))];
        assert!(check_allocation_sum(&low, &limits()).is_empty());
        assert!(check_allocation_sum(&high, &limits()).is_empty());
    }

    #[test]
    fn test_allocation_sum_outside_tolerance() {
        let h = vec![holding("A", dec!(50)), holding("B", dec!(40))];
        let errs = check_allocation_sum(&h, &limits());
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ValidationErrorKind::InvalidAllocationSum);
        assert!(errs[0].message.contains("90"));

        let h = vec![holding("A", dec!(70)), holding("B", dec!(40))];
        assert_eq!(check_allocation_sum(&h, &limits()).len(), 1);
    }

    #[test]
    fn test_allocation_sum_just_outside_tolerance() {
        let h = vec![holding("A", dec!(100.011))];
        assert_eq!(check_allocation_sum(&h, &limits()).len(), 1);
    }

    #[test]
    fn test_allocation_sum_overflow_is_a_finding() {
        let mut h = vec![holding("A", dec!(50)), holding("B", dec!(50))];
        h[0].allocation_pct = Decimal::MAX;
        h[1].allocation_pct = Decimal::MAX;
        assert_eq!(allocation_total(&h), None);
        let errs = check_allocation_sum(&h, &limits());
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ValidationErrorKind::InvalidAllocationSum);
        assert!(errs[0].message.contains("out of range"));
    }

    #[test]
    fn test_asset_type_tokens() {
        assert!(check_asset_type("EQUITY").is_empty());
        assert!(check_asset_type("Reit").is_empty());
        let errs = check_asset_type("crypto");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ValidationErrorKind::UnsupportedAssetType);
        assert_eq!(errs[0].field, "asset_type");
    }

    #[test]
    fn test_symbol_format_accepts_common_tickers() {
        for s in ["AAPL", "BRK.B", "RDS-A", "vti", "A", "12345678901234567890"] {
            assert!(check_symbol_format(s).is_empty(), "{s} should be valid");
        }
    }

    #[test]
    fn test_symbol_format_rejects() {
        for s in ["", "AB CD", "ABC$", "123456789012345678901", "ÄPL"] {
            let errs = check_symbol_format(s);
            assert_eq!(errs.len(), 1, "{s:?} should be invalid");
            assert_eq!(errs[0].kind, ValidationErrorKind::InvalidSymbolFormat);
        }
    }

    #[test]
    fn test_asset_count_limits() {
        assert_eq!(check_asset_count(&[], &limits()).len(), 1);
        let many: Vec<_> = (0..51).map(|i| holding(&format!("S{i}"), dec!(1))).collect();
        assert_eq!(check_asset_count(&many, &limits()).len(), 1);
        assert!(check_asset_count(&many[..50], &limits()).is_empty());
    }

    #[test]
    fn test_negative_allocation_rejected() {
        let h = vec![holding("A", dec!(110)), holding("B", dec!(-10))];
        let errs = check_allocation_values(&h);
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[1].field, "holdings[1].allocation_pct");
    }

    #[test]
    fn test_concentration_is_warning() {
        let h = vec![holding("A", dec!(85)), holding("B", dec!(15))];
        let errs = check_concentration(&h, &limits());
        assert_eq!(errs.len(), 1);
        assert!(errs[0].is_warning());

        let exactly = vec![holding("A", dec!(80)), holding("B", dec!(20))];
        assert!(check_concentration(&exactly, &limits()).is_empty());
    }

    #[test]
    fn test_amount_consistency() {
        let mut h = vec![holding("A", dec!(60)), holding("B", dec!(40))];
        assert!(check_amount_consistency(&h, dec!(100000), &limits()).is_empty());

        h[1].dollar_amount = dec!(39000);
        let errs = check_amount_consistency(&h, dec!(100000), &limits());
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ValidationErrorKind::AmountMismatch);
        assert!(check_amount_consistency(&h, Decimal::ZERO, &limits()).is_empty());
    }

    #[test]
    fn test_validate_holdings_partitions_findings() {
        let h = vec![holding("A", dec!(85)), holding("B B", dec!(15))];
        let report = validate_holdings(&h, &limits());
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ValidationErrorKind::InvalidSymbolFormat);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, ValidationErrorKind::ConcentrationWarning);
    }

    #[test]
    fn test_amount_check_waits_for_balanced_allocations() {
        let mut h = vec![holding("A", dec!(60)), holding("B", dec!(30))];
        h[1].dollar_amount = dec!(1);
        let report = validate_holdings(&h, &limits());
        assert_eq!(report.errors.len(), 1);
        assert!(report.warnings.is_empty());

        let mut h = vec![holding("A", dec!(60)), holding("B", dec!(40))];
        h[1].dollar_amount = dec!(30000);
        let report = validate_holdings(&h, &limits());
        assert!(report.is_valid());
        assert!(report
            .warnings
            .iter()
            .all(|w| w.kind == ValidationErrorKind::AmountMismatch));
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_dollar_total_overflow_reported_not_panicking() {
        let mut h = vec![holding("A", dec!(50)), holding("B", dec!(50))];
        h[0].dollar_amount = Decimal::MAX;
        h[1].dollar_amount = Decimal::MAX;
        let report = validate_holdings(&h, &limits());
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ValidationErrorKind::InvalidDollarAmount);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_amount_check_with_unrepresentable_expectation() {
        let mut h = vec![holding("A", dec!(50)), holding("B", dec!(50))];
        h[0].allocation_pct = Decimal::MAX;
        h[1].allocation_pct = Decimal::MIN;
        let errs = check_amount_consistency(&h, Decimal::MAX, &limits());
        assert_eq!(errs.len(), 2);
        assert!(errs[0].message.contains("out of range"));
    }

    #[test]
    fn test_validate_holdings_clean() {
        let h = vec![holding("A", dec!(50)), holding("B", dec!(50))];
        assert!(validate_holdings(&h, &limits()).is_clean());
    }

    #[test]
    fn test_validate_empty_reports_count_only() {
        let report = validate_holdings(&[], &limits());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ValidationErrorKind::InvalidAssetCount);
    }
}

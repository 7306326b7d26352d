//! Shared numeric and formatting helpers used across the engine.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;

pub const HUNDRED: Decimal = dec!(100);

/// Convert a 0-100 percentage into a 0-1 fraction.
pub fn fraction(pct: Decimal) -> Decimal {
    pct / HUNDRED
}

/// Clamp `value` into `[min, max]`.
pub fn clamp(value: Decimal, min: Decimal, max: Decimal) -> Decimal {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// `part / total * 100`, or zero when the total is zero or the quotient
/// leaves Decimal's range.
pub fn share_of(part: Decimal, total: Decimal) -> Decimal {
    part.checked_div(total)
        .map(|ratio| ratio.saturating_mul(HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Sum that reports overflow as `None`.
pub fn checked_sum<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

/// Sum pinned at `Decimal::MAX` / `Decimal::MIN` instead of overflowing.
pub fn saturating_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// Sum of `value * allocation / 100` across `(value, allocation_pct)` pairs.
///
/// Saturates rather than overflowing; every caller clamps the result to a score.
pub fn allocation_weighted_sum<I>(pairs: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    saturating_sum(
        pairs
            .into_iter()
            .map(|(value, allocation_pct)| value.saturating_mul(fraction(allocation_pct))),
    )
}

/// Falls back to halving each side when `a + b` leaves Decimal's range.
pub fn midpoint(a: Decimal, b: Decimal) -> Decimal {
    match a.checked_add(b) {
        Some(sum) => sum / dec!(2),
        None => (a / dec!(2)).saturating_add(b / dec!(2)),
    }
}

/// Round half away from zero, the convention used for every displayed figure.
pub fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// "12.35%" style rendering with two decimal places.
pub fn format_pct(value: Decimal) -> String {
    format!("{:.2}%", round_dp(value, 2))
}

/// "$1,234,567.89" style rendering; negative amounts render as "-$1,234.00".
pub fn format_money(value: Decimal) -> String {
    let rounded = round_dp(value, 2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{cents}")
}

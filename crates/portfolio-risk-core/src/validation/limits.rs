use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

pub const MAX_ASSETS: usize = 50;
pub const MIN_ASSETS: usize = 1;
/// Recommended ceiling for a single holding; exceeding it is advisory.
pub const MAX_SINGLE_ALLOCATION_PCT: Percent = dec!(80);
pub const ALLOCATION_TOLERANCE: Percent = dec!(0.01);
pub const DOLLAR_TOLERANCE: Money = dec!(0.01);

/// Policy limits honoured by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub max_assets: usize,
    pub min_assets: usize,
    pub max_single_allocation_pct: Percent,
    pub allocation_tolerance: Percent,
    pub dollar_tolerance: Money,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_assets: MAX_ASSETS,
            min_assets: MIN_ASSETS,
            max_single_allocation_pct: MAX_SINGLE_ALLOCATION_PCT,
            allocation_tolerance: ALLOCATION_TOLERANCE,
            dollar_tolerance: DOLLAR_TOLERANCE,
        }
    }
}

impl ValidationLimits {
    pub fn allocation_within_tolerance(&self, total: Percent) -> bool {
        total
            .checked_sub(dec!(100))
            .is_some_and(|gap| gap.abs() <= self.allocation_tolerance)
    }

    /// A gap too large to represent is never within tolerance.
    pub fn amount_within_tolerance(&self, expected: Money, actual: Money) -> bool {
        expected
            .checked_sub(actual)
            .is_some_and(|gap| gap.abs() <= self.dollar_tolerance)
    }
}

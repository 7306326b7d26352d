use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::holdings::AssetHolding;
use crate::types::{Money, Percent};

pub const UNCLASSIFIED_SECTOR: &str = "unclassified";

/// Allocation aggregated under one key (an asset type, category, region or sector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub key: String,
    pub allocation_pct: Percent,
    pub dollar_amount: Money,
    pub holdings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationBreakdown {
    pub by_asset_type: Vec<AllocationSlice>,
    pub by_category: Vec<AllocationSlice>,
    pub by_region: Vec<AllocationSlice>,
    /// Holdings without a sector are grouped as "unclassified"
    pub by_sector: Vec<AllocationSlice>,
}

/// Largest allocation first; ties broken by key.
fn aggregate<F>(holdings: &[AssetHolding], key_of: F) -> Vec<AllocationSlice>
where
    F: Fn(&AssetHolding) -> String,
{
    let mut buckets: BTreeMap<String, AllocationSlice> = BTreeMap::new();
    for h in holdings {
        let key = key_of(h);
        let slice = buckets.entry(key.clone()).or_insert_with(|| AllocationSlice {
            key,
            allocation_pct: Percent::ZERO,
            dollar_amount: Money::ZERO,
            holdings: 0,
        });
        slice.allocation_pct = slice.allocation_pct.saturating_add(h.allocation_pct);
        slice.dollar_amount = slice.dollar_amount.saturating_add(h.dollar_amount);
        slice.holdings += 1;
    }
    let mut slices: Vec<_> = buckets.into_values().collect();
    slices.sort_by(|a, b| {
        b.allocation_pct
            .cmp(&a.allocation_pct)
            .then_with(|| a.key.cmp(&b.key))
    });
    slices
}

pub fn allocation_breakdown(holdings: &[AssetHolding]) -> AllocationBreakdown {
    AllocationBreakdown {
        by_asset_type: aggregate(holdings, |h| h.asset_type.to_string()),
        by_category: aggregate(holdings, |h| h.category.to_string()),
        by_region: aggregate(holdings, |h| h.region.to_string()),
        by_sector: aggregate(holdings, |h| {
            h.declared_sector().unwrap_or(UNCLASSIFIED_SECTOR).to_string()
        }),
    }
}

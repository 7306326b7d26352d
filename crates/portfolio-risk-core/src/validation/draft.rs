use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::checks::{
    allocation_value_finding, check_allocation_total, check_asset_type, check_holding_count,
    check_symbol_format, concentration_finding, validate_holdings,
};
use super::limits::ValidationLimits;
use super::{ValidationError, ValidationErrorKind, ValidationReport};
use crate::holdings::{AssetCategory, AssetHolding, AssetType, Region};
use crate::numeric::checked_sum;
use crate::types::{Money, Percent};

/// A holding as submitted by an outer layer, before any parsing.
///
/// Symbol and asset type arrive as raw strings; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldingDraft {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub asset_type: Option<String>,
    pub category: Option<AssetCategory>,
    /// Falls back to the category's default region when absent
    pub region: Option<Region>,
    pub allocation_pct: Option<Percent>,
    pub dollar_amount: Option<Money>,
    pub sector: Option<String>,
    pub credit_rating: Option<String>,
    pub volatility_pct: Option<Percent>,
    pub expense_ratio: Option<Percent>,
    pub dividend_yield: Option<Percent>,
    pub duration: Option<Decimal>,
    pub beta: Option<Decimal>,
}

impl HoldingDraft {
    /// One `MissingRequiredField` per absent required field.
    pub fn check_required_fields(&self) -> Vec<ValidationError> {
        let blank = |s: &Option<String>| s.as_deref().map_or(true, |v| v.trim().is_empty());
        let mut missing = Vec::new();
        if blank(&self.symbol) {
            missing.push("symbol");
        }
        if blank(&self.asset_type) {
            missing.push("asset_type");
        }
        if self.category.is_none() {
            missing.push("category");
        }
        if self.allocation_pct.is_none() {
            missing.push("allocation_pct");
        }
        if self.dollar_amount.is_none() {
            missing.push("dollar_amount");
        }
        missing
            .into_iter()
            .map(|field| {
                ValidationError::new(
                    ValidationErrorKind::MissingRequiredField,
                    field,
                    format!("Missing required field '{field}'"),
                )
            })
            .collect()
    }

    /// Parse into an [`AssetHolding`], collecting every problem found.
    pub fn into_holding(self) -> Result<AssetHolding, Vec<ValidationError>> {
        let mut errors = self.check_required_fields();
        if let Some(symbol) = self.symbol.as_deref().filter(|s| !s.trim().is_empty()) {
            errors.extend(check_symbol_format(symbol));
        }
        if let Some(token) = self.asset_type.as_deref().filter(|s| !s.trim().is_empty()) {
            errors.extend(check_asset_type(token));
        }

        let (Some(symbol), Some(token), Some(category), Some(allocation_pct), Some(dollar_amount)) = (
            self.symbol,
            self.asset_type,
            self.category,
            self.allocation_pct,
            self.dollar_amount,
        ) else {
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        let asset_type = AssetType::from_str(&token).map_err(|_| check_asset_type(&token))?;

        Ok(AssetHolding {
            name: self.name.unwrap_or_else(|| symbol.clone()),
            symbol,
            asset_type,
            category,
            region: self.region.unwrap_or_else(|| category.default_region()),
            allocation_pct,
            dollar_amount,
            sector: self.sector,
            credit_rating: self.credit_rating,
            volatility_pct: self.volatility_pct,
            expense_ratio: self.expense_ratio,
            dividend_yield: self.dividend_yield,
            duration: self.duration,
            beta: self.beta,
        })
    }
}

/// Parse a batch of drafts. Field paths in the returned errors are prefixed
/// with the draft's index, e.g. `holdings[3].symbol`.
pub fn parse_drafts(drafts: Vec<HoldingDraft>) -> Result<Vec<AssetHolding>, Vec<ValidationError>> {
    let mut holdings = Vec::with_capacity(drafts.len());
    let mut errors = Vec::new();
    for (i, draft) in drafts.into_iter().enumerate() {
        match draft.into_holding() {
            Ok(h) => holdings.push(h),
            Err(errs) => errors.extend(errs.into_iter().map(|mut e| {
                e.field = format!("holdings[{i}].{}", e.field);
                e
            })),
        }
    }
    if errors.is_empty() {
        Ok(holdings)
    } else {
        Err(errors)
    }
}

/// Sum of the drafts' allocations. `None` when any draft lacks one or the
/// sum overflows.
pub fn draft_allocation_total(drafts: &[HoldingDraft]) -> Option<Percent> {
    let allocations: Option<Vec<Percent>> = drafts.iter().map(|d| d.allocation_pct).collect();
    allocations.and_then(checked_sum)
}

/// Validate raw drafts as a portfolio.
///
/// When every draft parses this is [`validate_holdings`]. Otherwise the parse
/// errors are reported together with the set-level checks over whatever the
/// drafts carry: the count always, per-allocation bounds and concentration
/// for drafts that have an allocation, and the sum once every draft has one.
/// Amount consistency needs the complete parsed set and is skipped.
pub fn validate_drafts(drafts: &[HoldingDraft], limits: &ValidationLimits) -> ValidationReport {
    let parse_errors = match parse_drafts(drafts.to_vec()) {
        Ok(holdings) => return validate_holdings(&holdings, limits),
        Err(errors) => errors,
    };

    let mut findings = check_holding_count(drafts.len(), limits);
    findings.extend(parse_errors);

    let allocations: Vec<(usize, String, Percent)> = drafts
        .iter()
        .enumerate()
        .filter_map(|(i, d)| {
            let label = d
                .symbol
                .clone()
                .unwrap_or_else(|| format!("holdings[{i}]"));
            d.allocation_pct.map(|pct| (i, label, pct))
        })
        .collect();
    findings.extend(
        allocations
            .iter()
            .filter_map(|(i, symbol, pct)| allocation_value_finding(*i, symbol, *pct)),
    );
    if allocations.len() == drafts.len() && !drafts.is_empty() {
        findings.extend(check_allocation_total(draft_allocation_total(drafts), limits));
    }
    findings.extend(
        allocations
            .iter()
            .filter_map(|(i, symbol, pct)| concentration_finding(*i, symbol, *pct, limits)),
    );

    let report = ValidationReport::from_findings(findings);
    tracing::debug!(
        drafts = drafts.len(),
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated unparsed drafts"
    );
    report
}

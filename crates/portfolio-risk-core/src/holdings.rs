use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PortfolioRiskError;
use crate::numeric::fraction;
use crate::types::{Money, Percent};

// ---------------------------------------------------------------------------
// Classification enums
// ---------------------------------------------------------------------------

/// Top-level instrument type of a holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Equity,
    Etf,
    MutualFund,
    Bond,
    Reit,
    Commodity,
    Cash,
}

impl AssetType {
    pub const ALL: [AssetType; 7] = [
        AssetType::Equity,
        AssetType::Etf,
        AssetType::MutualFund,
        AssetType::Bond,
        AssetType::Reit,
        AssetType::Commodity,
        AssetType::Cash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Equity => "equity",
            AssetType::Etf => "etf",
            AssetType::MutualFund => "mutual_fund",
            AssetType::Bond => "bond",
            AssetType::Reit => "reit",
            AssetType::Commodity => "commodity",
            AssetType::Cash => "cash",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = PortfolioRiskError;

    /// Only the names in [`AssetType::as_str`], case-insensitive; surrounding
    /// whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        AssetType::ALL
            .into_iter()
            .find(|t| t.as_str() == token)
            .ok_or_else(|| PortfolioRiskError::InvalidInput {
                field: "asset_type".into(),
                reason: format!("Unsupported asset type '{}'", s.trim()),
            })
    }
}

/// Geographic region a holding is exposed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Us,
    DevelopedInternational,
    EmergingMarkets,
    Global,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Us,
        Region::DevelopedInternational,
        Region::EmergingMarkets,
        Region::Global,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::DevelopedInternational => "developed_international",
            Region::EmergingMarkets => "emerging_markets",
            Region::Global => "global",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = PortfolioRiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "us" => Ok(Region::Us),
            "developed_international" | "international" => Ok(Region::DevelopedInternational),
            "emerging_markets" | "emerging" => Ok(Region::EmergingMarkets),
            "global" => Ok(Region::Global),
            _ => Err(PortfolioRiskError::InvalidInput {
                field: "region".into(),
                reason: format!("Unknown region '{}'", s.trim()),
            }),
        }
    }
}

/// Fine-grained classification, the key scenario definitions are written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    UsLargeCap,
    UsMidCap,
    UsSmallCap,
    InternationalDeveloped,
    EmergingMarkets,
    GovernmentBond,
    CorporateBond,
    HighYieldBond,
    MunicipalBond,
    InternationalBond,
    Tips,
    RealEstate,
    Commodities,
    Gold,
    Cash,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 15] = [
        AssetCategory::UsLargeCap,
        AssetCategory::UsMidCap,
        AssetCategory::UsSmallCap,
        AssetCategory::InternationalDeveloped,
        AssetCategory::EmergingMarkets,
        AssetCategory::GovernmentBond,
        AssetCategory::CorporateBond,
        AssetCategory::HighYieldBond,
        AssetCategory::MunicipalBond,
        AssetCategory::InternationalBond,
        AssetCategory::Tips,
        AssetCategory::RealEstate,
        AssetCategory::Commodities,
        AssetCategory::Gold,
        AssetCategory::Cash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::UsLargeCap => "us_large_cap",
            AssetCategory::UsMidCap => "us_mid_cap",
            AssetCategory::UsSmallCap => "us_small_cap",
            AssetCategory::InternationalDeveloped => "international_developed",
            AssetCategory::EmergingMarkets => "emerging_markets",
            AssetCategory::GovernmentBond => "government_bond",
            AssetCategory::CorporateBond => "corporate_bond",
            AssetCategory::HighYieldBond => "high_yield_bond",
            AssetCategory::MunicipalBond => "municipal_bond",
            AssetCategory::InternationalBond => "international_bond",
            AssetCategory::Tips => "tips",
            AssetCategory::RealEstate => "real_estate",
            AssetCategory::Commodities => "commodities",
            AssetCategory::Gold => "gold",
            AssetCategory::Cash => "cash",
        }
    }

    /// Human-readable label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            AssetCategory::UsLargeCap => "US Large Cap Equity",
            AssetCategory::UsMidCap => "US Mid Cap Equity",
            AssetCategory::UsSmallCap => "US Small Cap Equity",
            AssetCategory::InternationalDeveloped => "International Developed Equity",
            AssetCategory::EmergingMarkets => "Emerging Markets Equity",
            AssetCategory::GovernmentBond => "Government Bonds",
            AssetCategory::CorporateBond => "Corporate Bonds",
            AssetCategory::HighYieldBond => "High Yield Bonds",
            AssetCategory::MunicipalBond => "Municipal Bonds",
            AssetCategory::InternationalBond => "International Bonds",
            AssetCategory::Tips => "Inflation-Protected Bonds",
            AssetCategory::RealEstate => "Real Estate",
            AssetCategory::Commodities => "Commodities",
            AssetCategory::Gold => "Gold",
            AssetCategory::Cash => "Cash",
        }
    }

    /// The asset type a holding in this category most commonly has.
    pub fn default_asset_type(&self) -> AssetType {
        match self {
            AssetCategory::UsLargeCap
            | AssetCategory::UsMidCap
            | AssetCategory::UsSmallCap
            | AssetCategory::InternationalDeveloped
            | AssetCategory::EmergingMarkets => AssetType::Etf,
            AssetCategory::GovernmentBond
            | AssetCategory::CorporateBond
            | AssetCategory::HighYieldBond
            | AssetCategory::MunicipalBond
            | AssetCategory::InternationalBond
            | AssetCategory::Tips => AssetType::Bond,
            AssetCategory::RealEstate => AssetType::Reit,
            AssetCategory::Commodities | AssetCategory::Gold => AssetType::Commodity,
            AssetCategory::Cash => AssetType::Cash,
        }
    }

    pub fn default_region(&self) -> Region {
        match self {
            AssetCategory::InternationalDeveloped | AssetCategory::InternationalBond => {
                Region::DevelopedInternational
            }
            AssetCategory::EmergingMarkets => Region::EmergingMarkets,
            AssetCategory::Commodities | AssetCategory::Gold => Region::Global,
            _ => Region::Us,
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetCategory {
    type Err = PortfolioRiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        AssetCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| PortfolioRiskError::InvalidInput {
                field: "category".into(),
                reason: format!("Unknown asset category '{}'", s.trim()),
            })
    }
}

// ---------------------------------------------------------------------------
// Holding
// ---------------------------------------------------------------------------

/// A single position in a portfolio. Immutable for the duration of a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetHolding {
    pub symbol: String,
    pub name: String,
    pub asset_type: AssetType,
    pub category: AssetCategory,
    pub region: Region,
    /// Share of the portfolio, 0-100
    pub allocation_pct: Percent,
    pub dollar_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// Agency-style rating string, e.g. "AA+" or "BBB-"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_rating: Option<String>,
    /// Annualised historical volatility in percent (15 = 15%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility_pct: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_ratio: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<Percent>,
    /// Modified duration in years (bonds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<Decimal>,
}

impl AssetHolding {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        asset_type: AssetType,
        category: AssetCategory,
        region: Region,
        allocation_pct: Percent,
        dollar_amount: Money,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            asset_type,
            category,
            region,
            allocation_pct,
            dollar_amount,
            sector: None,
            credit_rating: None,
            volatility_pct: None,
            expense_ratio: None,
            dividend_yield: None,
            duration: None,
            beta: None,
        }
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_credit_rating(mut self, rating: impl Into<String>) -> Self {
        self.credit_rating = Some(rating.into());
        self
    }

    pub fn with_volatility(mut self, volatility_pct: Percent) -> Self {
        self.volatility_pct = Some(volatility_pct);
        self
    }

    pub fn with_beta(mut self, beta: Decimal) -> Self {
        self.beta = Some(beta);
        self
    }

    /// Allocation as a fraction of the portfolio (0-1).
    pub fn weight(&self) -> Decimal {
        fraction(self.allocation_pct)
    }

    /// Sector name, treating blank strings as undeclared.
    pub fn declared_sector(&self) -> Option<&str> {
        self.sector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_asset_type_parse_case_insensitive() {
        assert_eq!("ETF".parse::<AssetType>().unwrap(), AssetType::Etf);
        assert_eq!(" Mutual_Fund ".parse::<AssetType>().unwrap(), AssetType::MutualFund);
        assert_eq!("Equity".parse::<AssetType>().unwrap(), AssetType::Equity);
        assert!("crypto".parse::<AssetType>().is_err());
    }

    #[test]
    fn test_asset_type_rejects_informal_names() {
        for token in ["stock", "Stock", "mutual fund", "mutualfund", "REITs"] {
            assert!(token.parse::<AssetType>().is_err(), "{token} should be rejected");
        }
    }

    #[test]
    fn test_category_parse_accepts_labels_with_spaces() {
        assert_eq!(
            "us large cap".parse::<AssetCategory>().unwrap(),
            AssetCategory::UsLargeCap
        );
        assert_eq!(
            "high-yield-bond".parse::<AssetCategory>().unwrap(),
            AssetCategory::HighYieldBond
        );
        assert!("private_equity".parse::<AssetCategory>().is_err());
    }

    #[test]
    fn test_category_defaults() {
        assert_eq!(AssetCategory::Gold.default_asset_type(), AssetType::Commodity);
        assert_eq!(AssetCategory::Gold.default_region(), Region::Global);
        assert_eq!(
            AssetCategory::InternationalBond.default_region(),
            Region::DevelopedInternational
        );
    }

    #[test]
    fn test_serde_snake_case_tags() {
        let h = AssetHolding::new(
            "VTI",
            "Vanguard Total Stock Market",
            AssetType::Etf,
            AssetCategory::UsLargeCap,
            Region::Us,
            dec!(60),
            dec!(60000),
        );
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["asset_type"], "etf");
        assert_eq!(json["category"], "us_large_cap");
        assert!(json.get("sector").is_none());

        let back: AssetHolding = serde_json::from_value(json).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn test_blank_sector_is_undeclared() {
        let h = AssetHolding::new(
            "X",
            "X",
            AssetType::Equity,
            AssetCategory::UsLargeCap,
            Region::Us,
            dec!(10),
            dec!(1000),
        )
        .with_sector("  ");
        assert_eq!(h.declared_sector(), None);
        assert_eq!(h.weight(), dec!(0.1));
    }
}

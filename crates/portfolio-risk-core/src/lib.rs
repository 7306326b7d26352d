pub mod error;
pub mod holdings;
pub mod numeric;
pub mod types;
pub mod validation;

#[cfg(feature = "risk_profile")]
pub mod risk_profile;

#[cfg(feature = "risk_profile")]
pub mod analysis;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::PortfolioRiskError;
pub use holdings::{AssetCategory, AssetHolding, AssetType, Region};
pub use types::*;

/// Standard result type for all portfolio-risk operations
pub type PortfolioRiskResult<T> = Result<T, PortfolioRiskError>;

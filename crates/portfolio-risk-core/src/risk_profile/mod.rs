pub mod breakdown;
pub mod credit;
pub mod diversification;
pub mod profile;

pub use breakdown::{allocation_breakdown, AllocationBreakdown, AllocationSlice};
pub use diversification::{compute_diversification, DiversificationAnalysis};
pub use profile::{compute_risk_profile, RiskLevel, RiskProfile};

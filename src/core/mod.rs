pub mod appraisal;
pub mod decision;
pub mod landed_cost;
pub mod max_buy;
pub mod serial;
pub mod valuation;

pub use crate::domain::model::{
    Brand, CostParameters, DecodeResult, LandedCostInput, LandedCostOutput, MaxBuyInput,
    PricingGuidance, SourcingDecision,
};
pub use crate::domain::ports::{RateSource, SerialDecodeFallback};

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::toml_config::EngineConfig;
pub use core::appraisal::{appraise, Appraisal, AppraisalRequest};
pub use core::decision::derive_sourcing_decision;
pub use core::landed_cost::calculate_landed_cost;
pub use core::max_buy::calculate_max_buy_price;
pub use core::serial::{decode_serial_to_year, decode_with_fallback, needs_fallback};
pub use core::valuation::calculate_serial_pricing_guidance;
pub use domain::model::*;
pub use domain::ports::{RateSource, SerialDecodeFallback, StaticRates};
pub use utils::error::{Result, ValuationError};

use crate::domain::model::{Brand, CostParameters};
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "luxe-valuation")]
#[command(about = "Landed cost, serial dating and buy/pass decisions for luxury resale")]
pub struct CliConfig {
    /// Path to a TOML config with rates and default fees
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Landed EUR cost of buying at a given price
    Landed {
        /// Item price in the seller's currency
        #[arg(long)]
        base_price: f64,

        /// Expected resale price in EUR, enables the margin figures
        #[arg(long)]
        sell_price: Option<f64>,

        #[command(flatten)]
        costs: CostArgs,
    },

    /// Highest price to pay for a target sell price and margin
    MaxBuy {
        /// Target resale price in EUR
        #[arg(long)]
        sell_price: f64,

        /// Desired margin in whole percent; defaults to the config value
        #[arg(long)]
        margin: Option<f64>,

        #[command(flatten)]
        costs: CostArgs,
    },

    /// Decode a serial or date code into a production year
    Decode {
        #[arg(long)]
        brand: Brand,

        #[arg(long)]
        serial: String,
    },

    /// Age- and confidence-adjusted worth from a market average
    Value {
        #[arg(long)]
        brand: Brand,

        #[arg(long)]
        serial: String,

        #[arg(long)]
        market_average: f64,

        #[arg(long)]
        current_year: Option<i32>,
    },

    /// Fuse price-check and serial ceilings into one recommendation
    Decide {
        #[arg(long)]
        max_bid: Option<f64>,

        #[arg(long)]
        max_buy: Option<f64>,

        #[arg(long)]
        serial_max_pay: Option<f64>,
    },

    /// Decode, value and decide in one go
    Appraise {
        #[arg(long)]
        brand: Brand,

        #[arg(long)]
        serial: String,

        #[arg(long)]
        market_average: Option<f64>,

        /// Explicit price-check ceiling in EUR
        #[arg(long)]
        max_bid: Option<f64>,

        #[arg(long)]
        margin: Option<f64>,

        #[arg(long)]
        current_year: Option<i32>,

        #[command(flatten)]
        costs: CostArgs,
    },
}

/// Per-call overrides of the `[costs]` config section.
#[derive(Debug, Clone, Default, Args)]
pub struct CostArgs {
    /// EUR, USD, GBP or JPY
    #[arg(long)]
    pub currency: Option<String>,

    #[arg(long)]
    pub shipping: Option<f64>,

    #[arg(long)]
    pub insurance: Option<f64>,

    #[arg(long)]
    pub customs_pct: Option<f64>,

    #[arg(long)]
    pub import_vat_pct: Option<f64>,

    #[arg(long)]
    pub platform_fee_pct: Option<f64>,

    #[arg(long)]
    pub payment_fee_pct: Option<f64>,

    #[arg(long)]
    pub fixed_fee: Option<f64>,
}

impl CostArgs {
    pub fn apply(&self, defaults: CostParameters) -> Result<CostParameters> {
        let currency = match &self.currency {
            Some(code) => code.parse()?,
            None => defaults.currency,
        };

        Ok(CostParameters {
            currency,
            rates: defaults.rates,
            shipping: self.shipping.unwrap_or(defaults.shipping),
            insurance: self.insurance.unwrap_or(defaults.insurance),
            customs_pct: self.customs_pct.unwrap_or(defaults.customs_pct),
            import_vat_pct: self.import_vat_pct.unwrap_or(defaults.import_vat_pct),
            platform_fee_pct: self.platform_fee_pct.unwrap_or(defaults.platform_fee_pct),
            payment_fee_pct: self.payment_fee_pct.unwrap_or(defaults.payment_fee_pct),
            fixed_fee: self.fixed_fee.unwrap_or(defaults.fixed_fee),
        })
    }
}

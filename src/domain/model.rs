use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::utils::error::ValuationError;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Eur, Currency::Usd, Currency::Gbp, Currency::Jpy];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| {
                ValuationError::invalid_input(
                    "currency",
                    format!("unsupported currency '{}', expected one of EUR, USD, GBP, JPY", s),
                )
            })
    }
}

/// Units of a foreign currency per 1 EUR, e.g. `USD -> 1.08`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, f64>",
    into = "BTreeMap<String, f64>"
)]
pub struct RateTable {
    rates: BTreeMap<Currency, f64>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, currency: Currency, units_per_eur: f64) -> Self {
        self.insert(currency, units_per_eur);
        self
    }

    pub fn insert(&mut self, currency: Currency, units_per_eur: f64) {
        self.rates.insert(currency, units_per_eur);
    }

    pub fn get(&self, currency: Currency) -> Option<f64> {
        self.rates.get(&currency).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Currency, f64)> + '_ {
        self.rates.iter().map(|(c, r)| (*c, *r))
    }
}

impl TryFrom<BTreeMap<String, f64>> for RateTable {
    type Error = ValuationError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut table = RateTable::new();
        for (code, rate) in raw {
            table.insert(code.parse()?, rate);
        }
        Ok(table)
    }
}

impl From<RateTable> for BTreeMap<String, f64> {
    fn from(table: RateTable) -> Self {
        table
            .iter()
            .map(|(c, r)| (c.code().to_string(), r))
            .collect()
    }
}

/// Fee, tax and currency parameters shared by the forward calculator and the
/// max-buy solver. Shipping, insurance and the fixed fee are in `currency`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CostParameters {
    pub currency: Currency,
    pub rates: Option<RateTable>,
    pub shipping: f64,
    pub insurance: f64,
    pub customs_pct: f64,
    pub import_vat_pct: f64,
    pub platform_fee_pct: f64,
    pub payment_fee_pct: f64,
    pub fixed_fee: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandedCostInput {
    pub base_price: f64,
    #[serde(default)]
    pub target_sell_price_eur: Option<f64>,
    #[serde(flatten)]
    pub costs: CostParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandedCostOutput {
    pub rate_to_eur: f64,
    pub item_cost_eur: f64,
    pub shipping_eur: f64,
    pub insurance_eur: f64,
    pub cif_eur: f64,
    pub duty_eur: f64,
    pub vat_eur: f64,
    pub fees_eur: f64,
    pub total_landed_eur: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_eur: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxBuyInput {
    pub target_sell_price_eur: f64,
    pub desired_margin_pct: f64,
    #[serde(flatten)]
    pub costs: CostParameters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Brand {
    LouisVuitton,
    Chanel,
    Hermes,
    Gucci,
    Prada,
    Dior,
    Fendi,
    Celine,
    Goyard,
    BottegaVeneta,
    Other,
}

impl Brand {
    pub const ALL: [Brand; 11] = [
        Brand::LouisVuitton,
        Brand::Chanel,
        Brand::Hermes,
        Brand::Gucci,
        Brand::Prada,
        Brand::Dior,
        Brand::Fendi,
        Brand::Celine,
        Brand::Goyard,
        Brand::BottegaVeneta,
        Brand::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Brand::LouisVuitton => "Louis Vuitton",
            Brand::Chanel => "Chanel",
            Brand::Hermes => "Hermès",
            Brand::Gucci => "Gucci",
            Brand::Prada => "Prada",
            Brand::Dior => "Dior",
            Brand::Fendi => "Fendi",
            Brand::Celine => "Celine",
            Brand::Goyard => "Goyard",
            Brand::BottegaVeneta => "Bottega Veneta",
            Brand::Other => "Other",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            Brand::LouisVuitton => "louisvuitton",
            Brand::Chanel => "chanel",
            Brand::Hermes => "hermes",
            Brand::Gucci => "gucci",
            Brand::Prada => "prada",
            Brand::Dior => "dior",
            Brand::Fendi => "fendi",
            Brand::Celine => "celine",
            Brand::Goyard => "goyard",
            Brand::BottegaVeneta => "bottegaveneta",
            Brand::Other => "other",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Brand {
    type Err = ValuationError;

    /// Accepts display names, snake/kebab slugs and `LV`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .map(|c| if c == 'è' { 'e' } else { c })
            .collect();

        if key == "lv" {
            return Ok(Brand::LouisVuitton);
        }
        if key == "bv" {
            return Ok(Brand::BottegaVeneta);
        }

        Brand::ALL
            .into_iter()
            .find(|b| b.slug() == key)
            .ok_or_else(|| ValuationError::invalid_input("brand", format!("unknown brand '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeSource {
    Rules,
    Heuristic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePrecision {
    ExactWeek,
    ExactMonth,
    ExactYear,
    YearWindow,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionWindow {
    pub start_year: i32,
    pub end_year: i32,
}

impl ProductionWindow {
    pub fn new(start_year: i32, end_year: i32) -> Self {
        Self {
            start_year: start_year.min(end_year),
            end_year: start_year.max(end_year),
        }
    }

    pub fn single(year: i32) -> Self {
        Self::new(year, year)
    }

    pub fn is_single_year(&self) -> bool {
        self.start_year == self.end_year
    }

    /// Rounded midpoint; 2018..=2021 anchors on 2020.
    pub fn midpoint(&self) -> i32 {
        ((i64::from(self.start_year) + i64::from(self.end_year)) as f64 / 2.0).round() as i32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeResult {
    pub success: bool,
    pub brand: Brand,
    pub serial: String,
    pub source: DecodeSource,
    pub precision: DatePrecision,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_window: Option<ProductionWindow>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub rationale: Vec<String>,
    #[serde(default)]
    pub uncertainties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_format: Option<String>,
}

impl DecodeResult {
    /// A rule-based miss: no year, no window, zero confidence.
    pub fn failure(brand: Brand, serial: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            brand,
            serial: serial.into(),
            source: DecodeSource::Rules,
            precision: DatePrecision::Unknown,
            confidence: 0.0,
            year: None,
            period: None,
            production_window: None,
            message: message.into(),
            note: None,
            rationale: Vec::new(),
            uncertainties: Vec::new(),
            matched_format: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// The single year age calculations start from.
    pub fn anchor_year(&self) -> Option<i32> {
        self.year
            .or_else(|| self.production_window.map(|w| w.midpoint()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentBreakdown {
    pub age_years: i32,
    pub age_adjustment_pct: f64,
    pub confidence_penalty_pct: f64,
    pub total_adjustment_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingGuidance {
    pub market_average_eur: f64,
    pub estimated_worth_eur: f64,
    pub recommended_max_pay_eur: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_year: Option<i32>,
    pub adjustment: AdjustmentBreakdown,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Good,
    Caution,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintSource {
    None,
    PriceCheck,
    SerialCheck,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcingDecision {
    pub tone: Tone,
    pub recommended_max_pay: Option<f64>,
    pub constrained_by: ConstraintSource,
    pub summary: String,
    pub notes: Vec<String>,
}

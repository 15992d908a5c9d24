use crate::domain::model::{CostParameters, Currency, RateTable};
use crate::domain::ports::RateSource;
use crate::utils::error::{Result, ValuationError};
use crate::utils::validation::{
    validate_non_empty_string, validate_non_negative, validate_percentage, validate_positive_rate,
    validate_range, Validate,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

lazy_static! {
    static ref ENV_VAR_RE: Regex = Regex::new(r"\$\{([^}]+)\}").expect("valid regex");
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Units of each currency per 1 EUR, keyed by ISO code.
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
    #[serde(default)]
    pub costs: CostsConfig,
    #[serde(default)]
    pub valuation: ValuationConfig,
    pub logging: Option<LoggingConfig>,
}

/// Defaults for the fee and tax parameters; CLI flags override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CostsConfig {
    pub currency: String,
    pub shipping: f64,
    pub insurance: f64,
    pub customs_pct: f64,
    pub import_vat_pct: f64,
    pub platform_fee_pct: f64,
    pub payment_fee_pct: f64,
    pub fixed_fee: f64,
}

impl Default for CostsConfig {
    fn default() -> Self {
        Self {
            currency: Currency::Eur.code().to_string(),
            shipping: 0.0,
            insurance: 0.0,
            customs_pct: 0.0,
            import_vat_pct: 0.0,
            platform_fee_pct: 0.0,
            payment_fee_pct: 0.0,
            fixed_fee: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    pub desired_margin_pct: f64,
    /// Pins the "current" year for age calculations.
    pub current_year: Option<i32>,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            desired_margin_pct: 20.0,
            current_year: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ValuationError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ValuationError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown names are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        for (code, rate) in &self.rates {
            let currency: Currency = code.parse()?;
            if currency == Currency::Eur {
                return Err(ValuationError::InvalidConfigValueError {
                    field: "rates".to_string(),
                    value: code.clone(),
                    reason: "EUR is the base currency and takes no rate".to_string(),
                });
            }
            validate_positive_rate(&format!("rates.{}", code), *rate)?;
        }

        let costs = &self.costs;
        validate_non_empty_string("costs.currency", &costs.currency)?;
        let currency: Currency = costs.currency.parse()?;
        validate_non_negative("costs.shipping", costs.shipping)?;
        validate_non_negative("costs.insurance", costs.insurance)?;
        validate_non_negative("costs.fixed_fee", costs.fixed_fee)?;
        validate_percentage("costs.customs_pct", costs.customs_pct)?;
        validate_percentage("costs.import_vat_pct", costs.import_vat_pct)?;
        validate_percentage("costs.platform_fee_pct", costs.platform_fee_pct)?;
        validate_percentage("costs.payment_fee_pct", costs.payment_fee_pct)?;

        let has_rate = self
            .rates
            .keys()
            .any(|k| k.eq_ignore_ascii_case(currency.code()));
        if currency != Currency::Eur && !has_rate {
            return Err(ValuationError::MissingConfigError {
                field: format!("rates.{}", currency.code()),
            });
        }

        validate_range(
            "valuation.desired_margin_pct",
            self.valuation.desired_margin_pct,
            0.0,
            99.0,
        )?;
        if let Some(year) = self.valuation.current_year {
            validate_range("valuation.current_year", year, 1900, 2200)?;
        }

        Ok(())
    }

    pub fn rate_table(&self) -> Result<RateTable> {
        RateTable::try_from(self.rates.clone())
    }

    /// Cost defaults with rates from the `[rates]` section.
    pub fn cost_parameters(&self) -> Result<CostParameters> {
        self.rate_table()?;
        self.cost_parameters_with(self)
    }

    /// Cost defaults with rates from `source`, e.g. a live feed or fixed test rates.
    pub fn cost_parameters_with(&self, source: &dyn RateSource) -> Result<CostParameters> {
        let rates = source.rates();
        match &rates {
            Some(table) => {
                for (currency, units_per_eur) in table.iter() {
                    tracing::debug!("Rate {} = {} per EUR", currency, units_per_eur);
                }
            }
            None => tracing::debug!("No rates available; only EUR prices convert"),
        }

        Ok(CostParameters {
            currency: self.costs.currency.parse()?,
            rates,
            shipping: self.costs.shipping,
            insurance: self.costs.insurance,
            customs_pct: self.costs.customs_pct,
            import_vat_pct: self.costs.import_vat_pct,
            platform_fee_pct: self.costs.platform_fee_pct,
            payment_fee_pct: self.costs.payment_fee_pct,
            fixed_fee: self.costs.fixed_fee,
        })
    }

    pub fn desired_margin_pct(&self) -> f64 {
        self.valuation.desired_margin_pct
    }

    pub fn current_year(&self) -> Option<i32> {
        self.valuation.current_year
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl RateSource for EngineConfig {
    fn rates(&self) -> Option<RateTable> {
        self.rate_table().ok().filter(|t| !t.is_empty())
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::StaticRates;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[rates]
USD = 1.08
JPY = 162.5

[costs]
currency = "USD"
shipping = 45.0
customs_pct = 3
import_vat_pct = 23
platform_fee_pct = 5

[valuation]
desired_margin_pct = 25
current_year = 2026
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = EngineConfig::from_toml_str(BASIC).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.desired_margin_pct(), 25.0);
        assert_eq!(config.current_year(), Some(2026));

        let costs = config.cost_parameters().unwrap();
        assert_eq!(costs.currency, Currency::Usd);
        assert_eq!(costs.shipping, 45.0);
        assert_eq!(costs.rates.unwrap().get(Currency::Jpy), Some(162.5));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.desired_margin_pct(), 20.0);
        assert!(config.rates().is_none());
        assert_eq!(config.cost_parameters().unwrap().currency, Currency::Eur);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LUXE_TEST_GBP_RATE", "0.86");

        let config = EngineConfig::from_toml_str(
            r#"
[rates]
GBP = ${LUXE_TEST_GBP_RATE}
"#,
        )
        .unwrap();
        assert_eq!(config.rates.get("GBP"), Some(&0.86));

        std::env::remove_var("LUXE_TEST_GBP_RATE");
    }

    #[test]
    fn test_config_validation() {
        let missing_rate = EngineConfig::from_toml_str(
            r#"
[costs]
currency = "GBP"
"#,
        )
        .unwrap();
        assert!(matches!(
            missing_rate.validate(),
            Err(ValuationError::MissingConfigError { .. })
        ));

        let bad_vat = EngineConfig::from_toml_str(
            r#"
[costs]
import_vat_pct = 230
"#,
        )
        .unwrap();
        assert!(bad_vat.validate().is_err());

        let bad_rate = EngineConfig::from_toml_str(
            r#"
[rates]
USD = 0
"#,
        )
        .unwrap();
        assert!(bad_rate.validate().is_err());

        let unknown_currency = EngineConfig::from_toml_str(
            r#"
[rates]
CHF = 0.95
"#,
        )
        .unwrap();
        assert!(unknown_currency.validate().is_err());

        let blank_currency = EngineConfig::from_toml_str(
            r#"
[costs]
currency = "  "
"#,
        )
        .unwrap();
        assert!(matches!(
            blank_currency.validate(),
            Err(ValuationError::InvalidConfigValueError { ref field, .. }) if field == "costs.currency"
        ));
    }

    #[test]
    fn test_cost_parameters_take_injected_rates() {
        let config = EngineConfig::from_toml_str(BASIC).unwrap();

        let live = StaticRates::new(RateTable::new().with_rate(Currency::Usd, 1.25));
        let costs = config.cost_parameters_with(&live).unwrap();
        assert_eq!(costs.shipping, 45.0);
        let rates = costs.rates.unwrap();
        assert_eq!(rates.get(Currency::Usd), Some(1.25));
        assert_eq!(rates.get(Currency::Jpy), None);

        let costs = config
            .cost_parameters_with(&StaticRates::unavailable())
            .unwrap();
        assert!(costs.rates.is_none());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = EngineConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.rates.len(), 2);
    }
}

use crate::config::toml_config::EngineConfig;
use crate::core::appraisal::{appraise, Appraisal, AppraisalRequest};
use crate::domain::model::{Brand, ConstraintSource, CostParameters, DatePrecision, Tone};
use crate::domain::ports::{RateSource, SerialDecodeFallback};
use crate::utils::error::{Result, ValuationError};
use crate::utils::validation::sanitize_amount;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Json,
}

impl FromStr for ReportFormat {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(ValuationError::invalid_input(
                "format",
                format!("unsupported report format '{}', expected csv or json", other),
            )),
        }
    }
}

/// One input line: `brand,serial,market_average_eur,max_bid_eur`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRow {
    pub brand: String,
    pub serial: String,
    #[serde(default)]
    pub market_average_eur: Option<f64>,
    #[serde(default)]
    pub max_bid_eur: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub row: usize,
    pub brand: String,
    pub serial: String,
    pub decoded: bool,
    pub year: Option<i32>,
    pub window_start: Option<i32>,
    pub window_end: Option<i32>,
    pub precision: Option<DatePrecision>,
    pub confidence: Option<f64>,
    pub estimated_worth_eur: Option<f64>,
    pub serial_max_pay_eur: Option<f64>,
    pub max_bid_eur: Option<f64>,
    pub tone: Option<Tone>,
    pub recommended_max_pay_eur: Option<f64>,
    pub constrained_by: Option<ConstraintSource>,
    pub summary: String,
}

impl ReportRow {
    fn from_appraisal(row: usize, brand: Brand, appraisal: &Appraisal) -> Self {
        let decode = &appraisal.decode;
        Self {
            row,
            brand: brand.display_name().to_string(),
            serial: decode.serial.clone(),
            decoded: decode.success,
            year: decode.year,
            window_start: decode.production_window.map(|w| w.start_year),
            window_end: decode.production_window.map(|w| w.end_year),
            precision: Some(decode.precision),
            confidence: Some(decode.confidence),
            estimated_worth_eur: appraisal.guidance.as_ref().map(|g| g.estimated_worth_eur),
            serial_max_pay_eur: appraisal
                .guidance
                .as_ref()
                .map(|g| g.recommended_max_pay_eur),
            max_bid_eur: appraisal.max_bid_eur,
            tone: Some(appraisal.decision.tone),
            recommended_max_pay_eur: appraisal.decision.recommended_max_pay,
            constrained_by: Some(appraisal.decision.constrained_by),
            summary: appraisal.decision.summary.clone(),
        }
    }

    fn rejected(row: usize, brand: &str, serial: &str, reason: String) -> Self {
        Self {
            row,
            brand: brand.to_string(),
            serial: serial.to_string(),
            decoded: false,
            year: None,
            window_start: None,
            window_end: None,
            precision: None,
            confidence: None,
            estimated_worth_eur: None,
            serial_max_pay_eur: None,
            max_bid_eur: None,
            tone: None,
            recommended_max_pay_eur: None,
            constrained_by: None,
            summary: reason,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub rejected: usize,
    pub good: usize,
    pub caution: usize,
    pub stop: usize,
    pub neutral: usize,
}

impl BatchSummary {
    fn record(&mut self, tone: Option<Tone>) {
        match tone {
            Some(Tone::Good) => self.good += 1,
            Some(Tone::Caution) => self.caution += 1,
            Some(Tone::Stop) => self.stop += 1,
            Some(Tone::Neutral) => self.neutral += 1,
            None => self.rejected += 1,
        }
        self.processed += 1;
    }
}

/// Appraises every CSV row with the config's fees and margin and the rates
/// from `rates`, and writes one report row per input row. Bad rows are
/// reported, not fatal.
pub fn run_batch<R: Read, W: Write>(
    config: &EngineConfig,
    rates: &dyn RateSource,
    input: R,
    output: W,
    format: ReportFormat,
    fallback: Option<&dyn SerialDecodeFallback>,
) -> Result<BatchSummary> {
    let costs: CostParameters = config.cost_parameters_with(rates)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut summary = BatchSummary::default();
    let mut report = Vec::new();

    for (idx, record) in reader.deserialize::<BatchRow>().enumerate() {
        let row_number = idx + 1;
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Skipping unreadable row {}: {}", row_number, e);
                summary.record(None);
                report.push(ReportRow::rejected(
                    row_number,
                    "",
                    "",
                    format!("Unreadable row: {}", e),
                ));
                continue;
            }
        };

        let report_row = match row.brand.parse::<Brand>() {
            Ok(brand) => {
                let request = AppraisalRequest {
                    brand,
                    serial: row.serial.clone(),
                    market_average_eur: row.market_average_eur.map(sanitize_amount),
                    max_bid_eur: row.max_bid_eur.map(sanitize_amount),
                    costs: Some(costs.clone()),
                    desired_margin_pct: config.desired_margin_pct(),
                    current_year: config.current_year(),
                };
                let appraisal = appraise(&request, fallback);
                ReportRow::from_appraisal(row_number, brand, &appraisal)
            }
            Err(e) => {
                tracing::warn!("Row {}: {}", row_number, e);
                ReportRow::rejected(row_number, &row.brand, &row.serial, e.user_friendly_message())
            }
        };

        summary.record(report_row.tone);
        report.push(report_row);
    }

    write_report(&report, output, format)?;

    tracing::info!(
        "Batch finished: {} rows ({} good, {} caution, {} stop, {} neutral, {} rejected)",
        summary.processed,
        summary.good,
        summary.caution,
        summary.stop,
        summary.neutral,
        summary.rejected
    );
    Ok(summary)
}

fn write_report<W: Write>(rows: &[ReportRow], mut output: W, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut output, rows)?;
            writeln!(output)?;
        }
        ReportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(output);
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

//! Rule-based serial/date-code decoding.
//!
//! Every brand module exposes a `decode` that tries its known formats in a
//! fixed order. Each format is an independent function returning an optional
//! [`Candidate`]; the first hit wins. Results are a dating aid only and say
//! nothing about whether an item is genuine.

mod chanel;
mod louis_vuitton;

use crate::domain::model::{
    Brand, DatePrecision, DecodeResult, DecodeSource, ProductionWindow,
};
use crate::domain::ports::SerialDecodeFallback;

/// Below this, callers should escalate to a heuristic decoder.
pub const FALLBACK_CONFIDENCE_THRESHOLD: f64 = 0.7;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One format's reading of a code.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Candidate {
    pub format: &'static str,
    pub precision: DatePrecision,
    pub confidence: f64,
    pub year: Option<i32>,
    pub period: Option<String>,
    pub window: Option<ProductionWindow>,
    pub message: String,
    pub note: Option<String>,
    pub rationale: Vec<String>,
    pub uncertainties: Vec<String>,
}

impl Candidate {
    fn into_result(self, brand: Brand, serial: String) -> DecodeResult {
        DecodeResult {
            success: true,
            brand,
            serial,
            source: DecodeSource::Rules,
            precision: self.precision,
            confidence: self.confidence.clamp(0.0, 1.0),
            year: self.year,
            period: self.period,
            production_window: self.window,
            message: self.message,
            note: self.note,
            rationale: self.rationale,
            uncertainties: self.uncertainties,
            matched_format: Some(self.format.to_string()),
        }
    }
}

/// Why a brand decoder produced nothing.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Miss {
    pub message: String,
    pub note: Option<String>,
}

impl Miss {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

pub(crate) fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get((month as usize).checked_sub(1)?).copied()
}

/// Strips all whitespace and uppercases.
pub fn normalize_serial(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

pub fn decode_serial_to_year(serial: &str, brand: Brand) -> DecodeResult {
    let normalized = normalize_serial(serial);

    let outcome = match brand {
        Brand::LouisVuitton => louis_vuitton::decode(&normalized),
        Brand::Chanel => chanel::decode(&normalized),
        other => Err(Miss::new(format!(
            "No rule-based decoder for {} yet.",
            other.display_name()
        ))
        .with_note(
            "Use the AI-assisted lookup for a best-effort estimate, or date the item from receipts and hardware.",
        )),
    };

    match outcome {
        Ok(candidate) => {
            tracing::debug!(
                "Decoded {} serial '{}' as {:?} via {} (confidence {:.2})",
                brand,
                normalized,
                candidate.year.or(candidate.window.map(|w| w.start_year)),
                candidate.format,
                candidate.confidence
            );
            candidate.into_result(brand, normalized)
        }
        Err(miss) => {
            tracing::debug!("No {} decode for '{}': {}", brand, normalized, miss.message);
            let result = DecodeResult::failure(brand, normalized, miss.message);
            match miss.note {
                Some(note) => result.with_note(note),
                None => result,
            }
        }
    }
}

/// True when the rule-based result is too weak to price from on its own.
pub fn needs_fallback(result: &DecodeResult) -> bool {
    result.precision == DatePrecision::Unknown
        || result.confidence < FALLBACK_CONFIDENCE_THRESHOLD
}

/// Rule-based decode, escalated to `fallback` when [`needs_fallback`] says so.
/// A fallback answer replaces the rule-based one entirely; if the fallback has
/// nothing, the rule-based result stands.
pub fn decode_with_fallback(
    serial: &str,
    brand: Brand,
    fallback: Option<&dyn SerialDecodeFallback>,
) -> DecodeResult {
    let rule_based = decode_serial_to_year(serial, brand);
    if !needs_fallback(&rule_based) {
        return rule_based;
    }

    let Some(fallback) = fallback else {
        return rule_based;
    };

    match fallback.decode(brand, &rule_based.serial) {
        Some(heuristic) => {
            tracing::info!(
                "Using heuristic decode for {} '{}' (rule-based confidence {:.2})",
                brand,
                rule_based.serial,
                rule_based.confidence
            );
            heuristic
        }
        None => rule_based,
    }
}

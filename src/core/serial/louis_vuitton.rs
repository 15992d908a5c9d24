use lazy_static::lazy_static;
use regex::Regex;

use super::{month_name, Candidate, Miss};
use crate::domain::model::{DatePrecision, ProductionWindow};

const EIGHTIES_CONFIDENCE: f64 = 0.72;
const MONTH_ERA_CONFIDENCE: f64 = 0.9;
const WEEK_ERA_CONFIDENCE: f64 = 0.9;
const ANOMALY_CONFIDENCE: f64 = 0.55;

/// First year stamped with week-based codes.
const WEEK_CODES_FROM: i32 = 2007;

const FORMAT_HINT: &str = "Louis Vuitton date codes look like SR3179 (two letters and four digits, 1990 onwards) or 844 / 8534VI (1980s). Check the stamp and try again.";

lazy_static! {
    static ref EIGHTIES_RE: Regex = Regex::new(r"^(\d{3,4})[A-Z]{0,2}$").expect("valid regex");
    static ref FACTORY_CODE_RE: Regex =
        Regex::new(r"^([A-Z]{2})(\d)(\d)(\d)(\d)$").expect("valid regex");
}

/// Letters plus the four date digits of a 1990+ stamp.
#[derive(Debug, Clone, Copy)]
struct FactoryCode<'a> {
    factory: &'a str,
    digits: [u32; 4],
}

impl FactoryCode<'_> {
    /// Digits 1 and 3: month before 2007, week after.
    fn interleaved_period(&self) -> u32 {
        self.digits[0] * 10 + self.digits[2]
    }

    /// Digits 2 and 4.
    fn interleaved_year(&self) -> i32 {
        expand_two_digit_year(self.digits[1] * 10 + self.digits[3])
    }
}

fn expand_two_digit_year(yy: u32) -> i32 {
    let yy = yy as i32;
    if yy >= 80 {
        1900 + yy
    } else {
        2000 + yy
    }
}

fn parse_factory_code(code: &str) -> Option<FactoryCode<'_>> {
    let caps = FACTORY_CODE_RE.captures(code)?;
    let factory = caps.get(1)?.as_str();
    let mut digits = [0u32; 4];
    for (slot, idx) in digits.iter_mut().zip(2..=5) {
        *slot = caps.get(idx)?.as_str().parse().ok()?;
    }
    Some(FactoryCode { factory, digits })
}

pub(crate) fn decode(code: &str) -> Result<Candidate, Miss> {
    if code.is_empty() {
        return Err(Miss::new(
            "Enter the date code stamped inside the item (e.g. SR3179).",
        ));
    }

    if let Some(stamp) = parse_factory_code(code) {
        if let Some(mut candidate) = month_era(&stamp) {
            if let Some((week, year)) = week_reading(&stamp) {
                candidate.note = Some(format!(
                    "These digits would also fit the week layout (week {}, {}); they are read as a month because that year predates week codes.",
                    week, year
                ));
            }
            return Ok(candidate);
        }

        return week_era(&stamp)
            .or_else(|| anomalous(&stamp))
            .ok_or_else(|| Miss::new(FORMAT_HINT));
    }

    eighties(code).ok_or_else(|| Miss::new(FORMAT_HINT))
}

/// 1982-1989: `844` is April 1984.
fn eighties(code: &str) -> Option<Candidate> {
    let caps = EIGHTIES_RE.captures(code)?;
    let digits = caps.get(1)?.as_str();

    let yy: i32 = digits.get(..2)?.parse().ok()?;
    let month: u32 = digits.get(digits.len() - 1..)?.parse().ok()?;
    let year = 1900 + yy;

    if !(1982..=1989).contains(&year) || !(1..=9).contains(&month) {
        return None;
    }
    let month_label = month_name(month)?;

    Some(Candidate {
        format: "lv_1980s",
        precision: DatePrecision::ExactMonth,
        confidence: EIGHTIES_CONFIDENCE,
        year: Some(year),
        period: Some(month_label.to_string()),
        window: None,
        message: format!("Produced in {} {}.", month_label, year),
        note: Some("Early-1980s codes carry no factory letters.".to_string()),
        rationale: vec![
            format!("First two digits '{}' give the year {}.", &digits[..2], year),
            format!("Last digit '{}' gives the month ({}).", month, month_label),
        ],
        uncertainties: Vec::new(),
    })
}

/// 1990-2006: month from digits 1 and 3, year from digits 2 and 4.
fn month_era(stamp: &FactoryCode<'_>) -> Option<Candidate> {
    let month = stamp.interleaved_period();
    let year = stamp.interleaved_year();

    if !(1990..WEEK_CODES_FROM).contains(&year) {
        return None;
    }
    let month_label = month_name(month)?;

    Some(Candidate {
        format: "lv_1990_2006_month",
        precision: DatePrecision::ExactMonth,
        confidence: MONTH_ERA_CONFIDENCE,
        year: Some(year),
        period: Some(month_label.to_string()),
        window: None,
        message: format!(
            "Produced in {} {} (factory code {}).",
            month_label, year, stamp.factory
        ),
        note: None,
        rationale: vec![
            format!(
                "Digits 1 and 3 ({}, {}) give month {:02} ({}).",
                stamp.digits[0], stamp.digits[2], month, month_label
            ),
            format!(
                "Digits 2 and 4 ({}, {}) give the year {}.",
                stamp.digits[1], stamp.digits[3], year
            ),
            format!("Letters '{}' identify the workshop.", stamp.factory),
        ],
        uncertainties: Vec::new(),
    })
}

/// Week 1-53 and year, with no era check.
fn week_reading(stamp: &FactoryCode<'_>) -> Option<(u32, i32)> {
    let week = stamp.interleaved_period();
    (1..=53)
        .contains(&week)
        .then(|| (week, stamp.interleaved_year()))
}

/// 2007 onwards: week from digits 1 and 3, year from digits 2 and 4.
fn week_era(stamp: &FactoryCode<'_>) -> Option<Candidate> {
    let (week, year) = week_reading(stamp)?;
    if year < WEEK_CODES_FROM {
        return None;
    }

    Some(Candidate {
        format: "lv_2007_week",
        precision: DatePrecision::ExactWeek,
        confidence: WEEK_ERA_CONFIDENCE,
        year: Some(year),
        period: Some(format!("Week {}", week)),
        window: None,
        message: format!(
            "Produced in week {} of {} (factory code {}).",
            week, year, stamp.factory
        ),
        note: None,
        rationale: vec![
            format!(
                "Digits 1 and 3 ({}, {}) give week {}.",
                stamp.digits[0], stamp.digits[2], week
            ),
            format!(
                "Digits 2 and 4 ({}, {}) give the year {}.",
                stamp.digits[1], stamp.digits[3], year
            ),
            format!("Letters '{}' identify the workshop.", stamp.factory),
        ],
        uncertainties: Vec::new(),
    })
}

/// A week-shaped code whose year predates week codes. Reported with low
/// confidence instead of guessing an era.
fn anomalous(stamp: &FactoryCode<'_>) -> Option<Candidate> {
    let (week, year) = week_reading(stamp)?;
    if year >= WEEK_CODES_FROM {
        return None;
    }

    Some(Candidate {
        format: "lv_anomalous",
        precision: DatePrecision::YearWindow,
        confidence: ANOMALY_CONFIDENCE,
        year: Some(year),
        period: Some(format!("Week {}", week)),
        window: Some(ProductionWindow::single(year)),
        message: format!(
            "Code {}{}{}{}{} fits neither date scheme cleanly; {} is a rough reading only.",
            stamp.factory,
            stamp.digits[0],
            stamp.digits[1],
            stamp.digits[2],
            stamp.digits[3],
            year
        ),
        note: Some("Confirm the date from other evidence before relying on it.".to_string()),
        rationale: vec![format!(
            "Digits 2 and 4 ({}, {}) give the year {}.",
            stamp.digits[1], stamp.digits[3], year
        )],
        uncertainties: vec![
            if month_name(week).is_some() {
                format!(
                    "The year {} is outside 1990-2006, so the month format does not apply.",
                    year
                )
            } else {
                format!(
                    "Digits 1 and 3 give {}, which is not a month, so the 1990-2006 format does not apply.",
                    week
                )
            },
            format!(
                "Read as a week code the year is {}, before week codes were introduced in {}.",
                year, WEEK_CODES_FROM
            ),
            "The stamp may be worn, misread or re-stamped.".to_string(),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_era() {
        let c = decode("SR3179").unwrap();
        assert_eq!(c.year, Some(2019));
        assert_eq!(c.period.as_deref(), Some("Week 37"));
        assert_eq!(c.precision, DatePrecision::ExactWeek);
        assert_eq!(c.format, "lv_2007_week");
    }

    #[test]
    fn test_month_era_wins_overlap_with_note() {
        let c = decode("SP0065").unwrap();
        assert_eq!(c.year, Some(2005));
        assert_eq!(c.period.as_deref(), Some("June"));
        assert_eq!(c.precision, DatePrecision::ExactMonth);
        let note = c.note.unwrap();
        assert!(note.contains("week layout"));
        assert!(note.contains("week 6, 2005"));
    }

    #[test]
    fn test_nineties_year_expansion() {
        let c = decode("VI1925").unwrap();
        assert_eq!(c.year, Some(1995));
        assert_eq!(c.period.as_deref(), Some("December"));
    }

    #[test]
    fn test_eighties_codes() {
        let c = decode("844").unwrap();
        assert_eq!(c.year, Some(1984));
        assert_eq!(c.period.as_deref(), Some("April"));

        let c = decode("8534VI").unwrap();
        assert_eq!(c.year, Some(1985));
        assert_eq!(c.period.as_deref(), Some("April"));

        // 1979 and month 0 are out of range
        assert!(decode("791").is_err());
        assert!(decode("840").is_err());
    }

    #[test]
    fn test_format_hint_examples_decode() {
        for example in ["SR3179", "844", "8534VI"] {
            assert!(FORMAT_HINT.contains(example));
            assert!(decode(example).is_ok(), "{} should decode", example);
        }
        assert_eq!(decode("8910VI").unwrap_err().message, FORMAT_HINT);
    }

    #[test]
    fn test_anomalous_code_is_low_confidence_window() {
        // month 29 is invalid, week 29 of 2000 predates week codes
        let c = decode("AA2090").unwrap();
        assert_eq!(c.format, "lv_anomalous");
        assert_eq!(c.precision, DatePrecision::YearWindow);
        assert_eq!(c.window, Some(ProductionWindow::single(2000)));
        assert!((c.confidence - 0.55).abs() < 1e-9);
        assert_eq!(c.uncertainties.len(), 3);
    }

    #[test]
    fn test_unreadable_codes() {
        assert!(decode("INVALID").is_err());
        // 69 is neither a month nor a week
        assert!(decode("AB6090").is_err());
        assert!(decode("").unwrap_err().message.starts_with("Enter"));
    }
}

use super::{Candidate, Miss};
use crate::domain::model::{DatePrecision, ProductionWindow};

const EIGHT_DIGIT_EXACT_CONFIDENCE: f64 = 0.88;
const EIGHT_DIGIT_WINDOW_CONFIDENCE: f64 = 0.8;
const SEVEN_DIGIT_EXACT_CONFIDENCE: f64 = 0.84;
const SEVEN_DIGIT_WINDOW_CONFIDENCE: f64 = 0.75;

/// Two-digit prefix of 8-digit serials -> production years.
static EIGHT_DIGIT_SERIES: &[(u32, i32, i32)] = &[
    (5, 2005, 2005),
    (6, 2006, 2006),
    (7, 2007, 2008),
    (8, 2008, 2008),
    (9, 2009, 2009),
    (10, 2010, 2010),
    (11, 2011, 2012),
    (12, 2012, 2012),
    (13, 2013, 2013),
    (14, 2014, 2014),
    (15, 2015, 2015),
    (16, 2016, 2017),
    (17, 2017, 2017),
    (18, 2018, 2018),
    (19, 2019, 2019),
    (20, 2019, 2020),
    (21, 2021, 2021),
    (22, 2022, 2022),
    (23, 2023, 2023),
    (24, 2024, 2024),
    (25, 2025, 2025),
];

/// Leading digit of 7-digit serials -> production years.
static SEVEN_DIGIT_SERIES: &[(u32, i32, i32)] = &[
    (0, 1986, 1988),
    (1, 1989, 1991),
    (2, 1991, 1993),
    (3, 1993, 1994),
    (4, 1994, 1995),
    (5, 1995, 1995),
    (6, 1996, 1996),
    (7, 1997, 1999),
    (8, 2000, 2002),
    (9, 2003, 2005),
];

fn lookup(table: &[(u32, i32, i32)], prefix: u32) -> Option<ProductionWindow> {
    table
        .iter()
        .find(|(p, _, _)| *p == prefix)
        .map(|(_, start, end)| ProductionWindow::new(*start, *end))
}

pub(crate) fn decode(code: &str) -> Result<Candidate, Miss> {
    let digits: String = code.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return Err(Miss::new(
            "Enter the Chanel serial number (7 or 8 digits, from the authenticity card or hologram sticker).",
        ));
    }

    let mut candidate = match digits.len() {
        8 => eight_digit(&digits),
        7 => seven_digit(&digits),
        n => {
            return Err(Miss::new(format!(
                "Chanel serials have 7 or 8 digits; found {}. Check the sticker and try again.",
                n
            )))
        }
    }
    .ok_or_else(|| {
        Miss::new(format!(
            "The prefix of serial {} is not in the known Chanel series.",
            digits
        ))
    })?;

    if digits.len() != code.len() {
        candidate.note = Some("Non-digit characters were ignored.".to_string());
    }
    Ok(candidate)
}

fn eight_digit(digits: &str) -> Option<Candidate> {
    let prefix: u32 = digits.get(..2)?.parse().ok()?;
    let window = lookup(EIGHT_DIGIT_SERIES, prefix)?;
    Some(series_candidate(
        "chanel_8_digit",
        &format!("Prefix {:02}", prefix),
        window,
        EIGHT_DIGIT_EXACT_CONFIDENCE,
        EIGHT_DIGIT_WINDOW_CONFIDENCE,
    ))
}

fn seven_digit(digits: &str) -> Option<Candidate> {
    let prefix: u32 = digits.get(..1)?.parse().ok()?;
    let window = lookup(SEVEN_DIGIT_SERIES, prefix)?;
    Some(series_candidate(
        "chanel_7_digit",
        &format!("Leading digit {}", prefix),
        window,
        SEVEN_DIGIT_EXACT_CONFIDENCE,
        SEVEN_DIGIT_WINDOW_CONFIDENCE,
    ))
}

fn series_candidate(
    format: &'static str,
    prefix_label: &str,
    window: ProductionWindow,
    exact_confidence: f64,
    window_confidence: f64,
) -> Candidate {
    if window.is_single_year() {
        let year = window.start_year;
        return Candidate {
            format,
            precision: DatePrecision::ExactYear,
            confidence: exact_confidence,
            year: Some(year),
            period: None,
            window: Some(window),
            message: format!("Produced in {}.", year),
            note: None,
            rationale: vec![format!("{} belongs to the {} series.", prefix_label, year)],
            uncertainties: Vec::new(),
        };
    }

    Candidate {
        format,
        precision: DatePrecision::YearWindow,
        confidence: window_confidence,
        year: None,
        period: None,
        window: Some(window),
        message: format!(
            "Produced between {} and {}.",
            window.start_year, window.end_year
        ),
        note: None,
        rationale: vec![format!(
            "{} belongs to the series issued {}-{}.",
            prefix_label, window.start_year, window.end_year
        )],
        uncertainties: vec![format!(
            "This series ran across {} years; the serial alone cannot narrow it further.",
            window.end_year - window.start_year + 1
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_digit_exact_year() {
        let c = decode("25123456").unwrap();
        assert_eq!(c.year, Some(2025));
        assert_eq!(c.precision, DatePrecision::ExactYear);
        assert!((c.confidence - 0.88).abs() < 1e-9);
        assert!(c.uncertainties.is_empty());
    }

    #[test]
    fn test_eight_digit_window() {
        let c = decode("11223344").unwrap();
        assert_eq!(c.year, None);
        assert_eq!(c.window, Some(ProductionWindow::new(2011, 2012)));
        assert_eq!(c.precision, DatePrecision::YearWindow);
        assert!((c.confidence - 0.8).abs() < 1e-9);
        assert_eq!(c.uncertainties.len(), 1);
    }

    #[test]
    fn test_seven_digit_series() {
        let c = decode("6123456").unwrap();
        assert_eq!(c.year, Some(1996));
        assert!((c.confidence - 0.84).abs() < 1e-9);

        let c = decode("0123456").unwrap();
        assert_eq!(c.window, Some(ProductionWindow::new(1986, 1988)));
        assert!((c.confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_non_digits_are_ignored_with_note() {
        let c = decode("NO.6123456").unwrap();
        assert_eq!(c.year, Some(1996));
        assert!(c.note.is_some());
    }

    #[test]
    fn test_unusable_serials() {
        assert!(decode("").unwrap_err().message.contains("Enter"));
        assert!(decode("12345").unwrap_err().message.contains("7 or 8 digits"));
        assert!(decode("99123456").is_err());
    }
}

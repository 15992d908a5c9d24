use chrono::Datelike;

use crate::domain::model::{AdjustmentBreakdown, DecodeResult, PricingGuidance};

/// Share of a sell-side price that is consumption tax (23%).
pub const RESALE_VAT_FACTOR: f64 = 1.23;

/// Buy-side ceiling as a share of net worth, i.e. a 20% margin.
pub const TARGET_BUY_FACTOR: f64 = 0.8;

/// Percentage points of discount at zero decoder confidence.
pub const MAX_CONFIDENCE_PENALTY_PCT: f64 = 12.0;

/// Step discount by age in whole years.
pub fn age_adjustment_pct(age_years: i32) -> f64 {
    match age_years {
        i32::MIN..=2 => 0.0,
        3..=5 => -3.0,
        6..=10 => -7.0,
        11..=15 => -12.0,
        16..=20 => -18.0,
        _ => -25.0,
    }
}

pub fn confidence_penalty_pct(confidence: f64) -> f64 {
    let confidence = if confidence.is_finite() {
        confidence
    } else {
        0.0
    };
    ((1.0 - confidence) * MAX_CONFIDENCE_PENALTY_PCT).clamp(0.0, MAX_CONFIDENCE_PENALTY_PCT)
}

fn current_calendar_year() -> i32 {
    chrono::Local::now().year()
}

/// Adjusts a market average for the item's age and for how sure the decoder
/// was about it. `current_year` defaults to the local calendar year.
pub fn calculate_serial_pricing_guidance(
    market_average_eur: f64,
    decode: &DecodeResult,
    current_year: Option<i32>,
) -> PricingGuidance {
    let current_year = current_year.unwrap_or_else(current_calendar_year);
    let anchor_year = decode.anchor_year();

    let age_years = anchor_year
        .map(|anchor| current_year.saturating_sub(anchor).max(0))
        .unwrap_or(0);
    let age_pct = if anchor_year.is_some() {
        age_adjustment_pct(age_years)
    } else {
        0.0
    };
    let penalty_pct = confidence_penalty_pct(decode.confidence);
    let total_pct = age_pct - penalty_pct;

    let estimated_worth_eur = (market_average_eur * (1.0 + total_pct / 100.0))
        .round()
        .max(0.0);
    let recommended_max_pay_eur = (estimated_worth_eur / RESALE_VAT_FACTOR * TARGET_BUY_FACTOR)
        .round()
        .max(0.0);

    let summary = match anchor_year {
        None => format!(
            "No reliable production year; worth is the market average less a {:.1}% confidence discount.",
            penalty_pct
        ),
        Some(anchor) => format!(
            "About {} years old (anchored on {}): {:.0}% for age and -{:.1}% for decode confidence.",
            age_years, anchor, age_pct, penalty_pct
        ),
    };

    tracing::debug!(
        "Serial guidance: market {:.0} -> worth {:.0}, max pay {:.0} ({:+.1}%)",
        market_average_eur,
        estimated_worth_eur,
        recommended_max_pay_eur,
        total_pct
    );

    PricingGuidance {
        market_average_eur,
        estimated_worth_eur,
        recommended_max_pay_eur,
        anchor_year,
        adjustment: AdjustmentBreakdown {
            age_years,
            age_adjustment_pct: age_pct,
            confidence_penalty_pct: penalty_pct,
            total_adjustment_pct: total_pct,
        },
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Brand, ProductionWindow};

    #[test]
    fn test_age_steps() {
        let cases = [
            (0, 0.0),
            (2, 0.0),
            (3, -3.0),
            (5, -3.0),
            (6, -7.0),
            (10, -7.0),
            (11, -12.0),
            (15, -12.0),
            (16, -18.0),
            (20, -18.0),
            (21, -25.0),
            (60, -25.0),
        ];
        for (age, expected) in cases {
            assert_eq!(age_adjustment_pct(age), expected, "age {}", age);
        }
    }

    #[test]
    fn test_confidence_penalty_bounds() {
        assert_eq!(confidence_penalty_pct(1.0), 0.0);
        assert_eq!(confidence_penalty_pct(0.0), 12.0);
        assert_eq!(confidence_penalty_pct(1.5), 0.0);
        assert_eq!(confidence_penalty_pct(-1.0), 12.0);
        assert_eq!(confidence_penalty_pct(f64::NAN), 12.0);
        assert!((confidence_penalty_pct(0.9) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_future_anchor_counts_as_new() {
        let mut decode = DecodeResult::failure(Brand::Chanel, "x", "");
        decode.year = Some(2030);
        decode.confidence = 1.0;

        let guidance = calculate_serial_pricing_guidance(1000.0, &decode, Some(2026));
        assert_eq!(guidance.adjustment.age_years, 0);
        assert_eq!(guidance.estimated_worth_eur, 1000.0);
        // 1000 / 1.23 * 0.8 = 650.4
        assert_eq!(guidance.recommended_max_pay_eur, 650.0);
    }

    #[test]
    fn test_negative_market_average_floors_at_zero() {
        let decode = DecodeResult::failure(Brand::Gucci, "x", "");
        let guidance = calculate_serial_pricing_guidance(-500.0, &decode, Some(2026));
        assert_eq!(guidance.estimated_worth_eur, 0.0);
        assert_eq!(guidance.recommended_max_pay_eur, 0.0);
    }

    #[test]
    fn test_extreme_fallback_years_do_not_overflow() {
        let mut decode = DecodeResult::failure(Brand::Gucci, "x", "");
        decode.year = Some(i32::MIN);
        decode.confidence = 1.0;
        let guidance = calculate_serial_pricing_guidance(1000.0, &decode, Some(2026));
        assert_eq!(guidance.adjustment.age_years, i32::MAX);
        assert_eq!(guidance.adjustment.age_adjustment_pct, -25.0);
        assert_eq!(guidance.estimated_worth_eur, 750.0);

        let mut decode = DecodeResult::failure(Brand::Gucci, "x", "");
        decode.production_window = Some(ProductionWindow::new(i32::MAX, i32::MAX));
        decode.confidence = 1.0;
        let guidance = calculate_serial_pricing_guidance(1000.0, &decode, Some(2026));
        assert_eq!(guidance.anchor_year, Some(i32::MAX));
        assert_eq!(guidance.adjustment.age_years, 0);
        assert_eq!(guidance.estimated_worth_eur, 1000.0);
    }
}

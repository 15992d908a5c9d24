use luxe_valuation::{
    calculate_serial_pricing_guidance, Brand, DatePrecision, DecodeResult, ProductionWindow,
};

fn decoded(year: Option<i32>, window: Option<ProductionWindow>, confidence: f64) -> DecodeResult {
    let mut result = DecodeResult::failure(Brand::Chanel, "TEST", "");
    result.success = year.is_some() || window.is_some();
    result.year = year;
    result.production_window = window;
    result.confidence = confidence;
    result.precision = match (year, window) {
        (Some(_), _) => DatePrecision::ExactYear,
        (None, Some(_)) => DatePrecision::YearWindow,
        (None, None) => DatePrecision::Unknown,
    };
    result
}

#[test]
fn test_exact_year_eleven_years_old() {
    let decode = decoded(Some(2015), None, 0.9);
    let guidance = calculate_serial_pricing_guidance(3000.0, &decode, Some(2026));

    assert_eq!(guidance.anchor_year, Some(2015));
    assert_eq!(guidance.adjustment.age_years, 11);
    assert_eq!(guidance.adjustment.age_adjustment_pct, -12.0);
    assert!((guidance.adjustment.confidence_penalty_pct - 1.2).abs() < 1e-9);
    assert!((guidance.adjustment.total_adjustment_pct + 13.2).abs() < 1e-9);
    assert_eq!(guidance.estimated_worth_eur, 2604.0);
    assert_eq!(guidance.recommended_max_pay_eur, 1694.0);
    assert!(guidance.summary.contains("2015"));
}

#[test]
fn test_window_anchors_on_midpoint() {
    let decode = decoded(None, Some(ProductionWindow::new(2018, 2020)), 0.7);
    let guidance = calculate_serial_pricing_guidance(3000.0, &decode, Some(2026));

    assert_eq!(guidance.anchor_year, Some(2019));
    assert_eq!(guidance.adjustment.age_years, 7);
    assert_eq!(guidance.adjustment.age_adjustment_pct, -7.0);
    assert!((guidance.adjustment.confidence_penalty_pct - 3.6).abs() < 1e-9);
    // 3000 * (1 - 0.106) = 2682
    assert_eq!(guidance.estimated_worth_eur, 2682.0);
}

#[test]
fn test_no_year_only_confidence_discount() {
    let decode = decoded(None, None, 0.4);
    let guidance = calculate_serial_pricing_guidance(3000.0, &decode, Some(2026));

    assert_eq!(guidance.anchor_year, None);
    assert_eq!(guidance.adjustment.age_years, 0);
    assert_eq!(guidance.adjustment.age_adjustment_pct, 0.0);
    assert!((guidance.adjustment.confidence_penalty_pct - 7.2).abs() < 1e-9);
    assert!(guidance
        .summary
        .to_lowercase()
        .contains("no reliable production year"));
}

#[test]
fn test_future_year_is_not_negative_age() {
    let decode = decoded(Some(2030), None, 1.0);
    let guidance = calculate_serial_pricing_guidance(1000.0, &decode, Some(2026));

    assert_eq!(guidance.adjustment.age_years, 0);
    assert_eq!(guidance.estimated_worth_eur, 1000.0);
}

#[test]
fn test_outputs_never_negative() {
    let decode = decoded(Some(1985), None, 0.0);
    let guidance = calculate_serial_pricing_guidance(-500.0, &decode, Some(2026));

    assert_eq!(guidance.estimated_worth_eur, 0.0);
    assert_eq!(guidance.recommended_max_pay_eur, 0.0);
}

#[test]
fn test_guidance_wire_shape() {
    let decode = decoded(Some(2015), None, 0.9);
    let guidance = calculate_serial_pricing_guidance(3000.0, &decode, Some(2026));
    let json = serde_json::to_value(&guidance).unwrap();

    assert_eq!(json["estimatedWorthEur"], 2604.0);
    assert_eq!(json["adjustment"]["ageYears"], 11);
}

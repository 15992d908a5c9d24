use luxe_valuation::{derive_sourcing_decision, ConstraintSource, Tone};

#[test]
fn test_no_inputs_is_neutral() {
    let decision = derive_sourcing_decision(None, None, None);

    assert_eq!(decision.tone, Tone::Neutral);
    assert_eq!(decision.recommended_max_pay, None);
    assert_eq!(decision.constrained_by, ConstraintSource::None);
    assert!(!decision.summary.is_empty());
}

#[test]
fn test_price_check_only() {
    let decision = derive_sourcing_decision(Some(3200.0), None, None);

    assert_eq!(decision.tone, Tone::Good);
    assert_eq!(decision.recommended_max_pay, Some(3200.0));
    assert_eq!(decision.constrained_by, ConstraintSource::PriceCheck);
}

#[test]
fn test_serial_only_is_caution() {
    let decision = derive_sourcing_decision(None, None, Some(1800.0));

    assert_eq!(decision.tone, Tone::Caution);
    assert_eq!(decision.recommended_max_pay, Some(1800.0));
    assert_eq!(decision.constrained_by, ConstraintSource::SerialCheck);
}

#[test]
fn test_serial_moderately_below_bid() {
    let decision = derive_sourcing_decision(Some(3200.0), None, Some(2400.0));

    assert_eq!(decision.tone, Tone::Caution);
    assert_eq!(decision.recommended_max_pay, Some(2400.0));
    assert_eq!(decision.constrained_by, ConstraintSource::SerialCheck);
}

#[test]
fn test_serial_far_below_bid_stops() {
    let decision = derive_sourcing_decision(Some(3200.0), None, Some(1500.0));

    assert_eq!(decision.tone, Tone::Stop);
    assert_eq!(decision.recommended_max_pay, Some(1500.0));
    assert_eq!(decision.constrained_by, ConstraintSource::SerialCheck);
}

#[test]
fn test_aligned_signals_are_good() {
    let decision = derive_sourcing_decision(Some(3000.0), Some(2500.0), Some(2900.0));

    assert_eq!(decision.tone, Tone::Good);
    assert_eq!(decision.recommended_max_pay, Some(2900.0));
    assert!(decision.notes.iter().any(|n| n.contains("2500")));
}

#[test]
fn test_serial_above_bid_keeps_price_check() {
    let decision = derive_sourcing_decision(Some(2000.0), None, Some(2600.0));

    assert_eq!(decision.tone, Tone::Good);
    assert_eq!(decision.recommended_max_pay, Some(2000.0));
    assert_eq!(decision.constrained_by, ConstraintSource::PriceCheck);
}

#[test]
fn test_unusable_amounts_are_ignored() {
    for bad in [f64::NAN, f64::INFINITY, 0.0, -100.0] {
        let decision = derive_sourcing_decision(Some(bad), Some(bad), Some(bad));
        assert_eq!(decision.tone, Tone::Neutral);
        assert_eq!(decision.recommended_max_pay, None);
    }
}

#[test]
fn test_decision_wire_shape() {
    let decision = derive_sourcing_decision(Some(3200.0), None, Some(1500.0));
    let json = serde_json::to_value(&decision).unwrap();

    assert_eq!(json["tone"], "stop");
    assert_eq!(json["constrainedBy"], "serial-check");
}

use crate::domain::model::{ConstraintSource, SourcingDecision, Tone};

/// Combined/max-bid ratio below which serial context vetoes the buy.
pub const STOP_RATIO: f64 = 0.55;

/// Combined/max-bid ratio from which both signals count as aligned.
pub const ALIGNED_RATIO: f64 = 0.85;

/// Only finite, strictly positive amounts count as a signal.
fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Fuses the price-check ceiling (`max_bid`) with the serial-derived ceiling
/// into one recommendation. `max_buy` is surfaced as a note only.
pub fn derive_sourcing_decision(
    max_bid: Option<f64>,
    max_buy: Option<f64>,
    serial_max_pay: Option<f64>,
) -> SourcingDecision {
    let max_bid = usable(max_bid);
    let max_buy = usable(max_buy);
    let serial_max_pay = usable(serial_max_pay);

    let decision = match (max_bid, serial_max_pay) {
        (None, None) => SourcingDecision {
            tone: Tone::Neutral,
            recommended_max_pay: None,
            constrained_by: ConstraintSource::None,
            summary: "Not enough pricing data yet. Run a price check or decode the serial."
                .to_string(),
            notes: Vec::new(),
        },
        (Some(bid), None) => {
            let mut notes = Vec::new();
            if let Some(buy) = max_buy {
                notes.push(format!(
                    "Max buy price in the seller's currency: {:.0}.",
                    buy
                ));
            }
            notes.push("Decode the serial to check the price against the item's age.".to_string());
            SourcingDecision {
                tone: Tone::Good,
                recommended_max_pay: Some(bid),
                constrained_by: ConstraintSource::PriceCheck,
                summary: format!("Price check supports paying up to €{:.0}.", bid),
                notes,
            }
        }
        (None, Some(serial)) => SourcingDecision {
            tone: Tone::Caution,
            recommended_max_pay: Some(serial),
            constrained_by: ConstraintSource::SerialCheck,
            summary: format!(
                "Serial context alone suggests at most €{:.0}.",
                serial
            ),
            notes: vec![
                "Run a market price check before committing; this ceiling has no live comparables behind it."
                    .to_string(),
            ],
        },
        (Some(bid), Some(serial)) => fuse(bid, serial, max_buy),
    };

    tracing::debug!(
        "Sourcing decision {:?} at {:?} (constrained by {:?})",
        decision.tone,
        decision.recommended_max_pay,
        decision.constrained_by
    );
    decision
}

fn fuse(bid: f64, serial: f64, max_buy: Option<f64>) -> SourcingDecision {
    let (combined, constrained_by) = if serial < bid {
        (serial, ConstraintSource::SerialCheck)
    } else {
        (bid, ConstraintSource::PriceCheck)
    };
    let ratio = combined / bid;

    let (tone, summary) = if ratio < STOP_RATIO {
        (
            Tone::Stop,
            format!(
                "Serial context cuts the safe range to €{:.0}, {:.0}% of the price-check bid. Walk away unless the seller moves a lot.",
                combined,
                ratio * 100.0
            ),
        )
    } else if ratio < ALIGNED_RATIO {
        (
            Tone::Caution,
            format!(
                "Signals disagree; use the tighter ceiling of €{:.0}.",
                combined
            ),
        )
    } else {
        (
            Tone::Good,
            format!("Price check and serial context agree; pay up to €{:.0}.", combined),
        )
    };

    let mut notes = vec![
        format!("Price-check max bid: €{:.0}.", bid),
        format!("Serial-adjusted max pay: €{:.0}.", serial),
    ];
    if let Some(buy) = max_buy {
        notes.push(format!(
            "Max buy price in the seller's currency: {:.0}.",
            buy
        ));
    }

    SourcingDecision {
        tone,
        recommended_max_pay: Some(combined),
        constrained_by,
        summary,
        notes,
    }
}

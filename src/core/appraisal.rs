use serde::{Deserialize, Serialize};

use crate::core::decision::derive_sourcing_decision;
use crate::core::landed_cost::rate_to_eur;
use crate::core::max_buy::calculate_max_buy_price;
use crate::core::serial::decode_with_fallback;
use crate::core::valuation::calculate_serial_pricing_guidance;
use crate::domain::model::{
    Brand, CostParameters, DecodeResult, MaxBuyInput, PricingGuidance, SourcingDecision,
};
use crate::domain::ports::SerialDecodeFallback;

/// Everything known about a candidate purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppraisalRequest {
    pub brand: Brand,
    pub serial: String,
    /// Average selling price of comparables, from market research.
    #[serde(default)]
    pub market_average_eur: Option<f64>,
    /// Explicit price-check ceiling; otherwise derived from `costs`.
    #[serde(default)]
    pub max_bid_eur: Option<f64>,
    #[serde(default)]
    pub costs: Option<CostParameters>,
    #[serde(default)]
    pub desired_margin_pct: f64,
    #[serde(default)]
    pub current_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appraisal {
    pub decode: DecodeResult,
    pub guidance: Option<PricingGuidance>,
    /// Solved ceiling in the seller's currency; may be `<= 0`.
    pub max_buy_price: Option<f64>,
    pub max_bid_eur: Option<f64>,
    pub decision: SourcingDecision,
}

/// Runs the whole chain for one item: decode (escalating to `fallback` when
/// the rules are unsure), serial-adjusted valuation, max-buy solve with the
/// market average as target sell price, then decision fusion.
pub fn appraise(
    request: &AppraisalRequest,
    fallback: Option<&dyn SerialDecodeFallback>,
) -> Appraisal {
    let decode = decode_with_fallback(&request.serial, request.brand, fallback);

    let market_average = request
        .market_average_eur
        .filter(|v| v.is_finite() && *v > 0.0);

    let guidance = market_average
        .map(|avg| calculate_serial_pricing_guidance(avg, &decode, request.current_year));

    let max_buy_price = market_average.zip(request.costs.as_ref()).map(|(avg, costs)| {
        calculate_max_buy_price(&MaxBuyInput {
            target_sell_price_eur: avg,
            desired_margin_pct: request.desired_margin_pct,
            costs: costs.clone(),
        })
    });

    let max_bid_eur = request.max_bid_eur.or_else(|| {
        let costs = request.costs.as_ref()?;
        let native = max_buy_price?;
        Some(native * rate_to_eur(costs.currency, costs.rates.as_ref()))
    });

    let decision = derive_sourcing_decision(
        max_bid_eur,
        max_buy_price,
        guidance.as_ref().map(|g| g.recommended_max_pay_eur),
    );

    tracing::info!(
        "Appraised {} '{}': {:?}, max pay {:?}",
        request.brand,
        decode.serial,
        decision.tone,
        decision.recommended_max_pay
    );

    Appraisal {
        decode,
        guidance,
        max_buy_price,
        max_bid_eur,
        decision,
    }
}

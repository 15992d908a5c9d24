use crate::domain::model::{CostParameters, Currency, LandedCostInput, LandedCostOutput, RateTable};

/// EUR per one unit of `currency`. A missing or unusable rate yields 0 so
/// downstream figures collapse to zero instead of failing.
pub fn rate_to_eur(currency: Currency, rates: Option<&RateTable>) -> f64 {
    if currency == Currency::Eur {
        return 1.0;
    }

    match rates.and_then(|table| table.get(currency)) {
        Some(units_per_eur) if units_per_eur.is_finite() && units_per_eur > 0.0 => {
            1.0 / units_per_eur
        }
        _ => {
            tracing::warn!("No usable {} rate, EUR figures will be zero", currency);
            0.0
        }
    }
}

/// Forward transform from a native-currency price to a landed EUR cost.
///
/// VAT is levied on CIF plus duty. Proportional fees apply to the native base
/// price and are converted together with the fixed fee. Inputs are expected to
/// be sanitized already; no range checks happen here.
pub fn calculate_landed_cost(input: &LandedCostInput) -> LandedCostOutput {
    let costs: &CostParameters = &input.costs;
    let rate = rate_to_eur(costs.currency, costs.rates.as_ref());

    let item_cost_eur = input.base_price * rate;
    let shipping_eur = costs.shipping * rate;
    let insurance_eur = costs.insurance * rate;

    let fee_pct = (costs.platform_fee_pct + costs.payment_fee_pct) / 100.0;
    let fees_native = input.base_price * fee_pct + costs.fixed_fee;
    let fees_eur = fees_native * rate;

    let cif_eur = item_cost_eur + shipping_eur + insurance_eur;
    let duty_eur = cif_eur * (costs.customs_pct / 100.0);
    let vat_eur = (cif_eur + duty_eur) * (costs.import_vat_pct / 100.0);
    let total_landed_eur = cif_eur + duty_eur + vat_eur + fees_eur;

    let margin_eur = input
        .target_sell_price_eur
        .map(|sell| sell - total_landed_eur);
    let margin_pct = input
        .target_sell_price_eur
        .zip(margin_eur)
        .filter(|(sell, _)| *sell != 0.0)
        .map(|(sell, margin)| margin / sell * 100.0);

    tracing::debug!(
        "Landed cost {:.2} EUR (cif {:.2}, duty {:.2}, vat {:.2}, fees {:.2})",
        total_landed_eur,
        cif_eur,
        duty_eur,
        vat_eur,
        fees_eur
    );

    LandedCostOutput {
        rate_to_eur: rate,
        item_cost_eur,
        shipping_eur,
        insurance_eur,
        cif_eur,
        duty_eur,
        vat_eur,
        fees_eur,
        total_landed_eur,
        margin_eur,
        margin_pct,
    }
}

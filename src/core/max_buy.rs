use crate::core::landed_cost::rate_to_eur;
use crate::domain::model::MaxBuyInput;

/// Closed-form inverse of [`calculate_landed_cost`](crate::core::landed_cost::calculate_landed_cost).
///
/// Returns the highest native-currency base price whose landed cost leaves
/// `desired_margin_pct` of the target sell price. The result is not clamped:
/// a value `<= 0` means no purchase price satisfies the constraints. An
/// unknown currency rate returns exactly `0.0`.
pub fn calculate_max_buy_price(input: &MaxBuyInput) -> f64 {
    let costs = &input.costs;
    let rate = rate_to_eur(costs.currency, costs.rates.as_ref());
    if rate == 0.0 {
        return 0.0;
    }

    let duty = costs.customs_pct / 100.0;
    let vat = costs.import_vat_pct / 100.0;
    let fee_pct = (costs.platform_fee_pct + costs.payment_fee_pct) / 100.0;
    let k = (1.0 + duty) * (1.0 + vat);

    let target_landed_eur = input.target_sell_price_eur * (1.0 - input.desired_margin_pct / 100.0);
    let base_price = (target_landed_eur / rate
        - (costs.shipping + costs.insurance) * k
        - costs.fixed_fee)
        / (k + fee_pct);

    if base_price <= 0.0 {
        tracing::warn!(
            "No viable purchase price: {:.0}% margin on {:.2} EUR is unreachable",
            input.desired_margin_pct,
            input.target_sell_price_eur
        );
    } else {
        tracing::debug!(
            "Max buy price {:.2} {} for {:.2} EUR at {:.0}% margin",
            base_price,
            costs.currency,
            input.target_sell_price_eur,
            input.desired_margin_pct
        );
    }

    base_price
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CostParameters, Currency};

    #[test]
    fn test_eur_without_costs_is_margin_only() {
        let input = MaxBuyInput {
            target_sell_price_eur: 1000.0,
            desired_margin_pct: 25.0,
            costs: CostParameters::default(),
        };
        assert!((calculate_max_buy_price(&input) - 750.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_rate_returns_zero() {
        let input = MaxBuyInput {
            target_sell_price_eur: 5000.0,
            desired_margin_pct: 20.0,
            costs: CostParameters {
                currency: Currency::Jpy,
                ..CostParameters::default()
            },
        };
        assert_eq!(calculate_max_buy_price(&input), 0.0);
    }

    #[test]
    fn test_unreachable_margin_is_not_clamped() {
        let input = MaxBuyInput {
            target_sell_price_eur: 100.0,
            desired_margin_pct: 30.0,
            costs: CostParameters {
                shipping: 150.0,
                import_vat_pct: 23.0,
                ..CostParameters::default()
            },
        };
        assert!(calculate_max_buy_price(&input) < 0.0);
    }
}

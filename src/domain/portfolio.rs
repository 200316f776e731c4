//! Portfolio valuation over a set of holdings.

use super::holding::Holding;

/// Value-and-cost roll-up of a portfolio at current prices.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Valuation {
    pub total_value: f64,
    pub total_cost: f64,
    pub total_profit_loss: f64,
    /// Percent of total cost; 0 when cost is 0.
    pub total_profit_loss_pct: f64,
    /// Value-weighted latest session change, as a fraction.
    pub daily_return: f64,
}

impl Valuation {
    pub fn of(holdings: &[Holding]) -> Self {
        let total_value = total_value(holdings);
        let total_cost: f64 = holdings.iter().map(Holding::total_cost).sum();
        let total_profit_loss = total_value - total_cost;
        let total_profit_loss_pct = if total_cost > 0.0 {
            total_profit_loss / total_cost * 100.0
        } else {
            0.0
        };
        let daily_return = value_weights(holdings)
            .map(|(h, w)| w * h.daily_change_pct / 100.0)
            .sum();

        Valuation {
            total_value,
            total_cost,
            total_profit_loss,
            total_profit_loss_pct,
            daily_return,
        }
    }
}

pub fn total_value(holdings: &[Holding]) -> f64 {
    holdings.iter().map(Holding::current_value).sum()
}

/// Each holding paired with its share of total value. Yields nothing when
/// the portfolio has no value.
pub fn value_weights(holdings: &[Holding]) -> impl Iterator<Item = (&Holding, f64)> {
    let total = total_value(holdings);
    holdings
        .iter()
        .filter(move |_| total > 0.0)
        .map(move |h| (h, h.current_value() / total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Holding> {
        vec![
            Holding::new("THYAO", 100, 200.0, 250.0).with_daily_change(2.0),
            Holding::new("GARAN", 500, 60.0, 50.0).with_daily_change(-1.0),
        ]
    }

    #[test]
    fn totals() {
        let v = Valuation::of(&sample());
        assert!((v.total_value - 50_000.0).abs() < 1e-9);
        assert!((v.total_cost - 50_000.0).abs() < 1e-9);
        assert!(v.total_profit_loss.abs() < 1e-9);
        assert!(v.total_profit_loss_pct.abs() < 1e-9);
    }

    #[test]
    fn total_value_is_sum_of_current_values() {
        let holdings = sample();
        let expected: f64 = holdings.iter().map(|h| h.current_value()).sum();
        assert_eq!(total_value(&holdings), expected);
    }

    #[test]
    fn daily_return_is_value_weighted() {
        // equal weights: 0.5 * 0.02 + 0.5 * -0.01
        let v = Valuation::of(&sample());
        assert!((v.daily_return - 0.005).abs() < 1e-12);
    }

    #[test]
    fn weights_sum_to_one() {
        let sum: f64 = value_weights(&sample()).map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_valuation_is_zero() {
        assert_eq!(Valuation::of(&[]), Valuation::default());
        assert_eq!(value_weights(&[]).count(), 0);
    }

    #[test]
    fn zero_value_portfolio_has_no_weights() {
        let holdings = vec![Holding::new("X", 10, 1.0, 0.0)];
        assert_eq!(value_weights(&holdings).count(), 0);
        assert_eq!(Valuation::of(&holdings).daily_return, 0.0);
    }
}

//! A position held in a portfolio.

use super::error::AnalyticsError;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Holding {
    pub instrument: String,
    pub quantity: i64,
    pub average_cost: f64,
    pub current_price: f64,
    /// Latest session change of the instrument, in percent.
    pub daily_change_pct: f64,
}

impl Holding {
    pub fn new(
        instrument: impl Into<String>,
        quantity: i64,
        average_cost: f64,
        current_price: f64,
    ) -> Self {
        Holding {
            instrument: instrument.into(),
            quantity,
            average_cost,
            current_price,
            daily_change_pct: 0.0,
        }
    }

    pub fn with_daily_change(mut self, pct: f64) -> Self {
        self.daily_change_pct = pct;
        self
    }

    pub fn total_cost(&self) -> f64 {
        self.quantity as f64 * self.average_cost
    }

    pub fn current_value(&self) -> f64 {
        self.value_at(self.current_price)
    }

    pub fn value_at(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    pub fn profit_loss(&self) -> f64 {
        self.current_value() - self.total_cost()
    }

    /// Profit or loss as a percentage of cost; 0 when cost is 0.
    pub fn profit_loss_pct(&self) -> f64 {
        let cost = self.total_cost();
        if cost > 0.0 {
            self.profit_loss() / cost * 100.0
        } else {
            0.0
        }
    }

    /// Positive quantity and cost, non-negative price, all finite.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        let reason = if self.quantity <= 0 {
            "quantity must be positive"
        } else if !(self.average_cost.is_finite() && self.average_cost > 0.0) {
            "average cost must be a positive number"
        } else if !(self.current_price.is_finite() && self.current_price >= 0.0) {
            "current price must be a non-negative number"
        } else if !self.daily_change_pct.is_finite() {
            "daily change must be a number"
        } else {
            return Ok(());
        };
        Err(AnalyticsError::Data {
            reason: format!("invalid holding {}: {}", self.instrument, reason),
        })
    }
}

pub fn validate_holdings(holdings: &[Holding]) -> Result<(), AnalyticsError> {
    holdings.iter().try_for_each(Holding::validate)
}

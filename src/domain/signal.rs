//! Trading signals and their aggregation across indicators.

use std::collections::BTreeMap;
use std::fmt;

use super::indicator::IndicatorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Signal {
    Buy,
    Sell,
    Neutral,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Neutral => "NEUTRAL",
        }
    }

    /// Overbought above `upper` is a sell, oversold below `lower` is a buy.
    pub fn from_oscillator(value: f64, lower: f64, upper: f64) -> Self {
        if value > upper {
            Signal::Sell
        } else if value < lower {
            Signal::Buy
        } else {
            Signal::Neutral
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SignalSummary {
    pub individual: BTreeMap<IndicatorKind, Signal>,
    pub buy_count: usize,
    pub sell_count: usize,
    pub neutral_count: usize,
    pub overall: Signal,
    pub strength: f64,
}

impl SignalSummary {
    pub fn from_signals<I>(signals: I) -> Self
    where
        I: IntoIterator<Item = (IndicatorKind, Signal)>,
    {
        let individual: BTreeMap<IndicatorKind, Signal> = signals.into_iter().collect();

        let mut buy_count = 0;
        let mut sell_count = 0;
        let mut neutral_count = 0;
        for signal in individual.values() {
            match signal {
                Signal::Buy => buy_count += 1,
                Signal::Sell => sell_count += 1,
                Signal::Neutral => neutral_count += 1,
            }
        }

        let overall = if buy_count > sell_count {
            Signal::Buy
        } else if sell_count > buy_count {
            Signal::Sell
        } else {
            Signal::Neutral
        };

        let total = buy_count + sell_count + neutral_count;
        let strength = if total > 0 {
            buy_count.max(sell_count) as f64 / total as f64
        } else {
            0.0
        };

        SignalSummary {
            individual,
            buy_count,
            sell_count,
            neutral_count,
            overall,
            strength,
        }
    }

    pub fn total(&self) -> usize {
        self.buy_count + self.sell_count + self.neutral_count
    }
}

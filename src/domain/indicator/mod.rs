//! Technical indicator implementations.
//!
//! This module provides types for representing indicator results:
//! - `IndicatorKind`: Which indicator, independent of parameters
//! - `IndicatorConfig`: Indicator identity + typed parameters
//! - `IndicatorOutput`: The value sequences, one shape per indicator family
//! - `IndicatorValue`: A single point of an output (used for "current")
//! - `IndicatorResult`: Output aligned with dates, plus the derived signal

pub mod bollinger;
pub mod cci;
pub mod ema;
pub mod engine;
pub mod macd;
pub mod params;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod williams_r;

pub use engine::{
    IndicatorPanel, TechnicalAnalysis, analyze_instrument, calculate, calculate_all_indicators,
    calculate_indicator,
};

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::AnalyticsError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
    Bollinger,
    Stochastic,
    WilliamsR,
    Cci,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 8] = [
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::Bollinger,
        IndicatorKind::Stochastic,
        IndicatorKind::WilliamsR,
        IndicatorKind::Cci,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Ema => "EMA",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::Bollinger => "BOLLINGER",
            IndicatorKind::Stochastic => "STOCHASTIC",
            IndicatorKind::WilliamsR => "WILLIAMS_R",
            IndicatorKind::Cci => "CCI",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndicatorKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        IndicatorKind::ALL
            .into_iter()
            .find(|k| k.name() == upper)
            .ok_or_else(|| AnalyticsError::UnsupportedIndicator {
                name: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum IndicatorConfig {
    Sma { period: usize },
    Ema { period: usize },
    Rsi { period: usize },
    Macd { fast: usize, slow: usize, signal: usize },
    Bollinger { period: usize, stddev_mult: f64 },
    Stochastic { k_period: usize, d_period: usize },
    WilliamsR { period: usize },
    Cci { period: usize },
}

impl IndicatorConfig {
    pub fn kind(&self) -> IndicatorKind {
        match self {
            IndicatorConfig::Sma { .. } => IndicatorKind::Sma,
            IndicatorConfig::Ema { .. } => IndicatorKind::Ema,
            IndicatorConfig::Rsi { .. } => IndicatorKind::Rsi,
            IndicatorConfig::Macd { .. } => IndicatorKind::Macd,
            IndicatorConfig::Bollinger { .. } => IndicatorKind::Bollinger,
            IndicatorConfig::Stochastic { .. } => IndicatorKind::Stochastic,
            IndicatorConfig::WilliamsR { .. } => IndicatorKind::WilliamsR,
            IndicatorConfig::Cci { .. } => IndicatorKind::Cci,
        }
    }

    /// Fewest bars for which the indicator is reported. Saturates, so an
    /// oversized period reports insufficient data.
    pub fn min_bars(&self) -> usize {
        match *self {
            IndicatorConfig::Sma { period }
            | IndicatorConfig::Ema { period }
            | IndicatorConfig::Bollinger { period, .. }
            | IndicatorConfig::WilliamsR { period }
            | IndicatorConfig::Cci { period } => period,
            IndicatorConfig::Rsi { period } => period.saturating_add(1),
            IndicatorConfig::Macd { slow, signal, .. } => slow.saturating_add(signal),
            IndicatorConfig::Stochastic { k_period, d_period } => k_period.saturating_add(d_period),
        }
    }

    pub(crate) fn ensure_enough_bars(&self, series: &PriceSeries) -> Result<(), AnalyticsError> {
        let minimum = self.min_bars();
        if series.len() < minimum {
            return Err(AnalyticsError::insufficient(self.to_string(), series.len(), minimum));
        }
        Ok(())
    }
}

impl fmt::Display for IndicatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorConfig::Sma { period } => write!(f, "SMA({})", period),
            IndicatorConfig::Ema { period } => write!(f, "EMA({})", period),
            IndicatorConfig::Rsi { period } => write!(f, "RSI({})", period),
            IndicatorConfig::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorConfig::Bollinger { period, stddev_mult } => {
                write!(f, "BOLLINGER({},{})", period, stddev_mult)
            }
            IndicatorConfig::Stochastic { k_period, d_period } => {
                write!(f, "STOCHASTIC({},{})", k_period, d_period)
            }
            IndicatorConfig::WilliamsR { period } => write!(f, "WILLIAMS_R({})", period),
            IndicatorConfig::Cci { period } => write!(f, "CCI({})", period),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum IndicatorOutput {
    Simple(Vec<f64>),
    Macd {
        line: Vec<f64>,
        signal: Vec<f64>,
        histogram: Vec<f64>,
    },
    Bollinger {
        upper: Vec<f64>,
        middle: Vec<f64>,
        lower: Vec<f64>,
    },
    Stochastic {
        k: Vec<f64>,
        d: Vec<f64>,
    },
}

impl IndicatorOutput {
    pub fn len(&self) -> usize {
        match self {
            IndicatorOutput::Simple(values) => values.len(),
            IndicatorOutput::Macd { line, .. } => line.len(),
            IndicatorOutput::Bollinger { middle, .. } => middle.len(),
            IndicatorOutput::Stochastic { k, .. } => k.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, i: usize) -> Option<IndicatorValue> {
        match self {
            IndicatorOutput::Simple(values) => values.get(i).map(|&v| IndicatorValue::Simple(v)),
            IndicatorOutput::Macd {
                line,
                signal,
                histogram,
            } => Some(IndicatorValue::Macd {
                line: *line.get(i)?,
                signal: *signal.get(i)?,
                histogram: *histogram.get(i)?,
            }),
            IndicatorOutput::Bollinger {
                upper,
                middle,
                lower,
            } => Some(IndicatorValue::Bollinger {
                upper: *upper.get(i)?,
                middle: *middle.get(i)?,
                lower: *lower.get(i)?,
            }),
            IndicatorOutput::Stochastic { k, d } => Some(IndicatorValue::Stochastic {
                k: *k.get(i)?,
                d: *d.get(i)?,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
    Stochastic {
        k: f64,
        d: f64,
    },
}

/// Every value sequence in `output` has the same length as `dates`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IndicatorResult {
    pub config: IndicatorConfig,
    pub dates: Vec<NaiveDate>,
    pub output: IndicatorOutput,
    pub signal: Option<Signal>,
}

impl IndicatorResult {
    pub fn kind(&self) -> IndicatorKind {
        self.config.kind()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Most recent value, or `None` when nothing was computed.
    pub fn current(&self) -> Option<IndicatorValue> {
        self.output.len().checked_sub(1).and_then(|i| self.output.get(i))
    }

    /// Most recent value of a single-line indicator.
    pub fn current_simple(&self) -> Option<f64> {
        match self.current()? {
            IndicatorValue::Simple(v) => Some(v),
            _ => None,
        }
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub(crate) fn round_all(values: &[f64], decimals: i32) -> Vec<f64> {
    values.iter().map(|&v| round_to(v, decimals)).collect()
}

/// Last `len` dates of the series, matching a tail-aligned output.
pub(crate) fn tail_dates(series: &PriceSeries, len: usize) -> Vec<NaiveDate> {
    let bars = series.bars();
    bars[bars.len() - len..].iter().map(|b| b.date).collect()
}

/// Keeps the last `len` elements.
pub(crate) fn tail(values: &[f64], len: usize) -> Vec<f64> {
    values[values.len() - len..].to_vec()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::domain::ohlcv::PriceBar;

    pub fn make_series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    pub fn make_hlc_series(hlc: &[(f64, f64, f64)]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = hlc
            .iter()
            .enumerate()
            .map(|(i, &(high, low, close))| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high,
                low,
                close,
                volume: 1000,
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("sma".parse::<IndicatorKind>().unwrap(), IndicatorKind::Sma);
        assert_eq!("Williams_R".parse::<IndicatorKind>().unwrap(), IndicatorKind::WilliamsR);
        assert_eq!(" bollinger ".parse::<IndicatorKind>().unwrap(), IndicatorKind::Bollinger);
    }

    #[test]
    fn unknown_kind_is_unsupported() {
        let err = "ADX".parse::<IndicatorKind>().unwrap_err();
        assert!(matches!(err, AnalyticsError::UnsupportedIndicator { ref name } if name == "ADX"));
    }

    #[test]
    fn config_display_macd() {
        let macd = IndicatorConfig::Macd {
            fast: 12,
            slow: 26,
            signal: 9,
        };
        assert_eq!(macd.to_string(), "MACD(12,26,9)");
    }

    #[test]
    fn config_display_bollinger() {
        let boll = IndicatorConfig::Bollinger {
            period: 20,
            stddev_mult: 2.0,
        };
        assert_eq!(boll.to_string(), "BOLLINGER(20,2)");
    }

    #[test]
    fn min_bars_per_indicator() {
        assert_eq!(IndicatorConfig::Sma { period: 20 }.min_bars(), 20);
        assert_eq!(IndicatorConfig::Rsi { period: 14 }.min_bars(), 15);
        assert_eq!(
            IndicatorConfig::Macd {
                fast: 12,
                slow: 26,
                signal: 9
            }
            .min_bars(),
            35
        );
        assert_eq!(
            IndicatorConfig::Stochastic {
                k_period: 14,
                d_period: 3
            }
            .min_bars(),
            17
        );
    }

    #[test]
    fn round_to_two_and_four() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.23456, 4), 1.2346);
        assert_eq!(round_to(-0.125001, 2), -0.13);
    }

    #[test]
    fn current_of_empty_output_is_none() {
        let result = IndicatorResult {
            config: IndicatorConfig::Sma { period: 3 },
            dates: vec![],
            output: IndicatorOutput::Simple(vec![]),
            signal: None,
        };
        assert!(result.current().is_none());
        assert!(result.current_simple().is_none());
    }

    #[test]
    fn current_of_multi_line_output() {
        let output = IndicatorOutput::Stochastic {
            k: vec![10.0, 20.0],
            d: vec![15.0, 25.0],
        };
        assert_eq!(output.get(1), Some(IndicatorValue::Stochastic { k: 20.0, d: 25.0 }));
        assert_eq!(output.get(2), None);
    }
}

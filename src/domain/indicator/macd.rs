//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow), aligned on the slow EMA's range
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! All three lines are reported over the range where the signal line exists,
//! rounded to 4 decimals.

use crate::domain::error::AnalyticsError;
use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{
    IndicatorConfig, IndicatorOutput, IndicatorResult, round_all, tail, tail_dates,
};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::Signal;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub struct MacdLines {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Unrounded MACD lines, all of equal length.
pub fn macd_lines(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdLines {
    let ema_fast = ema_values(closes, fast);
    let ema_slow = ema_values(closes, slow);
    if ema_slow.is_empty() || ema_fast.len() < ema_slow.len() {
        return MacdLines {
            line: Vec::new(),
            signal: Vec::new(),
            histogram: Vec::new(),
        };
    }

    let offset = ema_fast.len() - ema_slow.len();
    let full_line: Vec<f64> = ema_slow
        .iter()
        .enumerate()
        .map(|(i, slow_v)| ema_fast[i + offset] - slow_v)
        .collect();

    let signal = ema_values(&full_line, signal_period);
    let line = tail(&full_line, signal.len());
    let histogram = line.iter().zip(&signal).map(|(m, s)| m - s).collect();

    MacdLines {
        line,
        signal,
        histogram,
    }
}

pub fn macd_signal(line: f64, signal: f64, histogram: f64) -> Signal {
    if line > signal && histogram > 0.0 {
        Signal::Buy
    } else if line < signal && histogram < 0.0 {
        Signal::Sell
    } else {
        Signal::Neutral
    }
}

pub fn calculate_macd(
    series: &PriceSeries,
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<IndicatorResult, AnalyticsError> {
    let config = IndicatorConfig::Macd {
        fast,
        slow,
        signal: signal_period,
    };
    config.ensure_enough_bars(series)?;

    let lines = macd_lines(&series.closes(), fast, slow, signal_period);
    let line = round_all(&lines.line, 4);
    let signal_line = round_all(&lines.signal, 4);
    let histogram = round_all(&lines.histogram, 4);

    let signal = match (line.last(), signal_line.last(), histogram.last()) {
        (Some(&m), Some(&s), Some(&h)) => Some(macd_signal(m, s, h)),
        _ => None,
    };

    Ok(IndicatorResult {
        config,
        dates: tail_dates(series, line.len()),
        output: IndicatorOutput::Macd {
            line,
            signal: signal_line,
            histogram,
        },
        signal,
    })
}

pub fn calculate_macd_default(series: &PriceSeries) -> Result<IndicatorResult, AnalyticsError> {
    calculate_macd(series, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

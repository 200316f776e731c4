//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! The first value lands on bar n (n price changes are needed).

use crate::domain::error::AnalyticsError;
use crate::domain::indicator::{
    IndicatorConfig, IndicatorOutput, IndicatorResult, round_all, tail_dates,
};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::Signal;

pub const OVERBOUGHT: f64 = 70.0;
pub const OVERSOLD: f64 = 30.0;

fn rsi_from(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

/// Unrounded RSI, one value per bar from bar `period` onwards.
pub fn rsi_values(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() <= period {
        return Vec::new();
    }

    let mut gains: Vec<f64> = Vec::with_capacity(closes.len() - 1);
    let mut losses: Vec<f64> = Vec::with_capacity(closes.len() - 1);
    for w in closes.windows(2) {
        let change = w[1] - w[0];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    let mut values = Vec::with_capacity(gains.len() - period + 1);
    values.push(rsi_from(avg_gain, avg_loss));

    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
        values.push(rsi_from(avg_gain, avg_loss));
    }

    values
}

pub fn rsi_signal(rsi: f64) -> Signal {
    Signal::from_oscillator(rsi, OVERSOLD, OVERBOUGHT)
}

pub fn calculate_rsi(
    series: &PriceSeries,
    period: usize,
) -> Result<IndicatorResult, AnalyticsError> {
    let config = IndicatorConfig::Rsi { period };
    config.ensure_enough_bars(series)?;

    let values = round_all(&rsi_values(&series.closes(), period), 2);
    let signal = values.last().map(|&v| rsi_signal(v));
    Ok(IndicatorResult {
        config,
        dates: tail_dates(series, values.len()),
        output: IndicatorOutput::Simple(values),
        signal,
    })
}

//! Commodity Channel Index.
//!
//! TP = (H + L + C) / 3
//! CCI = (TP - SMA(TP, n)) / (0.015 × MeanAbsDev(TP, n))
//! A window with zero mean deviation reports 0.

use crate::domain::error::AnalyticsError;
use crate::domain::indicator::{
    IndicatorConfig, IndicatorOutput, IndicatorResult, round_all, tail_dates,
};
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::domain::signal::Signal;

const LAMBERT_CONSTANT: f64 = 0.015;

pub fn cci_values(bars: &[PriceBar], period: usize) -> Vec<f64> {
    if period == 0 {
        return Vec::new();
    }
    let typical: Vec<f64> = bars.iter().map(PriceBar::typical_price).collect();

    typical
        .windows(period)
        .map(|window| {
            let mean = window.iter().sum::<f64>() / period as f64;
            let mean_dev = window.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / period as f64;
            if mean_dev > 0.0 {
                (window[window.len() - 1] - mean) / (LAMBERT_CONSTANT * mean_dev)
            } else {
                0.0
            }
        })
        .collect()
}

pub fn cci_signal(value: f64) -> Signal {
    Signal::from_oscillator(value, -100.0, 100.0)
}

pub fn calculate_cci(
    series: &PriceSeries,
    period: usize,
) -> Result<IndicatorResult, AnalyticsError> {
    let config = IndicatorConfig::Cci { period };
    config.ensure_enough_bars(series)?;

    let values = round_all(&cci_values(series.bars(), period), 2);
    let signal = values.last().map(|&v| cci_signal(v));
    Ok(IndicatorResult {
        config,
        dates: tail_dates(series, values.len()),
        output: IndicatorOutput::Simple(values),
        signal,
    })
}

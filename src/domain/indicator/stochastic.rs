//! Stochastic oscillator.
//!
//! %K = (C - LL) / (HH - LL) × 100 over the last k bars.
//! %D = SMA(%K, d).
//! A flat window (HH == LL) reports %K = 50.

use crate::domain::error::AnalyticsError;
use crate::domain::indicator::sma::sma_values;
use crate::domain::indicator::{
    IndicatorConfig, IndicatorOutput, IndicatorResult, round_all, tail, tail_dates,
};
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::domain::signal::Signal;

pub const DEFAULT_K_PERIOD: usize = 14;
pub const DEFAULT_D_PERIOD: usize = 3;

/// Highest high and lowest low of a window.
pub(crate) fn high_low(window: &[PriceBar]) -> (f64, f64) {
    window.iter().fold((f64::MIN, f64::MAX), |(hh, ll), b| {
        (hh.max(b.high), ll.min(b.low))
    })
}

/// Unrounded %K, one value per full `k_period` window.
pub fn percent_k(bars: &[PriceBar], k_period: usize) -> Vec<f64> {
    if k_period == 0 {
        return Vec::new();
    }
    bars.windows(k_period)
        .map(|window| {
            let (hh, ll) = high_low(window);
            let close = window[window.len() - 1].close;
            let range = hh - ll;
            if range > 0.0 {
                (close - ll) / range * 100.0
            } else {
                50.0
            }
        })
        .collect()
}

pub fn stochastic_signal(k: f64, d: f64) -> Signal {
    if k > 80.0 && d > 80.0 {
        Signal::Sell
    } else if k < 20.0 && d < 20.0 {
        Signal::Buy
    } else {
        Signal::Neutral
    }
}

pub fn calculate_stochastic(
    series: &PriceSeries,
    k_period: usize,
    d_period: usize,
) -> Result<IndicatorResult, AnalyticsError> {
    let config = IndicatorConfig::Stochastic { k_period, d_period };
    config.ensure_enough_bars(series)?;

    let k_raw = percent_k(series.bars(), k_period);
    let d_raw = sma_values(&k_raw, d_period);
    let k = round_all(&tail(&k_raw, d_raw.len()), 2);
    let d = round_all(&d_raw, 2);

    let signal = match (k.last(), d.last()) {
        (Some(&k_now), Some(&d_now)) => Some(stochastic_signal(k_now, d_now)),
        _ => None,
    };

    Ok(IndicatorResult {
        config,
        dates: tail_dates(series, k.len()),
        output: IndicatorOutput::Stochastic { k, d },
        signal,
    })
}

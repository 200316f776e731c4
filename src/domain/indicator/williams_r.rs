//! Williams %R.
//!
//! %R = (HH - C) / (HH - LL) × -100 over the last n bars, so the range is
//! [-100, 0]. A flat window reports -50.

use crate::domain::error::AnalyticsError;
use crate::domain::indicator::stochastic::high_low;
use crate::domain::indicator::{
    IndicatorConfig, IndicatorOutput, IndicatorResult, round_all, tail_dates,
};
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::domain::signal::Signal;

pub fn williams_r_values(bars: &[PriceBar], period: usize) -> Vec<f64> {
    if period == 0 {
        return Vec::new();
    }
    bars.windows(period)
        .map(|window| {
            let (hh, ll) = high_low(window);
            let close = window[window.len() - 1].close;
            let range = hh - ll;
            if range > 0.0 {
                (hh - close) / range * -100.0
            } else {
                -50.0
            }
        })
        .collect()
}

pub fn williams_r_signal(value: f64) -> Signal {
    Signal::from_oscillator(value, -80.0, -20.0)
}

pub fn calculate_williams_r(
    series: &PriceSeries,
    period: usize,
) -> Result<IndicatorResult, AnalyticsError> {
    let config = IndicatorConfig::WilliamsR { period };
    config.ensure_enough_bars(series)?;

    let values = round_all(&williams_r_values(series.bars(), period), 2);
    let signal = values.last().map(|&v| williams_r_signal(v));
    Ok(IndicatorResult {
        config,
        dates: tail_dates(series, values.len()),
        output: IndicatorOutput::Simple(values),
        signal,
    })
}

//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! The first value lands on bar n-1.

use crate::domain::error::AnalyticsError;
use crate::domain::indicator::{
    IndicatorConfig, IndicatorOutput, IndicatorResult, round_all, tail_dates,
};
use crate::domain::ohlcv::PriceSeries;

/// Unrounded EMA over `values`, starting at the end of the seed window.
pub fn ema_values(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = values[..period].iter().sum::<f64>() / period as f64;
    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(ema);

    for &value in &values[period..] {
        ema = value * k + ema * (1.0 - k);
        out.push(ema);
    }
    out
}

pub fn calculate_ema(
    series: &PriceSeries,
    period: usize,
) -> Result<IndicatorResult, AnalyticsError> {
    let config = IndicatorConfig::Ema { period };
    config.ensure_enough_bars(series)?;

    let values = round_all(&ema_values(&series.closes(), period), 2);
    Ok(IndicatorResult {
        config,
        dates: tail_dates(series, values.len()),
        output: IndicatorOutput::Simple(values),
        signal: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_series;

    #[test]
    fn ema_period_1() {
        let values = ema_values(&[10.0, 20.0, 30.0], 1);
        assert_eq!(values.len(), 3);
        assert!((values[0] - 10.0).abs() < f64::EPSILON);
        assert!((values[1] - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_seed_is_sma() {
        let values = ema_values(&[10.0, 20.0, 30.0], 3);
        let expected_sma = (10.0 + 20.0 + 30.0) / 3.0;
        assert_eq!(values.len(), 1);
        assert!((values[0] - expected_sma).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_calculation() {
        let values = ema_values(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        let k = 2.0 / 4.0;
        let sma = (10.0 + 20.0 + 30.0) / 3.0;
        let ema_3 = 40.0 * k + sma * (1.0 - k);
        let ema_4 = 50.0 * k + ema_3 * (1.0 - k);

        assert!((values[0] - sma).abs() < f64::EPSILON);
        assert!((values[1] - ema_3).abs() < f64::EPSILON);
        assert!((values[2] - ema_4).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_equal_prices() {
        for v in ema_values(&[100.0; 5], 3) {
            assert!((v - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_empty_or_period_0() {
        assert!(ema_values(&[], 3).is_empty());
        assert!(ema_values(&[10.0, 20.0], 0).is_empty());
    }

    #[test]
    fn ema_result_alignment() {
        let series = make_series(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let result = calculate_ema(&series, 3).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.dates[0], series.bars()[2].date);
        assert_eq!(result.config, IndicatorConfig::Ema { period: 3 });
    }

    #[test]
    fn ema_insufficient_data() {
        let series = make_series(&[10.0, 20.0]);
        assert!(matches!(
            calculate_ema(&series, 5),
            Err(AnalyticsError::InsufficientData { .. })
        ));
    }
}

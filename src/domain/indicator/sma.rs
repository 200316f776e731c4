//! Simple Moving Average indicator.
//!
//! SMA[i] = mean(C[i-n+1..=i]). The first value lands on bar n-1.

use crate::domain::error::AnalyticsError;
use crate::domain::indicator::{
    IndicatorConfig, IndicatorOutput, IndicatorResult, round_all, tail_dates,
};
use crate::domain::ohlcv::PriceSeries;

/// Rolling mean over `period`; one value per full window.
pub fn sma_values(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    values
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / period as f64)
        .collect()
}

pub fn calculate_sma(
    series: &PriceSeries,
    period: usize,
) -> Result<IndicatorResult, AnalyticsError> {
    let config = IndicatorConfig::Sma { period };
    config.ensure_enough_bars(series)?;

    let values = round_all(&sma_values(&series.closes(), period), 2);
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
    fn sma_window_means() {
        let values = sma_values(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        assert_eq!(values, vec![20.0, 30.0, 40.0]);
    }

    #[test]
    fn sma_period_1_is_identity() {
        assert_eq!(sma_values(&[1.5, 2.5], 1), vec![1.5, 2.5]);
    }

    #[test]
    fn sma_period_0_or_short_input() {
        assert!(sma_values(&[1.0, 2.0], 0).is_empty());
        assert!(sma_values(&[1.0, 2.0], 3).is_empty());
    }

    #[test]
    fn sma_dates_align_with_window_end() {
        let series = make_series(&[10.0, 20.0, 30.0, 40.0]);
        let result = calculate_sma(&series, 3).unwrap();
        assert_eq!(result.dates.len(), 2);
        assert_eq!(result.dates[0], series.bars()[2].date);
        assert_eq!(result.current_simple(), Some(30.0));
        assert!(result.signal.is_none());
    }

    #[test]
    fn sma_rounds_to_two_decimals() {
        let series = make_series(&[1.0, 1.0, 1.001]);
        let result = calculate_sma(&series, 3).unwrap();
        assert_eq!(result.current_simple(), Some(1.0));
    }

    #[test]
    fn sma_insufficient_data() {
        let series = make_series(&[1.0, 2.0]);
        let err = calculate_sma(&series, 3).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::InsufficientData {
                bars: 2,
                minimum: 3,
                ..
            }
        ));
    }
}

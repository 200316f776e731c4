//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: period=20, multiplier=2.0

use crate::domain::error::AnalyticsError;
use crate::domain::indicator::{
    IndicatorConfig, IndicatorOutput, IndicatorResult, round_all, tail_dates,
};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::Signal;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STDDEV_MULT: f64 = 2.0;

pub struct Bands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Unrounded bands, one triple per full window.
pub fn bollinger_bands(closes: &[f64], period: usize, mult: f64) -> Bands {
    let mut bands = Bands {
        upper: Vec::new(),
        middle: Vec::new(),
        lower: Vec::new(),
    };
    if period == 0 {
        return bands;
    }

    for window in closes.windows(period) {
        let middle = window.iter().sum::<f64>() / period as f64;
        let variance = window
            .iter()
            .map(|c| {
                let diff = c - middle;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        bands.upper.push(middle + mult * stddev);
        bands.middle.push(middle);
        bands.lower.push(middle - mult * stddev);
    }
    bands
}

pub fn bollinger_signal(price: f64, upper: f64, lower: f64) -> Signal {
    if price > upper {
        Signal::Sell
    } else if price < lower {
        Signal::Buy
    } else {
        Signal::Neutral
    }
}

pub fn calculate_bollinger(
    series: &PriceSeries,
    period: usize,
    stddev_mult: f64,
) -> Result<IndicatorResult, AnalyticsError> {
    let config = IndicatorConfig::Bollinger {
        period,
        stddev_mult,
    };
    config.ensure_enough_bars(series)?;

    let bands = bollinger_bands(&series.closes(), period, stddev_mult);
    let upper = round_all(&bands.upper, 2);
    let middle = round_all(&bands.middle, 2);
    let lower = round_all(&bands.lower, 2);

    let signal = match (series.last(), upper.last(), lower.last()) {
        (Some(bar), Some(&u), Some(&l)) => Some(bollinger_signal(bar.close, u, l)),
        _ => None,
    };

    Ok(IndicatorResult {
        config,
        dates: tail_dates(series, middle.len()),
        output: IndicatorOutput::Bollinger {
            upper,
            middle,
            lower,
        },
        signal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorValue;
    use crate::domain::indicator::test_support::make_series;

    #[test]
    fn bollinger_constant_values() {
        let bands = bollinger_bands(&[100.0; 5], 3, 2.0);
        assert_eq!(bands.middle.len(), 3);
        assert!((bands.middle[0] - 100.0).abs() < f64::EPSILON);
        assert!((bands.upper[0] - 100.0).abs() < f64::EPSILON);
        assert!((bands.lower[0] - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bollinger_basic_calculation() {
        let bands = bollinger_bands(&[10.0, 20.0, 30.0], 3, 2.0);

        let expected_middle: f64 = (10.0 + 20.0 + 30.0) / 3.0;
        let variance: f64 = ((10.0 - expected_middle).powi(2)
            + (20.0 - expected_middle).powi(2)
            + (30.0 - expected_middle).powi(2))
            / 3.0;
        let stddev = variance.sqrt();

        assert!((bands.middle[0] - expected_middle).abs() < 1e-10);
        assert!((bands.upper[0] - (expected_middle + 2.0 * stddev)).abs() < 1e-10);
        assert!((bands.lower[0] - (expected_middle - 2.0 * stddev)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_multiplier_variations() {
        let bands = bollinger_bands(&[10.0, 20.0, 30.0], 3, 1.0);
        let stddev = (200.0_f64 / 3.0).sqrt();
        assert!((bands.upper[0] - (20.0 + stddev)).abs() < 1e-10);
        assert!((bands.lower[0] - (20.0 - stddev)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_symmetry() {
        let bands = bollinger_bands(&[10.0, 20.0, 30.0], 3, 2.0);
        let upper_dist = bands.upper[0] - bands.middle[0];
        let lower_dist = bands.middle[0] - bands.lower[0];
        assert!((upper_dist - lower_dist).abs() < 1e-10);
    }

    #[test]
    fn bollinger_result_and_signal() {
        let series = make_series(&[10.0, 20.0, 30.0]);
        let result = calculate_bollinger(&series, 3, 2.0).unwrap();
        assert_eq!(result.len(), 1);
        // close 30 sits inside 20 ± 16.33
        assert_eq!(result.signal, Some(Signal::Neutral));
        match result.current() {
            Some(IndicatorValue::Bollinger { middle, .. }) => assert_eq!(middle, 20.0),
            other => panic!("Expected Bollinger value, got {:?}", other),
        }
    }

    #[test]
    fn bollinger_signal_rules() {
        assert_eq!(bollinger_signal(111.0, 110.0, 90.0), Signal::Sell);
        assert_eq!(bollinger_signal(89.0, 110.0, 90.0), Signal::Buy);
        assert_eq!(bollinger_signal(110.0, 110.0, 90.0), Signal::Neutral);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let series = make_series(&[10.0, 20.0]);
        assert!(matches!(
            calculate_bollinger(&series, 20, 2.0),
            Err(AnalyticsError::InsufficientData { .. })
        ));
    }
}

//! Indicator dispatch and the all-indicator panel.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::domain::error::AnalyticsError;
use crate::domain::indicator::{
    IndicatorConfig, IndicatorKind, IndicatorResult, bollinger, cci, ema, macd, rsi, sma,
    stochastic, williams_r,
};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::SignalSummary;

/// Computes one indicator by name, e.g. `("RSI", {"period": "14"})`.
pub fn calculate_indicator(
    series: &PriceSeries,
    name: &str,
    params: &HashMap<String, String>,
) -> Result<IndicatorResult, AnalyticsError> {
    let kind: IndicatorKind = name.parse()?;
    let config = IndicatorConfig::from_params(kind, params)?;
    calculate(series, &config)
}

pub fn calculate(
    series: &PriceSeries,
    config: &IndicatorConfig,
) -> Result<IndicatorResult, AnalyticsError> {
    config.validate()?;
    match *config {
        IndicatorConfig::Sma { period } => sma::calculate_sma(series, period),
        IndicatorConfig::Ema { period } => ema::calculate_ema(series, period),
        IndicatorConfig::Rsi { period } => rsi::calculate_rsi(series, period),
        IndicatorConfig::Macd { fast, slow, signal } => {
            macd::calculate_macd(series, fast, slow, signal)
        }
        IndicatorConfig::Bollinger {
            period,
            stddev_mult,
        } => bollinger::calculate_bollinger(series, period, stddev_mult),
        IndicatorConfig::Stochastic { k_period, d_period } => {
            stochastic::calculate_stochastic(series, k_period, d_period)
        }
        IndicatorConfig::WilliamsR { period } => williams_r::calculate_williams_r(series, period),
        IndicatorConfig::Cci { period } => cci::calculate_cci(series, period),
    }
}

/// Every supported indicator at default parameters, plus their combined signal.
#[derive(Debug)]
pub struct IndicatorPanel {
    pub results: BTreeMap<IndicatorKind, Result<IndicatorResult, AnalyticsError>>,
    pub summary: SignalSummary,
}

impl IndicatorPanel {
    pub fn get(&self, kind: IndicatorKind) -> Option<&IndicatorResult> {
        self.results.get(&kind).and_then(|r| r.as_ref().ok())
    }
}

pub fn calculate_all_indicators(series: &PriceSeries) -> IndicatorPanel {
    let results: BTreeMap<IndicatorKind, Result<IndicatorResult, AnalyticsError>> =
        IndicatorKind::ALL
            .into_iter()
            .map(|kind| {
                let result = calculate(series, &IndicatorConfig::default_for(kind));
                if let Err(ref e) = result {
                    tracing::debug!(
                        instrument = series.instrument(),
                        %kind,
                        error = %e,
                        "indicator skipped"
                    );
                }
                (kind, result)
            })
            .collect();

    let summary = SignalSummary::from_signals(results.iter().filter_map(|(kind, result)| {
        result
            .as_ref()
            .ok()
            .and_then(|r| r.signal)
            .map(|signal| (*kind, signal))
    }));

    IndicatorPanel { results, summary }
}

#[derive(Debug)]
pub struct TechnicalAnalysis {
    pub instrument: String,
    pub current_price: Option<f64>,
    pub analysis_date: Option<NaiveDate>,
    pub data_points: usize,
    pub panel: IndicatorPanel,
}

/// Full technical analysis of one instrument as of its last bar.
pub fn analyze_instrument(series: &PriceSeries) -> TechnicalAnalysis {
    let last = series.last();
    TechnicalAnalysis {
        instrument: series.instrument().to_string(),
        current_price: last.map(|b| b.close),
        analysis_date: last.map(|b| b.date),
        data_points: series.len(),
        panel: calculate_all_indicators(series),
    }
}

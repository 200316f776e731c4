//! Per-instrument beta estimates.
//!
//! Two sources are provided. [`StaticBetaTable`] is a fixed lookup keyed by
//! instrument id. It is an approximation seeded from sector character, not a
//! measured sensitivity. [`CovarianceBeta`] measures beta from aligned daily
//! returns against a market index series.

use std::collections::HashMap;

use super::error::AnalyticsError;
use super::holding::Holding;
use super::metrics::mean;
use super::ohlcv::PriceSeries;
use super::portfolio::value_weights;
use crate::ports::config_port::ConfigPort;

pub const MARKET_BETA: f64 = 1.0;

pub trait BetaSource {
    fn beta(&self, instrument: &str) -> f64;
}

/// Value-weighted beta of the holdings; 0 when the portfolio has no value.
pub fn portfolio_beta(holdings: &[Holding], betas: &dyn BetaSource) -> f64 {
    value_weights(holdings)
        .map(|(h, w)| w * betas.beta(&h.instrument))
        .sum()
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticBetaTable {
    betas: HashMap<String, f64>,
    default: f64,
}

impl StaticBetaTable {
    pub fn empty() -> Self {
        StaticBetaTable {
            betas: HashMap::new(),
            default: MARKET_BETA,
        }
    }

    /// Built-in table for common BIST instruments.
    pub fn bist_defaults() -> Self {
        let mut table = Self::empty();
        for (instrument, beta) in [
            ("THYAO", 1.2),
            ("PGSUS", 1.2),
            ("GARAN", 1.1),
            ("AKBNK", 1.1),
            ("YKBNK", 1.1),
            ("BIMAS", 0.9),
            ("EREGL", 0.9),
            ("SISE", 1.0),
            ("TUPRS", 1.0),
        ] {
            table = table.with_beta(instrument, beta);
        }
        table
    }

    pub fn with_beta(mut self, instrument: &str, beta: f64) -> Self {
        self.betas.insert(instrument.to_uppercase(), beta);
        self
    }

    /// The built-in table overridden by the `[betas]` config section.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, AnalyticsError> {
        let mut table = Self::bist_defaults();
        for (key, raw) in config.get_section("betas") {
            let beta = parse_beta(&key, &raw)?;
            table = table.with_beta(&key, beta);
        }
        Ok(table)
    }
}

impl Default for StaticBetaTable {
    fn default() -> Self {
        Self::bist_defaults()
    }
}

impl BetaSource for StaticBetaTable {
    fn beta(&self, instrument: &str) -> f64 {
        self.betas
            .get(&instrument.to_uppercase())
            .copied()
            .unwrap_or(self.default)
    }
}

pub(crate) fn parse_beta(key: &str, raw: &str) -> Result<f64, AnalyticsError> {
    match raw.trim().parse::<f64>() {
        Ok(beta) if beta.is_finite() => Ok(beta),
        _ => Err(AnalyticsError::ConfigInvalid {
            section: "betas".to_string(),
            key: key.to_string(),
            reason: format!("beta must be a number, got '{}'", raw),
        }),
    }
}

/// Betas measured against a market index. Instruments without enough
/// overlapping history take the market beta.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceBeta {
    betas: HashMap<String, f64>,
}

impl CovarianceBeta {
    pub fn estimate(market: &PriceSeries, prices: &HashMap<String, PriceSeries>) -> Self {
        let betas = prices
            .iter()
            .filter_map(|(instrument, series)| {
                let beta = covariance_beta(series, market);
                if beta.is_none() {
                    tracing::debug!(
                        instrument = instrument.as_str(),
                        market = market.instrument(),
                        "not enough aligned history for beta, using market beta"
                    );
                }
                beta.map(|b| (instrument.to_uppercase(), b))
            })
            .collect();
        CovarianceBeta { betas }
    }
}

impl BetaSource for CovarianceBeta {
    fn beta(&self, instrument: &str) -> f64 {
        self.betas
            .get(&instrument.to_uppercase())
            .copied()
            .unwrap_or(MARKET_BETA)
    }
}

/// cov(asset, market) / var(market) over daily returns on dates both series
/// have bars. `None` with fewer than 2 aligned returns or a flat market.
pub fn covariance_beta(asset: &PriceSeries, market: &PriceSeries) -> Option<f64> {
    let aligned: Vec<(f64, f64)> = asset
        .bars()
        .iter()
        .filter_map(|b| market.close_on(b.date).map(|m| (b.close, m)))
        .collect();

    let (asset_returns, market_returns): (Vec<f64>, Vec<f64>) = aligned
        .windows(2)
        .filter(|w| w[0].0 > 0.0 && w[0].1 > 0.0)
        .map(|w| ((w[1].0 - w[0].0) / w[0].0, (w[1].1 - w[0].1) / w[0].1))
        .unzip();

    if market_returns.len() < 2 {
        return None;
    }

    let asset_mean = mean(&asset_returns);
    let market_mean = mean(&market_returns);
    let n = market_returns.len() as f64;
    let covariance = asset_returns
        .iter()
        .zip(&market_returns)
        .map(|(a, m)| (a - asset_mean) * (m - market_mean))
        .sum::<f64>()
        / n;
    let variance = market_returns
        .iter()
        .map(|m| (m - market_mean).powi(2))
        .sum::<f64>()
        / n;

    if variance > 0.0 {
        Some(covariance / variance)
    } else {
        None
    }
}

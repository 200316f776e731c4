//! Analytics run settings.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::config_validation::{SECTION, parse_as_of, validate_analytics_config};
use super::error::AnalyticsError;
use super::ohlcv::PriceSeries;
use super::returns::latest_date;
use crate::ports::config_port::ConfigPort;

/// Annual risk-free yield used for Sharpe and Sortino.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.15;
pub const DEFAULT_LOOKBACK_DAYS: u32 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    pub risk_free_rate: f64,
    /// Calendar days covered by the historical return window.
    pub lookback_days: u32,
    /// End of the return window. When unset, the latest bar date in the
    /// supplied price history is used.
    pub as_of: Option<NaiveDate>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        AnalyticsConfig {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            as_of: None,
        }
    }
}

impl AnalyticsConfig {
    /// Reads and validates the `[analytics]` section.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, AnalyticsError> {
        validate_analytics_config(config)?;
        let lookback = config.get_int(SECTION, "lookback_days", i64::from(DEFAULT_LOOKBACK_DAYS));
        Ok(AnalyticsConfig {
            risk_free_rate: config.get_double(SECTION, "risk_free_rate", DEFAULT_RISK_FREE_RATE),
            lookback_days: u32::try_from(lookback).unwrap_or(DEFAULT_LOOKBACK_DAYS),
            as_of: parse_as_of(config)?,
        })
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn resolve_as_of(&self, prices: &HashMap<String, PriceSeries>) -> Option<NaiveDate> {
        self.as_of.or_else(|| latest_date(prices))
    }
}

//! Historical portfolio value and daily returns.
//!
//! Holdings are revalued on every weekday of a trailing window that ends at
//! an explicit `as_of` date. A holding with no bar on a date is valued at
//! its current price, which flattens early-window returns when history is
//! sparse.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::HashMap;

use super::config_validation::MAX_LOOKBACK_DAYS;
use super::holding::Holding;
use super::ohlcv::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct ValuePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Weekdays from `as_of - lookback_days` through `as_of`, inclusive. The
/// lookback is capped at `MAX_LOOKBACK_DAYS`.
pub fn weekday_calendar(as_of: NaiveDate, lookback_days: u32) -> Vec<NaiveDate> {
    let lookback = i64::from(lookback_days).min(MAX_LOOKBACK_DAYS);
    let start = as_of
        .checked_sub_signed(Duration::days(lookback))
        .unwrap_or(NaiveDate::MIN);
    start
        .iter_days()
        .take_while(|d| *d <= as_of)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

pub fn value_history(
    holdings: &[Holding],
    prices: &HashMap<String, PriceSeries>,
    dates: &[NaiveDate],
) -> Vec<ValuePoint> {
    let mut fallbacks = 0usize;
    let history = dates
        .iter()
        .map(|&date| {
            let value: f64 = holdings
                .iter()
                .map(|h| {
                    let close = prices.get(&h.instrument).and_then(|s| s.close_on(date));
                    match close {
                        Some(price) => h.value_at(price),
                        None => {
                            fallbacks += 1;
                            h.current_value()
                        }
                    }
                })
                .sum();
            ValuePoint { date, value }
        })
        .collect();

    if fallbacks > 0 {
        tracing::debug!(
            fallbacks,
            dates = dates.len(),
            holdings = holdings.len(),
            "valued holdings at current price where no bar exists"
        );
    }
    history
}

/// Simple returns between consecutive points; a step whose prior value is
/// not positive is skipped.
pub fn daily_returns(history: &[ValuePoint]) -> Vec<f64> {
    history
        .windows(2)
        .filter(|w| w[0].value > 0.0)
        .map(|w| (w[1].value - w[0].value) / w[0].value)
        .collect()
}

pub fn historical_returns(
    holdings: &[Holding],
    prices: &HashMap<String, PriceSeries>,
    as_of: NaiveDate,
    lookback_days: u32,
) -> Vec<f64> {
    let calendar = weekday_calendar(as_of, lookback_days);
    daily_returns(&value_history(holdings, prices, &calendar))
}

/// Most recent bar date across all series.
pub fn latest_date(prices: &HashMap<String, PriceSeries>) -> Option<NaiveDate> {
    prices.values().filter_map(|s| s.last().map(|b| b.date)).max()
}

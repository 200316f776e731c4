#![allow(dead_code)]

use bistfolio::domain::error::AnalyticsError;
use bistfolio::domain::holding::Holding;
pub use bistfolio::domain::ohlcv::{PriceBar, PriceSeries};
use bistfolio::ports::data_port::PriceHistoryPort;
use chrono::NaiveDate;
use std::collections::HashMap;

pub struct MockPriceHistoryPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockPriceHistoryPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, instrument: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(instrument.to_string(), bars);
        self
    }

    pub fn with_error(mut self, instrument: &str, reason: &str) -> Self {
        self.errors
            .insert(instrument.to_string(), reason.to_string());
        self
    }
}

impl PriceHistoryPort for MockPriceHistoryPort {
    fn fetch_series(
        &self,
        instrument: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, AnalyticsError> {
        if let Some(reason) = self.errors.get(instrument) {
            return Err(AnalyticsError::Data {
                reason: reason.clone(),
            });
        }
        let bars = self
            .data
            .get(instrument)
            .ok_or_else(|| AnalyticsError::Data {
                reason: format!("no data for {}", instrument),
            })?
            .iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .cloned()
            .collect();
        PriceSeries::new(instrument, bars)
    }

    fn list_instruments(&self) -> Result<Vec<String>, AnalyticsError> {
        let mut names: Vec<String> = self
            .data
            .keys()
            .chain(self.errors.keys())
            .cloned()
            .collect();
        names.sort();
        Ok(names)
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_bar(date: NaiveDate, close: f64) -> PriceBar {
    PriceBar {
        date,
        open: close - 0.5,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000,
    }
}

/// One bar per calendar day starting at `start`.
pub fn daily_bars(start: &str, closes: &[f64]) -> Vec<PriceBar> {
    let start = date(start);
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(start + chrono::Duration::days(i as i64), c))
        .collect()
}

pub fn make_series(instrument: &str, start: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::new(instrument, daily_bars(start, closes)).unwrap()
}

/// Deterministic zig-zag around `base`, wide enough to move every oscillator.
pub fn wave(base: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| base + (i as f64 * 0.7).sin() * base * 0.05 + i as f64 * 0.1)
        .collect()
}

pub fn holding(instrument: &str, quantity: i64, cost: f64, price: f64) -> Holding {
    Holding::new(instrument, quantity, cost, price)
}

/// Holdings CSV content for the given rows.
pub fn holdings_csv(rows: &[(&str, i64, f64, f64)]) -> String {
    let mut out = String::from("instrument,quantity,average_cost,current_price\n");
    for (instrument, qty, cost, price) in rows {
        out.push_str(&format!("{},{},{},{}\n", instrument, qty, cost, price));
    }
    out
}

/// Price CSV content for bars.
pub fn price_csv(bars: &[PriceBar]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    out
}

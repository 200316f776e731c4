//! OHLCV bar and price series representation.

use chrono::NaiveDate;

use super::error::AnalyticsError;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Prices must be finite and positive, volume non-negative.
    pub fn validate(&self) -> Result<(), &'static str> {
        let prices = [self.open, self.high, self.low, self.close];
        if !prices.iter().all(|p| p.is_finite() && *p > 0.0) {
            return Err("prices must be positive numbers");
        }
        if self.volume < 0 {
            return Err("volume must be non-negative");
        }
        Ok(())
    }
}

/// Bars for one instrument, ascending by date with at most one bar per date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PriceSeries {
    instrument: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Sorts `bars` by date. Fails on a duplicate date or an invalid bar.
    pub fn new(
        instrument: impl Into<String>,
        mut bars: Vec<PriceBar>,
    ) -> Result<Self, AnalyticsError> {
        let instrument = instrument.into();
        for bar in &bars {
            bar.validate().map_err(|reason| AnalyticsError::Data {
                reason: format!("invalid bar for {} on {}: {}", instrument, bar.date, reason),
            })?;
        }
        bars.sort_by_key(|b| b.date);
        if let Some(w) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(AnalyticsError::DuplicateDate {
                instrument,
                date: w[0].date,
            });
        }
        Ok(Self { instrument, bars })
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Closing price on `date`, if a bar exists for that session.
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.bars
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|i| self.bars[i].close)
    }
}

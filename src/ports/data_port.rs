//! Price history access port trait.

use crate::domain::error::AnalyticsError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

pub trait PriceHistoryPort {
    /// Bars for `instrument` dated within `[start_date, end_date]`, ascending.
    fn fetch_series(
        &self,
        instrument: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, AnalyticsError>;

    fn list_instruments(&self) -> Result<Vec<String>, AnalyticsError>;
}

//! CSV file data adapter.
//!
//! Price history lives in one `<INSTRUMENT>.csv` per instrument with the
//! header `date,open,high,low,close,volume`. Holdings are read from a
//! separate file with `instrument,quantity,average_cost,current_price` and
//! an optional `daily_change_pct` column.

use crate::domain::error::AnalyticsError;
use crate::domain::holding::Holding;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::data_port::PriceHistoryPort;
use chrono::NaiveDate;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, instrument: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", instrument))
    }
}

impl PriceHistoryPort for CsvAdapter {
    fn fetch_series(
        &self,
        instrument: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, AnalyticsError> {
        let path = self.csv_path(instrument);
        let content = fs::read_to_string(&path).map_err(|e| AnalyticsError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| AnalyticsError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = column(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                AnalyticsError::Data {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(PriceBar {
                date,
                open: parse_column(&record, 1, "open")?,
                high: parse_column(&record, 2, "high")?,
                low: parse_column(&record, 3, "low")?,
                close: parse_column(&record, 4, "close")?,
                volume: parse_column(&record, 5, "volume")?,
            });
        }

        tracing::debug!(instrument, bars = bars.len(), "loaded price history");
        PriceSeries::new(instrument, bars)
    }

    fn list_instruments(&self) -> Result<Vec<String>, AnalyticsError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| AnalyticsError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut instruments = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AnalyticsError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(instrument) = name_str.strip_suffix(".csv") {
                instruments.push(instrument.to_string());
            }
        }

        instruments.sort();
        Ok(instruments)
    }
}

/// Reads a holdings file.
pub fn load_holdings(path: &Path) -> Result<Vec<Holding>, AnalyticsError> {
    let content = fs::read_to_string(path).map_err(|e| AnalyticsError::Data {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut holdings = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| AnalyticsError::Data {
            reason: format!("CSV parse error in {}: {}", path.display(), e),
        })?;

        let instrument = column(&record, 0, "instrument")?.to_uppercase();
        if instrument.is_empty() {
            return Err(AnalyticsError::Data {
                reason: "empty instrument column".into(),
            });
        }

        let daily_change_pct = match record.get(4).filter(|s| !s.is_empty()) {
            Some(_) => parse_column(&record, 4, "daily_change_pct")?,
            None => 0.0,
        };

        let holding = Holding::new(
            instrument,
            parse_column(&record, 1, "quantity")?,
            parse_column(&record, 2, "average_cost")?,
            parse_column(&record, 3, "current_price")?,
        )
        .with_daily_change(daily_change_pct);
        holding.validate()?;
        holdings.push(holding);
    }

    tracing::debug!(path = %path.display(), holdings = holdings.len(), "loaded holdings");
    Ok(holdings)
}

fn column<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<&'r str, AnalyticsError> {
    record.get(index).ok_or_else(|| AnalyticsError::Data {
        reason: format!("missing {} column", name),
    })
}

fn parse_column<T>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<T, AnalyticsError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = column(record, index, name)?;
    raw.parse().map_err(|e| AnalyticsError::Data {
        reason: format!("invalid {} value '{}': {}", name, raw, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n";

        fs::write(path.join("THYAO.csv"), csv_content).unwrap();
        fs::write(path.join("GARAN.csv"), "date,open,high,low,close,volume\n").unwrap();
        fs::write(path.join("notes.txt"), "ignored").unwrap();

        (dir, path)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn fetch_series_returns_sorted_bars() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_series("THYAO", date(15), date(17)).unwrap();

        assert_eq!(series.instrument(), "THYAO");
        assert_eq!(series.len(), 3);
        let first = &series.bars()[0];
        assert_eq!(first.date, date(15));
        assert_eq!(first.open, 100.0);
        assert_eq!(first.high, 110.0);
        assert_eq!(first.low, 90.0);
        assert_eq!(first.close, 105.0);
        assert_eq!(first.volume, 50000);
    }

    #[test]
    fn fetch_series_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_series("THYAO", date(16), date(16)).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars()[0].date, date(16));
    }

    #[test]
    fn fetch_series_errors_for_missing_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let result = adapter.fetch_series("XYZ", date(1), date(31));
        assert!(matches!(result, Err(AnalyticsError::Data { .. })));
    }

    #[test]
    fn fetch_series_rejects_duplicate_dates() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("SISE.csv"),
            "date,open,high,low,close,volume\n\
             2024-01-15,1,1,1,1,1\n\
             2024-01-15,2,2,2,2,2\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        assert!(matches!(
            adapter.fetch_series("SISE", date(1), date(31)),
            Err(AnalyticsError::DuplicateDate { .. })
        ));
    }

    #[test]
    fn fetch_series_reports_bad_number() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("SISE.csv"),
            "date,open,high,low,close,volume\n2024-01-15,1,1,1,abc,1\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let err = adapter.fetch_series("SISE", date(1), date(31)).unwrap_err();
        assert!(err.to_string().contains("close"));
    }

    #[test]
    fn fetch_series_rejects_nan_close() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("SISE.csv"),
            "date,open,high,low,close,volume\n2024-01-15,1,1,1,NaN,1\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let err = adapter.fetch_series("SISE", date(1), date(31)).unwrap_err();
        assert!(matches!(err, AnalyticsError::Data { .. }));
        assert!(err.to_string().contains("SISE"));
    }

    #[test]
    fn list_instruments_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert_eq!(adapter.list_instruments().unwrap(), vec!["GARAN", "THYAO"]);
    }

    #[test]
    fn load_holdings_with_optional_change() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("holdings.csv");
        fs::write(
            &path,
            "instrument,quantity,average_cost,current_price,daily_change_pct\n\
             thyao,100,250.0,280.0,1.5\n\
             GARAN,200,60.0,55.0\n",
        )
        .unwrap();

        let holdings = load_holdings(&path).unwrap();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[0].instrument, "THYAO");
        assert_eq!(holdings[0].quantity, 100);
        assert_eq!(holdings[0].daily_change_pct, 1.5);
        assert_eq!(holdings[1].daily_change_pct, 0.0);
        assert_eq!(holdings[1].current_price, 55.0);
    }

    #[test]
    fn load_holdings_rejects_negative_quantity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("holdings.csv");
        fs::write(
            &path,
            "instrument,quantity,average_cost,current_price\n\
             THYAO,100,10,10\n\
             GARAN,-50,10,10\n",
        )
        .unwrap();
        let err = load_holdings(&path).unwrap_err();
        assert!(matches!(err, AnalyticsError::Data { .. }));
        assert!(err.to_string().contains("GARAN"));
    }

    #[test]
    fn load_holdings_rejects_bad_quantity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("holdings.csv");
        fs::write(
            &path,
            "instrument,quantity,average_cost,current_price\nTHYAO,ten,1,1\n",
        )
        .unwrap();
        assert!(matches!(load_holdings(&path), Err(AnalyticsError::Data { .. })));
    }
}

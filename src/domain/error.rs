//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for bistfolio.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("insufficient data for {indicator}: have {bars}, need {minimum}")]
    InsufficientData {
        indicator: String,
        bars: usize,
        minimum: usize,
    },

    #[error("unsupported indicator: {name}")]
    UnsupportedIndicator { name: String },

    #[error("invalid parameter {key} for {indicator}: {reason}")]
    InvalidParameter {
        indicator: String,
        key: String,
        reason: String,
    },

    #[error("portfolio is empty")]
    EmptyPortfolio,

    #[error("duplicate bar for {instrument} on {date}")]
    DuplicateDate { instrument: String, date: NaiveDate },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AnalyticsError {
    pub(crate) fn insufficient(indicator: impl Into<String>, bars: usize, minimum: usize) -> Self {
        AnalyticsError::InsufficientData {
            indicator: indicator.into(),
            bars,
            minimum,
        }
    }
}

impl From<&AnalyticsError> for std::process::ExitCode {
    fn from(err: &AnalyticsError) -> Self {
        let code: u8 = match err {
            AnalyticsError::Io(_) => 1,
            AnalyticsError::ConfigParse { .. }
            | AnalyticsError::ConfigMissing { .. }
            | AnalyticsError::ConfigInvalid { .. } => 2,
            AnalyticsError::Data { .. } | AnalyticsError::DuplicateDate { .. } => 3,
            AnalyticsError::InsufficientData { .. }
            | AnalyticsError::UnsupportedIndicator { .. }
            | AnalyticsError::InvalidParameter { .. } => 4,
            AnalyticsError::EmptyPortfolio => 5,
        };
        std::process::ExitCode::from(code)
    }
}

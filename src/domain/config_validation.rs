//! Configuration validation.
//!
//! Checks every analytics setting before a run starts, so a bad value is
//! reported with its section and key instead of surfacing as odd numbers.

use crate::domain::beta::parse_beta;
use crate::domain::error::AnalyticsError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const SECTION: &str = "analytics";
pub const MAX_LOOKBACK_DAYS: i64 = 3650;

pub fn validate_analytics_config(config: &dyn ConfigPort) -> Result<(), AnalyticsError> {
    validate_risk_free_rate(config)?;
    validate_lookback_days(config)?;
    validate_as_of(config)?;
    validate_betas(config)?;
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), AnalyticsError> {
    let Some(raw) = config.get_string(SECTION, "risk_free_rate") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if (0.0..1.0).contains(&value) => Ok(()),
        _ => Err(invalid(
            "risk_free_rate",
            "risk_free_rate must be a number between 0 and 1",
        )),
    }
}

fn validate_lookback_days(config: &dyn ConfigPort) -> Result<(), AnalyticsError> {
    let Some(raw) = config.get_string(SECTION, "lookback_days") else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(value) if (2..=MAX_LOOKBACK_DAYS).contains(&value) => Ok(()),
        _ => Err(invalid(
            "lookback_days",
            &format!("lookback_days must be an integer between 2 and {}", MAX_LOOKBACK_DAYS),
        )),
    }
}

fn validate_as_of(config: &dyn ConfigPort) -> Result<(), AnalyticsError> {
    parse_as_of(config).map(|_| ())
}

pub(crate) fn parse_as_of(config: &dyn ConfigPort) -> Result<Option<NaiveDate>, AnalyticsError> {
    match config.get_string(SECTION, "as_of") {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| invalid("as_of", "invalid as_of format, expected YYYY-MM-DD")),
    }
}

fn validate_betas(config: &dyn ConfigPort) -> Result<(), AnalyticsError> {
    for (key, raw) in config.get_section("betas") {
        parse_beta(&key, &raw)?;
    }
    Ok(())
}

fn invalid(key: &str, reason: &str) -> AnalyticsError {
    AnalyticsError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_analytics_config_passes() {
        let config = make_config(
            r#"
[analytics]
risk_free_rate = 0.15
lookback_days = 60
as_of = 2024-06-28

[betas]
THYAO = 1.3
"#,
        );
        assert!(validate_analytics_config(&config).is_ok());
    }

    #[test]
    fn empty_config_passes() {
        assert!(validate_analytics_config(&make_config("")).is_ok());
    }

    #[test]
    fn risk_free_rate_out_of_range_fails() {
        let config = make_config("[analytics]\nrisk_free_rate = 1.5\n");
        let err = validate_analytics_config(&config).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::ConfigInvalid { ref key, .. } if key == "risk_free_rate"
        ));
    }

    #[test]
    fn risk_free_rate_negative_fails() {
        let config = make_config("[analytics]\nrisk_free_rate = -0.01\n");
        assert!(validate_analytics_config(&config).is_err());
    }

    #[test]
    fn risk_free_rate_text_fails() {
        let config = make_config("[analytics]\nrisk_free_rate = high\n");
        assert!(validate_analytics_config(&config).is_err());
    }

    #[test]
    fn lookback_too_short_fails() {
        let config = make_config("[analytics]\nlookback_days = 1\n");
        let err = validate_analytics_config(&config).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::ConfigInvalid { ref key, .. } if key == "lookback_days"
        ));
    }

    #[test]
    fn invalid_as_of_format_fails() {
        let config = make_config("[analytics]\nas_of = 28/06/2024\n");
        let err = validate_analytics_config(&config).unwrap_err();
        assert!(matches!(err, AnalyticsError::ConfigInvalid { ref key, .. } if key == "as_of"));
    }

    #[test]
    fn non_numeric_beta_fails() {
        let config = make_config("[betas]\nTHYAO = steep\n");
        let err = validate_analytics_config(&config).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::ConfigInvalid { ref section, .. } if section == "betas"
        ));
    }
}

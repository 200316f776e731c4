//! Typed indicator configuration from loosely-typed parameter bags.
//!
//! Recognized keys per indicator:
//!
//! | Indicator  | Keys (default)                      |
//! |------------|-------------------------------------|
//! | SMA, EMA   | `period` (20)                       |
//! | RSI        | `period` (14)                       |
//! | MACD       | `fast` (12), `slow` (26), `signal` (9) |
//! | BOLLINGER  | `period` (20), `stddev` (2.0)       |
//! | STOCHASTIC | `k_period` (14), `d_period` (3)     |
//! | WILLIAMS_R | `period` (14)                       |
//! | CCI        | `period` (20)                       |
//!
//! Absent keys take the default. Unparsable values also take the default and
//! log a warning. Values that parse but cannot be computed with (zero periods,
//! `fast >= slow`, a negative multiplier) are rejected.

use std::collections::HashMap;
use std::str::FromStr;

use crate::domain::error::AnalyticsError;
use crate::domain::indicator::{IndicatorConfig, IndicatorKind, bollinger, macd, stochastic};

impl IndicatorConfig {
    pub fn default_for(kind: IndicatorKind) -> Self {
        match kind {
            IndicatorKind::Sma => IndicatorConfig::Sma { period: 20 },
            IndicatorKind::Ema => IndicatorConfig::Ema { period: 20 },
            IndicatorKind::Rsi => IndicatorConfig::Rsi { period: 14 },
            IndicatorKind::Macd => IndicatorConfig::Macd {
                fast: macd::DEFAULT_FAST,
                slow: macd::DEFAULT_SLOW,
                signal: macd::DEFAULT_SIGNAL,
            },
            IndicatorKind::Bollinger => IndicatorConfig::Bollinger {
                period: bollinger::DEFAULT_PERIOD,
                stddev_mult: bollinger::DEFAULT_STDDEV_MULT,
            },
            IndicatorKind::Stochastic => IndicatorConfig::Stochastic {
                k_period: stochastic::DEFAULT_K_PERIOD,
                d_period: stochastic::DEFAULT_D_PERIOD,
            },
            IndicatorKind::WilliamsR => IndicatorConfig::WilliamsR { period: 14 },
            IndicatorKind::Cci => IndicatorConfig::Cci { period: 20 },
        }
    }

    pub fn from_params(
        kind: IndicatorKind,
        params: &HashMap<String, String>,
    ) -> Result<Self, AnalyticsError> {
        let bag = ParamBag { kind, params };
        let config = match IndicatorConfig::default_for(kind) {
            IndicatorConfig::Sma { period } => IndicatorConfig::Sma {
                period: bag.get("period", period),
            },
            IndicatorConfig::Ema { period } => IndicatorConfig::Ema {
                period: bag.get("period", period),
            },
            IndicatorConfig::Rsi { period } => IndicatorConfig::Rsi {
                period: bag.get("period", period),
            },
            IndicatorConfig::Macd { fast, slow, signal } => IndicatorConfig::Macd {
                fast: bag.get("fast", fast),
                slow: bag.get("slow", slow),
                signal: bag.get("signal", signal),
            },
            IndicatorConfig::Bollinger {
                period,
                stddev_mult,
            } => IndicatorConfig::Bollinger {
                period: bag.get("period", period),
                stddev_mult: bag.get("stddev", stddev_mult),
            },
            IndicatorConfig::Stochastic { k_period, d_period } => IndicatorConfig::Stochastic {
                k_period: bag.get("k_period", k_period),
                d_period: bag.get("d_period", d_period),
            },
            IndicatorConfig::WilliamsR { period } => IndicatorConfig::WilliamsR {
                period: bag.get("period", period),
            },
            IndicatorConfig::Cci { period } => IndicatorConfig::Cci {
                period: bag.get("period", period),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        let kind = self.kind();
        match *self {
            IndicatorConfig::Sma { period }
            | IndicatorConfig::Ema { period }
            | IndicatorConfig::Rsi { period }
            | IndicatorConfig::WilliamsR { period }
            | IndicatorConfig::Cci { period } => require_positive(kind, "period", period),
            IndicatorConfig::Macd { fast, slow, signal } => {
                require_positive(kind, "fast", fast)?;
                require_positive(kind, "slow", slow)?;
                require_positive(kind, "signal", signal)?;
                if fast >= slow {
                    return Err(invalid(kind, "fast", "fast period must be shorter than slow"));
                }
                Ok(())
            }
            IndicatorConfig::Bollinger {
                period,
                stddev_mult,
            } => {
                require_positive(kind, "period", period)?;
                if !stddev_mult.is_finite() || stddev_mult < 0.0 {
                    return Err(invalid(kind, "stddev", "multiplier must be a non-negative number"));
                }
                Ok(())
            }
            IndicatorConfig::Stochastic { k_period, d_period } => {
                require_positive(kind, "k_period", k_period)?;
                require_positive(kind, "d_period", d_period)
            }
        }
    }
}

struct ParamBag<'a> {
    kind: IndicatorKind,
    params: &'a HashMap<String, String>,
}

impl ParamBag<'_> {
    fn get<T: FromStr + Copy + std::fmt::Display>(&self, key: &str, default: T) -> T {
        match self.params.get(key) {
            None => default,
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(value) => value,
                Err(_) => {
                    tracing::warn!(
                        indicator = %self.kind,
                        key,
                        value = %raw,
                        fallback = %default,
                        "unparsable indicator parameter, using default"
                    );
                    default
                }
            },
        }
    }
}

fn require_positive(kind: IndicatorKind, key: &str, value: usize) -> Result<(), AnalyticsError> {
    if value == 0 {
        return Err(invalid(kind, key, "must be greater than zero"));
    }
    Ok(())
}

fn invalid(kind: IndicatorKind, key: &str, reason: &str) -> AnalyticsError {
    AnalyticsError::InvalidParameter {
        indicator: kind.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

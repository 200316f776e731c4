//! Portfolio risk analysis.

use std::collections::HashMap;
use std::fmt;

use super::beta::{BetaSource, portfolio_beta};
use super::config::AnalyticsConfig;
use super::error::AnalyticsError;
use super::holding::{Holding, validate_holdings};
use super::metrics::{TRADING_DAYS_PER_YEAR, mean, value_at_risk, volatility};
use super::ohlcv::PriceSeries;
use super::returns::historical_returns;

/// Assumed daily market return used as the tracking benchmark.
pub const ASSUMED_MARKET_DAILY_RETURN: f64 = 0.0003;
/// Annualized volatility that maps to a full volatility score.
pub const VOLATILITY_CEILING: f64 = 0.5;
/// Daily 95% VaR that maps to a full VaR score.
pub const VAR_CEILING: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 0.3 {
            RiskLevel::Low
        } else if score < 0.6 {
            RiskLevel::Medium
        } else if score < 0.8 {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::VeryHigh => "Very High Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RiskAnalysis {
    pub volatility: f64,
    pub var_95: f64,
    pub var_99: f64,
    /// Normalized to [0, 1].
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub beta: f64,
    pub tracking_error: f64,
    pub downside_deviation: f64,
}

/// Mean of the capped volatility and VaR scores.
pub fn risk_score(volatility: f64, var_95: f64) -> f64 {
    let volatility_score = (volatility / VOLATILITY_CEILING).min(1.0);
    let var_score = (var_95 / VAR_CEILING).min(1.0);
    (volatility_score + var_score) / 2.0
}

pub fn tracking_error(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let active: Vec<f64> = returns
        .iter()
        .map(|r| r - ASSUMED_MARKET_DAILY_RETURN)
        .collect();
    volatility(&active)
}

/// Annualized root-mean-square shortfall below `threshold`; 0 when no
/// return falls below it.
pub fn downside_deviation(returns: &[f64], threshold: f64) -> f64 {
    let shortfall: Vec<f64> = returns
        .iter()
        .filter(|&&r| r < threshold)
        .map(|r| (r - threshold).powi(2))
        .collect();
    if shortfall.is_empty() {
        return 0.0;
    }
    (mean(&shortfall) * TRADING_DAYS_PER_YEAR).sqrt()
}

/// Risk statistics over a return series already derived for the holdings.
pub fn risk_from_returns(returns: &[f64], beta: f64) -> RiskAnalysis {
    let volatility = volatility(returns);
    let var_95 = value_at_risk(returns, 0.95);
    let var_99 = value_at_risk(returns, 0.99);
    let risk_score = risk_score(volatility, var_95);

    RiskAnalysis {
        volatility,
        var_95,
        var_99,
        risk_score,
        risk_level: RiskLevel::from_score(risk_score),
        beta,
        tracking_error: tracking_error(returns),
        downside_deviation: downside_deviation(returns, 0.0),
    }
}

pub fn calculate_risk_analysis(
    holdings: &[Holding],
    prices: &HashMap<String, PriceSeries>,
    config: &AnalyticsConfig,
    betas: &dyn BetaSource,
) -> Result<RiskAnalysis, AnalyticsError> {
    if holdings.is_empty() {
        return Err(AnalyticsError::EmptyPortfolio);
    }
    validate_holdings(holdings)?;

    let returns = config
        .resolve_as_of(prices)
        .map(|d| historical_returns(holdings, prices, d, config.lookback_days))
        .unwrap_or_default();

    let analysis = risk_from_returns(&returns, portfolio_beta(holdings, betas));
    tracing::debug!(
        returns = returns.len(),
        risk_score = analysis.risk_score,
        level = %analysis.risk_level,
        "risk analysis computed"
    );
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::beta::StaticBetaTable;

    #[test]
    fn invalid_holding_is_a_data_error() {
        let holdings = vec![Holding::new("ASELS", 0, 50.0, 40.0)];
        let err = calculate_risk_analysis(
            &holdings,
            &HashMap::new(),
            &AnalyticsConfig::default(),
            &StaticBetaTable::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalyticsError::Data { .. }));
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.3), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.6), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.8), RiskLevel::VeryHigh);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::VeryHigh);
    }

    #[test]
    fn score_is_capped() {
        assert!((risk_score(2.0, 0.5) - 1.0).abs() < f64::EPSILON);
        assert!((risk_score(0.25, 0.05) - 0.5).abs() < 1e-12);
        assert_eq!(risk_score(0.0, 0.0), 0.0);
    }

    #[test]
    fn downside_deviation_ignores_gains() {
        assert_eq!(downside_deviation(&[0.01, 0.02], 0.0), 0.0);
        assert_eq!(downside_deviation(&[], 0.0), 0.0);
        let dd = downside_deviation(&[0.01, -0.02], 0.0);
        assert!((dd - (0.0004f64 * 252.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn tracking_error_of_shifted_series_matches_volatility() {
        let returns = [0.01, -0.01, 0.02, 0.0];
        assert!((tracking_error(&returns) - volatility(&returns)).abs() < 1e-12);
        assert_eq!(tracking_error(&[]), 0.0);
    }

    #[test]
    fn empty_portfolio_is_error() {
        let err = calculate_risk_analysis(
            &[],
            &HashMap::new(),
            &AnalyticsConfig::default(),
            &StaticBetaTable::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalyticsError::EmptyPortfolio));
    }

    #[test]
    fn no_history_is_low_risk() {
        let holdings = vec![Holding::new("GARAN", 100, 50.0, 55.0)];
        let analysis = calculate_risk_analysis(
            &holdings,
            &HashMap::new(),
            &AnalyticsConfig::default(),
            &StaticBetaTable::default(),
        )
        .unwrap();
        assert_eq!(analysis.volatility, 0.0);
        assert_eq!(analysis.risk_level, RiskLevel::Low);
        assert!((analysis.beta - 1.1).abs() < 1e-12);
    }

    #[test]
    fn risk_from_volatile_returns() {
        let returns: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 0.08 } else { -0.08 }).collect();
        let analysis = risk_from_returns(&returns, 1.0);
        assert!((analysis.var_95 - 0.08).abs() < 1e-12);
        assert_eq!(analysis.risk_level, RiskLevel::VeryHigh);
    }
}

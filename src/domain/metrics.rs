//! Return and risk-adjusted performance statistics.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

use super::beta::{BetaSource, portfolio_beta};
use super::config::AnalyticsConfig;
use super::holding::Holding;
use super::ohlcv::PriceSeries;
use super::portfolio::Valuation;
use super::returns::historical_returns;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Sortino ratio, or the marker for a return series with no downside.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SortinoRatio {
    Finite(f64),
    NoDownsideRisk,
}

impl SortinoRatio {
    pub fn value(&self) -> Option<f64> {
        match self {
            SortinoRatio::Finite(v) => Some(*v),
            SortinoRatio::NoDownsideRisk => None,
        }
    }
}

impl Default for SortinoRatio {
    fn default() -> Self {
        SortinoRatio::Finite(0.0)
    }
}

impl fmt::Display for SortinoRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortinoRatio::Finite(v) => write!(f, "{:.4}", v),
            SortinoRatio::NoDownsideRisk => f.write_str("no downside risk"),
        }
    }
}

/// Portfolio performance summary. `Default` is the all-zero value reported
/// for an empty portfolio.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PortfolioMetrics {
    pub total_value: f64,
    pub total_cost: f64,
    pub total_profit_loss: f64,
    pub total_profit_loss_pct: f64,
    pub daily_return: f64,
    pub expected_annual_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: SortinoRatio,
    pub max_drawdown: f64,
    pub beta: f64,
    /// Last date of the return window; `None` when no window could be placed.
    pub as_of: Option<NaiveDate>,
    pub return_count: usize,
}

pub fn calculate_portfolio_metrics(
    holdings: &[Holding],
    prices: &HashMap<String, PriceSeries>,
    config: &AnalyticsConfig,
    betas: &dyn BetaSource,
) -> PortfolioMetrics {
    if holdings.is_empty() {
        return PortfolioMetrics::default();
    }

    let as_of = config.resolve_as_of(prices);
    let returns = as_of
        .map(|d| historical_returns(holdings, prices, d, config.lookback_days))
        .unwrap_or_default();
    metrics_from_returns(holdings, &returns, as_of, config, betas)
}

/// Metrics over an already computed daily return series ending at `as_of`.
pub fn metrics_from_returns(
    holdings: &[Holding],
    returns: &[f64],
    as_of: Option<NaiveDate>,
    config: &AnalyticsConfig,
    betas: &dyn BetaSource,
) -> PortfolioMetrics {
    if holdings.is_empty() {
        return PortfolioMetrics::default();
    }

    let valuation = Valuation::of(holdings);
    let volatility = volatility(returns);
    let expected_annual_return = expected_annual_return(returns);
    let metrics = PortfolioMetrics {
        total_value: valuation.total_value,
        total_cost: valuation.total_cost,
        total_profit_loss: valuation.total_profit_loss,
        total_profit_loss_pct: valuation.total_profit_loss_pct,
        daily_return: valuation.daily_return,
        expected_annual_return,
        volatility,
        sharpe_ratio: sharpe_ratio(expected_annual_return, config.risk_free_rate, volatility),
        sortino_ratio: sortino_ratio(returns, config.risk_free_rate),
        max_drawdown: max_drawdown(returns),
        beta: portfolio_beta(holdings, betas),
        as_of,
        return_count: returns.len(),
    };

    tracing::debug!(
        holdings = holdings.len(),
        returns = metrics.return_count,
        volatility = metrics.volatility,
        "portfolio metrics computed"
    );
    metrics
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0 for fewer than 2 values.
pub fn population_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Annualized volatility of daily returns.
pub fn volatility(returns: &[f64]) -> f64 {
    population_stddev(returns) * TRADING_DAYS_PER_YEAR.sqrt()
}

pub fn expected_annual_return(returns: &[f64]) -> f64 {
    mean(returns) * TRADING_DAYS_PER_YEAR
}

pub fn sharpe_ratio(expected_annual_return: f64, risk_free_rate: f64, volatility: f64) -> f64 {
    if volatility > 0.0 {
        (expected_annual_return - risk_free_rate) / volatility
    } else {
        0.0
    }
}

pub fn sortino_ratio(returns: &[f64], risk_free_rate: f64) -> SortinoRatio {
    if returns.is_empty() {
        return SortinoRatio::Finite(0.0);
    }

    let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;
    let excess: Vec<f64> = returns.iter().map(|r| r - daily_rf).collect();
    let downside: Vec<f64> = excess.iter().copied().filter(|&r| r < 0.0).collect();
    if downside.is_empty() {
        return SortinoRatio::NoDownsideRisk;
    }

    let downside_sq: Vec<f64> = downside.iter().map(|r| r * r).collect();
    let downside_dev = mean(&downside_sq).sqrt() * TRADING_DAYS_PER_YEAR.sqrt();
    if downside_dev > 0.0 {
        SortinoRatio::Finite(mean(&excess) * TRADING_DAYS_PER_YEAR / downside_dev)
    } else {
        SortinoRatio::Finite(0.0)
    }
}

/// Largest peak-to-trough decline of the compounded return index.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    compute_drawdown(&cumulative_index(returns))
}

/// Compounded value of 1.0 after each return, starting with 1.0 itself.
fn cumulative_index(returns: &[f64]) -> Vec<f64> {
    let mut index = Vec::with_capacity(returns.len() + 1);
    index.push(1.0);
    let mut value = 1.0;
    for r in returns {
        value *= 1.0 + r;
        index.push(value);
    }
    index
}

fn compute_drawdown(curve: &[f64]) -> f64 {
    let Some(&first) = curve.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &value in curve {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Historical value-at-risk: the loss at the `(1 - confidence)` quantile of
/// daily returns, as a positive fraction.
pub fn value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    // 1 - 0.95 is slightly above 0.05 in binary; snap before taking the ceiling
    let n = sorted.len();
    let tail = (1.0 - confidence) * n as f64;
    let raw = (tail - 1e-9).ceil() as i64 - 1;
    let index = raw.clamp(0, n as i64 - 1) as usize;
    sorted[index].abs()
}

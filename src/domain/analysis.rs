//! Combined portfolio analysis.

use std::collections::HashMap;

use super::beta::BetaSource;
use super::config::AnalyticsConfig;
use super::diversification::{
    DiversificationAnalysis, SectorLookup, calculate_diversification_analysis,
};
use super::error::AnalyticsError;
use super::holding::Holding;
use super::metrics::{PortfolioMetrics, metrics_from_returns};
use super::ohlcv::PriceSeries;
use super::risk::{RiskAnalysis, risk_from_returns};
use super::returns::historical_returns;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PortfolioAnalysis {
    pub metrics: PortfolioMetrics,
    pub risk: RiskAnalysis,
    pub diversification: DiversificationAnalysis,
}

/// Metrics, risk and diversification of one portfolio over the same return
/// window.
pub fn analyze_portfolio(
    holdings: &[Holding],
    prices: &HashMap<String, PriceSeries>,
    config: &AnalyticsConfig,
    betas: &dyn BetaSource,
    sectors: &dyn SectorLookup,
) -> Result<PortfolioAnalysis, AnalyticsError> {
    if holdings.is_empty() {
        return Err(AnalyticsError::EmptyPortfolio);
    }

    let diversification = calculate_diversification_analysis(holdings, sectors)?;
    let as_of = config.resolve_as_of(prices);
    let returns = as_of
        .map(|d| historical_returns(holdings, prices, d, config.lookback_days))
        .unwrap_or_default();
    let metrics = metrics_from_returns(holdings, &returns, as_of, config, betas);
    let risk = risk_from_returns(&returns, metrics.beta);

    tracing::info!(
        holdings = holdings.len(),
        total_value = metrics.total_value,
        risk_level = %risk.risk_level,
        diversification = diversification.diversification_score,
        "portfolio analyzed"
    );

    Ok(PortfolioAnalysis {
        metrics,
        risk,
        diversification,
    })
}

//! Rule-based advice derived from a portfolio analysis.

use chrono::{Duration, NaiveDate};

use super::analysis::PortfolioAnalysis;
use super::risk::RiskLevel;

pub const REVIEW_INTERVAL_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Recommendations {
    pub general: Vec<String>,
    pub rebalance: Vec<String>,
    pub diversification_tips: Vec<String>,
    pub risk_assessment: String,
    /// 0 to 100, one decimal.
    pub overall_score: f64,
    pub analysis_date: Option<NaiveDate>,
    pub next_review: Option<NaiveDate>,
}

pub fn recommend(analysis: &PortfolioAnalysis) -> Recommendations {
    let risk_score = analysis.risk.risk_score;
    let diversification_score = analysis.diversification.diversification_score;
    let concentration = analysis.diversification.concentration_risk;
    let sharpe = analysis.metrics.sharpe_ratio;
    let volatility = analysis.risk.volatility;

    let mut general = Vec::new();
    let mut rebalance = Vec::new();
    let mut tips = Vec::new();

    if risk_score > 0.8 {
        general.push(
            "Portfolio risk is high. Consider shifting toward more conservative assets."
                .to_string(),
        );
        rebalance.push(
            "Move 20-30% of the portfolio into safe assets such as government bonds or gold."
                .to_string(),
        );
    } else if risk_score < 0.3 {
        general.push(
            "Portfolio is very conservative. Growth stocks could lift expected return.".to_string(),
        );
    }

    if diversification_score < 0.6 {
        tips.push("Portfolio is under-diversified. Add holdings from other sectors.".to_string());
        tips.push("Aim to hold stocks from at least 5-6 different sectors.".to_string());
    }

    if concentration > 0.4 {
        rebalance.push(
            "A single holding exceeds 40% of the portfolio. Reduce that position.".to_string(),
        );
        tips.push("Keep every holding below 25% of the portfolio.".to_string());
    }

    if sharpe < 0.5 {
        general.push(
            "Risk-adjusted return is low. Review the portfolio composition.".to_string(),
        );
    }

    if volatility > 0.25 {
        general.push("Portfolio volatility is high. Consider adding steadier stocks.".to_string());
    }

    let analysis_date = analysis.metrics.as_of;
    Recommendations {
        general,
        rebalance,
        diversification_tips: tips,
        risk_assessment: risk_assessment(RiskLevel::from_score(risk_score)).to_string(),
        overall_score: overall_score(diversification_score, risk_score, sharpe),
        analysis_date,
        next_review: analysis_date.map(|d| d + Duration::days(REVIEW_INTERVAL_DAYS)),
    }
}

pub fn risk_assessment(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Low-risk, conservative portfolio",
        RiskLevel::Medium => "Medium-risk, balanced portfolio",
        RiskLevel::High => "High-risk, growth-oriented portfolio",
        RiskLevel::VeryHigh => "Very high-risk, speculative portfolio",
    }
}

/// Weighted 0-100 score; Sharpe is clamped to [0, 2] before scaling.
pub fn overall_score(diversification_score: f64, risk_score: f64, sharpe: f64) -> f64 {
    let normalized_sharpe = sharpe.clamp(0.0, 2.0) / 2.0;
    let score =
        diversification_score * 0.4 + (1.0 - risk_score) * 0.3 + normalized_sharpe * 0.3;
    (score * 1000.0).round() / 10.0
}

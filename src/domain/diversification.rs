//! Sector allocation and concentration.

use std::collections::{BTreeMap, HashMap};

use super::error::AnalyticsError;
use super::holding::{Holding, validate_holdings};
use super::portfolio::value_weights;
use crate::ports::config_port::ConfigPort;

/// Distinct sectors at which sector coverage scores fully.
pub const TARGET_SECTOR_COUNT: f64 = 8.0;
pub const DEFAULT_SECTOR: &str = "Other";

pub trait SectorLookup {
    fn sector(&self, instrument: &str) -> String;
}

impl<F> SectorLookup for F
where
    F: Fn(&str) -> String,
{
    fn sector(&self, instrument: &str) -> String {
        self(instrument)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectorTable {
    sectors: HashMap<String, String>,
}

impl SectorTable {
    pub fn empty() -> Self {
        SectorTable {
            sectors: HashMap::new(),
        }
    }

    /// Built-in classification of common BIST instruments.
    pub fn bist_defaults() -> Self {
        let mut table = Self::empty();
        for (instrument, sector) in [
            ("THYAO", "Transportation"),
            ("PGSUS", "Transportation"),
            ("GARAN", "Financial Services"),
            ("AKBNK", "Financial Services"),
            ("YKBNK", "Financial Services"),
            ("VAKBN", "Financial Services"),
            ("BIMAS", "Industry"),
            ("EREGL", "Industry"),
            ("SISE", "Energy"),
            ("TUPRS", "Energy"),
            ("ASELS", "Technology"),
            ("TTKOM", "Telecommunications"),
            ("TCELL", "Telecommunications"),
            ("FROTO", "Automotive"),
            ("ARCLK", "Automotive"),
        ] {
            table = table.with_sector(instrument, sector);
        }
        table
    }

    pub fn with_sector(mut self, instrument: &str, sector: &str) -> Self {
        self.sectors
            .insert(instrument.to_uppercase(), sector.trim().to_string());
        self
    }

    /// The built-in table overridden by the `[sectors]` config section.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        config
            .get_section("sectors")
            .into_iter()
            .filter(|(_, sector)| !sector.trim().is_empty())
            .fold(Self::bist_defaults(), |table, (instrument, sector)| {
                table.with_sector(&instrument, &sector)
            })
    }
}

impl Default for SectorTable {
    fn default() -> Self {
        Self::bist_defaults()
    }
}

impl SectorLookup for SectorTable {
    fn sector(&self, instrument: &str) -> String {
        self.sectors
            .get(&instrument.to_uppercase())
            .cloned()
            .unwrap_or_else(|| DEFAULT_SECTOR.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiversificationAnalysis {
    /// Share of total value per sector; shares sum to 1.
    pub sector_allocation: BTreeMap<String, f64>,
    /// Herfindahl index over holding weights.
    pub concentration_risk: f64,
    pub diversification_score: f64,
    pub number_of_holdings: usize,
    pub largest_holding_pct: f64,
    pub effective_number_of_stocks: f64,
}

/// Herfindahl-Hirschman index of the weights.
pub fn herfindahl_index(weights: &[f64]) -> f64 {
    weights.iter().map(|w| w * w).sum()
}

pub fn diversification_score(concentration_risk: f64, sector_count: usize) -> f64 {
    let sector_score = (sector_count as f64 / TARGET_SECTOR_COUNT).min(1.0);
    ((1.0 - concentration_risk) + sector_score) / 2.0
}

/// Fails with `EmptyPortfolio` when there are no holdings or they carry no
/// market value.
pub fn calculate_diversification_analysis(
    holdings: &[Holding],
    sectors: &dyn SectorLookup,
) -> Result<DiversificationAnalysis, AnalyticsError> {
    validate_holdings(holdings)?;
    let weighted: Vec<(&Holding, f64)> = value_weights(holdings).collect();
    if weighted.is_empty() {
        return Err(AnalyticsError::EmptyPortfolio);
    }

    let mut sector_allocation: BTreeMap<String, f64> = BTreeMap::new();
    for (holding, weight) in &weighted {
        *sector_allocation
            .entry(sectors.sector(&holding.instrument))
            .or_insert(0.0) += weight;
    }

    let weights: Vec<f64> = weighted.iter().map(|(_, w)| *w).collect();
    let concentration_risk = herfindahl_index(&weights);
    let largest_holding_pct = weights.iter().copied().fold(0.0, f64::max);
    let effective_number_of_stocks = if concentration_risk > 0.0 {
        1.0 / concentration_risk
    } else {
        0.0
    };

    Ok(DiversificationAnalysis {
        diversification_score: diversification_score(concentration_risk, sector_allocation.len()),
        sector_allocation,
        concentration_risk,
        number_of_holdings: holdings.len(),
        largest_holding_pct,
        effective_number_of_stocks,
    })
}

//! Core domain types and logic.

pub mod analysis;
pub mod beta;
pub mod config;
pub mod config_validation;
pub mod diversification;
pub mod error;
pub mod holding;
pub mod indicator;
pub mod metrics;
pub mod ohlcv;
pub mod portfolio;
pub mod recommendation;
pub mod returns;
pub mod risk;
pub mod signal;

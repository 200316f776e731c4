//! bistfolio: technical indicators and portfolio risk analytics for
//! equity price series.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. The domain performs no I/O.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;

//! Breakscan Core — domain types, indicators, the breakout rule, data providers.
//!
//! This crate contains everything needed to screen a single instrument:
//! - Domain types (bars, instrument series)
//! - Indicator library (EMA, SMA, RSI, Bollinger Bands, Guppy oscillator)
//! - Series validator and the four-condition breakout evaluator
//! - Screener configuration (TOML, validated, hashable)
//! - Data-provider trait with Yahoo Finance, CSV-directory and synthetic adapters
//! - Universe parsing from ticker lists and CSV/xlsx files
//!
//! Everything here is synchronous and free of shared mutable state, so one
//! series can be screened on any thread.

pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod screen;
pub mod table;
pub mod universe;

pub use config::ScreenerConfig;
pub use screen::{screen_series, ScreenHit, SeriesOutcome};

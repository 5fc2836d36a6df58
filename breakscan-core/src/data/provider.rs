//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, a CSV
//! directory, synthetic bars) so the screener can swap implementations and
//! mock them in tests. The screener treats every error and an empty series
//! the same way: the symbol is skipped.

use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::domain::{InstrumentSeries, SeriesError};

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("no data file for '{symbol}' at {path}")]
    NoLocalData { symbol: String, path: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("series error: {0}")]
    Series(#[from] SeriesError),

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("lookback of {lookback_days} days before {end} is out of the calendar range")]
    DateOutOfRange { end: NaiveDate, lookback_days: u32 },

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for market-data sources.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over an inclusive date range.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<InstrumentSeries, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool {
        true
    }

    /// Fetch the `lookback_days` calendar days ending at `end`.
    fn fetch_recent(
        &self,
        symbol: &str,
        end: NaiveDate,
        lookback_days: u32,
    ) -> Result<InstrumentSeries, DataError> {
        let start = end
            .checked_sub_days(Days::new(u64::from(lookback_days)))
            .ok_or(DataError::DateOutOfRange { end, lookback_days })?;
        self.fetch(symbol, start, end)
    }
}

/// Progress callback for multi-symbol operations.
pub trait ScanProgress: Send + Sync {
    /// Called when a symbol's pipeline starts.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, evaluated: usize, skipped: usize, total: usize);
}

/// Progress reporter that prints to stderr, keeping stdout for the report.
pub struct StderrProgress;

impl ScanProgress for StderrProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        eprintln!("[{}/{}] Screening {symbol}...", index + 1, total);
    }

    fn on_batch_complete(&self, evaluated: usize, skipped: usize, total: usize) {
        eprintln!("\nScan complete: {evaluated}/{total} evaluated, {skipped} skipped");
    }
}

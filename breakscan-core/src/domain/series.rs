//! InstrumentSeries — one symbol's chronological bar history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::Bar;

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("{symbol}: bar at index {index} ({date}) is not after the previous bar")]
    Unordered {
        symbol: String,
        index: usize,
        date: NaiveDate,
    },
}

/// Bars for one symbol, strictly ascending by date.
///
/// The engine only reads from a series; every indicator is a new sequence
/// derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl InstrumentSeries {
    /// Build a series, rejecting duplicate or out-of-order dates.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        if let Some(index) = bars
            .windows(2)
            .position(|pair| pair[1].date <= pair[0].date)
        {
            return Err(SeriesError::Unordered {
                date: bars[index + 1].date,
                index: index + 1,
                symbol,
            });
        }
        Ok(Self { symbol, bars })
    }

    /// Canonicalize provider output: drop bars failing [`Bar::is_sane`], sort
    /// by date and drop repeated dates (the first bar for a date wins).
    pub fn from_unsorted(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        let symbol = symbol.into();
        let received = bars.len();
        bars.retain(Bar::is_sane);
        if bars.len() < received {
            debug!(
                symbol = %symbol,
                dropped = received - bars.len(),
                "dropped void or inconsistent bars"
            );
        }
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self { symbol, bars }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Volumes as f64 for the rolling-mean machinery.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }
}

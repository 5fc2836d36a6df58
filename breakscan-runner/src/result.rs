//! Screen result, pass summary and ranking.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use breakscan_core::indicators::IndicatorFrame;
use breakscan_core::screen::ScreenHit;

/// Counts for one screening pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Distinct symbols handed to the orchestrator.
    pub requested: usize,
    /// Symbols that passed validation and went through the rule.
    pub evaluated: usize,
    /// Symbols whose fetch failed or returned no bars.
    pub fetch_failed: usize,
    /// Symbols rejected for too little history.
    pub insufficient_history: usize,
    /// Symbols never attempted because the pass was cancelled.
    pub not_attempted: usize,
    pub hits: usize,
    pub cancelled: bool,
}

impl ScanSummary {
    /// Every symbol that was dropped without an evaluation.
    pub fn skipped(&self) -> usize {
        self.fetch_failed + self.insufficient_history + self.not_attempted
    }
}

/// Output of one screening pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenResult {
    /// Passing instruments in input order.
    pub hits: Vec<ScreenHit>,
    /// Indicator frames of the hits, keyed by symbol. Charting only.
    pub frames: BTreeMap<String, IndicatorFrame>,
    pub summary: ScanSummary,
    /// BLAKE3 hash of the configuration that produced this result.
    pub config_hash: String,
}

impl ScreenResult {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.hits.iter().map(|h| h.symbol.as_str()).collect()
    }

    pub fn frame(&self, symbol: &str) -> Option<&IndicatorFrame> {
        self.frames.get(symbol)
    }

    /// Hits ordered by `key`. Ties fall back to symbol order.
    pub fn sorted_by(&self, key: SortKey, descending: bool) -> Vec<&ScreenHit> {
        let mut hits: Vec<&ScreenHit> = self.hits.iter().collect();
        hits.sort_by(|a, b| {
            let primary = key.compare(a, b);
            let primary = if descending {
                primary.reverse()
            } else {
                primary
            };
            primary.then_with(|| a.symbol.cmp(&b.symbol))
        });
        hits
    }
}

/// Which hit field to rank by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Symbol,
    Close,
    Rsi,
    Guppy,
    /// Oscillator minus trigger.
    GuppySpread,
    Volume,
    /// Volume over its moving average.
    VolumeRatio,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        Self::Symbol,
        Self::Close,
        Self::Rsi,
        Self::Guppy,
        Self::GuppySpread,
        Self::Volume,
        Self::VolumeRatio,
    ];

    /// Numeric value for this key; `None` for `Symbol`.
    pub fn extract(&self, hit: &ScreenHit) -> Option<f64> {
        match self {
            Self::Symbol => None,
            Self::Close => Some(hit.close),
            Self::Rsi => Some(hit.rsi),
            Self::Guppy => Some(hit.guppy_oscillator),
            Self::GuppySpread => Some(hit.guppy_spread()),
            Self::Volume => Some(hit.volume as f64),
            Self::VolumeRatio => Some(hit.volume_ratio()),
        }
    }

    pub fn compare(&self, a: &ScreenHit, b: &ScreenHit) -> Ordering {
        match (self.extract(a), self.extract(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => a.symbol.cmp(&b.symbol),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Close => "close",
            Self::Rsi => "rsi",
            Self::Guppy => "guppy",
            Self::GuppySpread => "guppy-spread",
            Self::Volume => "volume",
            Self::VolumeRatio => "volume-ratio",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown sort key '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

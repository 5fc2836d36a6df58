//! Breakout evaluator — the four-condition rule on the latest bar.
//!
//! 1. close > bollinger_upper
//! 2. volume > volume_multiplier * volume_ma
//! 3. rsi_lower < rsi < rsi_upper
//! 4. guppy_oscillator > guppy_trigger
//!
//! Logical AND, no scoring. Every comparison is strict, so equality at a
//! boundary fails. A missing indicator value fails its condition.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::BreakoutRule;
use crate::domain::Bar;
use crate::indicators::IndicatorRow;

/// Latest-bar snapshot of an instrument that passed the rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenHit {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: f64,
    pub rsi: f64,
    pub guppy_oscillator: f64,
    pub guppy_trigger: f64,
    pub volume: u64,
    pub bollinger_upper: f64,
    pub volume_ma: f64,
}

impl ScreenHit {
    /// Latest volume over its moving average.
    pub fn volume_ratio(&self) -> f64 {
        if self.volume_ma > 0.0 {
            self.volume as f64 / self.volume_ma
        } else {
            f64::INFINITY
        }
    }

    /// Oscillator distance above its trigger.
    pub fn guppy_spread(&self) -> f64 {
        self.guppy_oscillator - self.guppy_trigger
    }
}

/// Per-condition results for one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionChecks {
    pub price_above_band: bool,
    pub volume_surge: bool,
    pub rsi_in_range: bool,
    pub oscillator_confirms: bool,
}

impl ConditionChecks {
    pub fn all(&self) -> bool {
        self.price_above_band && self.volume_surge && self.rsi_in_range && self.oscillator_confirms
    }

    pub fn passed_count(&self) -> usize {
        [
            self.price_above_band,
            self.volume_surge,
            self.rsi_in_range,
            self.oscillator_confirms,
        ]
        .iter()
        .filter(|&&c| c)
        .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakoutDecision {
    pub checks: ConditionChecks,
    /// Present exactly when every check passed.
    pub hit: Option<ScreenHit>,
}

impl BreakoutDecision {
    pub fn is_breakout(&self) -> bool {
        self.hit.is_some()
    }
}

/// Apply `rule` to the latest bar and its indicator row.
pub fn evaluate(
    symbol: &str,
    bar: &Bar,
    row: &IndicatorRow,
    rule: &BreakoutRule,
) -> BreakoutDecision {
    let close = bar.close;
    let volume = bar.volume as f64;

    let checks = ConditionChecks {
        price_above_band: row.bollinger_upper.is_some_and(|upper| close > upper),
        volume_surge: row
            .volume_ma
            .is_some_and(|ma| volume > rule.volume_multiplier * ma),
        rsi_in_range: row
            .rsi
            .is_some_and(|rsi| rule.rsi_lower < rsi && rsi < rule.rsi_upper),
        oscillator_confirms: matches!(
            (row.guppy_oscillator, row.guppy_trigger),
            (Some(osc), Some(trigger)) if osc > trigger
        ),
    };

    let hit = match (checks.all(), row) {
        (
            true,
            IndicatorRow {
                guppy_oscillator: Some(guppy_oscillator),
                guppy_trigger: Some(guppy_trigger),
                rsi: Some(rsi),
                bollinger_upper: Some(bollinger_upper),
                volume_ma: Some(volume_ma),
            },
        ) => Some(ScreenHit {
            symbol: symbol.to_string(),
            date: bar.date,
            close,
            rsi: *rsi,
            guppy_oscillator: *guppy_oscillator,
            guppy_trigger: *guppy_trigger,
            volume: bar.volume,
            bollinger_upper: *bollinger_upper,
            volume_ma: *volume_ma,
        }),
        _ => None,
    };

    BreakoutDecision { checks, hit }
}

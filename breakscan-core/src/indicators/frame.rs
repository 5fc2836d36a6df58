//! IndicatorFrame — every series the breakout rule reads, aligned with the bars.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bollinger::bollinger_bands;
use super::guppy::GuppyOscillator;
use super::rsi::rsi_of_series;
use super::sma::sma_of_series;
use crate::config::IndicatorConfig;
use crate::domain::InstrumentSeries;

/// Indicator columns for one instrument. Every column has one entry per bar;
/// `None` marks a position whose window is not yet populated.
///
/// Derived fresh per screening pass. Kept on hits only so a chart renderer
/// can draw close vs. the upper band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub symbol: String,
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub volume: Vec<u64>,
    pub guppy_oscillator: Vec<Option<f64>>,
    pub guppy_trigger: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub bollinger_upper: Vec<Option<f64>>,
    pub bollinger_middle: Vec<Option<f64>>,
    pub bollinger_lower: Vec<Option<f64>>,
    pub volume_ma: Vec<Option<f64>>,
}

/// One row of the frame: the values the breakout rule compares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub guppy_oscillator: Option<f64>,
    pub guppy_trigger: Option<f64>,
    pub rsi: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub volume_ma: Option<f64>,
}

impl IndicatorRow {
    /// True when every column holds a value.
    pub fn is_complete(&self) -> bool {
        self.guppy_oscillator.is_some()
            && self.guppy_trigger.is_some()
            && self.rsi.is_some()
            && self.bollinger_upper.is_some()
            && self.volume_ma.is_some()
    }
}

impl IndicatorFrame {
    /// Compute every indicator column for `series`.
    pub fn compute(series: &InstrumentSeries, config: &IndicatorConfig) -> Self {
        let closes = series.closes();
        let volumes = series.volumes();

        let gmma = GuppyOscillator::new(
            config.short_spans.clone(),
            config.long_spans.clone(),
            config.trigger_window,
        )
        .lines(&closes);
        let bands = bollinger_bands(&closes, config.bollinger_window, config.bollinger_multiplier);

        Self {
            symbol: series.symbol().to_string(),
            dates: series.dates(),
            volume: series.bars().iter().map(|b| b.volume).collect(),
            rsi: rsi_of_series(&closes, config.rsi_period),
            volume_ma: sma_of_series(&volumes, config.volume_window),
            guppy_oscillator: gmma.oscillator,
            guppy_trigger: gmma.trigger,
            bollinger_upper: bands.upper,
            bollinger_middle: bands.middle,
            bollinger_lower: bands.lower,
            close: closes,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<IndicatorRow> {
        if index >= self.len() {
            return None;
        }
        Some(IndicatorRow {
            guppy_oscillator: self.guppy_oscillator[index],
            guppy_trigger: self.guppy_trigger[index],
            rsi: self.rsi[index],
            bollinger_upper: self.bollinger_upper[index],
            volume_ma: self.volume_ma[index],
        })
    }

    /// Row of the most recent bar.
    pub fn latest(&self) -> Option<IndicatorRow> {
        self.len().checked_sub(1).and_then(|i| self.row(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_series;

    fn ramp(n: usize) -> InstrumentSeries {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        make_series(&closes)
    }

    #[test]
    fn columns_are_aligned() {
        let frame = IndicatorFrame::compute(&ramp(75), &IndicatorConfig::default());
        assert_eq!(frame.len(), 75);
        for col in [
            &frame.guppy_oscillator,
            &frame.guppy_trigger,
            &frame.rsi,
            &frame.bollinger_upper,
            &frame.bollinger_middle,
            &frame.bollinger_lower,
            &frame.volume_ma,
        ] {
            assert_eq!(col.len(), 75);
        }
    }

    #[test]
    fn first_complete_row_is_after_longest_window() {
        let frame = IndicatorFrame::compute(&ramp(75), &IndicatorConfig::default());
        // trigger, bollinger and volume windows of 20 all fill at index 19;
        // RSI(14) fills at 14
        assert!(!frame.row(18).unwrap().is_complete());
        assert!(frame.row(19).unwrap().is_complete());
        assert!(frame.latest().unwrap().is_complete());
        assert!(frame.row(75).is_none());
    }

    #[test]
    fn empty_series_has_no_latest_row() {
        let frame = IndicatorFrame::compute(&make_series(&[]), &IndicatorConfig::default());
        assert!(frame.is_empty());
        assert!(frame.latest().is_none());
    }

    #[test]
    fn short_series_latest_row_incomplete() {
        let frame = IndicatorFrame::compute(&ramp(10), &IndicatorConfig::default());
        let latest = frame.latest().unwrap();
        assert!(!latest.is_complete());
        assert!(latest.guppy_oscillator.is_some());
        assert!(latest.bollinger_upper.is_none());
    }

    #[test]
    fn recompute_is_identical() {
        let series = ramp(90);
        let cfg = IndicatorConfig::default();
        assert_eq!(
            IndicatorFrame::compute(&series, &cfg),
            IndicatorFrame::compute(&series, &cfg)
        );
    }
}

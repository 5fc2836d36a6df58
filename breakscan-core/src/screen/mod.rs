//! Single-instrument screening pipeline: validate → indicators → breakout rule.

pub mod breakout;
pub mod validator;

pub use breakout::{evaluate, BreakoutDecision, ConditionChecks, ScreenHit};
pub use validator::{validate_series, Validation, MIN_HISTORY_BARS};

use crate::config::ScreenerConfig;
use crate::domain::InstrumentSeries;
use crate::indicators::IndicatorFrame;

/// What happened to one series.
#[derive(Debug, Clone)]
pub enum SeriesOutcome {
    /// Rejected by the validator; no indicators computed.
    Skipped(Validation),
    /// Indicators computed and the rule applied.
    Evaluated {
        decision: BreakoutDecision,
        frame: IndicatorFrame,
    },
}

impl SeriesOutcome {
    pub fn hit(&self) -> Option<&ScreenHit> {
        match self {
            Self::Evaluated { decision, .. } => decision.hit.as_ref(),
            Self::Skipped(_) => None,
        }
    }
}

/// Run the full pipeline on one series. Pure: same input, same output.
///
/// The config is not validated here (see [`ScreenerConfig::validate`]); an
/// invalid one leaves indicator columns missing, which can never pass the rule.
pub fn screen_series(series: &InstrumentSeries, config: &ScreenerConfig) -> SeriesOutcome {
    let validation = validate_series(series, config.required_history());
    if !validation.is_accepted() {
        return SeriesOutcome::Skipped(validation);
    }

    let frame = IndicatorFrame::compute(series, &config.indicators);
    let decision = match (series.latest(), frame.latest()) {
        (Some(bar), Some(row)) => evaluate(series.symbol(), bar, &row, &config.rule),
        // unreachable after validation; treat as a failed evaluation
        _ => BreakoutDecision {
            checks: ConditionChecks::default(),
            hit: None,
        },
    };

    SeriesOutcome::Evaluated { decision, frame }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_series;

    #[test]
    fn short_series_is_skipped() {
        let outcome = screen_series(&make_series(&[100.0; 40]), &ScreenerConfig::default());
        assert!(matches!(
            outcome,
            SeriesOutcome::Skipped(Validation::InsufficientData { bars: 40, .. })
        ));
        assert!(outcome.hit().is_none());
    }

    #[test]
    fn invalid_config_is_evaluated_without_hit() {
        let closes: Vec<f64> = (0..90).map(|i| 100.0 * 1.02_f64.powi(i)).collect();
        let mut config = ScreenerConfig::default();
        config.indicators.short_spans.clear();
        config.indicators.trigger_window = 0;
        assert!(config.validate().is_err());

        match screen_series(&make_series(&closes), &config) {
            SeriesOutcome::Evaluated { decision, frame } => {
                assert!(!decision.is_breakout());
                assert!(frame.guppy_oscillator.iter().all(|v| v.is_none()));
            }
            SeriesOutcome::Skipped(v) => panic!("unexpected skip: {v:?}"),
        }
    }

    #[test]
    fn flat_series_is_evaluated_but_not_a_hit() {
        let outcome = screen_series(&make_series(&[100.0; 90]), &ScreenerConfig::default());
        match outcome {
            SeriesOutcome::Evaluated { decision, frame } => {
                assert_eq!(frame.len(), 90);
                assert!(!decision.is_breakout());
                // close == upper band when the band has zero width
                assert!(!decision.checks.price_above_band);
            }
            SeriesOutcome::Skipped(v) => panic!("unexpected skip: {v:?}"),
        }
    }
}

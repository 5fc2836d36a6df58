//! Series validator — minimum-history policy.
//!
//! A series shorter than the longest indicator lookback cannot produce a
//! fully populated latest row, so it is excluded before any computation.
//! Exclusion is not an error: the orchestrator drops the symbol quietly.

use serde::{Deserialize, Serialize};

use crate::domain::InstrumentSeries;

/// Hard floor on bars per series (the 60-span EMA of the slow GMMA group).
pub const MIN_HISTORY_BARS: usize = 60;

/// Outcome of validating one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validation {
    Accepted,
    Empty,
    InsufficientData { bars: usize, required: usize },
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Check `series` against `required` bars (clamped up to [`MIN_HISTORY_BARS`]).
pub fn validate_series(series: &InstrumentSeries, required: usize) -> Validation {
    let required = required.max(MIN_HISTORY_BARS);
    if series.is_empty() {
        Validation::Empty
    } else if series.len() < required {
        Validation::InsufficientData {
            bars: series.len(),
            required,
        }
    } else {
        Validation::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_series;

    #[test]
    fn empty_series_rejected() {
        assert_eq!(validate_series(&make_series(&[]), 60), Validation::Empty);
    }

    #[test]
    fn forty_bars_rejected() {
        let v = validate_series(&make_series(&[1.0; 40]), 60);
        assert_eq!(
            v,
            Validation::InsufficientData {
                bars: 40,
                required: 60
            }
        );
        assert!(!v.is_accepted());
    }

    #[test]
    fn fifty_nine_rejected_sixty_accepted() {
        assert!(!validate_series(&make_series(&[1.0; 59]), 60).is_accepted());
        assert!(validate_series(&make_series(&[1.0; 60]), 60).is_accepted());
    }

    #[test]
    fn floor_cannot_be_lowered() {
        assert!(!validate_series(&make_series(&[1.0; 30]), 10).is_accepted());
    }

    #[test]
    fn longer_requirement_is_honoured() {
        let v = validate_series(&make_series(&[1.0; 80]), 100);
        assert_eq!(
            v,
            Validation::InsufficientData {
                bars: 80,
                required: 100
            }
        );
    }
}

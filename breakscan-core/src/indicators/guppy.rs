//! Guppy Multiple Moving Average (GMMA) oscillator and its trigger line.
//!
//! oscillator[t] = mean(short-group EMAs at t) - mean(long-group EMAs at t)
//! trigger[t]    = SMA(oscillator, trigger_window) at t
//!
//! Positive and widening oscillator values mean the fast group is pulling away
//! from the slow group. The oscillator crossing above its own trigger is the
//! acceleration confirmation used by the breakout rule.

use super::ema::ema_of_series;
use super::sma::sma_of_options;

#[derive(Debug, Clone)]
pub struct GuppyOscillator {
    short_spans: Vec<usize>,
    long_spans: Vec<usize>,
    trigger_window: usize,
}

/// Oscillator and trigger, index-aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct GuppyLines {
    pub oscillator: Vec<Option<f64>>,
    pub trigger: Vec<Option<f64>>,
}

impl GuppyOscillator {
    /// An empty span group or a zero trigger window yields all-missing lines.
    pub fn new(short_spans: Vec<usize>, long_spans: Vec<usize>, trigger_window: usize) -> Self {
        Self {
            short_spans,
            long_spans,
            trigger_window,
        }
    }

    /// Compute both lines from a close-price slice.
    pub fn lines(&self, closes: &[f64]) -> GuppyLines {
        let avg_short = group_average(closes, &self.short_spans);
        let avg_long = group_average(closes, &self.long_spans);

        let oscillator: Vec<Option<f64>> = avg_short
            .iter()
            .zip(&avg_long)
            .map(|(&s, &l)| Some(s? - l?))
            .collect();
        let trigger = sma_of_options(&oscillator, self.trigger_window);

        GuppyLines {
            oscillator,
            trigger,
        }
    }
}

/// Per-index arithmetic mean of the EMAs at each of `spans`.
pub fn group_average(closes: &[f64], spans: &[usize]) -> Vec<Option<f64>> {
    if spans.is_empty() {
        return vec![None; closes.len()];
    }
    let emas: Vec<Vec<Option<f64>>> = spans.iter().map(|&s| ema_of_series(closes, s)).collect();
    (0..closes.len())
        .map(|i| {
            let mut sum = 0.0;
            for ema in &emas {
                sum += ema[i]?;
            }
            Some(sum / emas.len() as f64)
        })
        .collect()
}

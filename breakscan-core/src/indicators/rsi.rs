//! Relative Strength Index (RSI).
//!
//! Wilder smoothing: avg[t] = avg[t-1] + (x[t] - avg[t-1]) / period, applied to
//! gains and losses separately. Both averages are seeded with the first price
//! change, and the first RSI value is reported once `period` changes have been
//! folded in, so the lookback is `period`.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Edge cases: avg_loss == 0 → 100; avg_gain == 0 → 0; no movement at all → 50.

/// RSI of a close-price slice.
pub fn rsi_of_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = closes.len();
    let mut result = vec![None; n];
    if period == 0 || n < period + 1 {
        return result;
    }

    let alpha = 1.0 / period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..n {
        let change = closes[i] - closes[i - 1];
        if !change.is_finite() {
            return result;
        }
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i == 1 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
        }

        if i >= period {
            result[i] = Some(compute_rsi(avg_gain, avg_loss));
        }
    }

    result
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        // clamp guards against rounding a hair outside the band
        (100.0 - 100.0 / (1.0 + avg_gain / avg_loss)).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_series};

    #[test]
    fn rsi_all_gains() {
        let result = rsi_of_series(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0], 3);
        assert_approx(result[3].unwrap(), 100.0, 1e-9);
        assert_approx(result[5].unwrap(), 100.0, 1e-9);
    }

    #[test]
    fn rsi_all_losses() {
        let result = rsi_of_series(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0], 3);
        assert_approx(result[3].unwrap(), 0.0, 1e-9);
    }

    #[test]
    fn rsi_flat_is_fifty() {
        let result = rsi_of_series(&[10.0; 20], 14);
        assert_approx(result[14].unwrap(), 50.0, 1e-9);
    }

    #[test]
    fn rsi_known_values() {
        // changes: +1, -1, +2 ; period 2, alpha 0.5
        // i=1: g=1, l=0
        // i=2: g=0.5, l=0.5 -> rsi 50
        // i=3: g=1.25, l=0.25 -> rs=5 -> rsi = 100 - 100/6
        let result = rsi_of_series(&[10.0, 11.0, 10.0, 12.0], 2);
        assert!(result[0].is_none());
        assert!(result[1].is_none());
        assert_approx(result[2].unwrap(), 50.0, 1e-9);
        assert_approx(result[3].unwrap(), 100.0 - 100.0 / 6.0, 1e-9);
    }

    #[test]
    fn rsi_prefix_is_missing() {
        let series = make_series(&[1.0; 30]);
        let result = rsi_of_series(&series.closes(), 14);
        assert!(result[..14].iter().all(|v| v.is_none()));
        assert!(result[14..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn rsi_bounds() {
        let result = rsi_of_series(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0], 3);
        for (i, v) in result.iter().enumerate() {
            if let Some(v) = v {
                assert!((0.0..=100.0).contains(v), "RSI out of bounds at bar {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_nan_taints_rest() {
        let result = rsi_of_series(&[100.0, 101.0, f64::NAN, 103.0, 104.0], 1);
        assert!(result[1].is_some());
        assert!(result[2..].iter().all(|v| v.is_none()));
    }
}

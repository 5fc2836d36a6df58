//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (span + 1).
//! Seed: EMA[0] = x[0]. No bias adjustment, so the value is defined from the
//! first bar on.

/// EMA of an arbitrary f64 slice.
///
/// A non-finite input taints that position and everything after it.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if span == 0 {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev: Option<f64> = None;

    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            return result;
        }
        let ema = match prev {
            None => v,
            Some(p) => alpha * v + (1.0 - alpha) * p,
        };
        result[i] = Some(ema);
        prev = Some(ema);
    }

    result
}

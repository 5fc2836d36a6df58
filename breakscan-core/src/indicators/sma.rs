//! Simple Moving Average (SMA) and rolling population standard deviation.
//!
//! Rolling mean over a trailing window. Lookback: window - 1 (first value at
//! index window-1). A window containing a missing or non-finite sample is
//! itself missing.

/// Rolling mean of a plain f64 slice.
pub fn sma_of_series(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let wrapped: Vec<Option<f64>> = values
        .iter()
        .map(|&v| v.is_finite().then_some(v))
        .collect();
    sma_of_options(&wrapped, window)
}

/// Rolling mean of a sequence that may itself have a missing prefix
/// (e.g. the trigger line, an SMA of the oscillator).
pub fn sma_of_options(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Rolling population standard deviation (divide by N).
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let wrapped: Vec<Option<f64>> = values
        .iter()
        .map(|&v| v.is_finite().then_some(v))
        .collect();
    rolling(&wrapped, window, |w| {
        let n = w.len() as f64;
        let mean = w.iter().sum::<f64>() / n;
        let variance = w.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
        variance.sqrt()
    })
}

fn rolling(
    values: &[Option<f64>],
    window: usize,
    reduce: impl Fn(&[f64]) -> f64,
) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];
    if window == 0 || n < window {
        return result;
    }

    let mut buf = Vec::with_capacity(window);
    for i in (window - 1)..n {
        buf.clear();
        buf.extend(values[(i + 1 - window)..=i].iter().map_while(|v| *v));
        if buf.len() == window {
            result[i] = Some(reduce(&buf));
        }
    }
    result
}

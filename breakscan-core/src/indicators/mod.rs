//! Indicator library.
//!
//! Indicators are pure functions: an ordered series in, an index-aligned
//! series out. Positions whose window is not yet populated are `None`.
//! [`IndicatorFrame`] runs every one of them over a single instrument.
//!
//! # Look-ahead guard
//! No value at bar t may depend on data from bar t+1 or later.

pub mod bollinger;
pub mod ema;
pub mod frame;
pub mod guppy;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger_bands, BollingerBands};
pub use ema::ema_of_series;
pub use frame::{IndicatorFrame, IndicatorRow};
pub use guppy::{group_average, GuppyLines, GuppyOscillator};
pub use rsi::rsi_of_series;
pub use sma::{rolling_std, sma_of_options, sma_of_series};

/// Create a synthetic series from close prices for testing.
///
/// open = prev_close (or close for the first bar), high/low = +/- 1.0 around
/// the body, volume = 1000, one bar per calendar day.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> crate::domain::InstrumentSeries {
    use crate::domain::{Bar, InstrumentSeries};
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect();
    InstrumentSeries::new("TEST", bars).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

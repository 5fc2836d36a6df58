//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(close, window)
//! - Upper: middle + mult * stddev(close, window)
//! - Lower: middle - mult * stddev(close, window)
//!
//! Uses population stddev (divide by N).
//! The first `window - 1` positions are missing.

use super::sma::{rolling_std, sma_of_series};

/// All three bands, index-aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

pub fn bollinger_bands(closes: &[f64], window: usize, multiplier: f64) -> BollingerBands {
    let middle = sma_of_series(closes, window);
    let std = rolling_std(closes, window);

    let offset = |sign: f64| -> Vec<Option<f64>> {
        middle
            .iter()
            .zip(&std)
            .map(|(&m, &s)| Some(m? + sign * multiplier * s?))
            .collect()
    };
    let upper = offset(1.0);
    let lower = offset(-1.0);

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_series, DEFAULT_EPSILON};

    #[test]
    fn bollinger_middle_is_sma() {
        let bands = bollinger_bands(&[10.0, 11.0, 12.0, 13.0, 14.0], 3, 2.0);
        assert!(bands.middle[0].is_none());
        assert!(bands.middle[1].is_none());
        assert_approx(bands.middle[2].unwrap(), 11.0, DEFAULT_EPSILON);
        assert_approx(bands.middle[3].unwrap(), 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_bands_symmetric() {
        let bands = bollinger_bands(&[10.0, 11.0, 12.0, 13.0, 14.0], 3, 2.0);
        for i in 2..5 {
            let half_width = bands.upper[i].unwrap() - bands.middle[i].unwrap();
            assert_approx(
                bands.middle[i].unwrap() - bands.lower[i].unwrap(),
                half_width,
                DEFAULT_EPSILON,
            );
        }
    }

    #[test]
    fn bollinger_upper_known_value() {
        // window [1,2,3]: mean 2, pop std sqrt(2/3)
        let bands = bollinger_bands(&[1.0, 2.0, 3.0], 3, 2.0);
        assert_approx(
            bands.upper[2].unwrap(),
            2.0 + 2.0 * (2.0_f64 / 3.0).sqrt(),
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn bollinger_constant_price_zero_width() {
        let series = make_series(&[100.0, 100.0, 100.0, 100.0]);
        let bands = bollinger_bands(&series.closes(), 3, 2.0);
        assert_approx(bands.upper[2].unwrap(), 100.0, DEFAULT_EPSILON);
        assert_approx(bands.lower[2].unwrap(), 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_nan_propagation() {
        let bands = bollinger_bands(&[10.0, 11.0, f64::NAN, 13.0], 3, 2.0);
        assert!(bands.upper[2].is_none());
        assert!(bands.upper[3].is_none());
    }
}

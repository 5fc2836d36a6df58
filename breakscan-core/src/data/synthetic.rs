//! Deterministic random-walk bars for offline development and tests.
//!
//! The generator is seeded by the BLAKE3 hash of the symbol, so the same
//! symbol and range always produce the same series. Weekends are skipped.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataError, DataProvider};
use crate::domain::{Bar, InstrumentSeries};

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    start_price: f64,
    max_daily_move: f64,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            max_daily_move: 0.03,
        }
    }
}

impl SyntheticProvider {
    pub fn new(start_price: f64, max_daily_move: f64) -> Self {
        Self {
            start_price,
            max_daily_move: max_daily_move.abs(),
        }
    }

    pub fn generate(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
        let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut bars = Vec::new();
        let mut price = self.start_price;
        let mut current = start;

        while current <= end {
            if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                current += Duration::days(1);
                continue;
            }

            let daily_return = if self.max_daily_move > 0.0 {
                rng.gen_range(-self.max_daily_move..self.max_daily_move)
            } else {
                0.0
            };
            let open = price;
            let close = price * (1.0 + daily_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(500_000..5_000_000u64);

            bars.push(Bar {
                date: current,
                open,
                high,
                low,
                close,
                volume,
            });

            price = close;
            current += Duration::days(1);
        }

        bars
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<InstrumentSeries, DataError> {
        Ok(InstrumentSeries::new(symbol, self.generate(symbol, start, end))?)
    }
}

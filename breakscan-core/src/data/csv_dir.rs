//! Offline provider reading `<dir>/<SYMBOL>.csv` files.
//!
//! Expected header: `date,open,high,low,close,volume` with ISO dates. Extra
//! columns are ignored. Rows outside the requested range are dropped, rows
//! are sorted and de-duplicated by date.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::provider::{DataError, DataProvider};
use crate::domain::{Bar, InstrumentSeries};

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    // exports often write volume as a float
    volume: f64,
}

impl From<CsvRow> for Bar {
    fn from(row: CsvRow) -> Self {
        Bar {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: if row.volume.is_finite() && row.volume > 0.0 {
                row.volume.round() as u64
            } else {
                0
            },
        }
    }
}

/// Reads per-symbol CSV files from one directory.
#[derive(Debug, Clone)]
pub struct CsvDirProvider {
    dir: PathBuf,
}

impl CsvDirProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl DataProvider for CsvDirProvider {
    fn name(&self) -> &str {
        "csv_dir"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<InstrumentSeries, DataError> {
        let path = self.path_for(symbol);
        if !path.is_file() {
            return Err(DataError::NoLocalData {
                symbol: symbol.to_string(),
                path: path.display().to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let mut bars = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let bar = Bar::from(row?);
            if bar.date >= start && bar.date <= end {
                bars.push(bar);
            }
        }
        debug!(symbol, path = %path.display(), bars = bars.len(), "loaded CSV bars");

        Ok(InstrumentSeries::from_unsorted(symbol, bars))
    }

    fn is_available(&self) -> bool {
        self.dir.is_dir()
    }
}

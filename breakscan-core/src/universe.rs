//! Instrument universe parsing.
//!
//! A universe comes either from a comma-separated list or from a CSV or xlsx
//! file with a `Ticker` column. When both are supplied the file wins. Symbols
//! are trimmed, blanks dropped, and duplicates removed keeping the first
//! occurrence.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::Symbol;
use crate::table::{Table, TableError};

/// Comma list used when the caller supplies nothing.
pub const DEFAULT_TICKERS: &str = "BBCA.JK, INCO.JK, ANTM.JK, ERAA.JK, INET.JK, MBMA.JK";

/// Header that identifies the symbol column in universe and broker files.
pub const TICKER_COLUMN: &str = "Ticker";

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("universe file: {0}")]
    Table(#[from] TableError),
}

/// Non-fatal problems found while loading a universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UniverseWarning {
    /// The file has no `Ticker` header; it contributes zero instruments.
    MissingColumn { path: PathBuf },
}

impl std::fmt::Display for UniverseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumn { path } => write!(
                f,
                "file {} has no '{TICKER_COLUMN}' column; no tickers loaded from it",
                path.display()
            ),
        }
    }
}

/// Resolved list of symbols plus anything worth telling the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Universe {
    pub symbols: Vec<Symbol>,
    pub warnings: Vec<UniverseWarning>,
}

impl Universe {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Split a comma-separated list into symbols.
pub fn parse_ticker_list(list: &str) -> Vec<Symbol> {
    normalize_symbols(list.split(','))
}

/// Read the `Ticker` column of a CSV or xlsx file.
pub fn load_ticker_file(path: &Path) -> Result<Universe, UniverseError> {
    let table = Table::from_path(path)?;
    let Some(column) = table.column(TICKER_COLUMN) else {
        let warning = UniverseWarning::MissingColumn {
            path: path.to_path_buf(),
        };
        warn!("{warning}");
        return Ok(Universe {
            symbols: Vec::new(),
            warnings: vec![warning],
        });
    };

    let symbols = normalize_symbols(table.rows.iter().map(|row| Table::cell(row, column)));
    debug!(path = %path.display(), symbols = symbols.len(), "loaded ticker file");
    Ok(Universe {
        symbols,
        warnings: Vec::new(),
    })
}

/// Resolve the universe: file if given, else the list, else [`DEFAULT_TICKERS`].
pub fn resolve(list: Option<&str>, file: Option<&Path>) -> Result<Universe, UniverseError> {
    match (file, list) {
        (Some(path), _) => load_ticker_file(path),
        (None, Some(list)) => Ok(Universe {
            symbols: parse_ticker_list(list),
            warnings: Vec::new(),
        }),
        (None, None) => Ok(Universe {
            symbols: parse_ticker_list(DEFAULT_TICKERS),
            warnings: Vec::new(),
        }),
    }
}

/// Trim symbols, drop blanks and repeats; first occurrence keeps its place.
pub fn normalize_symbols<S: AsRef<str>>(raw: impl IntoIterator<Item = S>) -> Vec<Symbol> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::fs;

    fn write_workbook(path: &Path, rows: &[[&str; 2]]) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn list_is_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_ticker_list(" BBCA.JK, ,ANTM.JK ,, "),
            vec!["BBCA.JK", "ANTM.JK"]
        );
    }

    #[test]
    fn list_duplicates_keep_first_position() {
        assert_eq!(
            parse_ticker_list("INCO.JK,ANTM.JK,INCO.JK"),
            vec!["INCO.JK", "ANTM.JK"]
        );
    }

    #[test]
    fn default_list_has_six_symbols() {
        let universe = resolve(None, None).unwrap();
        assert_eq!(universe.len(), 6);
        assert_eq!(universe.symbols[0], "BBCA.JK");
        assert_eq!(universe.symbols[5], "MBMA.JK");
    }

    #[test]
    fn file_reads_ticker_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickers.csv");
        fs::write(&path, "Name,Ticker\nBank,BBCA.JK\nBlank,\nNickel,INCO.JK\n").unwrap();

        let universe = load_ticker_file(&path).unwrap();
        assert_eq!(universe.symbols, vec!["BBCA.JK", "INCO.JK"]);
        assert!(universe.warnings.is_empty());
    }

    #[test]
    fn file_without_ticker_column_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "Symbol\nBBCA.JK\n").unwrap();

        let universe = load_ticker_file(&path).unwrap();
        assert!(universe.is_empty());
        assert_eq!(
            universe.warnings,
            vec![UniverseWarning::MissingColumn { path: path.clone() }]
        );
    }

    #[test]
    fn xlsx_reads_ticker_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickers.xlsx");
        write_workbook(
            &path,
            &[
                ["Name", "Ticker"],
                ["Bank", " BBCA.JK "],
                ["Blank", ""],
                ["Nickel", "INCO.JK"],
                ["Again", "BBCA.JK"],
            ],
        );

        let universe = load_ticker_file(&path).unwrap();
        assert_eq!(universe.symbols, vec!["BBCA.JK", "INCO.JK"]);
        assert!(universe.warnings.is_empty());
    }

    #[test]
    fn xlsx_without_ticker_column_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.xlsx");
        write_workbook(&path, &[["Symbol", "Name"], ["BBCA.JK", "Bank"]]);

        let universe = load_ticker_file(&path).unwrap();
        assert!(universe.is_empty());
        assert_eq!(
            universe.warnings,
            vec![UniverseWarning::MissingColumn { path: path.clone() }]
        );
    }

    #[test]
    fn file_takes_precedence_over_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickers.csv");
        fs::write(&path, "Ticker\nERAA.JK\n").unwrap();

        let universe = resolve(Some("BBCA.JK"), Some(&path)).unwrap();
        assert_eq!(universe.symbols, vec!["ERAA.JK"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_ticker_file(Path::new("/nonexistent/tickers.csv")).unwrap_err();
        assert!(matches!(err, UniverseError::Table(TableError::Io { .. })));
    }
}

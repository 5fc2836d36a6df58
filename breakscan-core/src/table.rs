//! Tabular input files: CSV or spreadsheet, read into a header row plus
//! string cells.
//!
//! Universe files and broker summaries share this reader. The format is
//! picked from the file extension (`xlsx`, `xlsm`, `xls`, `ods` are opened as
//! workbooks, anything else as CSV). Only the first worksheet is read.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Reader};
use thiserror::Error;

const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

#[derive(Debug, Error)]
pub enum TableError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("open workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook {path} has no worksheet")]
    NoWorksheet { path: PathBuf },
}

/// File layout, chosen from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Workbook,
}

impl TableFormat {
    pub fn for_path(path: &Path) -> Self {
        let is_workbook = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| WORKBOOK_EXTENSIONS.iter().any(|w| e.eq_ignore_ascii_case(w)));
        if is_workbook {
            Self::Workbook
        } else {
            Self::Csv
        }
    }
}

/// Header names (trimmed) and data rows as text. Rows may be shorter than
/// the header; missing cells read as blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        match TableFormat::for_path(path) {
            TableFormat::Csv => {
                let file = std::fs::File::open(path).map_err(|source| TableError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_csv_reader(file)
            }
            TableFormat::Workbook => Self::from_workbook(path),
        }
    }

    pub fn from_csv_reader<R: std::io::Read>(input: R) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
        let headers = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

    fn from_workbook(path: &Path) -> Result<Self, TableError> {
        let workbook_err = |source| TableError::Workbook {
            path: path.to_path_buf(),
            source,
        };
        let mut workbook = open_workbook_auto(path).map_err(workbook_err)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| TableError::NoWorksheet {
                path: path.to_path_buf(),
            })?
            .map_err(workbook_err)?;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());
        let headers = rows
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();
        Ok(Self {
            headers,
            rows: rows.collect(),
        })
    }

    /// Position of the header equal to `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell `column` of `row`, blank when the row is short.
    pub fn cell(row: &[String], column: usize) -> &str {
        row.get(column).map_or("", String::as_str)
    }
}

//! Broker-summary enrichment.
//!
//! A broker summary is an external CSV or xlsx sheet keyed by `Ticker` (e.g.
//! net buy per broker). It is left-joined onto the hit report: every hit keeps
//! its row, matched hits gain the broker columns, unmatched hits get blanks. A ticker
//! listed several times yields one report row per listing.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use breakscan_core::table::Table;
use breakscan_core::universe::TICKER_COLUMN;

use crate::export::ExportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerSummary {
    /// Broker columns other than `Ticker`, in file order.
    columns: Vec<String>,
    rows: HashMap<String, Vec<Vec<String>>>,
    blank: Vec<String>,
}

impl BrokerSummary {
    /// Load a broker file (CSV or xlsx). `Ok(None)` (plus a warning) when it
    /// has no `Ticker` column.
    pub fn from_path(path: &Path) -> Result<Option<Self>, ExportError> {
        let summary = Self::from_table(&Table::from_path(path)?);
        if summary.is_none() {
            warn!(
                path = %path.display(),
                "broker summary has no '{TICKER_COLUMN}' column; report not enriched"
            );
        }
        Ok(summary)
    }

    pub fn from_reader<R: std::io::Read>(input: R) -> Result<Option<Self>, ExportError> {
        Ok(Self::from_table(&Table::from_csv_reader(input)?))
    }

    pub fn from_table(table: &Table) -> Option<Self> {
        let key = table.column(TICKER_COLUMN)?;
        let others: Vec<usize> = (0..table.headers.len()).filter(|&i| i != key).collect();
        let columns: Vec<String> = others.iter().map(|&i| table.headers[i].clone()).collect();

        let mut rows: HashMap<String, Vec<Vec<String>>> = HashMap::new();
        for record in &table.rows {
            let ticker = Table::cell(record, key).trim();
            if ticker.is_empty() {
                continue;
            }
            let values = others
                .iter()
                .map(|&i| Table::cell(record, i).to_string())
                .collect();
            rows.entry(ticker.to_string()).or_default().push(values);
        }
        debug!(tickers = rows.len(), columns = columns.len(), "loaded broker summary");

        Some(Self {
            blank: vec![String::new(); columns.len()],
            columns,
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn ticker_count(&self) -> usize {
        self.rows.len()
    }

    /// Broker column names for the joined header; names already used by the
    /// report get a ` (broker)` suffix.
    pub fn joined_columns(&self, report_columns: &[&str]) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| {
                if report_columns.contains(&c.as_str()) {
                    format!("{c} (broker)")
                } else {
                    c.clone()
                }
            })
            .collect()
    }

    /// Broker values to append for `symbol`: every matching row, or one blank row.
    pub fn rows_for(&self, symbol: &str) -> Vec<&[String]> {
        match self.rows.get(symbol) {
            Some(matches) => matches.iter().map(Vec::as_slice).collect(),
            None => vec![self.blank.as_slice()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::export_hits_csv;
    use breakscan_core::screen::ScreenHit;
    use breakscan_core::table::TableError;
    use chrono::NaiveDate;
    use rust_xlsxwriter::Workbook;

    fn hit(symbol: &str) -> ScreenHit {
        ScreenHit {
            symbol: symbol.into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            close: 110.0,
            rsi: 70.0,
            guppy_oscillator: 2.5,
            guppy_trigger: 2.0,
            volume: 200_000,
            bollinger_upper: 108.0,
            volume_ma: 100_000.0,
        }
    }

    #[test]
    fn parses_columns_without_ticker() {
        let input = "Broker,Ticker,Net Buy\nYP,ANTM.JK,1500\nCC, INCO.JK ,-200\n";
        let summary = BrokerSummary::from_reader(input.as_bytes()).unwrap().unwrap();
        assert_eq!(summary.columns(), ["Broker", "Net Buy"]);
        assert_eq!(summary.ticker_count(), 2);
        assert_eq!(summary.rows_for("INCO.JK"), vec![["CC", "-200"].map(String::from).as_slice()]);
    }

    #[test]
    fn missing_ticker_column_is_none() {
        let input = "Symbol,Net Buy\nANTM.JK,1\n";
        assert!(BrokerSummary::from_reader(input.as_bytes()).unwrap().is_none());
    }

    #[test]
    fn left_join_keeps_unmatched_hits() {
        let input = "Ticker,Net Buy\nANTM.JK,1500\n";
        let summary = BrokerSummary::from_reader(input.as_bytes()).unwrap().unwrap();
        let csv = export_hits_csv(&[hit("ANTM.JK"), hit("BBCA.JK")], Some(&summary)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Ticker,Close,RSI,GMO,GMO Trigger,Volume,Net Buy");
        assert_eq!(lines[1], "ANTM.JK,110.0,70.0,2.5,2.0,200000,1500");
        assert_eq!(lines[2], "BBCA.JK,110.0,70.0,2.5,2.0,200000,");
    }

    #[test]
    fn repeated_ticker_multiplies_rows() {
        let input = "Ticker,Broker\nANTM.JK,YP\nANTM.JK,CC\n";
        let summary = BrokerSummary::from_reader(input.as_bytes()).unwrap().unwrap();
        let csv = export_hits_csv(&[hit("ANTM.JK")], Some(&summary)).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.contains(",YP\n"));
        assert!(csv.contains(",CC\n"));
    }

    #[test]
    fn colliding_column_names_are_suffixed() {
        let input = "Ticker,Close\nANTM.JK,9\n";
        let summary = BrokerSummary::from_reader(input.as_bytes()).unwrap().unwrap();
        let csv = export_hits_csv(&[hit("ANTM.JK")], Some(&summary)).unwrap();
        assert!(csv.starts_with("Ticker,Close,RSI,GMO,GMO Trigger,Volume,Close (broker)\n"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BrokerSummary::from_path(Path::new("/nonexistent/broker.csv")).unwrap_err();
        assert!(matches!(err, ExportError::Table(TableError::Io { .. })));
    }

    #[test]
    fn xlsx_summary_joins_like_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broker.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Broker").unwrap();
        sheet.write_string(0, 1, "Ticker").unwrap();
        sheet.write_string(0, 2, "Net Buy").unwrap();
        sheet.write_string(1, 0, "YP").unwrap();
        sheet.write_string(1, 1, "ANTM.JK").unwrap();
        sheet.write_number(1, 2, 1500.0).unwrap();
        workbook.save(&path).unwrap();

        let summary = BrokerSummary::from_path(&path).unwrap().unwrap();
        assert_eq!(summary.columns(), ["Broker", "Net Buy"]);
        let csv = export_hits_csv(&[hit("ANTM.JK"), hit("BBCA.JK")], Some(&summary)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Ticker,Close,RSI,GMO,GMO Trigger,Volume,Broker,Net Buy");
        assert_eq!(lines[1], "ANTM.JK,110.0,70.0,2.5,2.0,200000,YP,1500");
        assert_eq!(lines[2], "BBCA.JK,110.0,70.0,2.5,2.0,200000,,");
    }

    #[test]
    fn xlsx_without_ticker_column_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broker.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Symbol").unwrap();
        sheet.write_string(1, 0, "ANTM.JK").unwrap();
        workbook.save(&path).unwrap();

        assert!(BrokerSummary::from_path(&path).unwrap().is_none());
    }
}

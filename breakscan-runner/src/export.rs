//! Report export — CSV hit table and JSON result dump.
//!
//! The CSV report has the columns `Ticker, Close, RSI, GMO, GMO Trigger,
//! Volume` with floats rounded to two decimals, optionally followed by
//! broker-summary columns. The JSON export is the whole [`ScreenResult`].

use std::path::Path;

use thiserror::Error;

use breakscan_core::screen::ScreenHit;
use breakscan_core::table::TableError;

use crate::broker::BrokerSummary;
use crate::result::ScreenResult;

/// Columns of the hit report, in order.
pub const REPORT_COLUMNS: [&str; 6] = ["Ticker", "Close", "RSI", "GMO", "GMO Trigger", "Volume"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("broker summary: {0}")]
    Table(#[from] TableError),

    #[error("write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("flush CSV writer: {0}")]
    Flush(String),

    #[error("output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Two-decimal rendering that keeps one trailing zero on whole numbers
/// (`110.0`, `66.79`).
pub fn format_number(value: f64) -> String {
    let rounded = round2(value);
    if rounded.is_finite() && rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        rounded.to_string()
    }
}

fn report_fields(hit: &ScreenHit) -> [String; 6] {
    [
        hit.symbol.clone(),
        format_number(hit.close),
        format_number(hit.rsi),
        format_number(hit.guppy_oscillator),
        format_number(hit.guppy_trigger),
        hit.volume.to_string(),
    ]
}

/// Render hits as the CSV report, left-joined with `broker` when given.
pub fn export_hits_csv<'a>(
    hits: impl IntoIterator<Item = &'a ScreenHit>,
    broker: Option<&BrokerSummary>,
) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<String> = REPORT_COLUMNS.iter().map(|c| c.to_string()).collect();
    if let Some(broker) = broker {
        header.extend(broker.joined_columns(&REPORT_COLUMNS));
    }
    wtr.write_record(&header)?;

    for hit in hits {
        let base = report_fields(hit);
        match broker {
            None => wtr.write_record(&base)?,
            Some(broker) => {
                for extra in broker.rows_for(&hit.symbol) {
                    let fields = base.iter().chain(extra.iter()).map(String::as_str);
                    wtr.write_record(fields)?;
                }
            }
        }
    }

    let data = wtr
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(data)?)
}

/// Serialize a `ScreenResult` to pretty JSON.
pub fn export_json(result: &ScreenResult) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn import_json(json: &str) -> Result<ScreenResult, ExportError> {
    Ok(serde_json::from_str(json)?)
}

/// Write `contents` to `path`, creating parent directories.
pub fn save(path: &Path, contents: &str) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, contents).map_err(io_err)
}

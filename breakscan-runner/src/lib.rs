//! Breakscan Runner — screening orchestration, ranking, alerts and reports.
//!
//! This crate builds on `breakscan-core` to provide:
//! - The screening orchestrator (sequential or Rayon-parallel, cancellable)
//! - `ScreenResult` with pass summary, config hash and ranking by `SortKey`
//! - Notification sinks (Telegram Bot API) for breakout alerts
//! - CSV/JSON report export with broker-summary enrichment

pub mod broker;
pub mod export;
pub mod notify;
pub mod result;
pub mod screener;

pub use broker::BrokerSummary;
pub use export::{export_hits_csv, export_json, import_json, save, ExportError, REPORT_COLUMNS};
pub use notify::{deliver, format_alert_message, NotificationSink, NotifyError, TelegramNotifier};
pub use result::{ScanSummary, ScreenResult, SortKey};
pub use screener::{run_screen, ScanOptions, ScreenError};

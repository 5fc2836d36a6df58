//! Screening orchestrator: per-symbol pipelines and result assembly.
//!
//! Each symbol runs through its own pipeline; one symbol's failure never
//! touches another. Pipelines run on a Rayon pool when more than one thread is
//! requested. Results are gathered in input order, so the same universe and
//! data always give the same `ScreenResult`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::NaiveDate;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use breakscan_core::config::{ConfigError, ScreenerConfig};
use breakscan_core::data::{DataProvider, ScanProgress};
use breakscan_core::indicators::IndicatorFrame;
use breakscan_core::screen::{screen_series, ScreenHit, SeriesOutcome, Validation};
use breakscan_core::universe::normalize_symbols;

use crate::notify::{deliver, NotificationSink};
use crate::result::{ScanSummary, ScreenResult};

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

/// Knobs for one screening pass.
#[derive(Clone, Copy)]
pub struct ScanOptions<'a> {
    /// Last calendar day of history to request.
    pub end_date: NaiveDate,
    /// Worker threads; 0 or 1 runs sequentially.
    pub threads: usize,
    /// Cooperative stop flag, checked before each symbol.
    pub cancel: Option<&'a AtomicBool>,
    pub progress: Option<&'a dyn ScanProgress>,
    pub notifier: Option<&'a dyn NotificationSink>,
}

impl<'a> ScanOptions<'a> {
    pub fn new(end_date: NaiveDate) -> Self {
        Self {
            end_date,
            threads: 1,
            cancel: None,
            progress: None,
            notifier: None,
        }
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn cancel(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn progress(mut self, progress: &'a dyn ScanProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn notifier(mut self, notifier: &'a dyn NotificationSink) -> Self {
        self.notifier = Some(notifier);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|f| f.load(Ordering::Relaxed))
    }
}

/// What happened to one symbol.
enum SymbolOutcome {
    Hit(Box<(ScreenHit, IndicatorFrame)>),
    NoHit,
    FetchFailed,
    InsufficientHistory,
    NotAttempted,
}

/// Screen every symbol in `symbols` and collect the hits.
///
/// Symbols are trimmed and de-duplicated first. Fetch failures, empty series
/// and short series are skipped. Only an invalid configuration or a thread
/// pool that cannot be built fails the call.
pub fn run_screen(
    symbols: &[String],
    provider: &dyn DataProvider,
    config: &ScreenerConfig,
    options: &ScanOptions<'_>,
) -> Result<ScreenResult, ScreenError> {
    config.validate()?;

    let symbols = normalize_symbols(symbols);
    let total = symbols.len();
    let started = Instant::now();
    info!(
        symbols = total,
        provider = provider.name(),
        threads = options.threads.max(1),
        end = %options.end_date,
        "starting screen"
    );

    let run = |(index, symbol): (usize, &String)| {
        screen_symbol(symbol, index, total, provider, config, options)
    };

    let outcomes: Vec<SymbolOutcome> = if options.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .build()
            .map_err(|e| ScreenError::ThreadPool(e.to_string()))?;
        pool.install(|| symbols.par_iter().enumerate().map(run).collect())
    } else {
        symbols.iter().enumerate().map(run).collect()
    };

    let mut result = ScreenResult {
        config_hash: config.config_hash(),
        summary: ScanSummary {
            requested: total,
            ..ScanSummary::default()
        },
        ..ScreenResult::default()
    };

    for outcome in outcomes {
        match outcome {
            SymbolOutcome::Hit(boxed) => {
                let (hit, frame) = *boxed;
                result.summary.evaluated += 1;
                result.frames.insert(hit.symbol.clone(), frame);
                result.hits.push(hit);
            }
            SymbolOutcome::NoHit => result.summary.evaluated += 1,
            SymbolOutcome::FetchFailed => result.summary.fetch_failed += 1,
            SymbolOutcome::InsufficientHistory => result.summary.insufficient_history += 1,
            SymbolOutcome::NotAttempted => result.summary.not_attempted += 1,
        }
    }
    result.summary.hits = result.hits.len();
    result.summary.cancelled = result.summary.not_attempted > 0 || options.is_cancelled();

    if let Some(progress) = options.progress {
        progress.on_batch_complete(result.summary.evaluated, result.summary.skipped(), total);
    }

    info!(
        evaluated = result.summary.evaluated,
        skipped = result.summary.skipped(),
        hits = result.summary.hits,
        cancelled = result.summary.cancelled,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "screen finished"
    );

    if let Some(sink) = options.notifier {
        deliver(sink, &result.hits);
    }

    Ok(result)
}

fn screen_symbol(
    symbol: &str,
    index: usize,
    total: usize,
    provider: &dyn DataProvider,
    config: &ScreenerConfig,
    options: &ScanOptions<'_>,
) -> SymbolOutcome {
    if options.is_cancelled() {
        return SymbolOutcome::NotAttempted;
    }
    if let Some(progress) = options.progress {
        progress.on_start(symbol, index, total);
    }
    if !provider.is_available() {
        debug!(symbol, provider = provider.name(), "provider unavailable; skipping");
        return SymbolOutcome::FetchFailed;
    }

    let series = match provider.fetch_recent(symbol, options.end_date, config.data.lookback_days) {
        Ok(series) => series,
        Err(e) => {
            warn!(symbol, error = %e, "fetch failed; skipping");
            return SymbolOutcome::FetchFailed;
        }
    };

    match screen_series(&series, config) {
        SeriesOutcome::Skipped(Validation::Empty) => {
            debug!(symbol, "no bars returned; skipping");
            SymbolOutcome::FetchFailed
        }
        SeriesOutcome::Skipped(validation) => {
            debug!(symbol, ?validation, "not enough history; skipping");
            SymbolOutcome::InsufficientHistory
        }
        SeriesOutcome::Evaluated { decision, frame } => match decision.hit {
            Some(hit) => {
                info!(symbol, close = hit.close, rsi = hit.rsi, "breakout");
                SymbolOutcome::Hit(Box::new((hit, frame)))
            }
            None => {
                debug!(
                    symbol,
                    passed = decision.checks.passed_count(),
                    checks = ?decision.checks,
                    "no breakout"
                );
                SymbolOutcome::NoHit
            }
        },
    }
}

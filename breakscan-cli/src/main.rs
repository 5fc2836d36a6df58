//! Breakscan CLI — breakout screening from the command line.
//!
//! Commands:
//! - `scan`: screen a universe and print/export the breakout hits
//! - `config`: print the default (or a validated) screener config as TOML
//! - `universe`: show the symbols a ticker list or file resolves to

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use breakscan_core::config::ScreenerConfig;
use breakscan_core::data::{
    CircuitBreaker, CsvDirProvider, DataProvider, StderrProgress, SyntheticProvider, YahooProvider,
};
use breakscan_core::screen::ScreenHit;
use breakscan_core::universe::{self, Universe};
use breakscan_runner::{
    export_hits_csv, export_json, save, run_screen, BrokerSummary, NotificationSink, ScanOptions,
    ScreenResult, SortKey, TelegramNotifier,
};

#[derive(Parser)]
#[command(
    name = "breakscan",
    about = "Breakscan: multi-indicator breakout stock screener"
)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen a universe for breakouts.
    Scan {
        #[command(flatten)]
        universe: UniverseArgs,

        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Print the screener config as TOML.
    Config {
        /// Validate and echo this file instead of the defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show the resolved symbol list.
    Universe {
        #[command(flatten)]
        universe: UniverseArgs,
    },
}

#[derive(clap::Args)]
struct UniverseArgs {
    /// Comma-separated tickers, e.g. "BBCA.JK, ANTM.JK".
    #[arg(long)]
    tickers: Option<String>,

    /// CSV or xlsx file with a Ticker column (takes precedence over --tickers).
    #[arg(long)]
    file: Option<PathBuf>,
}

impl UniverseArgs {
    fn resolve(&self) -> Result<Universe> {
        let universe = universe::resolve(self.tickers.as_deref(), self.file.as_deref())
            .context("failed to load universe")?;
        for warning in &universe.warnings {
            eprintln!("Warning: {warning}");
        }
        Ok(universe)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Scan { universe, scan } => run_scan(&universe, scan),
        Commands::Config { config } => run_config(config.as_deref()),
        Commands::Universe { universe } => run_universe(&universe),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[derive(clap::Args)]
struct ScanArgs {
    /// Path to a TOML screener config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Broker summary (CSV or xlsx) to left-join onto the report; needs a Ticker column.
    #[arg(long)]
    broker: Option<PathBuf>,

    /// Write the CSV report here.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the full result as JSON here.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Worker threads (1 = sequential).
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Calendar days of history to request (overrides the config).
    #[arg(long)]
    lookback_days: Option<u32>,

    /// Last day of history (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end: Option<String>,

    /// Read bars from <DIR>/<SYMBOL>.csv instead of Yahoo Finance.
    #[arg(long, conflicts_with = "synthetic")]
    csv_dir: Option<PathBuf>,

    /// Use deterministic synthetic bars (offline demo).
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Send a Telegram alert (TELEGRAM_TOKEN / TELEGRAM_CHAT_ID).
    #[arg(long, default_value_t = false)]
    notify: bool,

    /// Rank hits by: symbol, close, rsi, guppy, guppy-spread, volume, volume-ratio.
    #[arg(long, default_value_t = SortKey::Symbol)]
    sort: SortKey,

    /// Sort ascending instead of descending (symbol always sorts A-Z).
    #[arg(long, default_value_t = false)]
    ascending: bool,

    /// Report per-symbol progress on stderr.
    #[arg(long, default_value_t = false)]
    progress: bool,
}

fn load_config(path: Option<&Path>) -> Result<ScreenerConfig> {
    match path {
        Some(path) => ScreenerConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ScreenerConfig::default()),
    }
}

fn build_provider(args: &ScanArgs) -> Result<Box<dyn DataProvider>> {
    if let Some(dir) = &args.csv_dir {
        if !dir.is_dir() {
            bail!("CSV directory not found: {}", dir.display());
        }
        return Ok(Box::new(CsvDirProvider::new(dir)));
    }
    if args.synthetic {
        warn!("using synthetic data; hits are not real market signals");
        return Ok(Box::new(SyntheticProvider::default()));
    }
    let breaker = Arc::new(CircuitBreaker::default_provider());
    let provider = YahooProvider::new(breaker).context("failed to build Yahoo Finance client")?;
    Ok(Box::new(provider))
}

fn run_scan(universe_args: &UniverseArgs, args: ScanArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(days) = args.lookback_days {
        config.data.lookback_days = days;
    }

    let universe = universe_args.resolve()?;
    if universe.is_empty() {
        println!("No tickers to screen.");
        return Ok(());
    }

    let end_date = match args.end.as_deref() {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid --end date '{s}' (expected YYYY-MM-DD)"))?,
        None => chrono::Local::now().date_naive(),
    };

    let provider = build_provider(&args)?;
    let telegram = if args.notify {
        let notifier = TelegramNotifier::from_env();
        if notifier.is_none() {
            warn!("--notify given but TELEGRAM_TOKEN / TELEGRAM_CHAT_ID are not set");
        }
        notifier
    } else {
        None
    };
    let broker = args
        .broker
        .as_deref()
        .map(BrokerSummary::from_path)
        .transpose()
        .context("failed to read broker summary")?
        .flatten();

    let progress = StderrProgress;
    let mut options = ScanOptions::new(end_date).threads(args.threads);
    if args.progress {
        options = options.progress(&progress);
    }
    if let Some(notifier) = &telegram {
        options = options.notifier(notifier as &dyn NotificationSink);
    }

    let result = run_screen(&universe.symbols, provider.as_ref(), &config, &options)
        .context("screen failed")?;

    let descending = !args.ascending && args.sort != SortKey::Symbol;
    let ranked = result.sorted_by(args.sort, descending);
    print_hits(&result, &ranked);

    if let Some(path) = &args.output {
        let csv = export_hits_csv(ranked.iter().copied(), broker.as_ref())?;
        save(path, &csv)?;
        info!(path = %path.display(), "wrote CSV report");
    }
    if let Some(path) = &args.json {
        save(path, &export_json(&result)?)?;
        info!(path = %path.display(), "wrote JSON result");
    }

    Ok(())
}

fn print_hits(result: &ScreenResult, ranked: &[&ScreenHit]) {
    let s = &result.summary;
    println!(
        "Screened {} symbols: {} evaluated, {} skipped ({} fetch failures, {} short history){}",
        s.requested,
        s.evaluated,
        s.skipped(),
        s.fetch_failed,
        s.insufficient_history,
        if s.cancelled { ", cancelled" } else { "" }
    );

    if ranked.is_empty() {
        println!("Tidak ada saham yang memenuhi kriteria.");
        return;
    }

    println!("Ditemukan {} saham memenuhi kriteria.\n", ranked.len());
    println!(
        "{:<12} {:>10} {:>8} {:>10} {:>12} {:>14} {:>8}",
        "Ticker", "Close", "RSI", "GMO", "GMO Trigger", "Volume", "Vol/MA"
    );
    for hit in ranked {
        println!(
            "{:<12} {:>10.2} {:>8.2} {:>10.2} {:>12.2} {:>14} {:>8.2}",
            hit.symbol,
            hit.close,
            hit.rsi,
            hit.guppy_oscillator,
            hit.guppy_trigger,
            hit.volume,
            hit.volume_ratio()
        );
    }
    println!("\nconfig hash: {}", result.config_hash);
}

fn run_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    config.validate().context("config is invalid")?;
    print!("{}", config.to_toml()?);
    Ok(())
}

fn run_universe(args: &UniverseArgs) -> Result<()> {
    let universe = args.resolve()?;
    for symbol in &universe.symbols {
        println!("{symbol}");
    }
    eprintln!("{} symbols", universe.len());
    Ok(())
}

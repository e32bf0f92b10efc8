//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_provider::CsvProvider;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_state_store::JsonStateStore;
use crate::adapters::telegram_notifier::TelegramNotifier;
use crate::adapters::yahoo_provider::YahooProvider;
use crate::domain::error::RibbonError;
use crate::domain::replay::run_replay;
use crate::domain::ribbon::RibbonSpans;
use crate::domain::scan::run_scan;
use crate::domain::summary::PerformanceSummary;
use crate::domain::watchlist::load_watchlist;
use crate::ports::bar_provider::BarProvider;
use crate::ports::config_port::ConfigPort;
use crate::ports::notifier::Notifier;

#[derive(Parser, Debug)]
#[command(name = "ribbonscan", about = "Triple EMA ribbon scanner and backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan the watchlist once and alert on new signals
    Scan {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Read bars from CSV files in this directory instead of Yahoo
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Evaluate and persist state but send no notification
        #[arg(long)]
        no_notify: bool,
    },
    /// Replay the ribbon rule over history and report statistics
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Read bars from CSV files in this directory instead of Yahoo
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Backtest a single ticker instead of the watchlist
        #[arg(long)]
        ticker: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Scan {
            config,
            data_dir,
            no_notify,
        } => run_scan_command(config.as_ref(), data_dir, no_notify),
        Command::Backtest {
            config,
            data_dir,
            ticker,
        } => run_backtest_command(config.as_ref(), data_dir, ticker.as_deref()),
    }
}

/// Everything the two commands need, with defaults matching a config-less
/// run: 9/21/55 spans, watchlist.txt, signals_state.json, a 180-day scan
/// window and a 730-day backtest window.
#[derive(Debug)]
pub struct AppConfig {
    pub spans: RibbonSpans,
    pub watchlist: PathBuf,
    pub state_file: PathBuf,
    pub scan_history_days: u32,
    pub backtest_history_days: u32,
    pub csv_dir: Option<PathBuf>,
    pub telegram: Option<(String, String)>,
}

pub fn build_app_config(adapter: Option<&dyn ConfigPort>) -> Result<AppConfig, RibbonError> {
    let get_string = |section: &str, key: &str| adapter.and_then(|a| a.get_string(section, key));
    let get_int = |section: &str, key: &str, default: i64| {
        adapter.map_or(default, |a| a.get_int(section, key, default))
    };

    let span_for = |key: &str, default: i64| -> Result<usize, RibbonError> {
        let value = get_int("ribbon", key, default);
        usize::try_from(value).map_err(|_| RibbonError::ConfigInvalid {
            section: "ribbon".into(),
            key: key.into(),
            reason: format!("span must be a positive integer, got {value}"),
        })
    };
    let spans = RibbonSpans::new(
        span_for("short", 9)?,
        span_for("medium", 21)?,
        span_for("long", 55)?,
    )?;

    let days_for = |section: &str, default: i64| -> Result<u32, RibbonError> {
        let value = get_int(section, "history_days", default);
        u32::try_from(value).map_err(|_| RibbonError::ConfigInvalid {
            section: section.into(),
            key: "history_days".into(),
            reason: format!("must be a positive integer, got {value}"),
        })
    };

    let telegram = match (
        get_string("telegram", "bot_token"),
        get_string("telegram", "chat_id"),
    ) {
        (Some(token), Some(chat_id)) => Some((token, chat_id)),
        _ => None,
    };

    Ok(AppConfig {
        spans,
        watchlist: get_string("scan", "watchlist")
            .or_else(|| get_string("backtest", "watchlist"))
            .map_or_else(|| PathBuf::from("watchlist.txt"), PathBuf::from),
        state_file: get_string("scan", "state_file")
            .map_or_else(|| PathBuf::from("signals_state.json"), PathBuf::from),
        scan_history_days: days_for("scan", 180)?,
        backtest_history_days: days_for("backtest", 730)?,
        csv_dir: get_string("data", "csv_dir").map(PathBuf::from),
        telegram,
    })
}

fn load_config(path: Option<&PathBuf>) -> Result<Option<FileConfigAdapter>, ExitCode> {
    let Some(path) = path else { return Ok(None) };
    match FileConfigAdapter::from_file(path) {
        Ok(adapter) => Ok(Some(adapter)),
        Err(e) => {
            let err = RibbonError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            };
            eprintln!("error: {err}");
            Err(ExitCode::from(&err))
        }
    }
}

fn build_provider(data_dir: Option<PathBuf>, config: &AppConfig) -> Box<dyn BarProvider> {
    match data_dir.or_else(|| config.csv_dir.clone()) {
        Some(dir) => Box::new(CsvProvider::new(dir)),
        None => Box::new(YahooProvider::new()),
    }
}

fn build_notifier(config: &AppConfig, no_notify: bool) -> Option<Box<dyn Notifier>> {
    if no_notify {
        return None;
    }
    if let Some((token, chat_id)) = &config.telegram {
        return Some(Box::new(TelegramNotifier::new(
            token.clone(),
            chat_id.clone(),
        )));
    }
    match TelegramNotifier::from_env() {
        Some(notifier) => Some(Box::new(notifier)),
        None => {
            eprintln!("warning: TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set; alerts disabled");
            None
        }
    }
}

fn run_scan_command(
    config_path: Option<&PathBuf>,
    data_dir: Option<PathBuf>,
    no_notify: bool,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let config = match build_app_config(adapter.as_ref().map(|a| a as &dyn ConfigPort)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    eprintln!("Starting triple EMA ribbon scan...");
    let tickers = load_watchlist(&config.watchlist);
    if tickers.is_empty() {
        eprintln!("Watchlist is empty; nothing to scan");
        return ExitCode::SUCCESS;
    }

    let provider = build_provider(data_dir, &config);
    let store = JsonStateStore::new(config.state_file.clone());
    let notifier = build_notifier(&config, no_notify);

    let report = match run_scan(
        provider.as_ref(),
        &store,
        notifier.as_deref(),
        &tickers,
        &config.spans,
        config.scan_history_days,
    ) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    eprintln!(
        "Scan complete: {} processed, {} skipped, state updated",
        report.processed, report.skipped
    );
    if report.events.is_empty() {
        eprintln!("No new signals found");
    } else {
        eprintln!("Found {} new signal(s)", report.events.len());
        eprintln!(
            "{}",
            crate::domain::scan::format_alerts(&report.events, &config.spans)
        );
    }
    ExitCode::SUCCESS
}

fn run_backtest_command(
    config_path: Option<&PathBuf>,
    data_dir: Option<PathBuf>,
    ticker_override: Option<&str>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let config = match build_app_config(adapter.as_ref().map(|a| a as &dyn ConfigPort)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    let tickers = match ticker_override {
        Some(ticker) => vec![ticker.to_string()],
        None => load_watchlist(&config.watchlist),
    };
    if tickers.is_empty() {
        eprintln!("Watchlist is empty; nothing to backtest");
        return ExitCode::SUCCESS;
    }

    let provider = build_provider(data_dir, &config);
    eprintln!(
        "Backtesting {} ticker(s) over {} days...",
        tickers.len(),
        config.backtest_history_days
    );

    let report = run_replay(
        provider.as_ref(),
        &tickers,
        &config.spans,
        config.backtest_history_days,
    );

    if report.trades.is_empty() && report.open_positions.is_empty() {
        eprintln!("No trades found in backtest period");
        return ExitCode::SUCCESS;
    }

    let summary = PerformanceSummary::compute(&report.trades);
    eprintln!("\n=== Backtest Results ===");
    eprintln!("Total Trades: {}", summary.total_trades);
    eprintln!("Win Rate:     {:.2}%", summary.win_rate * 100.0);
    eprintln!("Avg Gain:     {:.2}%", summary.avg_gain * 100.0);
    eprintln!("Avg Loss:     {:.2}%", summary.avg_loss * 100.0);
    eprintln!("Total Return: {:.2}%", summary.total_return * 100.0);

    if !report.open_positions.is_empty() {
        eprintln!(
            "{} position(s) still open at window end (not counted)",
            report.open_positions.len()
        );
    }

    ExitCode::SUCCESS
}

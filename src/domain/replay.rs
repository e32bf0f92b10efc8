//! Full-history replay of the ribbon rule (backtest mode).
//!
//! Walks consecutive (previous, current) ribbon pairs with an explicit
//! sliding window, starting at the first eligible bar: the one with `long`
//! bars of history behind it (inclusive). A series of exactly `long` bars
//! is therefore evaluated exactly once, on its final bar.

use crate::domain::bar::Bar;
use crate::domain::error::RibbonError;
use crate::domain::position::{OpenPosition, PositionState, Trade, Transition};
use crate::domain::ribbon::{compute_ribbon, RibbonSpans};
use crate::domain::signal::Signal;
use crate::ports::bar_provider::BarProvider;

/// Outcome of replaying one instrument.
#[derive(Debug, Clone)]
pub struct TickerReplay {
    pub ticker: String,
    pub trades: Vec<Trade>,
    /// Position still open when the window ended. Reported but never
    /// counted as a trade.
    pub open: Option<OpenPosition>,
}

pub fn replay_ticker(
    ticker: &str,
    bars: &[Bar],
    spans: &RibbonSpans,
) -> Result<TickerReplay, RibbonError> {
    if bars.is_empty() {
        return Err(RibbonError::NoData {
            ticker: ticker.to_string(),
        });
    }
    if bars.len() < spans.long {
        return Err(RibbonError::InsufficientData {
            ticker: ticker.to_string(),
            bars: bars.len(),
            minimum: spans.long,
        });
    }

    let ribbon = compute_ribbon(bars, spans);
    let first_eligible = spans.long - 1;

    let mut state = PositionState::Flat;
    let mut trades = Vec::new();

    for (prev_idx, pair) in ribbon.windows(2).enumerate() {
        let idx = prev_idx + 1;
        if idx < first_eligible {
            continue;
        }
        let bar = &bars[idx];
        let signal = Signal::evaluate(bar.close, &pair[1], &pair[0]);
        if let Some(Transition::Exited(trade)) = state.advance(ticker, bar.date, bar.close, signal)
        {
            trades.push(trade);
        }
    }

    let open = match state {
        PositionState::Long(position) => Some(position),
        PositionState::Flat => None,
    };

    Ok(TickerReplay {
        ticker: ticker.to_string(),
        trades,
        open,
    })
}

/// Ledger and bookkeeping for a whole backtest run.
#[derive(Debug, Clone, Default)]
pub struct BacktestReport {
    /// Completed trades, watchlist-major, chronological within each ticker.
    pub trades: Vec<Trade>,
    pub open_positions: Vec<OpenPosition>,
    pub processed: usize,
    pub skipped: usize,
}

/// Replay every watchlist instrument. A failure on one instrument is logged
/// and never aborts the rest of the batch.
pub fn run_replay(
    provider: &dyn BarProvider,
    tickers: &[String],
    spans: &RibbonSpans,
    history_days: u32,
) -> BacktestReport {
    let mut report = BacktestReport::default();

    for ticker in tickers {
        let bars = match provider.daily_history(ticker, history_days) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("warning: skipping {ticker} ({e})");
                report.skipped += 1;
                continue;
            }
        };

        match replay_ticker(ticker, &bars, spans) {
            Ok(replay) => {
                report.trades.extend(replay.trades);
                report.open_positions.extend(replay.open);
                report.processed += 1;
            }
            Err(e) => {
                eprintln!("warning: skipping {ticker} ({e})");
                report.skipped += 1;
            }
        }
    }

    report
}

//! Live scan: evaluate the latest bar per instrument against persisted state.
//!
//! The scan path is the same transition rule as the full replay, applied to
//! the final bar only; the persisted record stands in for all earlier bars.
//! Records are loaded once at the start of a run and saved once at the end,
//! before any notification attempt, so a failed delivery never loses a
//! transition.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::bar::Bar;
use crate::domain::error::RibbonError;
use crate::domain::position::{OpenPosition, PositionState, Transition};
use crate::domain::ribbon::{compute_ribbon, EmaTriple, RibbonSpans};
use crate::domain::signal::Signal;
use crate::ports::bar_provider::BarProvider;
use crate::ports::notifier::Notifier;
use crate::ports::state_store::StateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Status {
    #[default]
    #[serde(rename = "FLAT")]
    Flat,
    #[serde(rename = "LONG")]
    Long,
}

/// Durable per-ticker state, as stored in the JSON state file. Entry and
/// exit metadata from earlier transitions are retained on the record; only
/// `status` decides the live position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TickerRecord {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<f64>,
}

impl TickerRecord {
    /// Typed view of the record. A LONG record missing its entry metadata
    /// is treated as flat rather than rejected, matching the recoverable
    /// handling of malformed store content.
    pub fn position(&self, ticker: &str) -> PositionState {
        match (self.status, self.entry_date, self.entry_price) {
            (Status::Long, Some(entry_date), Some(entry_price)) => {
                PositionState::Long(OpenPosition {
                    ticker: ticker.to_string(),
                    entry_date,
                    entry_price,
                })
            }
            _ => PositionState::Flat,
        }
    }

    /// Fold a signal event into the record. Entries set the entry fields,
    /// exits the exit fields; the other pair is left as it was.
    pub fn apply(&mut self, event: &SignalEvent) {
        match event.kind {
            SignalKind::Entry => {
                self.status = Status::Long;
                self.entry_date = Some(event.date);
                self.entry_price = Some(event.price);
            }
            SignalKind::Exit => {
                self.status = Status::Flat;
                self.exit_date = Some(event.date);
                self.exit_price = Some(event.price);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Entry,
    Exit,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::Entry => write!(f, "ENTRY"),
            SignalKind::Exit => write!(f, "EXIT"),
        }
    }
}

/// A state transition observed on the latest bar of one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub ticker: String,
    pub date: NaiveDate,
    pub kind: SignalKind,
    pub price: f64,
    pub ribbon: EmaTriple,
}

/// Evaluate the latest bar only. The ribbon is computed over the whole
/// fetched history so the smoothed values match a full replay bar-for-bar.
pub fn scan_ticker(
    ticker: &str,
    bars: &[Bar],
    spans: &RibbonSpans,
    state: PositionState,
) -> Result<(PositionState, Option<SignalEvent>), RibbonError> {
    if bars.len() < spans.long {
        return Err(RibbonError::InsufficientData {
            ticker: ticker.to_string(),
            bars: bars.len(),
            minimum: spans.long,
        });
    }

    let ribbon = compute_ribbon(bars, spans);
    let last = bars.len() - 1;
    let bar = &bars[last];
    let signal = Signal::evaluate(bar.close, &ribbon[last], &ribbon[last - 1]);

    let mut state = state;
    let event = state
        .advance(ticker, bar.date, bar.close, signal)
        .map(|transition| SignalEvent {
            ticker: ticker.to_string(),
            date: bar.date,
            kind: match transition {
                Transition::Entered { .. } => SignalKind::Entry,
                Transition::Exited(_) => SignalKind::Exit,
            },
            price: bar.close,
            ribbon: ribbon[last],
        });

    Ok((state, event))
}

#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub events: Vec<SignalEvent>,
    pub processed: usize,
    pub skipped: usize,
}

/// Scan every watchlist instrument once. Instruments that fail to fetch or
/// have too little history are skipped with their persisted record left
/// untouched; every processed instrument gets its record rewritten. The
/// store is saved before the notifier is invoked.
pub fn run_scan(
    provider: &dyn BarProvider,
    store: &dyn StateStore,
    notifier: Option<&dyn Notifier>,
    tickers: &[String],
    spans: &RibbonSpans,
    history_days: u32,
) -> Result<ScanReport, RibbonError> {
    let mut records = store.load_all()?;
    let mut report = ScanReport::default();

    for ticker in tickers {
        let bars = match provider.daily_history(ticker, history_days) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("warning: skipping {ticker} ({e})");
                report.skipped += 1;
                continue;
            }
        };

        let state = records
            .get(ticker)
            .map(|record| record.position(ticker))
            .unwrap_or_default();

        match scan_ticker(ticker, &bars, spans, state) {
            Ok((_, event)) => {
                let record = records.entry(ticker.clone()).or_default();
                if let Some(event) = event {
                    record.apply(&event);
                    report.events.push(event);
                }
                report.processed += 1;
            }
            Err(e) => {
                eprintln!("warning: skipping {ticker} ({e})");
                report.skipped += 1;
            }
        }
    }

    store.save_all(&records)?;

    if let Some(notifier) = notifier {
        if !report.events.is_empty() {
            let message = format_alerts(&report.events, spans);
            if let Err(e) = notifier.send(&message) {
                eprintln!("warning: notification failed ({e})");
            }
        }
    }

    Ok(report)
}

/// One aggregate alert message for a scan run's events.
pub fn format_alerts(events: &[SignalEvent], spans: &RibbonSpans) -> String {
    let mut lines = vec!["Triple EMA Ribbon Alerts".to_string(), String::new()];
    for event in events {
        lines.push(format!(
            "{} {} @ {:.2}",
            event.kind, event.ticker, event.price
        ));
        lines.push(format!(
            "  EMA{} {:.2} | EMA{} {:.2} | EMA{} {:.2}",
            spans.short,
            event.ribbon.short,
            spans.medium,
            event.ribbon.medium,
            spans.long,
            event.ribbon.long,
        ));
    }
    lines.join("\n")
}

/// Records map used by the state store.
pub type RecordMap = HashMap<String, TickerRecord>;

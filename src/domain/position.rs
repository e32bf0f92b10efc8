//! Position lifecycle: flat/long state machine, open positions, completed trades.

use chrono::NaiveDate;

use crate::domain::signal::Signal;

/// An entered position awaiting its exit.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPosition {
    pub ticker: String,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
}

/// One completed round trip. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub ticker: String,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub pct_change: f64,
}

impl Trade {
    pub fn close(position: OpenPosition, exit_date: NaiveDate, exit_price: f64) -> Trade {
        Trade {
            ticker: position.ticker,
            entry_date: position.entry_date,
            entry_price: position.entry_price,
            exit_date,
            exit_price,
            pct_change: (exit_price - position.entry_price) / position.entry_price,
        }
    }

    pub fn is_win(&self) -> bool {
        self.pct_change > 0.0
    }
}

/// Per-instrument signal state. `Long` always carries its entry metadata,
/// so "long without an entry price" cannot be represented.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long(OpenPosition),
}

/// A state change produced by one bar.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Entered { date: NaiveDate, price: f64 },
    Exited(Trade),
}

impl PositionState {
    pub fn is_long(&self) -> bool {
        matches!(self, PositionState::Long(_))
    }

    /// Apply one bar's signal in sequence. Entry is only honored while flat,
    /// exit only while long; everything else leaves the state unchanged.
    pub fn advance(
        &mut self,
        ticker: &str,
        date: NaiveDate,
        close: f64,
        signal: Signal,
    ) -> Option<Transition> {
        match self {
            PositionState::Flat if signal.entry => {
                *self = PositionState::Long(OpenPosition {
                    ticker: ticker.to_string(),
                    entry_date: date,
                    entry_price: close,
                });
                Some(Transition::Entered { date, price: close })
            }
            PositionState::Long(position) if signal.exit => {
                let trade = Trade::close(position.clone(), date, close);
                *self = PositionState::Flat;
                Some(Transition::Exited(trade))
            }
            _ => None,
        }
    }
}

//! Aggregate performance statistics over a trade ledger.

use crate::domain::position::Trade;

/// Summary of a backtest ledger. Ratios are fractions; the console layer
/// formats them as percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub total_trades: usize,
    pub winners: usize,
    pub losers: usize,
    pub win_rate: f64,
    pub avg_gain: f64,
    pub avg_loss: f64,
    pub total_return: f64,
}

impl PerformanceSummary {
    /// Compute over the full ledger. Wins are trades with pct_change > 0;
    /// breakeven counts as a loss. The cumulative return compounds trades
    /// in ledger order across all instruments, modelling sequential
    /// fully-reinvested capital.
    pub fn compute(trades: &[Trade]) -> Self {
        if trades.is_empty() {
            return PerformanceSummary {
                total_trades: 0,
                winners: 0,
                losers: 0,
                win_rate: 0.0,
                avg_gain: 0.0,
                avg_loss: 0.0,
                total_return: 0.0,
            };
        }

        let mut winners = 0usize;
        let mut losers = 0usize;
        let mut gain_sum = 0.0_f64;
        let mut loss_sum = 0.0_f64;
        let mut compounded = 1.0_f64;

        for trade in trades {
            if trade.is_win() {
                winners += 1;
                gain_sum += trade.pct_change;
            } else {
                losers += 1;
                loss_sum += trade.pct_change;
            }
            compounded *= 1.0 + trade.pct_change;
        }

        let total = trades.len();
        let avg_gain = if winners > 0 {
            gain_sum / winners as f64
        } else {
            0.0
        };
        let avg_loss = if losers > 0 {
            loss_sum / losers as f64
        } else {
            0.0
        };

        PerformanceSummary {
            total_trades: total,
            winners,
            losers,
            win_rate: winners as f64 / total as f64,
            avg_gain,
            avg_loss,
            total_return: compounded - 1.0,
        }
    }
}

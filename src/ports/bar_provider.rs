//! Market data access port trait.

use crate::domain::bar::Bar;
use crate::domain::error::RibbonError;

/// Supplies daily close history for one instrument, ordered by date
/// ascending. An empty result means the instrument has no data for the
/// requested window; callers treat that as "skip this instrument".
pub trait BarProvider {
    fn daily_history(&self, ticker: &str, days: u32) -> Result<Vec<Bar>, RibbonError>;
}

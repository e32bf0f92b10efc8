//! Persisted scan-state access port trait.

use crate::domain::error::RibbonError;
use crate::domain::scan::{RecordMap, TickerRecord};

/// Durable key-value store of per-ticker scan state. A scan run reads the
/// whole store once at the start and rewrites it once at the end.
pub trait StateStore {
    fn load_all(&self) -> Result<RecordMap, RibbonError>;

    fn save_all(&self, records: &RecordMap) -> Result<(), RibbonError>;

    /// Default implementation: reads the whole store.
    fn get(&self, ticker: &str) -> Result<Option<TickerRecord>, RibbonError> {
        Ok(self.load_all()?.remove(ticker))
    }

    /// Default implementation: read-modify-write of the whole store.
    fn put(&self, ticker: &str, record: &TickerRecord) -> Result<(), RibbonError> {
        let mut records = self.load_all()?;
        records.insert(ticker.to_string(), record.clone());
        self.save_all(&records)
    }
}

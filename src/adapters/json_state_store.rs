//! JSON file state store.
//!
//! One JSON object on disk mapping ticker symbol to its scan record.
//! An absent or malformed file reads as an empty store; every save
//! rewrites the file in full.

use crate::domain::error::RibbonError;
use crate::domain::scan::RecordMap;
use crate::ports::state_store::StateStore;
use std::fs;
use std::path::PathBuf;

pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl StateStore for JsonStateStore {
    fn load_all(&self) -> Result<RecordMap, RibbonError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(RecordMap::new());
            }
            Err(e) => {
                return Err(RibbonError::StateStore {
                    reason: format!("failed to read {}: {e}", self.path.display()),
                });
            }
        };

        match serde_json::from_str(&content) {
            Ok(records) => Ok(records),
            Err(e) => {
                eprintln!(
                    "warning: could not decode {} ({e}); starting fresh",
                    self.path.display()
                );
                Ok(RecordMap::new())
            }
        }
    }

    fn save_all(&self, records: &RecordMap) -> Result<(), RibbonError> {
        let content =
            serde_json::to_string_pretty(records).map_err(|e| RibbonError::StateStore {
                reason: format!("failed to encode state: {e}"),
            })?;
        fs::write(&self.path, content).map_err(|e| RibbonError::StateStore {
            reason: format!("failed to write {}: {e}", self.path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scan::{Status, TickerRecord};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonStateStore {
        JsonStateStore::new(dir.path().join("signals_state.json"))
    }

    #[test]
    fn absent_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn malformed_content_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(dir.path().join("signals_state.json"), "{not json").unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut records = RecordMap::new();
        records.insert(
            "AAPL".to_string(),
            TickerRecord {
                status: Status::Long,
                entry_date: NaiveDate::from_ymd_opt(2024, 2, 1),
                entry_price: Some(191.5),
                exit_date: None,
                exit_price: None,
            },
        );
        records.insert("BHP".to_string(), TickerRecord::default());

        store.save_all(&records).unwrap();
        let reloaded = store.load_all().unwrap();
        assert_eq!(reloaded, records);
    }

    #[test]
    fn save_rewrites_the_whole_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut records = RecordMap::new();
        records.insert("AAPL".to_string(), TickerRecord::default());
        records.insert("BHP".to_string(), TickerRecord::default());
        store.save_all(&records).unwrap();

        records.remove("BHP");
        store.save_all(&records).unwrap();

        let reloaded = store.load_all().unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(!reloaded.contains_key("BHP"));
    }

    #[test]
    fn default_get_and_put_operate_per_key() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.get("AAPL").unwrap().is_none());

        let record = TickerRecord {
            status: Status::Long,
            entry_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            entry_price: Some(10.0),
            exit_date: None,
            exit_price: None,
        };
        store.put("AAPL", &record).unwrap();
        assert_eq!(store.get("AAPL").unwrap(), Some(record));
    }

    #[test]
    fn reads_hand_written_state_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            dir.path().join("signals_state.json"),
            r#"{
                "AAPL": {
                    "status": "LONG",
                    "entry_date": "2024-02-01",
                    "entry_price": 191.5
                },
                "BHP": {"status": "FLAT"}
            }"#,
        )
        .unwrap();

        let records = store.load_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records["AAPL"].status, Status::Long);
        assert_eq!(records["AAPL"].entry_price, Some(191.5));
        assert_eq!(records["BHP"].status, Status::Flat);
        assert_eq!(records["BHP"].entry_date, None);
    }
}

//! CSV directory bar provider.
//!
//! Reads `<dir>/<TICKER>.csv` with a `date,open,high,low,close,volume`
//! header. Only the date and close columns feed the domain; the other
//! columns are accepted for compatibility with common export formats.

use crate::domain::bar::Bar;
use crate::domain::error::RibbonError;
use crate::ports::bar_provider::BarProvider;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvProvider {
    base_path: PathBuf,
}

impl CsvProvider {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{ticker}.csv"))
    }
}

impl BarProvider for CsvProvider {
    fn daily_history(&self, ticker: &str, _days: u32) -> Result<Vec<Bar>, RibbonError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| RibbonError::Provider {
            ticker: ticker.to_string(),
            reason: format!("failed to read {}: {e}", path.display()),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| RibbonError::Provider {
                ticker: ticker.to_string(),
                reason: format!("CSV parse error: {e}"),
            })?;

            let date_str = record.get(0).ok_or_else(|| RibbonError::Provider {
                ticker: ticker.to_string(),
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                RibbonError::Provider {
                    ticker: ticker.to_string(),
                    reason: format!("invalid date format: {e}"),
                }
            })?;

            let close: f64 = record
                .get(4)
                .ok_or_else(|| RibbonError::Provider {
                    ticker: ticker.to_string(),
                    reason: "missing close column".into(),
                })?
                .parse()
                .map_err(|e| RibbonError::Provider {
                    ticker: ticker.to_string(),
                    reason: format!("invalid close value: {e}"),
                })?;

            bars.push(Bar { date, close });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

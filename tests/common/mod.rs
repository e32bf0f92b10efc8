#![allow(dead_code)]
//! Shared fixtures: mock ports and bar-series builders.

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;

use ribbonscan::domain::bar::Bar;
use ribbonscan::domain::error::RibbonError;
use ribbonscan::domain::scan::RecordMap;
use ribbonscan::ports::bar_provider::BarProvider;
use ribbonscan::ports::notifier::Notifier;
use ribbonscan::ports::state_store::StateStore;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_series(prices: &[f64]) -> Vec<Bar> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: date(2023, 6, 1) + chrono::Duration::days(i as i64),
            close,
        })
        .collect()
}

/// Strictly increasing closes from 1.0 to 2.0.
pub fn rising(n: usize) -> Vec<f64> {
    (0..n).map(|i| 1.0 + i as f64 / (n - 1) as f64).collect()
}

/// Sixty rising bars followed by ten sharply falling ones.
pub fn rise_then_fall() -> Vec<f64> {
    let mut prices = rising(60);
    let peak = *prices.last().unwrap();
    for i in 1..=10 {
        prices.push(peak - 0.08 * i as f64);
    }
    prices
}

#[derive(Default)]
pub struct MockProvider {
    series: HashMap<String, Vec<Bar>>,
    failing: Vec<String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, ticker: &str, bars: Vec<Bar>) -> Self {
        self.series.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_failure(mut self, ticker: &str) -> Self {
        self.failing.push(ticker.to_string());
        self
    }
}

impl BarProvider for MockProvider {
    fn daily_history(&self, ticker: &str, _days: u32) -> Result<Vec<Bar>, RibbonError> {
        if self.failing.iter().any(|t| t == ticker) {
            return Err(RibbonError::Provider {
                ticker: ticker.to_string(),
                reason: "simulated outage".into(),
            });
        }
        self.series
            .get(ticker)
            .cloned()
            .ok_or_else(|| RibbonError::NoData {
                ticker: ticker.to_string(),
            })
    }
}

#[derive(Default)]
pub struct MemoryStateStore {
    pub records: RefCell<RecordMap>,
    pub saves: RefCell<usize>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(records: RecordMap) -> Self {
        Self {
            records: RefCell::new(records),
            saves: RefCell::new(0),
        }
    }
}

impl StateStore for MemoryStateStore {
    fn load_all(&self) -> Result<RecordMap, RibbonError> {
        Ok(self.records.borrow().clone())
    }

    fn save_all(&self, records: &RecordMap) -> Result<(), RibbonError> {
        *self.records.borrow_mut() = records.clone();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: RefCell<Vec<String>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            messages: RefCell::new(Vec::new()),
            fail: true,
        }
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, message: &str) -> Result<(), RibbonError> {
        if self.fail {
            return Err(RibbonError::Notify {
                reason: "simulated delivery failure".into(),
            });
        }
        self.messages.borrow_mut().push(message.to_string());
        Ok(())
    }
}

//! Yahoo Finance daily bar provider.
//!
//! Fetches daily bars from Yahoo's v8 chart API. Yahoo has no official
//! API and is subject to unannounced format changes; the CSV provider is
//! the fallback when it is unavailable.

use crate::domain::bar::Bar;
use crate::domain::error::RibbonError;
use crate::ports::bar_provider::BarProvider;
use serde::Deserialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

pub struct YahooProvider {
    client: reqwest::blocking::Client,
    max_retries: u32,
    base_delay: Duration,
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooProvider {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    fn chart_url(ticker: &str, days: u32) -> String {
        let end_ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        let start_ts = end_ts - i64::from(days) * 86_400;
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{ticker}\
             ?period1={start_ts}&period2={end_ts}&interval=1d"
        )
    }

    fn parse_response(ticker: &str, resp: ChartResponse) -> Result<Vec<Bar>, RibbonError> {
        let provider_err = |reason: String| RibbonError::Provider {
            ticker: ticker.to_string(),
            reason,
        };

        let result = match (resp.chart.result, resp.chart.error) {
            (Some(result), _) => result,
            (None, Some(err)) => {
                return Err(provider_err(format!("{}: {}", err.code, err.description)));
            }
            (None, None) => return Err(provider_err("empty result with no error".into())),
        };

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| provider_err("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| provider_err("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| provider_err("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| provider_err(format!("invalid timestamp: {ts}")))?;

            // Null close slots are holidays or half-session artifacts.
            let Some(close) = quote.close.get(i).copied().flatten() else {
                continue;
            };

            bars.push(Bar { date, close });
        }

        Ok(bars)
    }

    fn fetch_with_retry(&self, ticker: &str, days: u32) -> Result<Vec<Bar>, RibbonError> {
        let url = Self::chart_url(ticker, days);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                std::thread::sleep(self.base_delay * 2u32.pow(attempt - 1));
            }

            match self.client.get(&url).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if !status.is_success() {
                        last_error = Some(RibbonError::Provider {
                            ticker: ticker.to_string(),
                            reason: format!("HTTP {status}"),
                        });
                        continue;
                    }

                    let chart: ChartResponse =
                        resp.json().map_err(|e| RibbonError::Provider {
                            ticker: ticker.to_string(),
                            reason: format!("failed to parse response: {e}"),
                        })?;

                    return Self::parse_response(ticker, chart);
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(RibbonError::Provider {
                        ticker: ticker.to_string(),
                        reason: e.to_string(),
                    });
                    continue;
                }
                Err(e) => {
                    return Err(RibbonError::Provider {
                        ticker: ticker.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(last_error.unwrap_or_else(|| RibbonError::Provider {
            ticker: ticker.to_string(),
            reason: "max retries exceeded".into(),
        }))
    }
}

impl BarProvider for YahooProvider {
    fn daily_history(&self, ticker: &str, days: u32) -> Result<Vec<Bar>, RibbonError> {
        self.fetch_with_retry(ticker, days)
    }
}

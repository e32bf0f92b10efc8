//! Telegram Bot API notifier.

use crate::domain::error::RibbonError;
use crate::ports::notifier::Notifier;
use std::time::Duration;

pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            token,
            chat_id,
        }
    }

    /// Reads TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID. Returns None when
    /// either is unset; the scan then runs without notifications.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN").ok()?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").ok()?;
        Some(Self::new(token, chat_id))
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, message: &str) -> Result<(), RibbonError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": message,
        });

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .map_err(|e| RibbonError::Notify {
                reason: e.to_string(),
            })?;

        resp.error_for_status()
            .map(|_| ())
            .map_err(|e| RibbonError::Notify {
                reason: e.to_string(),
            })
    }
}

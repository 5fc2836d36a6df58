//! Breakout notifications.
//!
//! The orchestrator hands a plain-text alert to an optional
//! [`NotificationSink`]. Delivery problems are logged and never change the
//! screen result.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use breakscan_core::screen::ScreenHit;

use crate::export::format_number;

/// First line of every alert.
pub const ALERT_HEADER: &str = "📢 Sinyal Breakout Ditemukan:";

const TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")]
    Transport(String),

    #[error("notification rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Destination for breakout alerts.
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &str;

    fn send(&self, message: &str) -> Result<(), NotifyError>;
}

/// Header line plus one `SYMBOL - Close: x, RSI: y` line per hit.
pub fn format_alert_message(hits: &[ScreenHit]) -> String {
    let mut message = String::from(ALERT_HEADER);
    for hit in hits {
        message.push('\n');
        message.push_str(&format!(
            "{} - Close: {}, RSI: {}",
            hit.symbol,
            format_number(hit.close),
            format_number(hit.rsi)
        ));
    }
    message
}

/// Send an alert for `hits` through `sink`. Returns whether a message went out.
///
/// Nothing is sent for an empty hit list; failures are logged as warnings.
pub fn deliver(sink: &dyn NotificationSink, hits: &[ScreenHit]) -> bool {
    if hits.is_empty() {
        return false;
    }
    match sink.send(&format_alert_message(hits)) {
        Ok(()) => {
            info!(sink = sink.name(), hits = hits.len(), "breakout alert sent");
            true
        }
        Err(e) => {
            warn!(sink = sink.name(), error = %e, "breakout alert not delivered");
            false
        }
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Telegram Bot API `sendMessage` sink.
pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    bot_token: String,
    chat_id: String,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| NotifyError::Client(e.to_string()))?;
        Ok(Self {
            client,
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: TELEGRAM_API.to_string(),
        })
    }

    /// Build from `TELEGRAM_TOKEN` and `TELEGRAM_CHAT_ID`.
    ///
    /// `None` when either is unset or blank: alerts are then silently off.
    pub fn from_env() -> Option<Self> {
        Self::from_vars(
            std::env::var("TELEGRAM_TOKEN").ok(),
            std::env::var("TELEGRAM_CHAT_ID").ok(),
        )
    }

    fn from_vars(token: Option<String>, chat_id: Option<String>) -> Option<Self> {
        let token = token.filter(|t| !t.trim().is_empty())?;
        let chat_id = chat_id.filter(|c| !c.trim().is_empty())?;
        match Self::new(token.trim(), chat_id.trim()) {
            Ok(notifier) => Some(notifier),
            Err(e) => {
                warn!(error = %e, "telegram notifier disabled");
                None
            }
        }
    }

    /// Point at a different Bot API host.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

impl NotificationSink for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    fn send(&self, message: &str) -> Result<(), NotifyError> {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text: message,
        };
        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().unwrap_or_default();
            Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

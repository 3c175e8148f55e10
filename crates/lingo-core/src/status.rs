use serde::{Deserialize, Serialize};
use tokio::sync::watch;

pub const DETECTING: &str = "🔍 Detecting language...";
pub const DETECTED: &str = "✅ Language detected successfully.";
pub const TRANSLATING: &str = "🔄 Translating text...";
pub const TRANSLATED: &str = "✅ Translation successful.";
pub const SUMMARIZING: &str = "📖 Summarizing text...";
pub const SUMMARIZED: &str = "✅ Summarization successful.";
pub const SERVICES_READY: &str = "✅ AI Services Ready!";
pub const SERVICES_MISSING: &str = "❌ Error: AI APIs not available.";
pub const SERVICES_FAILED: &str = "❌ Failed to initialize AI services.";

const SUCCESS_MARK: &str = "✅";
const ERROR_MARK: &str = "❌";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Idle,
    Progress,
    Success,
    Error,
}

impl StatusLevel {
    /// Category by prefix: success and error marks, empty is idle,
    /// anything else is work in progress.
    pub fn classify(text: &str) -> Self {
        let text = text.trim_start();
        if text.is_empty() {
            StatusLevel::Idle
        } else if text.starts_with(SUCCESS_MARK) {
            StatusLevel::Success
        } else if text.starts_with(ERROR_MARK) {
            StatusLevel::Error
        } else {
            StatusLevel::Progress
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLevel::Idle => "idle",
            StatusLevel::Progress => "progress",
            StatusLevel::Success => "success",
            StatusLevel::Error => "error",
        }
    }
}

/// Human-readable status line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    text: String,
}

impl Status {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn idle() -> Self {
        Self::default()
    }

    pub fn error(detail: impl std::fmt::Display) -> Self {
        Self { text: format!("{} {}.", ERROR_MARK, detail) }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn level(&self) -> StatusLevel {
        StatusLevel::classify(&self.text)
    }

    pub fn to_protocol(&self) -> protocol::Status {
        protocol::Status {
            v: Some(protocol::VERSION),
            level: self.level().as_str().to_string(),
            text: self.text.clone(),
        }
    }
}

/// Single current status value. Writes overwrite; nothing is queued.
#[derive(Debug)]
pub struct StatusChannel {
    tx: watch::Sender<Status>,
}

impl StatusChannel {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Status::idle());
        Self { tx }
    }

    pub fn set(&self, status: Status) {
        self.tx.send_replace(status);
    }

    pub fn current(&self) -> Status {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.tx.subscribe()
    }
}

impl Default for StatusChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;

    #[test]
    fn classify_by_prefix() {
        assert_eq!(StatusLevel::classify(""), StatusLevel::Idle);
        assert_eq!(StatusLevel::classify(DETECTING), StatusLevel::Progress);
        assert_eq!(StatusLevel::classify(TRANSLATED), StatusLevel::Success);
        assert_eq!(StatusLevel::classify(SERVICES_FAILED), StatusLevel::Error);
    }

    #[test]
    fn error_status_carries_service_error_text() {
        let status = Status::error(ServiceError::TranslationFailed("offline".into()));
        assert_eq!(status.text(), "❌ Translation failed: offline.");
        assert_eq!(status.level(), StatusLevel::Error);
        assert_eq!(status.to_protocol().level, "error");
    }

    #[tokio::test]
    async fn channel_keeps_only_latest_value() {
        let channel = StatusChannel::new();
        let mut rx = channel.subscribe();
        channel.set(Status::new(SUMMARIZING));
        channel.set(Status::new(SUMMARIZED));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().text(), SUMMARIZED);
        assert_eq!(channel.current().level(), StatusLevel::Success);
    }
}

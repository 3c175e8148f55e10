use serde::{Deserialize, Serialize};

/// Protocol version (bumped when breaking changes are introduced)
pub const VERSION: u8 = 1;

/// Requests a presentation layer sends to a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// The primary control: sends the text, or summarizes the last message
    /// when it is long enough to need it.
    Submit(Submit),
    Send(Submit),
    Translate,
    SelectLanguage(SelectLanguage),
    SummarizeOriginal,
    SummarizeTranslation(MessageRef),
    Remove(MessageRef),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v: Option<u8>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectLanguage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v: Option<u8>,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v: Option<u8>,
    pub id: u64,
}

impl Command {
    pub fn submit<S: Into<String>>(text: S) -> Self {
        Command::Submit(Submit { v: Some(VERSION), text: text.into() })
    }

    pub fn send<S: Into<String>>(text: S) -> Self {
        Command::Send(Submit { v: Some(VERSION), text: text.into() })
    }

    pub fn select_language<S: Into<String>>(lang: S) -> Self {
        Command::SelectLanguage(SelectLanguage { v: Some(VERSION), lang: lang.into() })
    }

    pub fn summarize_translation(id: u64) -> Self {
        Command::SummarizeTranslation(MessageRef { v: Some(VERSION), id })
    }

    pub fn remove(id: u64) -> Self {
        Command::Remove(MessageRef { v: Some(VERSION), id })
    }
}

/// Notifications a chat session pushes to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Status(Status),
    DetectedLanguage(DetectedLanguage),
    Snapshot(Snapshot),
}

/// Informational status line for UIs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v: Option<u8>,
    pub level: String, // idle|progress|success|error
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLanguage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v: Option<u8>,
    pub lang: String,
}

/// Full view of the message log at one version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v: Option<u8>,
    pub session_id: String,
    pub version: u64,
    pub messages: Vec<ChatMessage>,
}

/// Flat rendering of one log entry, shaped for chat bubbles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub kind: MessageKind,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub needs_summarization: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_lang: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub summarized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Sent,
    Received,
    SummaryOfTranslation,
}

#[inline]
fn is_false(b: &bool) -> bool { !*b }

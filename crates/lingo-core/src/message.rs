use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::language::LanguageTag;

pub use protocol::MessageKind;

/// Stable identity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for MessageId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id source. Ids are never reused within one generator.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: AtomicU64::new(1) }
    }

    pub fn next_id(&self) -> MessageId {
        MessageId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Whitespace-delimited token count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
    pub lang: LanguageTag,
}

/// Text the user typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentMessage {
    text: String,
    word_count: usize,
    needs_summarization: bool,
    summary: Option<Summary>,
}

impl SentMessage {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }
}

/// A translation; immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivedMessage {
    text: String,
    lang: LanguageTag,
    original_text: String,
    word_count: usize,
    needs_summarization: bool,
}

impl ReceivedMessage {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lang(&self) -> &LanguageTag {
        &self.lang
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }
}

/// Summary of a translation, written in the translation's own language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationSummary {
    text: String,
    lang: LanguageTag,
    source_id: MessageId,
}

impl TranslationSummary {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lang(&self) -> &LanguageTag {
        &self.lang
    }

    pub fn source_id(&self) -> MessageId {
        self.source_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageBody {
    Sent(SentMessage),
    Received(ReceivedMessage),
    SummaryOfTranslation(TranslationSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    created_at: DateTime<Utc>,
    body: MessageBody,
}

impl Message {
    pub fn sent(id: MessageId, text: impl Into<String>, threshold: usize) -> Self {
        let text = text.into();
        let words = word_count(&text);
        Self::with_body(id, MessageBody::Sent(SentMessage {
            text,
            word_count: words,
            needs_summarization: words > threshold,
            summary: None,
        }))
    }

    pub fn received(
        id: MessageId,
        text: impl Into<String>,
        lang: LanguageTag,
        original_text: impl Into<String>,
        threshold: usize,
    ) -> Self {
        let text = text.into();
        let words = word_count(&text);
        Self::with_body(id, MessageBody::Received(ReceivedMessage {
            text,
            lang,
            original_text: original_text.into(),
            word_count: words,
            needs_summarization: words > threshold,
        }))
    }

    pub fn summary_of_translation(
        id: MessageId,
        summary: impl Into<String>,
        lang: LanguageTag,
        source_id: MessageId,
    ) -> Self {
        Self::with_body(id, MessageBody::SummaryOfTranslation(TranslationSummary {
            text: summary.into(),
            lang,
            source_id,
        }))
    }

    fn with_body(id: MessageId, body: MessageBody) -> Self {
        Self { id, created_at: Utc::now(), body }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    pub fn kind(&self) -> MessageKind {
        match self.body {
            MessageBody::Sent(_) => MessageKind::Sent,
            MessageBody::Received(_) => MessageKind::Received,
            MessageBody::SummaryOfTranslation(_) => MessageKind::SummaryOfTranslation,
        }
    }

    /// The displayed content.
    pub fn text(&self) -> &str {
        match &self.body {
            MessageBody::Sent(m) => &m.text,
            MessageBody::Received(m) => &m.text,
            MessageBody::SummaryOfTranslation(m) => &m.text,
        }
    }

    pub fn lang(&self) -> Option<&LanguageTag> {
        match &self.body {
            MessageBody::Sent(_) => None,
            MessageBody::Received(m) => Some(&m.lang),
            MessageBody::SummaryOfTranslation(m) => Some(&m.lang),
        }
    }

    pub fn original_text(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Received(m) => Some(&m.original_text),
            _ => None,
        }
    }

    pub fn word_count(&self) -> usize {
        match &self.body {
            MessageBody::Sent(m) => m.word_count,
            MessageBody::Received(m) => m.word_count,
            MessageBody::SummaryOfTranslation(m) => word_count(&m.text),
        }
    }

    pub fn needs_summarization(&self) -> bool {
        match &self.body {
            MessageBody::Sent(m) => m.needs_summarization,
            MessageBody::Received(m) => m.needs_summarization,
            MessageBody::SummaryOfTranslation(_) => false,
        }
    }

    pub fn summary(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Sent(m) => m.summary.as_ref().map(|s| s.text.as_str()),
            MessageBody::Received(_) => None,
            MessageBody::SummaryOfTranslation(m) => Some(&m.text),
        }
    }

    pub fn summary_lang(&self) -> Option<&LanguageTag> {
        match &self.body {
            MessageBody::Sent(m) => m.summary.as_ref().map(|s| &s.lang),
            MessageBody::Received(_) => None,
            MessageBody::SummaryOfTranslation(m) => Some(&m.lang),
        }
    }

    pub fn is_summarized(&self) -> bool {
        self.summary().is_some()
    }

    /// Attaches a summary to a sent message, keeping id and timestamp.
    /// Other variants come back unchanged.
    pub fn with_summary(&self, summary: Summary) -> Message {
        let mut next = self.clone();
        if let MessageBody::Sent(sent) = &mut next.body {
            sent.summary = Some(summary);
            sent.needs_summarization = false;
        }
        next
    }

    pub fn to_view(&self) -> protocol::ChatMessage {
        protocol::ChatMessage {
            id: self.id.get(),
            kind: self.kind(),
            text: self.text().to_string(),
            lang: self.lang().map(|l| l.to_string()),
            original_text: self.original_text().map(str::to_string),
            needs_summarization: self.needs_summarization(),
            summary: match &self.body {
                MessageBody::Sent(m) => m.summary.as_ref().map(|s| s.text.clone()),
                _ => None,
            },
            summary_lang: self.summary_lang().map(|l| l.to_string()),
            summarized: self.is_summarized(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn word_count_splits_on_any_whitespace() {
        assert_eq!(word_count("  one\ttwo\n three  "), 3);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn ids_are_monotonic() {
        let ids = IdGenerator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
    }

    #[test]
    fn needs_summarization_threshold_is_exclusive() {
        let ids = IdGenerator::new();
        assert!(!Message::sent(ids.next_id(), words(150), 150).needs_summarization());
        assert!(Message::sent(ids.next_id(), words(151), 150).needs_summarization());
    }

    #[test]
    fn sent_message_has_no_lang() {
        let msg = Message::sent(MessageId::from(1), "hola", 150);
        assert_eq!(msg.kind(), MessageKind::Sent);
        assert!(msg.lang().is_none());
        assert!(msg.original_text().is_none());
    }

    #[test]
    fn attaching_summary_clears_flag_and_keeps_identity() {
        let msg = Message::sent(MessageId::from(9), words(200), 150);
        let summarized = msg.with_summary(Summary { text: "short".into(), lang: "en".into() });

        assert_eq!(summarized.id(), msg.id());
        assert_eq!(summarized.created_at(), msg.created_at());
        assert_eq!(summarized.text(), msg.text());
        assert!(!summarized.needs_summarization());
        assert!(summarized.is_summarized());
        assert_eq!(summarized.summary_lang(), Some(&LanguageTag::new("en")));
    }

    #[test]
    fn received_messages_ignore_summary_attachment() {
        let msg = Message::received(MessageId::from(2), words(200), "fr".into(), "source", 150);
        let same = msg.with_summary(Summary { text: "x".into(), lang: "fr".into() });
        assert_eq!(same, msg);
    }

    #[test]
    fn translation_summary_view() {
        let msg = Message::summary_of_translation(MessageId::from(3), "bref", "fr".into(), MessageId::from(2));
        let view = msg.to_view();
        assert_eq!(view.kind, MessageKind::SummaryOfTranslation);
        assert_eq!(view.lang.as_deref(), Some("fr"));
        assert_eq!(view.summary_lang.as_deref(), Some("fr"));
        assert!(view.summarized);
        assert!(!view.needs_summarization);
    }
}

use std::sync::Arc;

use crate::message::{Message, MessageId};

/// Immutable snapshot of the conversation. Every operation returns a new
/// snapshot; clones share storage.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    version: u64,
    messages: Arc<Vec<Message>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped by every transformation that changed the contents.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    /// Highest-index entry, whatever its kind.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.get(id).is_some()
    }

    pub fn append(&self, message: Message) -> MessageLog {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.extend(self.messages.iter().cloned());
        messages.push(message);
        self.next(messages)
    }

    /// Replaces the entry with `id`; unchanged snapshot if it is absent.
    pub fn update<F>(&self, id: MessageId, f: F) -> MessageLog
    where
        F: FnOnce(&Message) -> Message,
    {
        let Some(index) = self.messages.iter().position(|m| m.id() == id) else {
            return self.clone();
        };
        let replacement = f(&self.messages[index]);
        debug_assert_eq!(replacement.id(), id, "update must keep the message id");
        let mut messages = self.messages.as_ref().clone();
        messages[index] = replacement;
        self.next(messages)
    }

    /// Filters out the entry with `id`; unchanged snapshot if it is absent.
    pub fn remove(&self, id: MessageId) -> MessageLog {
        if !self.contains(id) {
            return self.clone();
        }
        let messages = self.messages.iter().filter(|m| m.id() != id).cloned().collect();
        self.next(messages)
    }

    /// Sum of word counts over every displayed text.
    pub fn displayed_word_count(&self) -> usize {
        self.messages.iter().map(Message::word_count).sum()
    }

    pub fn views(&self) -> Vec<protocol::ChatMessage> {
        self.messages.iter().map(Message::to_view).collect()
    }

    fn next(&self, messages: Vec<Message>) -> MessageLog {
        MessageLog { version: self.version + 1, messages: Arc::new(messages) }
    }
}

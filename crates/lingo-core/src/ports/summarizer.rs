use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::language::LanguageTag;

/// Optional per-call language hints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeOptions {
    pub source_language: Option<LanguageTag>,
    pub target_language: Option<LanguageTag>,
}

impl SummarizeOptions {
    pub fn new(source_language: Option<LanguageTag>, target_language: Option<LanguageTag>) -> Self {
        Self { source_language, target_language }
    }

    /// Same language on both ends.
    pub fn within(lang: LanguageTag) -> Self {
        Self { source_language: Some(lang.clone()), target_language: Some(lang) }
    }
}

/// Long-lived summarizer handle, shared by every call.
#[async_trait]
pub trait TextSummarizer: Send + Sync {
    async fn summarize(&self, text: &str, options: &SummarizeOptions) -> Result<String>;
}

#[async_trait]
pub trait SummarizerFactory: Send + Sync {
    async fn create(&self) -> Result<Arc<dyn TextSummarizer>>;
}

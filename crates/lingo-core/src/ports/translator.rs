use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::language::LanguageTag;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: LanguageTag,
    pub target: LanguageTag,
}

impl LanguagePair {
    pub fn new(source: impl Into<LanguageTag>, target: impl Into<LanguageTag>) -> Self {
        Self { source: source.into(), target: target.into() }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.source, self.target)
    }
}

/// Translator bound to one language pair.
#[async_trait]
pub trait TextTranslator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
}

/// Builds a fresh translator for every pair. Translators are cheap and
/// parametric, so handles are not cached across calls.
#[async_trait]
pub trait TranslatorFactory: Send + Sync {
    async fn create(&self, pair: &LanguagePair) -> Result<Box<dyn TextTranslator>>;
}

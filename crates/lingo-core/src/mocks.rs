// Simple in-crate mocks for demo/testing
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

use crate::ports::{
    Detection, DetectorFactory, LanguageDetector, LanguagePair, OutboundPort, SummarizeOptions,
    SummarizerFactory, TextSummarizer, TextTranslator, TranslatorFactory,
};

/// Keyword-driven detector. The first rule whose keyword appears in the
/// lowercased text wins; otherwise the fallback candidates are returned.
#[derive(Debug, Clone)]
pub struct MockDetector {
    rules: Vec<(String, Detection)>,
    fallback: Vec<Detection>,
}

impl MockDetector {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            fallback: vec![Detection::new("en", 0.9)],
        }
        .with_rule("bonjour", "fr", 0.95)
        .with_rule("hola", "es", 0.93)
        .with_rule("olá", "pt", 0.92)
        .with_rule("привет", "ru", 0.97)
    }

    pub fn with_rule(mut self, keyword: &str, language: &str, confidence: f32) -> Self {
        self.rules.push((keyword.to_lowercase(), Detection::new(language, confidence)));
        self
    }

    /// Candidates for text no rule matches. Empty means "no idea".
    pub fn with_fallback(mut self, fallback: Vec<Detection>) -> Self {
        self.fallback = fallback;
        self
    }
}

impl Default for MockDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageDetector for MockDetector {
    async fn detect(&self, text: &str) -> Result<Vec<Detection>> {
        let lowered = text.to_lowercase();
        let hit = self
            .rules
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword.as_str()))
            .map(|(_, detection)| detection.clone());
        match hit {
            Some(top) => {
                let mut candidates = vec![top];
                candidates.extend(self.fallback.iter().cloned());
                Ok(candidates)
            }
            None => Ok(self.fallback.clone()),
        }
    }
}

#[async_trait]
impl DetectorFactory for MockDetector {
    async fn create(&self) -> Result<Arc<dyn LanguageDetector>> {
        Ok(Arc::new(self.clone()))
    }
}

#[derive(Debug, Clone)]
enum TranslatorMode {
    Tagged,
    Blank,
    Fail(String),
}

/// Records every pair it is asked for. Translations come back as
/// `[target] text`.
#[derive(Debug, Clone)]
pub struct MockTranslatorFactory {
    pairs: Arc<Mutex<Vec<LanguagePair>>>,
    mode: TranslatorMode,
}

impl MockTranslatorFactory {
    pub fn new() -> Self {
        Self::with_mode(TranslatorMode::Tagged)
    }

    /// Translators that answer with whitespace only.
    pub fn blank() -> Self {
        Self::with_mode(TranslatorMode::Blank)
    }

    /// Translators whose calls fail.
    pub fn failing(reason: &str) -> Self {
        Self::with_mode(TranslatorMode::Fail(reason.to_string()))
    }

    fn with_mode(mode: TranslatorMode) -> Self {
        Self { pairs: Arc::new(Mutex::new(Vec::new())), mode }
    }

    pub fn pairs(&self) -> Vec<LanguagePair> {
        self.pairs.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Default for MockTranslatorFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslatorFactory for MockTranslatorFactory {
    async fn create(&self, pair: &LanguagePair) -> Result<Box<dyn TextTranslator>> {
        self.pairs.lock().unwrap_or_else(PoisonError::into_inner).push(pair.clone());
        Ok(Box::new(MockTranslator { pair: pair.clone(), mode: self.mode.clone() }))
    }
}

struct MockTranslator {
    pair: LanguagePair,
    mode: TranslatorMode,
}

#[async_trait]
impl TextTranslator for MockTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        match &self.mode {
            TranslatorMode::Tagged => Ok(format!("[{}] {}", self.pair.target, text)),
            TranslatorMode::Blank => Ok("   ".to_string()),
            TranslatorMode::Fail(reason) => Err(anyhow!("{}", reason)),
        }
    }
}

/// Keeps the first `max_words` words and records the options of each call.
#[derive(Debug, Clone)]
pub struct MockSummarizer {
    calls: Arc<Mutex<Vec<SummarizeOptions>>>,
    max_words: usize,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self::with_max_words(12)
    }

    pub fn with_max_words(max_words: usize) -> Self {
        Self { calls: Arc::new(Mutex::new(Vec::new())), max_words }
    }

    pub fn calls(&self) -> Vec<SummarizeOptions> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextSummarizer for MockSummarizer {
    async fn summarize(&self, text: &str, options: &SummarizeOptions) -> Result<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(options.clone());
        Ok(text.split_whitespace().take(self.max_words).collect::<Vec<_>>().join(" "))
    }
}

#[async_trait]
impl SummarizerFactory for MockSummarizer {
    async fn create(&self) -> Result<Arc<dyn TextSummarizer>> {
        Ok(Arc::new(self.clone()))
    }
}

/// Constructs fine, then fails every call.
#[derive(Debug, Clone)]
pub struct FailingService {
    reason: String,
}

impl FailingService {
    pub fn new(reason: &str) -> Self {
        Self { reason: reason.to_string() }
    }
}

#[async_trait]
impl LanguageDetector for FailingService {
    async fn detect(&self, _text: &str) -> Result<Vec<Detection>> {
        Err(anyhow!("{}", self.reason))
    }
}

#[async_trait]
impl DetectorFactory for FailingService {
    async fn create(&self) -> Result<Arc<dyn LanguageDetector>> {
        Ok(Arc::new(self.clone()))
    }
}

#[async_trait]
impl TextSummarizer for FailingService {
    async fn summarize(&self, _text: &str, _options: &SummarizeOptions) -> Result<String> {
        Err(anyhow!("{}", self.reason))
    }
}

#[async_trait]
impl SummarizerFactory for FailingService {
    async fn create(&self) -> Result<Arc<dyn TextSummarizer>> {
        Ok(Arc::new(self.clone()))
    }
}

/// Fails at construction time.
#[derive(Debug, Clone)]
pub struct FailingFactory {
    reason: String,
}

impl FailingFactory {
    pub fn new(reason: &str) -> Self {
        Self { reason: reason.to_string() }
    }
}

#[async_trait]
impl DetectorFactory for FailingFactory {
    async fn create(&self) -> Result<Arc<dyn LanguageDetector>> {
        Err(anyhow!("{}", self.reason))
    }
}

#[async_trait]
impl TranslatorFactory for FailingFactory {
    async fn create(&self, _pair: &LanguagePair) -> Result<Box<dyn TextTranslator>> {
        Err(anyhow!("{}", self.reason))
    }
}

#[async_trait]
impl SummarizerFactory for FailingFactory {
    async fn create(&self) -> Result<Arc<dyn TextSummarizer>> {
        Err(anyhow!("{}", self.reason))
    }
}

#[derive(Clone)]
pub struct ChannelOutbound(pub mpsc::Sender<protocol::Event>);

#[async_trait]
impl OutboundPort for ChannelOutbound {
    async fn send(&self, event: protocol::Event) -> Result<()> {
        self.0.send(event).await.map_err(|e| anyhow!(e.to_string()))
    }
}

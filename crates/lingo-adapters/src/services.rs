use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use llm::{ChatOptions, Client};
use std::sync::Arc;
use tracing::debug;

use lingo_core::language::LanguageSet;
use lingo_core::ports::{
    Detection, DetectorFactory, LanguageDetector, LanguagePair, SummarizeOptions, SummarizerFactory,
    TextSummarizer, TextTranslator, TranslatorFactory,
};

use crate::config::LlmServiceConfig;
use crate::prompts;

fn connect(config: &LlmServiceConfig) -> Result<Client> {
    let key = config
        .api_key
        .clone()
        .ok_or_else(|| anyhow!("no API key configured for {}", config.base_url))?;
    let client = Client::new(key, config.model.clone())
        .context("building HTTP client")?
        .with_base_url(config.base_url.clone());
    Ok(client)
}

/// Builds an [`LlmDetector`] on `create`.
pub struct LlmDetectorFactory {
    config: LlmServiceConfig,
}

impl LlmDetectorFactory {
    pub fn new(config: LlmServiceConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DetectorFactory for LlmDetectorFactory {
    async fn create(&self) -> Result<Arc<dyn LanguageDetector>> {
        Ok(Arc::new(LlmDetector { client: connect(&self.config)? }))
    }
}

pub struct LlmDetector {
    client: Client,
}

#[async_trait]
impl LanguageDetector for LlmDetector {
    async fn detect(&self, text: &str) -> Result<Vec<Detection>> {
        let opts = ChatOptions { temperature: Some(0.0), json_object: true };
        let reply = self.client.chat(&prompts::detect(text), opts).await?;
        let detections = prompts::parse_detections(&reply)?;
        debug!(candidates = detections.len(), "detector reply parsed");
        Ok(detections)
    }
}

/// Hands out one translator per language pair, all sharing a client.
pub struct LlmTranslatorFactory {
    config: LlmServiceConfig,
    languages: LanguageSet,
}

impl LlmTranslatorFactory {
    pub fn new(config: LlmServiceConfig, languages: LanguageSet) -> Self {
        Self { config, languages }
    }
}

#[async_trait]
impl TranslatorFactory for LlmTranslatorFactory {
    async fn create(&self, pair: &LanguagePair) -> Result<Box<dyn TextTranslator>> {
        Ok(Box::new(LlmTranslator {
            client: connect(&self.config)?,
            languages: self.languages.clone(),
            pair: pair.clone(),
        }))
    }
}

pub struct LlmTranslator {
    client: Client,
    languages: LanguageSet,
    pair: LanguagePair,
}

#[async_trait]
impl TextTranslator for LlmTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        let messages = prompts::translate(&self.languages, &self.pair, text);
        let reply = self.client.chat(&messages, ChatOptions::default()).await?;
        debug!(pair = %self.pair, chars = reply.len(), "translation received");
        Ok(prompts::clean_reply(&reply))
    }
}

pub struct LlmSummarizerFactory {
    config: LlmServiceConfig,
    languages: LanguageSet,
}

impl LlmSummarizerFactory {
    pub fn new(config: LlmServiceConfig, languages: LanguageSet) -> Self {
        Self { config, languages }
    }
}

#[async_trait]
impl SummarizerFactory for LlmSummarizerFactory {
    async fn create(&self) -> Result<Arc<dyn TextSummarizer>> {
        Ok(Arc::new(LlmSummarizer {
            client: connect(&self.config)?,
            languages: self.languages.clone(),
        }))
    }
}

pub struct LlmSummarizer {
    client: Client,
    languages: LanguageSet,
}

#[async_trait]
impl TextSummarizer for LlmSummarizer {
    async fn summarize(&self, text: &str, options: &SummarizeOptions) -> Result<String> {
        let messages = prompts::summarize(&self.languages, options, text);
        let opts = ChatOptions { temperature: Some(0.2), json_object: false };
        let reply = self.client.chat(&messages, opts).await?;
        Ok(reply.trim().to_string())
    }
}

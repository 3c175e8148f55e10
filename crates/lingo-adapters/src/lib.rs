//! LLM-backed language services for `lingo-core`.

pub mod config;
pub mod prompts;
pub mod services;

pub use config::LlmServiceConfig;
pub use services::{LlmDetectorFactory, LlmSummarizerFactory, LlmTranslatorFactory};

use lingo_core::language::LanguageSet;
use lingo_core::Capabilities;
use tracing::warn;

/// All three capabilities backed by one chat-completions endpoint. Without
/// credentials none are offered, which the core reports as unavailable.
pub fn capabilities(config: &LlmServiceConfig, languages: &LanguageSet) -> Capabilities {
    if !config.has_credentials() {
        warn!(base_url = %config.base_url, "no LLM API key configured; language services disabled");
        return Capabilities::new();
    }
    Capabilities::new()
        .with_detector(LlmDetectorFactory::new(config.clone()))
        .with_translator(LlmTranslatorFactory::new(config.clone(), languages.clone()))
        .with_summarizer(LlmSummarizerFactory::new(config.clone(), languages.clone()))
}

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One candidate language. `confidence` is whatever scale the engine uses
/// (0..1 or 0..100); only ordering matters to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub language: String,
    pub confidence: f32,
}

impl Detection {
    pub fn new(language: impl Into<String>, confidence: f32) -> Self {
        Self { language: language.into(), confidence }
    }
}

/// Initialized detector handle.
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Candidates ordered by descending confidence.
    async fn detect(&self, text: &str) -> Result<Vec<Detection>>;
}

#[async_trait]
pub trait DetectorFactory: Send + Sync {
    async fn create(&self) -> Result<Arc<dyn LanguageDetector>>;
}

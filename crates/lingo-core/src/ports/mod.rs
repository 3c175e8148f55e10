pub mod detector;
pub mod summarizer;
pub mod translator;

pub use detector::{Detection, DetectorFactory, LanguageDetector};
pub use summarizer::{SummarizeOptions, SummarizerFactory, TextSummarizer};
pub use translator::{LanguagePair, TextTranslator, TranslatorFactory};

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Where a chat session pushes its events.
#[async_trait]
pub trait OutboundPort: Send + Sync {
    async fn send(&self, event: protocol::Event) -> Result<()>;
}

/// The capability factories available at startup. Any of them may be absent.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub detector: Option<Arc<dyn DetectorFactory>>,
    pub translator: Option<Arc<dyn TranslatorFactory>>,
    pub summarizer: Option<Arc<dyn SummarizerFactory>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detector(mut self, factory: impl DetectorFactory + 'static) -> Self {
        self.detector = Some(Arc::new(factory));
        self
    }

    pub fn with_translator(mut self, factory: impl TranslatorFactory + 'static) -> Self {
        self.translator = Some(Arc::new(factory));
        self
    }

    pub fn with_summarizer(mut self, factory: impl SummarizerFactory + 'static) -> Self {
        self.summarizer = Some(Arc::new(factory));
        self
    }
}

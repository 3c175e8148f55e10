use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{Capability, ServiceError};
use crate::language::{LanguageSet, LanguageTag};
use crate::ports::{
    Capabilities, Detection, LanguageDetector, LanguagePair, SummarizeOptions, TextSummarizer,
    TranslatorFactory,
};

/// How a capability came out of startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Absent,
    Failed(String),
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub detector: Readiness,
    pub translator: Readiness,
    pub summarizer: Readiness,
}

impl InitReport {
    pub fn all_ready(&self) -> bool {
        self.readiness().all(Readiness::is_ready)
    }

    pub fn any_absent(&self) -> bool {
        self.readiness().any(|r| *r == Readiness::Absent)
    }

    pub fn any_failed(&self) -> bool {
        self.readiness().any(|r| matches!(r, Readiness::Failed(_)))
    }

    fn readiness(&self) -> impl Iterator<Item = &Readiness> {
        [&self.detector, &self.translator, &self.summarizer].into_iter()
    }
}

/// Uniform async wrapper around the three language services.
/// No retries, no timeouts: every call either settles or stays outstanding.
pub struct ServiceGateway {
    detector: Option<Arc<dyn LanguageDetector>>,
    translators: Option<Arc<dyn TranslatorFactory>>,
    summarizer: Option<Arc<dyn TextSummarizer>>,
    languages: LanguageSet,
}

impl ServiceGateway {
    /// Constructs the detector and summarizer handles once. Translators are
    /// created per call, so only the factory is kept.
    pub async fn initialize(capabilities: Capabilities, languages: LanguageSet) -> (Self, InitReport) {
        let (detector, detector_state) = match capabilities.detector {
            None => (None, Readiness::Absent),
            Some(factory) => match factory.create().await {
                Ok(handle) => (Some(handle), Readiness::Ready),
                Err(e) => {
                    warn!(error = %format!("{:#}", e), "language detector failed to initialize");
                    (None, Readiness::Failed(e.to_string()))
                }
            },
        };

        let translator_state = if capabilities.translator.is_some() {
            Readiness::Ready
        } else {
            Readiness::Absent
        };

        let (summarizer, summarizer_state) = match capabilities.summarizer {
            None => (None, Readiness::Absent),
            Some(factory) => match factory.create().await {
                Ok(handle) => (Some(handle), Readiness::Ready),
                Err(e) => {
                    warn!(error = %format!("{:#}", e), "summarizer failed to initialize");
                    (None, Readiness::Failed(e.to_string()))
                }
            },
        };

        let report = InitReport {
            detector: detector_state,
            translator: translator_state,
            summarizer: summarizer_state,
        };
        info!(?report, "service gateway initialized");

        let gateway = Self {
            detector,
            translators: capabilities.translator,
            summarizer,
            languages,
        };
        (gateway, report)
    }

    pub fn languages(&self) -> &LanguageSet {
        &self.languages
    }

    pub fn is_available(&self, capability: Capability) -> bool {
        match capability {
            Capability::Detector => self.detector.is_some(),
            Capability::Translator => self.translators.is_some(),
            Capability::Summarizer => self.summarizer.is_some(),
        }
    }

    pub async fn detect(&self, text: &str) -> Result<Vec<Detection>, ServiceError> {
        let detector = self
            .detector
            .as_ref()
            .ok_or(ServiceError::ServiceUnavailable(Capability::Detector))?;

        let results = detector
            .detect(text)
            .await
            .map_err(|e| ServiceError::DetectionFailed(format!("{:#}", e)))?;
        debug!(candidates = results.len(), "detection returned");
        Ok(results)
    }

    /// Rejects an unknown or unsupported source tag without calling out.
    pub async fn translate(&self, source: &str, target: &LanguageTag, text: &str) -> Result<String, ServiceError> {
        if !self.languages.contains(source) {
            return Err(ServiceError::UnsupportedSourceLanguage(source.to_string()));
        }
        if !self.languages.contains(target.as_str()) {
            return Err(ServiceError::UnsupportedLanguage(target.to_string()));
        }
        let factory = self
            .translators
            .as_ref()
            .ok_or(ServiceError::ServiceUnavailable(Capability::Translator))?;

        let pair = LanguagePair::new(source, target.clone());
        debug!(%pair, "creating translator");
        let translator = factory
            .create(&pair)
            .await
            .map_err(|e| ServiceError::TranslationFailed(format!("{:#}", e)))?;

        let translated = translator
            .translate(text)
            .await
            .map_err(|e| ServiceError::TranslationFailed(format!("{:#}", e)))?;
        if translated.trim().is_empty() {
            return Err(ServiceError::TranslationFailed("empty translation".to_string()));
        }
        Ok(translated)
    }

    pub async fn summarize(&self, text: &str, options: &SummarizeOptions) -> Result<String, ServiceError> {
        for tag in [&options.source_language, &options.target_language].into_iter().flatten() {
            if !self.languages.contains(tag.as_str()) {
                return Err(ServiceError::UnsupportedLanguage(tag.to_string()));
            }
        }
        let summarizer = self
            .summarizer
            .as_ref()
            .ok_or(ServiceError::ServiceUnavailable(Capability::Summarizer))?;

        let summary = summarizer
            .summarize(text, options)
            .await
            .map_err(|e| ServiceError::SummarizationFailed(format!("{:#}", e)))?;
        if summary.trim().is_empty() {
            return Err(ServiceError::SummarizationFailed("empty summary".to_string()));
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{FailingFactory, MockDetector, MockSummarizer, MockTranslatorFactory};

    async fn full_gateway(translator: MockTranslatorFactory) -> ServiceGateway {
        let caps = Capabilities::new()
            .with_detector(MockDetector::new())
            .with_translator(translator)
            .with_summarizer(MockSummarizer::new());
        ServiceGateway::initialize(caps, LanguageSet::default()).await.0
    }

    #[tokio::test]
    async fn initialize_reports_each_capability() {
        let caps = Capabilities::new()
            .with_detector(FailingFactory::new("no model"))
            .with_summarizer(MockSummarizer::new());
        let (gateway, report) = ServiceGateway::initialize(caps, LanguageSet::default()).await;

        assert!(matches!(report.detector, Readiness::Failed(_)));
        assert_eq!(report.translator, Readiness::Absent);
        assert_eq!(report.summarizer, Readiness::Ready);
        assert!(report.any_absent() && report.any_failed() && !report.all_ready());
        assert!(!gateway.is_available(Capability::Detector));
        assert!(gateway.is_available(Capability::Summarizer));
    }

    #[tokio::test]
    async fn detect_without_detector_is_unavailable() {
        let (gateway, _) = ServiceGateway::initialize(Capabilities::new(), LanguageSet::default()).await;
        let err = gateway.detect("hello").await.unwrap_err();
        assert_eq!(err, ServiceError::ServiceUnavailable(Capability::Detector));
    }

    #[tokio::test]
    async fn translate_rejects_unknown_source_without_calling() {
        let translator = MockTranslatorFactory::new();
        let gateway = full_gateway(translator.clone()).await;

        let err = gateway.translate("Unknown", &"en".into(), "hola").await.unwrap_err();
        assert_eq!(err, ServiceError::UnsupportedSourceLanguage("Unknown".into()));
        let err = gateway.translate("de", &"en".into(), "hallo").await.unwrap_err();
        assert_eq!(err, ServiceError::UnsupportedSourceLanguage("de".into()));
        assert!(translator.pairs().is_empty());
    }

    #[tokio::test]
    async fn translate_creates_translator_per_pair() {
        let translator = MockTranslatorFactory::new();
        let gateway = full_gateway(translator.clone()).await;

        gateway.translate("fr", &"en".into(), "bonjour").await.unwrap();
        gateway.translate("fr", &"es".into(), "bonjour").await.unwrap();

        assert_eq!(translator.pairs(), vec![LanguagePair::new("fr", "en"), LanguagePair::new("fr", "es")]);
    }

    #[tokio::test]
    async fn blank_translation_is_a_failure() {
        let gateway = full_gateway(MockTranslatorFactory::blank()).await;
        let err = gateway.translate("fr", &"en".into(), "bonjour").await.unwrap_err();
        assert!(matches!(err, ServiceError::TranslationFailed(_)));
    }

    #[tokio::test]
    async fn summarize_checks_language_hints() {
        let gateway = full_gateway(MockTranslatorFactory::new()).await;
        let options = SummarizeOptions::new(Some("xx".into()), Some("en".into()));
        let err = gateway.summarize("text", &options).await.unwrap_err();
        assert_eq!(err, ServiceError::UnsupportedLanguage("xx".into()));

        let summary = gateway.summarize("some text here", &SummarizeOptions::default()).await.unwrap();
        assert!(!summary.is_empty());
    }
}

use std::fmt;

/// The three external language services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Detector,
    Translator,
    Summarizer,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Detector => write!(f, "Language detector"),
            Capability::Translator => write!(f, "Translator"),
            Capability::Summarizer => write!(f, "Summarizer"),
        }
    }
}

/// Failures the gateway and orchestrator report. The display text is what
/// the status line shows after the error marker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} not initialized yet")]
    ServiceUnavailable(Capability),

    #[error("Error detecting language: {0}")]
    DetectionFailed(String),

    #[error("Translation failed: {0}")]
    TranslationFailed(String),

    #[error("Cannot translate from source language {0}")]
    UnsupportedSourceLanguage(String),

    #[error("Summarization failed: {0}")]
    SummarizationFailed(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

impl ServiceError {
    /// Failures that leave the capability usable for a manual retry.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ServiceError::ServiceUnavailable(_))
    }
}

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::language::{LanguageSet, LanguageTag};

pub const DEFAULT_SUMMARIZATION_THRESHOLD: usize = 150;
pub const DEFAULT_TARGET_LANGUAGE: &str = "es";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Messages with more words than this need summarization.
    pub summarization_threshold: usize,
    pub default_target_language: LanguageTag,
    pub languages: LanguageSet,
    /// Capacity of a session's command and event channels.
    pub channel_capacity: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            summarization_threshold: DEFAULT_SUMMARIZATION_THRESHOLD,
            default_target_language: LanguageTag::new(DEFAULT_TARGET_LANGUAGE),
            languages: LanguageSet::default(),
            channel_capacity: 64,
        }
    }
}

impl CoreConfig {
    /// Defaults overridden by `LINGO_*` variables, after loading `.env`.
    pub fn from_env() -> Self {
        load_dotenv();
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`; bad values are logged and ignored.
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("LINGO_LANGUAGES") {
            match LanguageSet::parse(&raw) {
                Some(languages) => self.languages = languages,
                None => warn!(value = %raw, "ignoring empty LINGO_LANGUAGES"),
            }
        }
        if let Some(raw) = lookup("LINGO_SUMMARY_THRESHOLD") {
            match raw.trim().parse::<usize>() {
                Ok(threshold) => self.summarization_threshold = threshold,
                Err(e) => warn!(value = %raw, error = %e, "ignoring invalid LINGO_SUMMARY_THRESHOLD"),
            }
        }
        if let Some(raw) = lookup("LINGO_TARGET_LANG") {
            self.default_target_language = LanguageTag::new(raw);
        }
        if let Some(raw) = lookup("LINGO_CHANNEL_CAPACITY") {
            match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => self.channel_capacity = capacity,
                _ => warn!(value = %raw, "ignoring invalid LINGO_CHANNEL_CAPACITY"),
            }
        }
        self.normalized()
    }

    /// Keeps the default target inside the supported set.
    pub fn normalized(mut self) -> Self {
        if !self.languages.contains(self.default_target_language.as_str()) {
            if let Some(first) = self.languages.first().cloned() {
                warn!(
                    target_lang = %self.default_target_language,
                    fallback = %first,
                    "default target language is not supported, falling back"
                );
                self.default_target_language = first;
            }
        }
        self
    }
}

/// Best-effort `.env` loading from the working directory and its parents.
pub fn load_dotenv() {
    for path in [".env", "../.env", "../../.env"] {
        if dotenvy::from_filename(path).is_ok() {
            break;
        }
    }
}

use serde::{Deserialize, Serialize};

/// Connection settings for the chat-completions backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmServiceConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for LlmServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: llm::GROQ_BASE_URL.to_string(),
            model: llm::DEFAULT_MODEL.to_string(),
        }
    }
}

impl LlmServiceConfig {
    /// `LINGO_LLM_*` variables, with `GROQ_API_KEY` as the key fallback.
    pub fn from_env() -> Self {
        lingo_core::config::load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            api_key: non_empty("LINGO_LLM_API_KEY").or_else(|| non_empty("GROQ_API_KEY")),
            base_url: non_empty("LINGO_LLM_BASE_URL").unwrap_or(defaults.base_url),
            model: non_empty("LINGO_LLM_MODEL").unwrap_or(defaults.model),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

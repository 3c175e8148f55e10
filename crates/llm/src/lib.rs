//! Minimal client for OpenAI-compatible chat completion endpoints.

use anyhow::{anyhow, Context, Result};
use reqwest::Client as Http;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

#[derive(Clone, Debug)]
pub struct Client {
    http: Http,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    /// Request JSON-only output (`json_object`).
    pub json_object: bool,
}

impl Client {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: Http::builder().pool_max_idle_per_host(8).build()?,
            api_key: api_key.into(),
            model: model.into(),
            base_url: GROQ_BASE_URL.to_string(),
        })
    }

    /// Points the client at another OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Picks up GROQ_API_KEY from env.
    pub fn from_env_groq(model: &str) -> Result<Self> {
        let key = std::env::var("GROQ_API_KEY").context("GROQ_API_KEY not set")?;
        Self::new(key, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn chat(&self, messages: &[ChatMessage], opts: ChatOptions) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = build_body(&self.model, messages, &opts);
        debug!(model = %self.model, messages = messages.len(), json = opts.json_object, "chat completion request");

        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("request failed")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("chat completion {}: {}", status, resp.text().await.unwrap_or_default()));
        }

        let v: Value = resp.json().await.context("invalid json")?;
        extract_content(&v)
    }

    /// One-shot prompt.
    pub async fn simple(&self, prompt: &str) -> Result<String> {
        self.chat(&[ChatMessage::user(prompt)], ChatOptions::default()).await
    }
}

/// Request body for `/chat/completions`.
pub fn build_body(model: &str, messages: &[ChatMessage], opts: &ChatOptions) -> Value {
    let mut body = json!({
        "model": model,
        "messages": messages,
        "temperature": opts.temperature.unwrap_or(0.0),
    });
    if opts.json_object {
        body["response_format"] = json!({ "type": "json_object" });
    }
    body
}

/// Pulls `choices[0].message.content` out of a completion response.
pub fn extract_content(response: &Value) -> Result<String> {
    response
        .pointer("/choices/0/message/content")
        .and_then(|x| x.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("missing choices[0].message.content"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_roles_and_json_mode() {
        let messages = [ChatMessage::system("be brief"), ChatMessage::user("hi")];
        let body = build_body("m", &messages, &ChatOptions { temperature: None, json_object: true });

        assert_eq!(body["model"], "m");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn plain_body_has_no_response_format() {
        let body = build_body("m", &[ChatMessage::user("hi")], &ChatOptions::default());
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn content_is_extracted_from_first_choice() {
        let response = json!({
            "choices": [{ "message": { "role": "assistant", "content": "hola" } }]
        });
        assert_eq!(extract_content(&response).unwrap(), "hola");
        assert!(extract_content(&json!({ "choices": [] })).is_err());
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = Client::new("k", "m").unwrap().with_base_url("http://localhost:8080/v1/");
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
    }
}

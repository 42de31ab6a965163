//! # Gemini Client
//!
//! Blocking HTTP client for Google's generative language API.

use super::TextGenerator;
use crate::{config, ForgeError, ForgeResult};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the model name.
pub const MODEL_ENV: &str = "GEMINI_MODEL";
/// Environment variable overriding the service base URL.
pub const ENDPOINT_ENV: &str = "GEMINI_ENDPOINT";

/// Connection settings for the text generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct LldmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LldmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: config::DEFAULT_MODEL.to_string(),
            endpoint: config::DEFAULT_ENDPOINT.to_string(),
            temperature: 0.9,
            timeout_secs: config::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LldmConfig {
    /// Defaults overridden by `GEMINI_API_KEY`, `GEMINI_MODEL` and `GEMINI_ENDPOINT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            api_key: lookup(API_KEY_ENV),
            model: non_blank(MODEL_ENV).unwrap_or(defaults.model),
            endpoint: non_blank(ENDPOINT_ENV).unwrap_or(defaults.endpoint),
            temperature: defaults.temperature,
            timeout_secs: defaults.timeout_secs,
        }
    }

    /// Uses the given key when one is supplied, keeping the current one otherwise.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    /// The configured key, or a configuration error when there is none.
    pub fn require_api_key(&self) -> ForgeResult<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ForgeError::Configuration(format!(
                    "no API key configured; pass --api-key or set {}",
                    API_KEY_ENV
                ))
            })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        Some(content.parts.into_iter().map(|p| p.text).collect())
    }
}

/// Text generator backed by the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: Client,
    config: LldmConfig,
    api_key: String,
}

impl GeminiClient {
    /// Builds a client. Fails with a configuration error when no API key is set,
    /// before any request is made.
    pub fn new(config: LldmConfig) -> ForgeResult<Self> {
        let api_key = config.require_api_key()?.to_string();
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ForgeError::Configuration(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &LldmConfig {
        &self.config
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> ForgeResult<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        log::info!("Requesting generation from model {}", self.config.model);
        let response = self
            .http
            .post(self.config.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ForgeError::Generation(e.without_url().to_string()))?;

        let body: GenerateContentResponse = response
            .json()
            .map_err(|e| ForgeError::Generation(format!("unreadable reply: {}", e)))?;

        body.into_text()
            .ok_or_else(|| ForgeError::Generation("reply contained no candidates".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults() {
        let config = LldmConfig::default();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.timeout_secs, 60);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = LldmConfig::from_lookup(lookup(&[
            (API_KEY_ENV, "env-key"),
            (MODEL_ENV, "gemini-pro"),
            (ENDPOINT_ENV, "http://localhost:9999/v1/"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.model, "gemini-pro");
        assert_eq!(
            config.generate_url(),
            "http://localhost:9999/v1/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_user_key_beats_env() {
        let config = LldmConfig::from_lookup(lookup(&[(API_KEY_ENV, "env-key")]))
            .with_api_key(Some("user-key".to_string()));
        assert_eq!(config.require_api_key().unwrap(), "user-key");

        let config = LldmConfig::from_lookup(lookup(&[(API_KEY_ENV, "env-key")]))
            .with_api_key(Some("  ".to_string()));
        assert_eq!(config.require_api_key().unwrap(), "env-key");
    }

    #[test]
    fn test_missing_key_fails_before_any_request() {
        let config = LldmConfig::from_lookup(lookup(&[(API_KEY_ENV, "   ")]));
        assert!(matches!(
            GeminiClient::new(config),
            Err(ForgeError::Configuration(_))
        ));
        assert!(matches!(
            GeminiClient::new(LldmConfig::default()),
            Err(ForgeError::Configuration(_))
        ));
    }

    #[test]
    fn test_reply_text_is_concatenated() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"name\": "}, {"text": "\"X\"}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(body.into_text().unwrap(), r#"{"name": "X"}"#);

        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.into_text().is_none());
    }
}

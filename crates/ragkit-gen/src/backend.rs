//! Gemini REST backend.
//!
//! Blocking client for the `generateContent` endpoint. HTTP 404 maps to
//! `BackendError::ModelNotFound`, which is what lets a fallback chain walk
//! its model list without inspecting error text. The model call itself
//! carries no timeout; callers impose their own.

use ragkit_core::error::BackendError;
use ragkit_core::traits::GenerativeBackend;
use serde_json::json;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiBackend {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { client: reqwest::blocking::Client::new(), api_key: api_key.into() }
    }

    /// Construct from `GEMINI_API_KEY`, if set and non-empty.
    pub fn from_env() -> Option<Self> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .map(Self::new)
    }
}

impl GenerativeBackend for GeminiBackend {
    fn generate(&self, prompt: &str, model_id: &str) -> Result<String, BackendError> {
        let url = format!("{API_BASE}/{model_id}:generateContent");
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| BackendError::Other(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::ModelNotFound(model_id.to_string()));
        }
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(BackendError::Other(format!("{model_id}: HTTP {status}: {detail}")));
        }

        let payload: serde_json::Value =
            response.json().map_err(|e| BackendError::Other(e.to_string()))?;
        let text = payload["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        if text.is_empty() {
            return Err(BackendError::Other(format!("{model_id}: response carried no text")));
        }
        Ok(text)
    }
}

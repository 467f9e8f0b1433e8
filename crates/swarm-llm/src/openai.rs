//! OpenAI-compatible `/v1/chat/completions` backend.
//!
//! Credentials and endpoint come from the process environment, read once at
//! construction:
//!
//! - `OPENAI_API_KEY`  — required bearer credential
//! - `OPENAI_BASE_URL` — optional, defaults to `https://api.openai.com`
//!
//! Each `chat()` call is a single blocking POST with the request's timeout.
//! There are no retries.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use swarm_contracts::{
    chat::{ChatMessage, ChatRequest, ChatResponse},
    error::{SwarmError, SwarmResult},
};
use swarm_core::traits::ChatBackend;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Request body for the chat completions endpoint.
#[derive(Debug, Serialize)]
pub struct CompletionBody<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
}

impl<'a> From<&'a ChatRequest> for CompletionBody<'a> {
    fn from(request: &'a ChatRequest) -> Self {
        Self {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Completion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Pull the generated text out of a completion response body.
pub fn completion_text(raw: &serde_json::Value) -> SwarmResult<String> {
    let completion: Completion =
        serde_json::from_value(raw.clone()).map_err(|e| SwarmError::BackendError {
            reason: format!("unexpected completion response shape: {}", e),
        })?;
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| SwarmError::BackendError {
            reason: "completion response contained no generated text".to_string(),
        })
}

/// Blocking client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiChatBackend {
    api_key: String,
    base_url: String,
    http: reqwest::blocking::Client,
}

impl std::fmt::Debug for OpenAiChatBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChatBackend")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiChatBackend {
    /// Build a backend from explicit values, as read from the environment.
    ///
    /// A missing or blank key is a `ConfigError`. A missing base URL falls
    /// back to [`DEFAULT_BASE_URL`]; trailing slashes are removed.
    pub fn from_vars(api_key: Option<String>, base_url: Option<String>) -> SwarmResult<Self> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SwarmError::ConfigError {
                reason: format!("{} is not set in the environment", API_KEY_VAR),
            })?;

        let base_url = base_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let http = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| SwarmError::ConfigError {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            api_key,
            base_url,
            http,
        })
    }

    /// Build a backend from `OPENAI_API_KEY` and `OPENAI_BASE_URL`.
    pub fn from_env() -> SwarmResult<Self> {
        Self::from_vars(
            std::env::var(API_KEY_VAR).ok(),
            std::env::var(BASE_URL_VAR).ok(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, COMPLETIONS_PATH)
    }
}

impl ChatBackend for OpenAiChatBackend {
    fn chat(&self, request: &ChatRequest) -> SwarmResult<ChatResponse> {
        let url = self.endpoint();
        debug!(url = %url, model = %request.model, turns = request.messages.len(), "POST chat completion");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(request.timeout)
            .json(&CompletionBody::from(request))
            .send()
            .map_err(|e| {
                let kind = if e.is_timeout() { "timed out" } else { "failed" };
                SwarmError::BackendError {
                    reason: format!("request to {} {}: {}", url, kind, e),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(status = %status, "chat completion returned non-success status");
            return Err(SwarmError::BackendError {
                reason: format!("chat completion returned {}: {}", status, body),
            });
        }

        let raw: serde_json::Value = response.json().map_err(|e| SwarmError::BackendError {
            reason: format!("failed to decode chat completion response: {}", e),
        })?;
        let text = completion_text(&raw)?;

        Ok(ChatResponse { text, raw })
    }
}

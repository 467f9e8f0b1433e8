//! Configuration schema.
//!
//! A `SwarmConfig` is deserialized from TOML. Every section and key is
//! optional and falls back to the defaults below; unknown keys are an error
//! so typos do not silently fall back.
//!
//! Example:
//! ```toml
//! [llm]
//! provider = "openai"
//! model = "gpt-4.1-mini"
//! temperature = 0.4
//! max_tokens = 1800
//! timeout_seconds = 60
//!
//! [swarm]
//! max_review_cycles = 2
//! artifact_dir = "out"
//! log_jsonl = true
//!
//! [project]
//! name = "Marketing Agent Swarm"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use swarm_contracts::chat::ChatSettings;

/// The `[llm]` section: which backend to call and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmConfig {
    /// Backend adapter name. Only `"openai"` exists.
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    /// Maximum output length, in tokens.
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4.1-mini".to_string(),
            temperature: 0.4,
            max_tokens: 1800,
            timeout_seconds: 60,
        }
    }
}

impl From<&LlmConfig> for ChatSettings {
    fn from(llm: &LlmConfig) -> Self {
        ChatSettings {
            model: llm.model.clone(),
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            timeout: Duration::from_secs(llm.timeout_seconds),
        }
    }
}

/// The `[swarm]` section: review budget and output layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub max_review_cycles: u32,
    /// Directory (relative to the working directory) that holds one
    /// sub-directory per run.
    pub artifact_dir: String,
    /// Write `run.log.jsonl` for each run.
    pub log_jsonl: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_review_cycles: 2,
            artifact_dir: "out".to_string(),
            log_jsonl: true,
        }
    }
}

/// The `[project]` section. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Marketing Agent Swarm".to_string(),
        }
    }
}

/// The top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwarmConfig {
    pub llm: LlmConfig,
    pub swarm: RunConfig,
    pub project: ProjectConfig,
}

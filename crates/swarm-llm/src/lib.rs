//! # swarm-llm
//!
//! Text-generation backends for the swarm.
//!
//! This crate provides [`openai::OpenAiChatBackend`], which implements
//! [`swarm_core::traits::ChatBackend`] against an OpenAI-compatible chat
//! completions endpoint, and [`backend_for`], which picks the adapter named
//! by the `[llm] provider` setting.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! let backend = swarm_llm::backend_for(&config.llm)?;
//! ```

pub mod openai;

use tracing::info;

use swarm_config::LlmConfig;
use swarm_contracts::error::{SwarmError, SwarmResult};
use swarm_core::traits::ChatBackend;

pub use openai::OpenAiChatBackend;

/// Provider names accepted in `[llm] provider`.
pub const PROVIDERS: &[&str] = &["openai"];

/// Construct the backend named by `llm.provider`, reading credentials from
/// the environment.
///
/// Returns `SwarmError::ConfigError` for an unknown provider or a missing
/// credential. Nothing is written to disk.
pub fn backend_for(llm: &LlmConfig) -> SwarmResult<Box<dyn ChatBackend>> {
    match llm.provider.trim().to_ascii_lowercase().as_str() {
        "openai" => {
            let backend = OpenAiChatBackend::from_env()?;
            info!(provider = "openai", base_url = %backend.base_url(), "backend ready");
            Ok(Box::new(backend))
        }
        other => Err(SwarmError::ConfigError {
            reason: format!(
                "unknown llm provider '{}'; supported providers: {}",
                other,
                PROVIDERS.join(", ")
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_is_config_error() {
        let llm = LlmConfig {
            provider: "anthropic".to_string(),
            ..LlmConfig::default()
        };
        match backend_for(&llm) {
            Err(SwarmError::ConfigError { reason }) => {
                assert!(reason.contains("anthropic"));
                assert!(reason.contains("openai"));
            }
            Err(other) => panic!("expected ConfigError, got {:?}", other),
            Ok(_) => panic!("expected ConfigError, got a backend"),
        }
    }
}

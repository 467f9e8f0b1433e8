//! Loading and validating `SwarmConfig`.
//!
//! Configuration is read once at startup and treated as immutable for the
//! lifetime of a run.

use std::path::Path;

use tracing::debug;

use swarm_contracts::error::{SwarmError, SwarmResult};

use crate::schema::SwarmConfig;

impl SwarmConfig {
    /// Parse `s` as TOML and validate the result.
    ///
    /// Returns `SwarmError::ConfigError` if the TOML is malformed, contains
    /// unknown keys, or fails validation.
    pub fn from_toml_str(s: &str) -> SwarmResult<Self> {
        let config: SwarmConfig = toml::from_str(s).map_err(|e| SwarmError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> SwarmResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SwarmError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        let config = Self::from_toml_str(&contents)?;

        debug!(
            path = %path.display(),
            project = %config.project.name,
            provider = %config.llm.provider,
            model = %config.llm.model,
            max_review_cycles = config.swarm.max_review_cycles,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> SwarmResult<()> {
        if self.llm.model.trim().is_empty() {
            return Err(SwarmError::ConfigError {
                reason: "llm.model must not be empty".to_string(),
            });
        }
        if self.llm.timeout_seconds == 0 {
            return Err(SwarmError::ConfigError {
                reason: "llm.timeout_seconds must be greater than zero".to_string(),
            });
        }
        if !self.llm.temperature.is_finite() || self.llm.temperature < 0.0 {
            return Err(SwarmError::ConfigError {
                reason: format!(
                    "llm.temperature must be a non-negative number, got {}",
                    self.llm.temperature
                ),
            });
        }
        if self.swarm.artifact_dir.trim().is_empty() {
            return Err(SwarmError::ConfigError {
                reason: "swarm.artifact_dir must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

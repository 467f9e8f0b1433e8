//! # swarm-config
//!
//! TOML configuration for the marketing agent swarm.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use swarm_config::SwarmConfig;
//!
//! let config = SwarmConfig::from_file(Path::new("config/config.toml"))?;
//! let settings: ChatSettings = (&config.llm).into();
//! ```
//!
//! Sections: `[llm]` (backend and generation parameters), `[swarm]` (review
//! budget, output directory, run logging), `[project]` (informational).

pub mod loader;
pub mod schema;

pub use schema::{LlmConfig, ProjectConfig, RunConfig, SwarmConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────

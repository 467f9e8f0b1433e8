//! Error types for the swarm pipeline.
//!
//! All fallible operations return `SwarmResult<T>`. Every variant is fatal:
//! nothing in the pipeline converts an error into a degraded path.

use thiserror::Error;

/// The unified error type for the swarm crates.
#[derive(Debug, Error)]
pub enum SwarmError {
    /// The configuration file, a prompt file, an input file, or a required
    /// credential is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The backend call failed: transport error, timeout, or non-success
    /// status.
    #[error("backend error: {reason}")]
    BackendError { reason: String },

    /// The agent's reply could not be recovered as a JSON object.
    ///
    /// The raw text has already been written to the run log when this is
    /// returned.
    #[error("malformed agent response: {reason}")]
    MalformedResponse { reason: String },

    /// An artifact, output file, or log line could not be written.
    #[error("artifact write failed: {reason}")]
    ArtifactWriteError { reason: String },
}

/// Convenience alias used throughout the swarm crates.
pub type SwarmResult<T> = Result<T, SwarmError>;

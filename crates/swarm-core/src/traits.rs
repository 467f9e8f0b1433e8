//! Core trait definitions for the swarm pipeline.
//!
//! These three traits are the seams between the pipeline and the outside
//! world:
//!
//! - `ChatBackend`   — the text-generation service (untrusted output)
//! - `ArtifactStore` — where generated artifacts and final outputs land
//! - `RunLog`        — the append-only record of every exchange
//!
//! The pipeline owns none of their implementations; the hosting runtime
//! constructs them per run and lends them to `Pipeline::run()`.

use swarm_contracts::{
    artifact::Artifact,
    chat::{ChatRequest, ChatResponse},
    error::SwarmResult,
    log::LogEntry,
};

/// A synchronous chat-completion backend.
///
/// One call is one blocking request/response exchange. Implementations must
/// honor `request.timeout` and report transport failures, timeouts and
/// non-success statuses as `SwarmError::BackendError`. No retries.
pub trait ChatBackend: Send + Sync {
    fn chat(&self, request: &ChatRequest) -> SwarmResult<ChatResponse>;
}

/// Persistence for a run's artifacts and output files.
pub trait ArtifactStore: Send + Sync {
    /// Write `content` to the file `name` relative to the run's output
    /// directory, creating intermediate directories. Overwrites silently.
    fn write_file(&self, name: &str, content: &str) -> SwarmResult<()>;

    /// Persist one artifact under its own name.
    fn put(&self, artifact: &Artifact) -> SwarmResult<()> {
        self.write_file(&artifact.name, &artifact.content)
    }
}

/// The run's append-only exchange log.
pub trait RunLog: Send + Sync {
    /// Append one entry. Entries are never modified or removed.
    fn append(&self, entry: &LogEntry) -> SwarmResult<()>;
}

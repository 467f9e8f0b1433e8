//! # swarm-store
//!
//! Persistence for swarm runs: the filesystem artifact store and the
//! append-only run log.
//!
//! ## Overview
//!
//! Each run owns one output directory, `{artifact_dir}/{task_id}/`. Agent
//! artifacts, `final_bundle.md` and `summary.json` are written there by
//! [`FsArtifactStore`]; every envelope and raw reply is appended to
//! `run.log.jsonl` by [`JsonlRunLog`], or dropped by [`DisabledRunLog`] when
//! logging is off.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use swarm_store::{FsArtifactStore, JsonlRunLog};
//!
//! let store = FsArtifactStore::create(out_dir.clone())?;
//! let log = JsonlRunLog::new(out_dir.join("run.log.jsonl"));
//! ```

pub mod artifacts;
pub mod runlog;

pub use artifacts::FsArtifactStore;
pub use runlog::{read_log, DisabledRunLog, JsonlRunLog};

// ── Tests ─────────────────────────────────────────────────────────────────────

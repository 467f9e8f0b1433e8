//! # swarm-core
//!
//! The orchestration core of the marketing agent swarm.
//!
//! This crate provides:
//! - The three seam traits (`ChatBackend`, `ArtifactStore`, `RunLog`)
//! - The lenient reply parser and the `AgentInvoker`
//! - The `Pipeline` that runs the drafting stages, the bounded review loop,
//!   and writes the final bundle
//!
//! ## Usage
//!
//! ```rust,ignore
//! use swarm_core::{Pipeline, RunContext, AgentInvoker, AgentRegistry};
//!
//! let pipeline = Pipeline::new(agents, AgentInvoker::new(backend, settings), 2);
//! let summary = pipeline.run(&RunContext::new(&task_id, &inputs, &store, &log))?;
//! ```

pub mod bundle;
pub mod invoker;
pub mod lenient;
pub mod pipeline;
pub mod registry;
pub mod stage;
pub mod traits;

pub use bundle::{Bundle, Category};
pub use invoker::{AgentInvoker, AgentReply};
pub use pipeline::{Pipeline, RunContext};
pub use registry::AgentRegistry;

//! # swarm-contracts
//!
//! Shared types for the marketing agent swarm: agent identities, the message
//! envelope, artifacts, chat request/response shapes, run log entries, and
//! the error type.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod agent;
pub mod artifact;
pub mod chat;
pub mod envelope;
pub mod error;
pub mod log;
pub mod run;

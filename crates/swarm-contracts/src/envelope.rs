//! The message envelope passed to every agent call.
//!
//! An `Envelope` is built fresh for each exchange and never mutated. Its JSON
//! form is the user turn the agent receives, so field names here are the
//! wire protocol.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    agent::{AgentRole, Party},
    artifact::Artifact,
    run::TaskId,
};

/// Protocol version stamped on every envelope.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Unique identifier for a single envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub uuid::Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Envelope message kind. Only `TASK` is exchanged today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Task,
}

/// A suggested follow-up action for the recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextAction {
    #[serde(rename = "to")]
    pub recipient: AgentRole,
    #[serde(rename = "action")]
    pub description: String,
    pub priority: u8,
}

impl NextAction {
    pub fn new(recipient: AgentRole, description: impl Into<String>, priority: u8) -> Self {
        Self {
            recipient,
            description: description.into(),
            priority,
        }
    }
}

/// The task context carried by an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub goal: String,
    pub inputs: Map<String, Value>,
    pub constraints: Vec<String>,
    pub artifacts: Vec<Artifact>,
    pub next: Vec<NextAction>,
}

/// One message from the orchestrator to an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub protocol_version: String,
    pub message_id: MessageId,
    pub task_id: TaskId,
    pub timestamp: DateTime<Utc>,
    pub from: Party,
    pub to: AgentRole,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub payload: Payload,
}

impl Envelope {
    /// Build an envelope with a fresh message id and the current time.
    pub fn new(
        task_id: TaskId,
        from: Party,
        to: AgentRole,
        message_type: MessageType,
        payload: Payload,
    ) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            message_id: MessageId::new(),
            task_id,
            timestamp: Utc::now(),
            from,
            to,
            message_type,
            payload,
        }
    }

    /// Build a `TASK` envelope.
    #[allow(clippy::too_many_arguments)]
    pub fn task(
        task_id: TaskId,
        from: Party,
        to: AgentRole,
        goal: impl Into<String>,
        inputs: Map<String, Value>,
        constraints: Vec<String>,
        artifacts: Vec<Artifact>,
        next: Vec<NextAction>,
    ) -> Self {
        Self::new(
            task_id,
            from,
            to,
            MessageType::Task,
            Payload {
                goal: goal.into(),
                inputs,
                constraints,
                artifacts,
                next,
            },
        )
    }
}

//! Run log entries.
//!
//! Every envelope sent and every raw reply received is appended to the run
//! log as one `LogEntry`, in call order.

use serde::{Deserialize, Serialize};

use crate::{agent::AgentRole, envelope::Envelope, run::TaskId};

/// The raw text an agent returned, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub from: AgentRole,
    pub task_id: TaskId,
    pub raw: String,
    /// Name of the artifact a revision was aimed at, for reviser replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// One line of the run log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum LogEntry {
    Envelope(Envelope),
    Response(AgentResponse),
}

impl LogEntry {
    /// The task id carried by this entry.
    pub fn task_id(&self) -> &TaskId {
        match self {
            LogEntry::Envelope(envelope) => &envelope.task_id,
            LogEntry::Response(response) => &response.task_id,
        }
    }
}

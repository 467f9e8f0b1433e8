//! The agent invoker: one backend exchange per agent call.
//!
//! Invocation is split in two so the caller can log the raw reply before it
//! is parsed:
//!
//!   `exchange()` → raw text → (caller logs it) → `AgentReply::parse()`
//!
//! A reply that fails to parse is therefore always on record.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use swarm_contracts::{
    agent::Agent,
    artifact::Artifact,
    chat::{ChatMessage, ChatRequest, ChatSettings},
    envelope::Envelope,
    error::{SwarmError, SwarmResult},
};

use crate::{lenient, traits::ChatBackend};

/// Sends envelopes to agents through a `ChatBackend`.
pub struct AgentInvoker {
    backend: Box<dyn ChatBackend>,
    settings: ChatSettings,
}

impl AgentInvoker {
    pub fn new(backend: Box<dyn ChatBackend>, settings: ChatSettings) -> Self {
        Self { backend, settings }
    }

    /// Build the two-turn conversation for `agent` and `envelope`.
    ///
    /// The system turn is the agent's instructions; the user turn is the
    /// envelope serialized as pretty-printed JSON.
    pub fn request_for(&self, agent: &Agent, envelope: &Envelope) -> SwarmResult<ChatRequest> {
        let body = serde_json::to_string_pretty(envelope).map_err(|e| SwarmError::BackendError {
            reason: format!("failed to serialize envelope for {}: {}", agent.role, e),
        })?;
        Ok(ChatRequest::new(
            &self.settings,
            vec![ChatMessage::system(agent.instructions.clone()), ChatMessage::user(body)],
        ))
    }

    /// Perform one blocking exchange and return the generated text.
    pub fn exchange(&self, agent: &Agent, envelope: &Envelope) -> SwarmResult<String> {
        let request = self.request_for(agent, envelope)?;

        debug!(
            agent = %agent.role,
            task_id = %envelope.task_id,
            model = %request.model,
            artifacts = envelope.payload.artifacts.len(),
            "invoking agent"
        );

        let response = self.backend.chat(&request)?;

        debug!(
            agent = %agent.role,
            task_id = %envelope.task_id,
            bytes = response.text.len(),
            "agent replied"
        );

        Ok(response.text)
    }
}

/// The structured result an agent claimed, recovered from its reply text.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    /// The full recovered object.
    pub body: Map<String, Value>,
    /// Artifact-shaped entries of `body["artifacts"]`, in order.
    pub artifacts: Vec<Artifact>,
}

impl AgentReply {
    /// Recover a reply from raw text using the lenient parse strategy.
    ///
    /// A missing or non-array `artifacts` key yields no artifacts. Entries
    /// lacking a string `name` or `content` are skipped with a warning.
    pub fn parse(text: &str) -> SwarmResult<Self> {
        let body = lenient::parse_object(text)?;

        let artifacts = match body.get("artifacts") {
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .filter_map(|(idx, entry)| {
                    match serde_json::from_value::<Artifact>(entry.clone()) {
                        Ok(artifact) => Some(artifact),
                        Err(e) => {
                            warn!(index = idx, error = %e, "skipping malformed artifact entry");
                            None
                        }
                    }
                })
                .collect(),
            Some(other) if !other.is_null() => {
                warn!("reply 'artifacts' is not an array; ignoring it");
                Vec::new()
            }
            _ => Vec::new(),
        };

        Ok(Self { body, artifacts })
    }

    /// `content` of the first raw `artifacts` entry, or `""`.
    ///
    /// Read from the unparsed list, so a malformed first entry yields an
    /// empty string rather than promoting the next well-formed one.
    pub fn first_entry_content(&self) -> String {
        self.body
            .get("artifacts")
            .and_then(Value::as_array)
            .and_then(|entries| entries.first())
            .and_then(|entry| entry.get("content"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

//! Agent identity types.
//!
//! The swarm has a closed set of six agents. `AgentRole` names them and is
//! shared by the agent registry and the envelope schema, so a recipient that
//! does not exist cannot be addressed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the six fixed agents in the pipeline.
///
/// Serialized under the identity strings the agents' prompts refer to,
/// e.g. `"MarketResearcher"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentRole {
    MarketResearcher,
    StrategistPlanner,
    CopywriterExecutor,
    ChannelManager,
    #[serde(rename = "AnalystQA")]
    AnalystQa,
    Reviser,
}

impl AgentRole {
    /// Every role, in pipeline order.
    pub const ALL: [AgentRole; 6] = [
        AgentRole::MarketResearcher,
        AgentRole::StrategistPlanner,
        AgentRole::CopywriterExecutor,
        AgentRole::ChannelManager,
        AgentRole::AnalystQa,
        AgentRole::Reviser,
    ];

    /// The wire identity of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::MarketResearcher => "MarketResearcher",
            AgentRole::StrategistPlanner => "StrategistPlanner",
            AgentRole::CopywriterExecutor => "CopywriterExecutor",
            AgentRole::ChannelManager => "ChannelManager",
            AgentRole::AnalystQa => "AnalystQA",
            AgentRole::Reviser => "Reviser",
        }
    }

    /// Position of this role in [`AgentRole::ALL`].
    pub fn index(&self) -> usize {
        match self {
            AgentRole::MarketResearcher => 0,
            AgentRole::StrategistPlanner => 1,
            AgentRole::CopywriterExecutor => 2,
            AgentRole::ChannelManager => 3,
            AgentRole::AnalystQa => 4,
            AgentRole::Reviser => 5,
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown agent role '{}'", s))
    }
}

/// The sender of an envelope: the orchestrator itself, or one of the agents.
///
/// Serialized as a plain string (`"orchestrator"` or the agent's role name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Party {
    Orchestrator,
    Agent(AgentRole),
}

impl Party {
    const ORCHESTRATOR: &'static str = "orchestrator";
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Orchestrator => f.write_str(Self::ORCHESTRATOR),
            Party::Agent(role) => role.fmt(f),
        }
    }
}

impl From<Party> for String {
    fn from(party: Party) -> Self {
        party.to_string()
    }
}

impl TryFrom<String> for Party {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == Self::ORCHESTRATOR {
            Ok(Party::Orchestrator)
        } else {
            value.parse().map(Party::Agent)
        }
    }
}

impl From<AgentRole> for Party {
    fn from(role: AgentRole) -> Self {
        Party::Agent(role)
    }
}

/// An agent instance: a role plus the fixed instruction text it runs with.
///
/// Instructions are loaded once when the registry is built and never change
/// for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub role: AgentRole,
    pub instructions: String,
}

impl Agent {
    pub fn new(role: AgentRole, instructions: impl Into<String>) -> Self {
        Self {
            role,
            instructions: instructions.into(),
        }
    }
}

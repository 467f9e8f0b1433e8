//! The fixed set of agents for a run.

use swarm_contracts::{
    agent::{Agent, AgentRole},
    error::SwarmResult,
};

/// Holds exactly one `Agent` per `AgentRole`.
///
/// Built once at orchestrator construction; lookups cannot fail because
/// every role is present by construction.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
}

impl AgentRegistry {
    /// Build the registry by asking `load` for each role's instructions,
    /// in `AgentRole::ALL` order. The first error aborts construction.
    pub fn load<F>(mut load: F) -> SwarmResult<Self>
    where
        F: FnMut(AgentRole) -> SwarmResult<String>,
    {
        let agents = AgentRole::ALL
            .into_iter()
            .map(|role| load(role).map(|instructions| Agent::new(role, instructions)))
            .collect::<SwarmResult<Vec<_>>>()?;
        Ok(Self { agents })
    }

    pub fn get(&self, role: AgentRole) -> &Agent {
        &self.agents[role.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }
}

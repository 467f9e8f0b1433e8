//! Loading the six agents' instructions from the prompts directory.

use std::path::Path;

use tracing::debug;

use swarm_contracts::{
    agent::AgentRole,
    error::{SwarmError, SwarmResult},
};
use swarm_core::AgentRegistry;

/// File name of each role's system prompt inside the prompts directory.
pub fn prompt_file(role: AgentRole) -> &'static str {
    match role {
        AgentRole::MarketResearcher => "01_researcher.system.txt",
        AgentRole::StrategistPlanner => "02_strategist.system.txt",
        AgentRole::CopywriterExecutor => "03_copywriter.system.txt",
        AgentRole::ChannelManager => "04_channel_manager.system.txt",
        AgentRole::AnalystQa => "05_analyst.system.txt",
        AgentRole::Reviser => "06_revisioner.system.txt",
    }
}

/// Read every role's prompt from `prompts_dir`.
///
/// A missing or unreadable prompt file is a `ConfigError`.
pub fn load_agents(prompts_dir: &Path) -> SwarmResult<AgentRegistry> {
    AgentRegistry::load(|role| {
        let path = prompts_dir.join(prompt_file(role));
        let instructions =
            std::fs::read_to_string(&path).map_err(|e| SwarmError::ConfigError {
                reason: format!("failed to read prompt for {} at '{}': {}", role, path.display(), e),
            })?;
        debug!(agent = %role, path = %path.display(), "prompt loaded");
        Ok(instructions)
    })
}

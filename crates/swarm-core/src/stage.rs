//! Declarative description of the drafting stages.
//!
//! The pipeline interprets `DRAFT_STAGES` in order with a single loop. Each
//! stage names the agent to call, the follow-up action it is handed, which
//! artifacts of the current bundle it sees, and which category its output
//! replaces.

use swarm_contracts::{agent::AgentRole, artifact::Artifact};

use crate::bundle::{Bundle, Category};

/// One step of the drafting pipeline.
#[derive(Clone, Copy)]
pub struct Stage {
    pub agent: AgentRole,
    /// Description of the suggested next action sent with the envelope.
    pub action: &'static str,
    pub priority: u8,
    /// Selects the context artifacts from the bundle built so far.
    pub input: fn(&Bundle) -> Vec<Artifact>,
    /// The category the agent's artifacts become.
    pub output: Category,
}

fn nothing(_: &Bundle) -> Vec<Artifact> {
    Vec::new()
}

fn research(bundle: &Bundle) -> Vec<Artifact> {
    bundle.get(Category::Research).to_vec()
}

fn plan(bundle: &Bundle) -> Vec<Artifact> {
    bundle.get(Category::Plan).to_vec()
}

/// research → plan → copy → channel.
///
/// Copy and channel are both seeded with the plan only, never with each
/// other's output.
pub const DRAFT_STAGES: [Stage; 4] = [
    Stage {
        agent: AgentRole::MarketResearcher,
        action: "Produce research brief",
        priority: 5,
        input: nothing,
        output: Category::Research,
    },
    Stage {
        agent: AgentRole::StrategistPlanner,
        action: "Create campaign plan",
        priority: 5,
        input: research,
        output: Category::Plan,
    },
    Stage {
        agent: AgentRole::CopywriterExecutor,
        action: "Draft copy pack",
        priority: 5,
        input: plan,
        output: Category::Copy,
    },
    Stage {
        agent: AgentRole::ChannelManager,
        action: "Draft channel plan",
        priority: 4,
        input: plan,
        output: Category::Channel,
    },
];

/// Suggested action handed to the analyst on every review pass.
pub const REVIEW_ACTION: &str = "Review artifacts and propose revisions";
pub const REVIEW_PRIORITY: u8 = 5;

/// Suggested action handed to the reviser for each category.
pub const REVISE_ACTION: &str = "Revise the provided artifact based on qa_review.md";
pub const REVISE_PRIORITY: u8 = 4;

/// Name of the synthesized artifact carrying the analyst's review note.
pub const REVIEW_NOTE_NAME: &str = "qa_review.md";

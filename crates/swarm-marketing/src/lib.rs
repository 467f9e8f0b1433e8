//! # swarm-marketing
//!
//! The marketing runtime for the agent swarm.
//!
//! Turns a goal, a free-form inputs mapping and a list of constraints into a
//! bundle of marketing artifacts by running six agents in a fixed order:
//!
//! 1. **MarketResearcher** — research brief
//! 2. **StrategistPlanner** — campaign plan
//! 3. **CopywriterExecutor** / **ChannelManager** — copy pack and channel plan
//! 4. **AnalystQA** / **Reviser** — bounded review and revision loop
//!
//! Prompts are read from `prompts/*.system.txt`; configuration from a TOML
//! file; outputs land in `{artifact_dir}/{task_id}/`.

pub mod agents;
pub mod inputs;
pub mod orchestrator;

pub use orchestrator::Orchestrator;

// ── Tests ─────────────────────────────────────────────────────────────────────

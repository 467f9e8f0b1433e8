//! The orchestrator: wires configuration, agents, backend, store and log
//! into a pipeline run.
//!
//! Construction does all the fallible setup (credential, prompts) before any
//! run starts, so a missing credential never leaves an output directory
//! behind.

use std::path::{Path, PathBuf};

use tracing::info;

use swarm_config::SwarmConfig;
use swarm_contracts::{
    error::SwarmResult,
    run::{RunInputs, RunSummary, TaskId},
};
use swarm_core::{
    pipeline::RUN_LOG_FILE,
    traits::{ChatBackend, RunLog},
    AgentInvoker, AgentRegistry, Pipeline, RunContext,
};
use swarm_store::{DisabledRunLog, FsArtifactStore, JsonlRunLog};

use crate::agents::load_agents;

/// Runs the marketing pipeline with one fixed configuration.
pub struct Orchestrator {
    config: SwarmConfig,
    pipeline: Pipeline,
}

impl Orchestrator {
    /// Build an orchestrator from already-constructed parts.
    pub fn new(config: SwarmConfig, agents: AgentRegistry, backend: Box<dyn ChatBackend>) -> Self {
        let invoker = AgentInvoker::new(backend, (&config.llm).into());
        let pipeline = Pipeline::new(agents, invoker, config.swarm.max_review_cycles);
        Self { config, pipeline }
    }

    /// Build the configured backend and load the prompts from `prompts_dir`.
    ///
    /// Fails with `ConfigError` on an unknown provider, a missing credential,
    /// or a missing prompt file.
    pub fn from_config(config: SwarmConfig, prompts_dir: &Path) -> SwarmResult<Self> {
        let backend = swarm_llm::backend_for(&config.llm)?;
        let agents = load_agents(prompts_dir)?;
        Ok(Self::new(config, agents, backend))
    }

    /// Output directory for `task_id`: `{artifact_dir}/{task_id}`.
    pub fn output_dir(&self, task_id: &TaskId) -> PathBuf {
        Path::new(&self.config.swarm.artifact_dir).join(task_id.to_string())
    }

    /// Execute one run under a fresh task id and return its output directory.
    pub fn run(&self, inputs: &RunInputs) -> SwarmResult<PathBuf> {
        let task_id = TaskId::new();
        let out_dir = self.output_dir(&task_id);
        self.run_in(&task_id, &out_dir, inputs)?;
        Ok(out_dir)
    }

    /// Execute one run writing into `out_dir`.
    pub fn run_in(&self, task_id: &TaskId, out_dir: &Path, inputs: &RunInputs) -> SwarmResult<RunSummary> {
        info!(
            project = %self.config.project.name,
            task_id = %task_id,
            out_dir = %out_dir.display(),
            goal = %inputs.goal,
            "starting swarm run"
        );

        let store = FsArtifactStore::create(out_dir)?;
        let log: Box<dyn RunLog> = if self.config.swarm.log_jsonl {
            Box::new(JsonlRunLog::new(out_dir.join(RUN_LOG_FILE)))
        } else {
            Box::new(DisabledRunLog)
        };

        let ctx = RunContext::new(task_id, inputs, &store, log.as_ref());
        self.pipeline.run(&ctx)
    }
}

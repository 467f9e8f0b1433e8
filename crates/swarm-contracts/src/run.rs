//! Per-run identity, inputs and results.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier shared by every envelope of one run.
///
/// Also names the run's output directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub uuid::Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Caller-supplied inputs for one run. Immutable once the run starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunInputs {
    pub goal: String,
    pub inputs: Map<String, Value>,
    pub constraints: Vec<String>,
}

impl RunInputs {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            ..Default::default()
        }
    }
}

/// Machine-readable summary written as `summary.json` at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub task_id: TaskId,
    pub goal: String,
    /// Final bundle artifact names, then the well-known output files.
    pub artifacts: Vec<String>,
    /// Number of review passes the analyst completed.
    pub review_cycles: u32,
}

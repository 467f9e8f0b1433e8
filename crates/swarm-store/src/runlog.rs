//! JSON Lines run log.
//!
//! One `LogEntry` per line, appended in call order. The file and its parent
//! directories are created on first write. There is no rotation and no size
//! bound.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use swarm_contracts::{
    error::{SwarmError, SwarmResult},
    log::LogEntry,
};
use swarm_core::traits::RunLog;

/// Appends entries to a `.jsonl` file.
#[derive(Debug, Clone)]
pub struct JsonlRunLog {
    path: PathBuf,
}

impl JsonlRunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RunLog for JsonlRunLog {
    fn append(&self, entry: &LogEntry) -> SwarmResult<()> {
        let mut line = serde_json::to_string(entry).map_err(|e| SwarmError::ArtifactWriteError {
            reason: format!("failed to serialize log entry: {}", e),
        })?;
        line.push('\n');

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SwarmError::ArtifactWriteError {
                reason: format!("failed to create '{}': {}", parent.display(), e),
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SwarmError::ArtifactWriteError {
                reason: format!("failed to open run log '{}': {}", self.path.display(), e),
            })?;
        file.write_all(line.as_bytes())
            .map_err(|e| SwarmError::ArtifactWriteError {
                reason: format!("failed to append to run log '{}': {}", self.path.display(), e),
            })
    }
}

/// The run log used when logging is turned off: every append is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRunLog;

impl RunLog for DisabledRunLog {
    fn append(&self, _entry: &LogEntry) -> SwarmResult<()> {
        Ok(())
    }
}

/// Read a run log back into its entries, in file order.
///
/// Blank lines are skipped. A line that is not a valid entry is reported as
/// a `ConfigError` naming its line number.
pub fn read_log(path: &Path) -> SwarmResult<Vec<LogEntry>> {
    let file = fs::File::open(path).map_err(|e| SwarmError::ConfigError {
        reason: format!("failed to open run log '{}': {}", path.display(), e),
    })?;

    let mut entries = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| SwarmError::ConfigError {
            reason: format!("failed to read run log '{}': {}", path.display(), e),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line).map_err(|e| SwarmError::ConfigError {
            reason: format!("invalid run log entry at line {}: {}", idx + 1, e),
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

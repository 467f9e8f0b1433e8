//! Filesystem implementation of `ArtifactStore`.
//!
//! Artifact names are relative paths under the run's output directory.
//! A name that could land outside it (absolute, drive-prefixed, or holding a
//! `..` segment) is rejected before anything is written.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use swarm_contracts::error::{SwarmError, SwarmResult};
use swarm_core::traits::ArtifactStore;

/// Writes artifacts as plain files under one output directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Create the output directory (and parents) and return a store for it.
    pub fn create(root: impl Into<PathBuf>) -> SwarmResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| SwarmError::ArtifactWriteError {
            reason: format!("failed to create output directory '{}': {}", root.display(), e),
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` to a path confined to the output directory.
    pub fn resolve(&self, name: &str) -> SwarmResult<PathBuf> {
        let relative = Path::new(name);
        let confined = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
            && relative.components().any(|c| matches!(c, Component::Normal(_)));

        if !confined {
            return Err(SwarmError::ArtifactWriteError {
                reason: format!("artifact name '{}' escapes the output directory", name),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn write_file(&self, name: &str, content: &str) -> SwarmResult<()> {
        let path = self.resolve(name)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SwarmError::ArtifactWriteError {
                reason: format!("failed to create '{}': {}", parent.display(), e),
            })?;
        }
        fs::write(&path, content).map_err(|e| SwarmError::ArtifactWriteError {
            reason: format!("failed to write '{}': {}", path.display(), e),
        })?;

        debug!(path = %path.display(), bytes = content.len(), "artifact written");
        Ok(())
    }
}

//! Named content blocks produced by agents.

use serde::{Deserialize, Serialize};

/// A named, formatted piece of generated content.
///
/// `name` doubles as the artifact's relative path inside the run's output
/// directory. Uniqueness is not enforced: a later artifact with the same
/// name overwrites the earlier file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    /// Free-form format label. Agents that omit it get `"markdown"`.
    #[serde(default = "Artifact::default_format")]
    pub format: String,
    pub content: String,
}

impl Artifact {
    pub const MARKDOWN: &'static str = "markdown";

    pub fn new(name: impl Into<String>, format: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: format.into(),
            content: content.into(),
        }
    }

    pub fn markdown(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, Self::MARKDOWN, content)
    }

    fn default_format() -> String {
        Self::MARKDOWN.to_string()
    }
}

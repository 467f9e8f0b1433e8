//! Immutable snapshots of the artifacts a run is carrying forward.
//!
//! Each pipeline stage and each review cycle consumes a `Bundle` and
//! produces a new one. Category lists are replaced, never merged.

use swarm_contracts::artifact::Artifact;

/// The four artifact categories a bundle carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Research,
    Plan,
    Copy,
    Channel,
}

impl Category {
    /// Bundle concatenation order.
    pub const ORDER: [Category; 4] = [
        Category::Research,
        Category::Plan,
        Category::Copy,
        Category::Channel,
    ];

    /// Categories the reviser works on, in revision order. Research is never
    /// revised.
    pub const REVISABLE: [Category; 3] = [Category::Plan, Category::Copy, Category::Channel];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Research => "research",
            Category::Plan => "plan",
            Category::Copy => "copy",
            Category::Channel => "channel",
        }
    }
}

/// One snapshot of the working artifact lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    research: Vec<Artifact>,
    plan: Vec<Artifact>,
    copy: Vec<Artifact>,
    channel: Vec<Artifact>,
}

impl Bundle {
    pub fn get(&self, category: Category) -> &[Artifact] {
        match category {
            Category::Research => &self.research,
            Category::Plan => &self.plan,
            Category::Copy => &self.copy,
            Category::Channel => &self.channel,
        }
    }

    /// Return a new snapshot with `category` replaced by `artifacts`.
    pub fn with(mut self, category: Category, artifacts: Vec<Artifact>) -> Self {
        let slot = match category {
            Category::Research => &mut self.research,
            Category::Plan => &mut self.plan,
            Category::Copy => &mut self.copy,
            Category::Channel => &mut self.channel,
        };
        *slot = artifacts;
        self
    }

    /// research ++ plan ++ copy ++ channel.
    pub fn concat(&self) -> Vec<Artifact> {
        Category::ORDER
            .iter()
            .flat_map(|c| self.get(*c).iter().cloned())
            .collect()
    }

    /// Names of the concatenated artifacts, in order.
    pub fn names(&self) -> Vec<String> {
        Category::ORDER
            .iter()
            .flat_map(|c| self.get(*c).iter().map(|a| a.name.clone()))
            .collect()
    }
}

//! The seam to the host build orchestrator.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::builder::target::TargetDescriptor;

/// Something that accepts target declarations.
///
/// The host build system implements this; compilation, linking and caching
/// are its business.
pub trait Orchestrator {
    /// Declare one target.
    fn declare(&mut self, target: TargetDescriptor) -> Result<()>;
}

/// An orchestrator that records declarations into a serializable plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildPlan {
    pub targets: Vec<TargetDescriptor>,
}

impl BuildPlan {
    pub fn new() -> Self {
        BuildPlan::default()
    }

    /// Find a declared target by name.
    pub fn get(&self, name: &str) -> Option<&TargetDescriptor> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Orchestrator for BuildPlan {
    fn declare(&mut self, target: TargetDescriptor) -> Result<()> {
        if self.get(&target.name).is_some() {
            anyhow::bail!("target `{}` declared twice", target.name);
        }
        self.targets.push(target);
        Ok(())
    }
}

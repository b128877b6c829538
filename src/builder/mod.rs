//! Target emission for the host build orchestrator.
//!
//! [`context`] holds the configure step, [`emit`] the three emitters and
//! [`orchestrator`] the seam they declare targets through.

pub mod context;
pub mod emit;
pub mod orchestrator;
pub mod target;

pub use context::{BuildConfig, ConfigureOptions};
pub use emit::{build_modular_libs, compile_project, create_unified_lib, ProjectBuildOptions};
pub use orchestrator::{BuildPlan, Orchestrator};
pub use target::{TargetDescriptor, TargetKind};

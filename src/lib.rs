//! juce-build - build-tool support for JUCE
//!
//! This crate reads JUCE module descriptors and `.jucer` project files and
//! turns them into target descriptors for a host build orchestrator.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Fixtures for unit tests: synthetic module roots and project files.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildConfig, BuildPlan, Orchestrator, TargetDescriptor};
pub use core::{ModuleCatalog, ModuleDescriptor, Platform, Project};
pub use util::context::GlobalContext;

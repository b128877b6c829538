//! Core data structures.
//!
//! - Platform detection
//! - Module descriptors and the built-in fallback tables
//! - Project files

pub mod catalog;
pub mod module_info;
pub mod platform;
pub mod project;
pub mod tables;

pub use catalog::{ModuleCatalog, ModuleRequirements};
pub use module_info::ModuleDescriptor;
pub use platform::Platform;
pub use project::Project;

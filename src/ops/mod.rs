//! High-level operations.
//!
//! This module contains the implementation of juce-build commands.

pub mod configure;
pub mod inspect;
pub mod plan;

pub use configure::{
    chosen_module_root, configure, configure_report, format_report, ConfigureReport, Overrides,
};
pub use inspect::{
    format_module_report, format_modules, format_project_report, list_modules, module_report,
    project_report, ModuleReport, ModuleSummary, ProjectReport,
};
pub use plan::{plan_modular, plan_project, plan_unified};

//! Command implementations

pub mod completions;
pub mod configure;
pub mod info;
pub mod modules;
pub mod plan;
pub mod project;

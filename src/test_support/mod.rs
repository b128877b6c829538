//! Test utilities for juce-build unit tests.
//!
//! Fixtures here write synthetic module trees and project files into
//! temporary directories.
//!
//! # Example
//!
//! ```rust,ignore
//! use juce_build::test_support::{ModuleFixture, ProjectFixture};
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! ModuleFixture::new("juce_core").compile("juce_core.cpp", None).write(tmp.path());
//! let jucer = ProjectFixture::new("Demo").module("juce_core").write(tmp.path());
//! ```

pub mod fixtures;

pub use fixtures::*;

//! Module descriptor (`juce_module_info`) reading.
//!
//! Each JUCE module directory carries a JSON descriptor naming the module,
//! its sibling dependencies, the native libraries and frameworks it needs,
//! and the files to compile on each exporter.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use miette::Diagnostic;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::platform::Platform;

/// File name of a module descriptor inside its module directory.
pub const DESCRIPTOR_FILE_NAME: &str = "juce_module_info";

/// Major version suffix used when naming module packages.
pub const PACKAGE_SUFFIX: &str = "-3";

/// Errors reading a descriptor that exists on disk.
///
/// A missing descriptor is not an error; see [`ModuleDescriptor::load`].
#[derive(Debug, Error, Diagnostic)]
pub enum DescriptorError {
    #[error("failed to read module descriptor {}", path.display())]
    #[diagnostic(code(juce_build::module::read))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed module descriptor {}", path.display())]
    #[diagnostic(
        code(juce_build::module::malformed),
        help("the descriptor must be a JSON object with at least an `id` key")
    )]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A dependency entry in a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRef {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub version: Option<String>,
}

/// When a compile entry applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileCondition {
    /// No `target` key.
    Always,
    /// `xcode`: only for the mac native project format.
    NativeMacOnly,
    /// `! xcode`: everywhere except the mac native project format.
    NotNativeMac,
    /// A target this tool does not build for.
    Unrecognized(String),
}

impl CompileCondition {
    /// Check whether files under this condition are built for `platform`.
    pub fn matches(&self, platform: &Platform) -> bool {
        match self {
            CompileCondition::Always => true,
            CompileCondition::NativeMacOnly => platform.is_mac(),
            CompileCondition::NotNativeMac => !platform.is_mac(),
            CompileCondition::Unrecognized(_) => false,
        }
    }
}

/// One `compile` entry of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileEntry {
    /// Path relative to the module directory.
    pub file: String,

    #[serde(default)]
    pub target: Option<String>,
}

impl CompileEntry {
    pub fn condition(&self) -> CompileCondition {
        match self.target.as_deref().map(str::trim) {
            None => CompileCondition::Always,
            Some("xcode") => CompileCondition::NativeMacOnly,
            Some("! xcode") | Some("!xcode") => CompileCondition::NotNativeMac,
            Some(other) => CompileCondition::Unrecognized(other.to_string()),
        }
    }
}

/// A parsed `juce_module_info` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub website: String,

    #[serde(default)]
    pub license: String,

    #[serde(default)]
    pub dependencies: Vec<DependencyRef>,

    /// Whitespace-separated Linux library names.
    #[serde(rename = "LinuxLibs", default)]
    pub linux_libs: Option<String>,

    /// Whitespace-separated macOS framework names.
    #[serde(rename = "OSXFrameworks", default)]
    pub osx_frameworks: Option<String>,

    #[serde(default)]
    pub compile: Option<Vec<CompileEntry>>,

    /// Location the descriptor was read from.
    #[serde(skip)]
    pub path: PathBuf,
}

impl ModuleDescriptor {
    /// Load the descriptor of `module_id` under `module_root`.
    ///
    /// Returns `Ok(None)` when the module has no descriptor file, so callers
    /// can fall back to the built-in tables. A descriptor that exists but
    /// cannot be read or parsed is an error.
    pub fn load(module_root: &Path, module_id: &str) -> Result<Option<Self>, DescriptorError> {
        Self::load_from_dir(&module_root.join(module_id), module_id)
    }

    /// Load the descriptor from a specific module directory.
    pub fn load_from_dir(dir: &Path, module_id: &str) -> Result<Option<Self>, DescriptorError> {
        match descriptor_path(dir, module_id) {
            Some(path) => Self::from_path(&path).map(Some),
            None => {
                tracing::debug!("no descriptor for {} in {}", module_id, dir.display());
                Ok(None)
            }
        }
    }

    /// Parse a descriptor file.
    pub fn from_path(path: &Path) -> Result<Self, DescriptorError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DescriptorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut desc: ModuleDescriptor =
            serde_json::from_str(&contents).map_err(|source| DescriptorError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        desc.path = path.to_path_buf();
        Ok(desc)
    }

    /// Directory containing the module sources.
    pub fn module_dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// Dependency identifiers in declaration order.
    pub fn dependency_ids(&self) -> Vec<&str> {
        self.dependencies
            .iter()
            .filter_map(|d| d.id.as_deref())
            .collect()
    }

    /// Parse the version as semver, if it has that shape.
    pub fn semver(&self) -> Option<semver::Version> {
        semver::Version::parse(self.version.trim()).ok()
    }

    /// Packages this module needs at link time.
    ///
    /// Dependencies are renamed to package names; on mac the module's
    /// framework tokens are added too.
    pub fn required_packages(&self, platform: &Platform) -> Vec<String> {
        let mut pkgs = Vec::new();
        for dep in self.dependency_ids() {
            push_unique(&mut pkgs, package_name(dep));
        }
        for fw in self.osx_frameworks(platform) {
            push_unique(&mut pkgs, fw);
        }
        pkgs
    }

    /// `-l` flags for the module's Linux libraries; empty off Linux.
    pub fn linux_libs(&self, platform: &Platform) -> Vec<String> {
        if !platform.is_linux() {
            return Vec::new();
        }
        split_names(self.linux_libs.as_deref())
            .map(|lib| format!("-l{}", lib))
            .collect()
    }

    /// Linker flags for the module on `platform`.
    pub fn link_flags(&self, platform: &Platform) -> Vec<String> {
        self.linux_libs(platform)
    }

    /// Framework tokens for the module; empty off mac.
    pub fn osx_frameworks(&self, platform: &Platform) -> Vec<String> {
        if !platform.is_mac() {
            return Vec::new();
        }
        let mut fwks = Vec::new();
        for fw in split_names(self.osx_frameworks.as_deref()) {
            push_unique(&mut fwks, framework_token(fw));
        }
        fwks
    }

    /// Compile entries that apply on `platform`.
    ///
    /// A descriptor without a `compile` key yields nothing.
    pub fn compile_entries_for<'a>(
        &'a self,
        platform: &'a Platform,
    ) -> impl Iterator<Item = &'a CompileEntry> + 'a {
        self.compile
            .iter()
            .flatten()
            .filter(move |e| e.condition().matches(platform))
    }
}

/// Find the descriptor file inside a module directory.
pub fn descriptor_path(dir: &Path, module_id: &str) -> Option<PathBuf> {
    [
        dir.join(DESCRIPTOR_FILE_NAME),
        dir.join(format!("{}_info", module_id)),
    ]
    .into_iter()
    .find(|p| p.is_file())
}

/// Package name for a module identifier: `juce_gui_basics` -> `juce-gui-basics-3`.
pub fn package_name(module_id: &str) -> String {
    format!("{}{}", module_id.replace('_', "-"), PACKAGE_SUFFIX)
}

static WORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid regex"));
static CASE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_\-]+").expect("valid regex"));

/// Normalize a framework name to its flag token.
///
/// `DiscRecording` -> `DISC_RECORDING`, `IOKit` -> `IO_KIT`,
/// `Disk Recording` -> `DISK_RECORDING`.
pub fn framework_token(name: &str) -> String {
    let s = WORD_START.replace_all(name.trim(), "${1}_${2}");
    let s = CASE_BOUNDARY.replace_all(&s, "${1}_${2}");
    let s = SEPARATORS.replace_all(&s, "_");
    s.trim_matches('_').to_uppercase()
}

fn split_names(value: Option<&str>) -> impl Iterator<Item = &str> {
    value.unwrap_or_default().split_whitespace()
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

//! Build configuration - the result of the configure step.
//!
//! [`BuildConfig::configure`] runs once: it settles the platform, module
//! root and output directory, and computes compiler flags, preprocessor
//! defines and library naming. The value is read-only afterwards and is
//! passed to every emitter.

use std::fmt;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::core::catalog::ModuleCatalog;
use crate::core::platform::{Platform, PlatformError};
use crate::core::tables;

/// Output directory used when none is given.
pub const DEFAULT_OUT_DIR: &str = "build";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigureError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Platform(#[from] PlatformError),

    #[error("shared library pattern `{0}` has no file extension")]
    #[diagnostic(code(juce_build::configure::pattern))]
    BadLibraryPattern(String),
}

/// Inputs to the configure step.
#[derive(Debug, Clone, Default)]
pub struct ConfigureOptions {
    /// Build debuggable binaries.
    pub debug: bool,

    /// Output directory; defaults to `build`.
    pub out: Option<PathBuf>,

    /// Module root; defaults to `~/juce/modules`.
    pub module_path: Option<PathBuf>,

    /// Platform to configure for; defaults to the host.
    pub platform: Option<Platform>,
}

/// A preprocessor define.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Define {
    pub name: String,
    pub value: String,
}

impl Define {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Define {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Convert to a compiler flag.
    pub fn to_flag(&self) -> String {
        format!("-D{}={}", self.name, self.value)
    }
}

impl fmt::Display for Define {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Which compiled task handles a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompiledTask {
    C,
    Cxx,
}

/// Configured build settings.
#[derive(Debug, Clone, Serialize)]
pub struct BuildConfig {
    pub platform: Platform,
    pub module_root: PathBuf,
    pub out_dir: PathBuf,
    pub debug: bool,
    pub defines: Vec<Define>,
    pub cflags: Vec<String>,
    pub cxxflags: Vec<String>,
    pub linkflags: Vec<String>,
    /// Shared library naming pattern, `%s` standing for the name.
    pub shlib_pattern: String,
    /// Loadable plugin naming pattern: the shared library pattern without `lib`.
    pub plugin_pattern: String,
    /// File extension of loadable plugins, including the dot.
    pub plugin_ext: String,
    /// `FRAMEWORK_<TOKEN>` settings (mac only).
    pub frameworks: Vec<(String, String)>,
}

impl BuildConfig {
    /// Run the configure step.
    pub fn configure(opts: &ConfigureOptions) -> Result<Self, ConfigureError> {
        let platform = opts.platform.clone().unwrap_or_else(Platform::host);
        platform.require_supported()?;

        let mut defines = Vec::new();
        let mut cflags: Vec<String> = Vec::new();
        let mut cxxflags: Vec<String> = Vec::new();
        let mut linkflags: Vec<String> = Vec::new();

        if opts.debug {
            defines.push(Define::new("DEBUG", "1"));
            defines.push(Define::new("_DEBUG", "1"));
            for flag in ["-g", "-ggdb", "-O0"] {
                push_unique(&mut cflags, flag);
                push_unique(&mut cxxflags, flag);
            }
        } else {
            defines.push(Define::new("NDEBUG", "1"));
            push_unique(&mut cflags, "-Os");
            push_unique(&mut cxxflags, "-Os");
        }

        match platform {
            Platform::Mac => {
                push_unique(&mut cxxflags, "-stdlib=libc++");
                push_unique(&mut cxxflags, "-std=c++11");
                push_unique(&mut linkflags, "-stdlib=libc++");
                push_unique(&mut linkflags, "-lc++");
            }
            Platform::Linux => {
                push_unique(&mut cxxflags, "-std=c++11");
                defines.push(Define::new("LINUX", "1"));
            }
            _ => {}
        }

        let frameworks = if platform.is_mac() {
            tables::FRAMEWORKS
                .iter()
                .map(|(token, name)| (format!("FRAMEWORK_{}", token), name.to_string()))
                .collect()
        } else {
            Vec::new()
        };

        let shlib_pattern = platform.shlib_pattern().to_string();
        let plugin_pattern = shlib_pattern
            .strip_prefix("lib")
            .unwrap_or(&shlib_pattern)
            .to_string();
        let plugin_ext = match plugin_pattern.rfind('.') {
            Some(idx) => plugin_pattern[idx..].to_string(),
            None => return Err(ConfigureError::BadLibraryPattern(shlib_pattern)),
        };

        let config = BuildConfig {
            module_root: opts.module_path.clone().unwrap_or_else(default_module_root),
            out_dir: opts
                .out
                .clone()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
            platform,
            debug: opts.debug,
            defines,
            cflags,
            cxxflags,
            linkflags,
            shlib_pattern,
            plugin_pattern,
            plugin_ext,
            frameworks,
        };

        tracing::debug!(
            "configured for {} (module root {}, out {})",
            config.platform,
            config.module_root.display(),
            config.out_dir.display()
        );
        Ok(config)
    }

    /// Module lookup over the configured module root.
    pub fn catalog(&self) -> ModuleCatalog {
        ModuleCatalog::new(&self.module_root, self.platform.clone())
    }

    /// File name of a loadable plugin called `name`.
    pub fn plugin_filename(&self, name: &str) -> String {
        self.plugin_pattern.replace("%s", name)
    }

    /// File name of a shared library called `name`.
    pub fn shlib_filename(&self, name: &str) -> String {
        self.shlib_pattern.replace("%s", name)
    }

    /// Compiled task for a source file, if the file is compiled at all.
    ///
    /// Objective-C (`.m`) and Objective-C++ (`.mm`) are only compiled on mac.
    /// Extensions match without regard to case, except that `.C` is C++.
    pub fn compiled_task_for(&self, source: &Path) -> Option<CompiledTask> {
        let ext = source.extension()?.to_str()?;
        if ext == "C" {
            return Some(CompiledTask::Cxx);
        }
        match ext.to_ascii_lowercase().as_str() {
            "c" => Some(CompiledTask::C),
            "cpp" | "cc" | "cxx" | "c++" => Some(CompiledTask::Cxx),
            "m" if self.platform.is_mac() => Some(CompiledTask::C),
            "mm" if self.platform.is_mac() => Some(CompiledTask::Cxx),
            _ => None,
        }
    }

    /// Defines as compiler flags.
    pub fn define_flags(&self) -> Vec<String> {
        self.defines.iter().map(Define::to_flag).collect()
    }
}

/// `~/juce/modules`, or `juce/modules` when there is no home directory.
pub fn default_module_root() -> PathBuf {
    directories::BaseDirs::new()
        .map(|b| b.home_dir().join("juce").join("modules"))
        .unwrap_or_else(|| PathBuf::from("juce").join("modules"))
}

fn push_unique(list: &mut Vec<String>, flag: &str) {
    if !list.iter().any(|f| f == flag) {
        list.push(flag.to_string());
    }
}

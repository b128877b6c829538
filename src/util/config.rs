//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.juce-build/config.toml` - user-wide defaults
//! - Project: `.juce-build/config.toml` - project-specific overrides
//!
//! Project config takes precedence over global config, and command line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::context::ConfigureOptions;
use crate::core::platform::Platform;

/// Name of the per-user and per-project configuration directory.
pub const CONFIG_DIR_NAME: &str = ".juce-build";

/// Configuration file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// juce-build configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Framework location
    pub juce: JuceSettings,

    /// Build settings
    pub build: BuildSettings,
}

/// Where the framework lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JuceSettings {
    /// Directory containing one subdirectory per module
    pub module_path: Option<PathBuf>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Output directory
    pub out: Option<PathBuf>,

    /// Build debuggable binaries
    pub debug: bool,

    /// Version number given to modular shared libraries
    pub vnum: Option<String>,

    /// Platform to configure for (mac, linux, windows)
    pub platform: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.juce.module_path.is_some() {
            self.juce.module_path = other.juce.module_path;
        }

        if other.build.out.is_some() {
            self.build.out = other.build.out;
        }
        if other.build.debug {
            self.build.debug = true;
        }
        if other.build.vnum.is_some() {
            self.build.vnum = other.build.vnum;
        }
        if other.build.platform.is_some() {
            self.build.platform = other.build.platform;
        }
    }

    /// Parse the configured platform.
    pub fn platform(&self) -> Result<Option<Platform>> {
        match self.build.platform.as_deref() {
            Some(name) => {
                let platform = name
                    .parse::<Platform>()
                    .with_context(|| format!("invalid `build.platform` in config: {}", name))?;
                Ok(Some(platform))
            }
            None => Ok(None),
        }
    }

    /// Configure options from this config.
    pub fn configure_options(&self) -> Result<ConfigureOptions> {
        Ok(ConfigureOptions {
            debug: self.build.debug,
            out: self.build.out.clone(),
            module_path: self.juce.module_path.clone(),
            platform: self.platform()?,
        })
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.juce-build/config.toml)
/// 2. Global config (~/.juce-build/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global config directory (~/.juce-build).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR_NAME))
}

/// Get the project config path (.juce-build/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

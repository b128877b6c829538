//! Target platform detection.
//!
//! Every platform-dependent decision in the crate branches on a [`Platform`]
//! value that is detected once (or overridden) at configure time and then
//! passed explicitly to parsers and emitters.

use std::fmt;
use std::str::FromStr;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised for platforms the tool cannot configure.
#[derive(Debug, Error, Diagnostic)]
pub enum PlatformError {
    #[error("unsupported platform `{0}`")]
    #[diagnostic(
        code(juce_build::platform::unsupported),
        help("supported platforms are macos, linux and windows; pass --platform to override")
    )]
    Unsupported(String),
}

/// The operating system a build is configured for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Mac,
    Linux,
    Windows,
    /// Anything else; configuration refuses to proceed on these.
    Other(String),
}

impl Platform {
    /// Detect the host platform.
    pub fn host() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map an operating system name to a platform.
    pub fn from_os_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "macos" | "darwin" | "mac" | "osx" => Platform::Mac,
            "linux" => Platform::Linux,
            "windows" | "win32" | "win64" => Platform::Windows,
            other => Platform::Other(other.to_string()),
        }
    }

    /// Fail for platforms without a configuration.
    pub fn require_supported(&self) -> Result<(), PlatformError> {
        match self {
            Platform::Other(name) => Err(PlatformError::Unsupported(name.clone())),
            _ => Ok(()),
        }
    }

    pub fn is_mac(&self) -> bool {
        matches!(self, Platform::Mac)
    }

    pub fn is_linux(&self) -> bool {
        matches!(self, Platform::Linux)
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// Tag of this platform's native exporter inside `EXPORTFORMATS`.
    pub fn exporter_tag(&self) -> &'static str {
        match self {
            Platform::Mac => "XCODE_MAC",
            Platform::Linux => "LINUX_MAKE",
            Platform::Windows | Platform::Other(_) => "CODEBLOCKS",
        }
    }

    /// Extension of a module's single translation unit.
    ///
    /// On mac the unity file is Objective-C++ so it can include Cocoa headers.
    pub fn unity_extension(&self) -> &'static str {
        match self {
            Platform::Mac => ".mm",
            _ => ".cpp",
        }
    }

    /// Shared library naming pattern, `%s` standing for the target name.
    pub fn shlib_pattern(&self) -> &'static str {
        match self {
            Platform::Mac => "lib%s.dylib",
            Platform::Windows => "%s.dll",
            Platform::Linux | Platform::Other(_) => "lib%s.so",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Platform::Mac => "macos",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::Other(name) => name,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::host()
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let platform = Platform::from_os_name(s);
        platform.require_supported()?;
        Ok(platform)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Target descriptors - what the orchestrator is asked to build.
//!
//! A [`TargetDescriptor`] is fully resolved: every source is a path and every
//! use token is final, so the orchestrator never has to look anything up.

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::core::project::ProjectType;

/// The kind of artifact a target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Compile only; objects are left for the caller.
    Objects,

    /// Static library (.a / .lib)
    StaticLib,

    /// Shared/dynamic library (.so / .dylib / .dll)
    SharedLib,

    /// Executable
    Program,
}

impl TargetKind {
    /// Feature string understood by the orchestrator.
    pub fn features(&self) -> &'static str {
        match self {
            TargetKind::Objects => "cxx",
            TargetKind::StaticLib => "cxx cxxstlib",
            TargetKind::SharedLib => "cxx cxxshlib",
            TargetKind::Program => "cxx cxxprogram",
        }
    }

    /// Artifact kind for a project's declared type.
    pub fn for_project(project_type: &ProjectType) -> Self {
        match project_type {
            ProjectType::GuiApp | ProjectType::ConsoleApp => TargetKind::Program,
            ProjectType::Dll | ProjectType::AudioPlug => TargetKind::SharedLib,
            ProjectType::Library => TargetKind::StaticLib,
            ProjectType::Other(_) => TargetKind::Objects,
        }
    }

    pub fn is_library(&self) -> bool {
        matches!(self, TargetKind::StaticLib | TargetKind::SharedLib)
    }
}

impl std::str::FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "objects" | "cxx" => Ok(TargetKind::Objects),
            "staticlib" | "static" | "cxxstlib" => Ok(TargetKind::StaticLib),
            "sharedlib" | "shared" | "cxxshlib" => Ok(TargetKind::SharedLib),
            "program" | "exe" | "cxxprogram" => Ok(TargetKind::Program),
            other => Err(format!(
                "unknown target kind `{}` (expected objects, staticlib, sharedlib or program)",
                other
            )),
        }
    }
}

/// A target handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub kind: TargetKind,

    /// Feature string derived from `kind`.
    pub features: String,

    /// Task generator name, used by other targets' `use` lists.
    pub name: String,

    /// Output name.
    pub target: String,

    pub source: Vec<PathBuf>,

    #[serde(default)]
    pub includes: Vec<PathBuf>,

    #[serde(default)]
    pub linkflags: Vec<String>,

    /// Use-library tokens (frameworks, other targets), no duplicates.
    #[serde(rename = "use", default)]
    pub use_libs: Vec<String>,

    /// Shared library version number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vnum: Option<String>,
}

impl TargetDescriptor {
    pub fn new(kind: TargetKind, name: impl Into<String>, target: impl Into<String>) -> Self {
        TargetDescriptor {
            kind,
            features: kind.features().to_string(),
            name: name.into(),
            target: target.into(),
            source: Vec::new(),
            includes: Vec::new(),
            linkflags: Vec::new(),
            use_libs: Vec::new(),
            vnum: None,
        }
    }

    /// Create a shared library target.
    pub fn sharedlib(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(TargetKind::SharedLib, name, target)
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = PathBuf>) -> Self {
        self.source.extend(sources);
        self
    }

    pub fn with_includes(mut self, includes: impl IntoIterator<Item = PathBuf>) -> Self {
        self.includes.extend(includes);
        self
    }

    pub fn with_linkflags(mut self, flags: impl IntoIterator<Item = String>) -> Self {
        self.linkflags.extend(flags);
        self
    }

    /// Add use tokens, skipping ones already present.
    pub fn with_use(mut self, tokens: impl IntoIterator<Item = String>) -> Self {
        for token in tokens {
            if !self.use_libs.contains(&token) {
                self.use_libs.push(token);
            }
        }
        self
    }

    /// Set the shared library version.
    ///
    /// Empty strings leave the version unset.
    pub fn with_vnum(mut self, vnum: Option<&str>) -> Result<Self> {
        match vnum.map(str::trim) {
            None | Some("") => {}
            Some(v) => {
                validate_vnum(v)?;
                self.vnum = Some(v.to_string());
            }
        }
        Ok(self)
    }

    /// Check the descriptor is complete enough to declare.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("target has no name");
        }
        if self.target.trim().is_empty() {
            bail!("target `{}` has no output name", self.name);
        }
        if self.source.is_empty() {
            bail!("target `{}` has no sources", self.name);
        }
        Ok(())
    }
}

/// A version number is one to three dot-separated integers.
fn validate_vnum(vnum: &str) -> Result<()> {
    let parts: Vec<&str> = vnum.split('.').collect();
    let numeric = parts
        .iter()
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    if parts.len() > 3 || !numeric {
        bail!("invalid library version `{}` (expected e.g. 3.0.8)", vnum);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_for_project_types() {
        assert_eq!(
            TargetKind::for_project(&ProjectType::GuiApp).features(),
            "cxx cxxprogram"
        );
        assert_eq!(
            TargetKind::for_project(&ProjectType::Dll).features(),
            "cxx cxxshlib"
        );
        assert_eq!(
            TargetKind::for_project(&ProjectType::Other("weird".into())).features(),
            "cxx"
        );
    }

    #[test]
    fn test_use_is_deduplicated() {
        let t = TargetDescriptor::sharedlib("a", "a")
            .with_use(vec!["COCOA".to_string(), "IO_KIT".to_string()])
            .with_use(vec!["COCOA".to_string()]);
        assert_eq!(t.use_libs, vec!["COCOA", "IO_KIT"]);
    }

    #[test]
    fn test_vnum() {
        let t = TargetDescriptor::sharedlib("a", "a")
            .with_vnum(Some("3.0.8"))
            .unwrap();
        assert_eq!(t.vnum.as_deref(), Some("3.0.8"));

        let t = TargetDescriptor::sharedlib("a", "a").with_vnum(Some("")).unwrap();
        assert_eq!(t.vnum, None);

        assert!(TargetDescriptor::sharedlib("a", "a")
            .with_vnum(Some("3.x"))
            .is_err());
        assert!(TargetDescriptor::sharedlib("a", "a")
            .with_vnum(Some("1.2.3.4"))
            .is_err());
    }

    #[test]
    fn test_validate() {
        let t = TargetDescriptor::sharedlib("a", "");
        assert!(t.validate().is_err());
        let t = TargetDescriptor::sharedlib("a", "a");
        assert!(t.validate().is_err());
        let t = t.with_sources(vec![PathBuf::from("a.cpp")]);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_serializes_use_key() {
        let t = TargetDescriptor::sharedlib("juce-core-3", "juce_core-3")
            .with_sources(vec![PathBuf::from("juce_core.cpp")])
            .with_use(vec!["COCOA".to_string()]);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["use"][0], "COCOA");
        assert_eq!(json["features"], "cxx cxxshlib");
        assert!(json.get("vnum").is_none());
    }
}

//! `.jucer` project file parsing.
//!
//! A project file is an XML document rooted at `JUCERPROJECT`. Parsing
//! normalizes it into a [`Project`]: module references from both the legacy
//! `MODULE` and current `MODULES` tags are merged, file entries are
//! collected from every group, and each exporter subtree is kept with its
//! module paths and build configurations.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::core::module_info::{descriptor_path, DescriptorError, ModuleDescriptor};
use crate::core::platform::Platform;
use crate::util::fs::resolve_project_path;
use crate::util::xml::Element;

/// Root tag of every project file.
pub const PROJECT_ROOT_TAG: &str = "JUCERPROJECT";

/// Directory next to the project file holding generated code.
pub const LIBRARY_CODE_DIR: &str = "JuceLibraryCode";

/// Generated binary resource source inside [`LIBRARY_CODE_DIR`].
pub const BINARY_DATA_FILE: &str = "BinaryData.cpp";

/// Target name used when a project does not declare one.
pub const DEFAULT_TARGET_NAME: &str = "JuceTarget";

#[derive(Debug, Error, Diagnostic)]
pub enum ProjectError {
    #[error("failed to read project file {}", path.display())]
    #[diagnostic(code(juce_build::project::read))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed project file {}", path.display())]
    #[diagnostic(code(juce_build::project::malformed))]
    Xml {
        path: PathBuf,
        #[source]
        source: xml::reader::Error,
    },

    #[error("{} is not a project file: root element is `{found}`", path.display())]
    #[diagnostic(
        code(juce_build::project::not_a_project),
        help("project files have a `JUCERPROJECT` root element")
    )]
    NotAProject { path: PathBuf, found: String },

    #[error("project file {} has no `{attribute}` attribute", path.display())]
    #[diagnostic(code(juce_build::project::missing_attribute))]
    MissingAttribute { path: PathBuf, attribute: String },
}

/// The `projectType` of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    GuiApp,
    ConsoleApp,
    Dll,
    Library,
    AudioPlug,
    Other(String),
}

impl ProjectType {
    pub fn from_attr(value: &str) -> Self {
        match value {
            "guiapp" => ProjectType::GuiApp,
            "consoleapp" => ProjectType::ConsoleApp,
            "dll" => ProjectType::Dll,
            "library" => ProjectType::Library,
            "audioplug" => ProjectType::AudioPlug,
            other => ProjectType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ProjectType::GuiApp => "guiapp",
            ProjectType::ConsoleApp => "consoleapp",
            ProjectType::Dll => "dll",
            ProjectType::Library => "library",
            ProjectType::AudioPlug => "audioplug",
            ProjectType::Other(s) => s,
        }
    }
}

/// A `FILE` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectFile {
    /// Path as written in the project, relative to the project directory.
    pub file: String,
    pub compile: bool,
    pub resource: bool,
}

/// A `MODULEPATH` entry of an exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulePath {
    pub id: String,
    pub path: String,
}

/// A `CONFIGURATION` entry of an exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfiguration {
    pub name: String,
    pub target_name: Option<String>,
    pub is_debug: bool,
}

/// One exporter subtree under `EXPORTFORMATS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exporter {
    /// Element tag, e.g. `LINUX_MAKE`.
    pub format: String,
    pub module_paths: Vec<ModulePath>,
    pub configurations: Vec<BuildConfiguration>,
}

/// A parsed project file.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    path: PathBuf,
    dir: PathBuf,
    pub id: String,
    pub name: String,
    pub version: String,
    pub jucer_version: String,
    pub bundle_identifier: String,
    pub project_type: ProjectType,
    modules: Vec<String>,
    files: Vec<ProjectFile>,
    exporters: Vec<Exporter>,
}

impl Project {
    /// Load and parse a project file.
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let file = File::open(path).map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let root = Element::parse(BufReader::new(file)).map_err(|source| ProjectError::Xml {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_element(path, &root)
    }

    /// Parse project XML that lives at `path`.
    ///
    /// `path` is only used to resolve relative file and module paths.
    pub fn parse_str(xml: &str, path: &Path) -> Result<Self, ProjectError> {
        let root = Element::parse(xml.as_bytes()).map_err(|source| ProjectError::Xml {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_element(path, &root)
    }

    fn from_element(path: &Path, root: &Element) -> Result<Self, ProjectError> {
        if root.name != PROJECT_ROOT_TAG {
            return Err(ProjectError::NotAProject {
                path: path.to_path_buf(),
                found: root.name.clone(),
            });
        }

        let attr = |name: &str| root.attr(name).unwrap_or_default().to_string();
        let name = root
            .attr("name")
            .ok_or_else(|| ProjectError::MissingAttribute {
                path: path.to_path_buf(),
                attribute: "name".to_string(),
            })?
            .to_string();

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Project {
            path: path.to_path_buf(),
            dir,
            id: attr("id"),
            name,
            version: attr("version"),
            jucer_version: attr("jucerVersion"),
            bundle_identifier: attr("bundleIdentifier"),
            project_type: ProjectType::from_attr(&attr("projectType")),
            modules: collect_modules(root),
            files: collect_files(root),
            exporters: collect_exporters(root),
        })
    }

    /// Path of the project file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the project file.
    pub fn project_dir(&self) -> &Path {
        &self.dir
    }

    /// Referenced module identifiers, first-seen order, no duplicates.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Every `FILE` entry.
    pub fn files(&self) -> &[ProjectFile] {
        &self.files
    }

    pub fn exporters(&self) -> &[Exporter] {
        &self.exporters
    }

    /// The exporter subtree for `platform`'s native project format.
    pub fn exporter(&self, platform: &Platform) -> Option<&Exporter> {
        let tag = platform.exporter_tag();
        self.exporters.iter().find(|e| e.format == tag)
    }

    /// Path of a module as declared by `platform`'s exporter.
    pub fn module_path(&self, module: &str, platform: &Platform) -> Option<PathBuf> {
        let entry = self
            .exporter(platform)?
            .module_paths
            .iter()
            .find(|p| p.id == module)?;
        Some(resolve_project_path(
            &self.dir,
            &format!("{}/{}", entry.path, module),
        ))
    }

    /// Project files marked for compilation.
    pub fn project_code(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .filter(|f| f.compile)
            .map(|f| resolve_project_path(&self.dir, &f.file))
            .collect()
    }

    /// Project files marked as binary resources.
    pub fn resource_files(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .filter(|f| f.resource)
            .map(|f| resolve_project_path(&self.dir, &f.file))
            .collect()
    }

    /// Directory of generated code (`JuceLibraryCode`).
    pub fn library_code_path(&self) -> PathBuf {
        self.dir.join(LIBRARY_CODE_DIR)
    }

    /// Directory holding the sources of `module`.
    ///
    /// A copy vendored into the project wins, then `module_root`, then the
    /// path declared by the exporter.
    pub fn module_source_dir(
        &self,
        module: &str,
        platform: &Platform,
        module_root: Option<&Path>,
    ) -> Option<PathBuf> {
        let local = self.library_code_path().join("modules").join(module);
        if descriptor_path(&local, module).is_some() {
            return Some(local);
        }
        if let Some(root) = module_root {
            let dir = root.join(module);
            if dir.is_dir() {
                return Some(dir);
            }
        }
        self.module_path(module, platform)
    }

    /// Descriptor of a referenced module, if one can be found.
    pub fn module_info(
        &self,
        module: &str,
        platform: &Platform,
        module_root: Option<&Path>,
    ) -> Result<Option<ModuleDescriptor>, DescriptorError> {
        match self.module_source_dir(module, platform, module_root) {
            Some(dir) => ModuleDescriptor::load_from_dir(&dir, module),
            None => {
                tracing::debug!("no source directory for module {}", module);
                Ok(None)
            }
        }
    }

    /// Module sources to compile on `platform`, plus generated binary data.
    pub fn library_code(
        &self,
        platform: &Platform,
        module_root: Option<&Path>,
    ) -> Result<Vec<PathBuf>, DescriptorError> {
        let mut code = Vec::new();

        for module in &self.modules {
            let Some(info) = self.module_info(module, platform, module_root)? else {
                continue;
            };
            let module_dir = info.module_dir().to_path_buf();
            for entry in info.compile_entries_for(platform) {
                code.push(resolve_project_path(&module_dir, &entry.file));
            }
        }

        let binary_data = self.library_code_path().join(BINARY_DATA_FILE);
        if binary_data.is_file() {
            code.push(binary_data);
        }

        Ok(code)
    }

    /// Everything a whole-project compile needs: project code then library code.
    pub fn buildable_code(
        &self,
        platform: &Platform,
        module_root: Option<&Path>,
    ) -> Result<Vec<PathBuf>, DescriptorError> {
        let mut code = self.project_code();
        code.extend(self.library_code(platform, module_root)?);
        Ok(code)
    }

    /// Names of the build configurations of `platform`'s exporter.
    pub fn configurations(&self, platform: &Platform) -> Vec<&str> {
        self.exporter(platform)
            .map(|e| e.configurations.iter().map(|c| c.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Output name of configuration `config` on `platform`.
    ///
    /// Falls back to [`DEFAULT_TARGET_NAME`] when the exporter, the
    /// configuration, or its `targetName` is missing.
    pub fn target_name(&self, config: &str, platform: &Platform) -> String {
        self.exporter(platform)
            .and_then(|e| e.configurations.iter().find(|c| c.name == config))
            .and_then(|c| c.target_name.clone())
            .unwrap_or_else(|| DEFAULT_TARGET_NAME.to_string())
    }

    /// Linker flags required by the referenced modules.
    pub fn link_flags(
        &self,
        platform: &Platform,
        module_root: Option<&Path>,
    ) -> Result<Vec<String>, DescriptorError> {
        let mut flags = Vec::new();
        for module in &self.modules {
            if let Some(info) = self.module_info(module, platform, module_root)? {
                flags.extend(info.link_flags(platform));
            }
        }
        Ok(flags)
    }

    /// Framework tokens required by the referenced modules, deduplicated.
    pub fn use_flags(
        &self,
        platform: &Platform,
        module_root: Option<&Path>,
    ) -> Result<Vec<String>, DescriptorError> {
        let mut flags: Vec<String> = Vec::new();
        for module in &self.modules {
            if let Some(info) = self.module_info(module, platform, module_root)? {
                for fw in info.osx_frameworks(platform) {
                    if !flags.contains(&fw) {
                        flags.push(fw);
                    }
                }
            }
        }
        Ok(flags)
    }
}

fn is_truthy(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("1") | Some("true"))
}

fn collect_modules(root: &Element) -> Vec<String> {
    let mut modules: Vec<String> = Vec::new();
    // Older projects use MODULE, newer ones MODULES; some carry both.
    for el in root.descendants_in(&["MODULE", "MODULES"]) {
        if let Some(id) = el.attr("id") {
            if !modules.iter().any(|m| m == id) {
                modules.push(id.to_string());
            }
        }
    }
    modules
}

fn collect_files(root: &Element) -> Vec<ProjectFile> {
    root.descendants_named("FILE")
        .into_iter()
        .filter_map(|el| {
            Some(ProjectFile {
                file: el.attr("file")?.to_string(),
                compile: is_truthy(el.attr("compile")),
                resource: is_truthy(el.attr("resource")),
            })
        })
        .collect()
}

fn collect_exporters(root: &Element) -> Vec<Exporter> {
    let Some(formats) = root.child("EXPORTFORMATS") else {
        return Vec::new();
    };

    formats
        .children
        .iter()
        .map(|exporter| {
            let module_paths = exporter
                .child("MODULEPATHS")
                .map(|paths| {
                    paths
                        .children_named("MODULEPATH")
                        .filter_map(|p| {
                            Some(ModulePath {
                                id: p.attr("id")?.to_string(),
                                path: p.attr("path")?.to_string(),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();

            let configurations = exporter
                .child("CONFIGURATIONS")
                .map(|configs| {
                    configs
                        .children_named("CONFIGURATION")
                        .filter_map(|c| {
                            Some(BuildConfiguration {
                                name: c.attr("name")?.to_string(),
                                target_name: c.attr("targetName").map(str::to_string),
                                is_debug: is_truthy(c.attr("isDebug")),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();

            Exporter {
                format: exporter.name.clone(),
                module_paths,
                configurations,
            }
        })
        .collect()
}

//! Fixture builders for module trees and project files.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::core::module_info::DESCRIPTOR_FILE_NAME;

/// A module directory with a `juce_module_info` descriptor.
#[derive(Debug, Clone)]
pub struct ModuleFixture {
    pub id: String,
    pub version: String,
    pub dependencies: Vec<String>,
    pub linux_libs: Option<String>,
    pub osx_frameworks: Option<String>,
    pub compile: Vec<(String, Option<String>)>,
}

impl ModuleFixture {
    pub fn new(id: impl Into<String>) -> Self {
        ModuleFixture {
            id: id.into(),
            version: "3.0.8".to_string(),
            dependencies: Vec::new(),
            linux_libs: None,
            osx_frameworks: None,
            compile: Vec::new(),
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn depends_on(mut self, id: &str) -> Self {
        self.dependencies.push(id.to_string());
        self
    }

    pub fn linux_libs(mut self, libs: &str) -> Self {
        self.linux_libs = Some(libs.to_string());
        self
    }

    pub fn osx_frameworks(mut self, frameworks: &str) -> Self {
        self.osx_frameworks = Some(frameworks.to_string());
        self
    }

    pub fn compile(mut self, file: &str, target: Option<&str>) -> Self {
        self.compile
            .push((file.to_string(), target.map(str::to_string)));
        self
    }

    /// Descriptor JSON for this module.
    pub fn to_json(&self) -> String {
        let mut desc = json!({
            "id": self.id,
            "name": format!("JUCE {} classes", self.id),
            "version": self.version,
            "description": "Test module",
            "website": "http://www.juce.com/juce",
            "license": "GPL/Commercial",
            "dependencies": self
                .dependencies
                .iter()
                .map(|d| json!({ "id": d, "version": "matching" }))
                .collect::<Vec<_>>(),
        });
        if let Some(ref libs) = self.linux_libs {
            desc["LinuxLibs"] = json!(libs);
        }
        if let Some(ref fwks) = self.osx_frameworks {
            desc["OSXFrameworks"] = json!(fwks);
        }
        if !self.compile.is_empty() {
            desc["compile"] = self
                .compile
                .iter()
                .map(|(file, target)| match target {
                    Some(t) => json!({ "file": file, "target": t }),
                    None => json!({ "file": file }),
                })
                .collect();
        }
        serde_json::to_string_pretty(&desc).unwrap()
    }

    /// Write the module under `root`, with empty unity sources, and return
    /// the module directory.
    pub fn write(&self, root: &Path) -> PathBuf {
        let dir = root.join(&self.id);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(DESCRIPTOR_FILE_NAME), self.to_json()).unwrap();
        for ext in ["cpp", "mm"] {
            std::fs::write(dir.join(format!("{}.{}", self.id, ext)), "").unwrap();
        }
        dir
    }
}

#[derive(Debug, Clone)]
struct ExporterFixture {
    tag: String,
    module_paths: Vec<(String, String)>,
    configurations: Vec<(String, Option<String>)>,
}

/// A `.jucer` project file.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    pub name: String,
    project_type: String,
    modules: Vec<(&'static str, String)>,
    files: Vec<(String, bool)>,
    exporters: Vec<ExporterFixture>,
}

impl ProjectFixture {
    pub fn new(name: impl Into<String>) -> Self {
        ProjectFixture {
            name: name.into(),
            project_type: "guiapp".to_string(),
            modules: Vec::new(),
            files: Vec::new(),
            exporters: Vec::new(),
        }
    }

    pub fn project_type(mut self, project_type: &str) -> Self {
        self.project_type = project_type.to_string();
        self
    }

    /// Reference a module with the current `MODULES` tag.
    pub fn module(mut self, id: &str) -> Self {
        self.modules.push(("MODULES", id.to_string()));
        self
    }

    /// Reference a module with the legacy `MODULE` tag.
    pub fn legacy_module(mut self, id: &str) -> Self {
        self.modules.push(("MODULE", id.to_string()));
        self
    }

    pub fn file(mut self, path: &str, compile: bool) -> Self {
        self.files.push((path.to_string(), compile));
        self
    }

    pub fn exporter(
        mut self,
        tag: &str,
        module_paths: &[(&str, &str)],
        configurations: &[(&str, Option<&str>)],
    ) -> Self {
        self.exporters.push(ExporterFixture {
            tag: tag.to_string(),
            module_paths: module_paths
                .iter()
                .map(|(id, path)| (id.to_string(), path.to_string()))
                .collect(),
            configurations: configurations
                .iter()
                .map(|(name, target)| (name.to_string(), target.map(str::to_string)))
                .collect(),
        });
        self
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#).unwrap();
        writeln!(
            xml,
            r#"<JUCERPROJECT id="abc123" name="{}" projectType="{}" version="1.0.0" bundleIdentifier="com.example.{}" jucerVersion="3.1.0">"#,
            self.name, self.project_type, self.name
        )
        .unwrap();

        writeln!(xml, r#"  <MAINGROUP id="main" name="{}">"#, self.name).unwrap();
        writeln!(xml, r#"    <GROUP id="src" name="Source">"#).unwrap();
        for (i, (path, compile)) in self.files.iter().enumerate() {
            let file_name = path.rsplit('/').next().unwrap_or(path);
            writeln!(
                xml,
                r#"      <FILE id="f{}" name="{}" compile="{}" resource="0" file="{}"/>"#,
                i,
                file_name,
                if *compile { 1 } else { 0 },
                path
            )
            .unwrap();
        }
        writeln!(xml, "    </GROUP>\n  </MAINGROUP>").unwrap();

        writeln!(xml, "  <MODULES>").unwrap();
        for (tag, id) in &self.modules {
            writeln!(xml, r#"    <{} id="{}" showAllCode="1"/>"#, tag, id).unwrap();
        }
        writeln!(xml, "  </MODULES>").unwrap();

        writeln!(xml, "  <EXPORTFORMATS>").unwrap();
        for exporter in &self.exporters {
            writeln!(xml, r#"    <{} targetFolder="Builds/{}">"#, exporter.tag, exporter.tag).unwrap();
            writeln!(xml, "      <CONFIGURATIONS>").unwrap();
            for (name, target) in &exporter.configurations {
                let line = match target {
                    Some(t) => format!(
                        r#"        <CONFIGURATION name="{}" isDebug="1" targetName="{}"/>"#,
                        name, t
                    ),
                    None => format!(r#"        <CONFIGURATION name="{}" isDebug="0"/>"#, name),
                };
                writeln!(xml, "{}", line).unwrap();
            }
            writeln!(xml, "      </CONFIGURATIONS>").unwrap();
            writeln!(xml, "      <MODULEPATHS>").unwrap();
            for (id, path) in &exporter.module_paths {
                writeln!(xml, r#"        <MODULEPATH id="{}" path="{}"/>"#, id, path).unwrap();
            }
            writeln!(xml, "      </MODULEPATHS>").unwrap();
            writeln!(xml, "    </{}>", exporter.tag).unwrap();
        }
        writeln!(xml, "  </EXPORTFORMATS>").unwrap();
        writeln!(xml, "</JUCERPROJECT>").unwrap();
        xml
    }

    /// Write `<name>.jucer` into `dir` and return its path.
    pub fn write(&self, dir: &Path) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join(format!("{}.jucer", self.name));
        std::fs::write(&path, self.to_xml()).unwrap();
        path
    }
}

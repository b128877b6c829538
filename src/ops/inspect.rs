//! Read-only inspection of modules and project files.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::builder::context::BuildConfig;
use crate::core::catalog::{ModuleRequirements, RequirementSource};
use crate::core::module_info::ModuleDescriptor;
use crate::core::project::Project;
use crate::util::diagnostic::suggestions;
use crate::util::fs::relative_path;

/// One row of the module listing.
#[derive(Debug, Clone)]
pub struct ModuleSummary {
    pub id: String,
    pub version: Option<String>,
    pub source: RequirementSource,
    pub dependencies: Vec<String>,
}

/// List the modules present under the module root.
pub fn list_modules(config: &BuildConfig) -> Result<Vec<ModuleSummary>> {
    let catalog = config.catalog();
    if !catalog.root().is_dir() {
        bail!(
            "module path {} does not exist\n{}",
            catalog.root().display(),
            suggestions::NO_MODULE_ROOT
        );
    }

    let mut modules = Vec::new();
    for id in catalog.available_modules()? {
        let reqs = catalog.requirements(&id)?;
        modules.push(ModuleSummary {
            id,
            version: reqs.version,
            source: reqs.source,
            dependencies: reqs.dependencies,
        });
    }
    Ok(modules)
}

/// Format the module listing for display.
pub fn format_modules(modules: &[ModuleSummary]) -> String {
    let width = modules.iter().map(|m| m.id.len()).max().unwrap_or(0);
    let mut out = String::new();
    for m in modules {
        let _ = write!(
            out,
            "{:width$}  {:8}  {}",
            m.id,
            m.version.as_deref().unwrap_or("-"),
            m.source,
            width = width
        );
        if !m.dependencies.is_empty() {
            let _ = write!(out, "  (needs {})", m.dependencies.join(", "));
        }
        out.push('\n');
    }
    out
}

/// Everything known about one module.
#[derive(Debug, Clone)]
pub struct ModuleReport {
    pub requirements: ModuleRequirements,
    pub descriptor: Option<ModuleDescriptor>,
    pub unity_source: Option<PathBuf>,
    /// Module and its dependencies, dependencies first.
    pub closure: Vec<String>,
}

/// Inspect one module.
pub fn module_report(config: &BuildConfig, id: &str) -> Result<ModuleReport> {
    let catalog = config.catalog();
    let descriptor = catalog
        .descriptor(id)
        .with_context(|| format!("failed to read descriptor of `{}`", id))?;
    let requirements = catalog.requirements(id)?;
    let unity_source = catalog.unity_source(id).ok();
    let closure = catalog.transitive_dependencies(&[id])?;

    Ok(ModuleReport {
        requirements,
        descriptor,
        unity_source,
        closure,
    })
}

/// Format a module report for display.
pub fn format_module_report(report: &ModuleReport, config: &BuildConfig) -> String {
    let reqs = &report.requirements;
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", reqs.id, reqs.source);
    if let Some(desc) = &report.descriptor {
        if !desc.name.is_empty() {
            let _ = writeln!(out, "  name:         {}", desc.name);
        }
        if !desc.description.is_empty() {
            let _ = writeln!(out, "  description:  {}", desc.description);
        }
        if !desc.license.is_empty() {
            let _ = writeln!(out, "  license:      {}", desc.license);
        }
    }
    if let Some(v) = &reqs.version {
        let _ = writeln!(out, "  version:      {}", v);
    }
    let _ = writeln!(out, "  dependencies: {}", list_or_none(&reqs.dependencies));
    let _ = writeln!(out, "  closure:      {}", report.closure.join(" "));
    let _ = writeln!(out, "  use:          {}", list_or_none(&reqs.use_tokens()));
    let _ = writeln!(out, "  linkflags:    {}", list_or_none(&reqs.link_flags));
    match &report.unity_source {
        Some(path) => {
            let _ = writeln!(out, "  unity source: {}", path.display());
        }
        None => {
            let _ = writeln!(out, "  unity source: not found");
        }
    }

    if let Some(desc) = &report.descriptor {
        let entries: Vec<&str> = desc
            .compile_entries_for(&config.platform)
            .map(|e| e.file.as_str())
            .collect();
        if !entries.is_empty() {
            let _ = writeln!(out, "  compiles:     {}", entries.join(" "));
        }
    }

    out
}

/// Summary of a project file for the configured platform.
#[derive(Debug, Clone)]
pub struct ProjectReport {
    pub project: Project,
    pub configurations: Vec<String>,
    pub target_name: String,
    pub project_code: Vec<PathBuf>,
    pub library_code: Vec<PathBuf>,
    pub resources: Vec<PathBuf>,
}

/// Load and summarize a project file.
pub fn project_report(
    config: &BuildConfig,
    path: &Path,
    configuration: &str,
    module_root: Option<&Path>,
) -> Result<ProjectReport> {
    let project = Project::load(path)?;
    let platform = &config.platform;

    let configurations: Vec<String> = project
        .configurations(platform)
        .into_iter()
        .map(str::to_string)
        .collect();
    if !configurations.is_empty() && !configurations.iter().any(|c| c == configuration) {
        tracing::warn!(
            "configuration `{}` not found in {}; {}",
            configuration,
            platform.exporter_tag(),
            suggestions::NO_CONFIGURATION
        );
    }

    Ok(ProjectReport {
        target_name: project.target_name(configuration, platform),
        project_code: project.project_code(),
        library_code: project.library_code(platform, module_root)?,
        resources: project.resource_files(),
        configurations,
        project,
    })
}

/// Format a project report for display.
pub fn format_project_report(report: &ProjectReport) -> String {
    let p = &report.project;
    let mut out = String::new();

    let _ = writeln!(out, "{} {} ({})", p.name, p.version, p.project_type.as_str());
    if !p.bundle_identifier.is_empty() {
        let _ = writeln!(out, "  bundle:         {}", p.bundle_identifier);
    }
    let _ = writeln!(out, "  modules:        {}", list_or_none(p.modules()));
    let _ = writeln!(
        out,
        "  configurations: {}",
        list_or_none(&report.configurations)
    );
    let _ = writeln!(out, "  target:         {}", report.target_name);

    for (label, files) in [
        ("project code", &report.project_code),
        ("library code", &report.library_code),
        ("resources", &report.resources),
    ] {
        let _ = writeln!(out, "  {}:", label);
        for f in files {
            let shown = relative_path(p.project_dir(), f);
            let _ = writeln!(out, "    {}", shown.display());
        }
    }

    out
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(" ")
    }
}

//! Target emission.
//!
//! Each emitter turns modules or a project into [`TargetDescriptor`]s,
//! validates them, declares them to the orchestrator and returns them.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::builder::context::BuildConfig;
use crate::builder::orchestrator::Orchestrator;
use crate::builder::target::{TargetDescriptor, TargetKind};
use crate::core::module_info::{package_name, PACKAGE_SUFFIX};
use crate::core::project::Project;

/// Output name used when a project configuration names an empty target.
pub const FALLBACK_PROGRAM_NAME: &str = "a.out";

/// Options for a whole-project compile.
#[derive(Debug, Clone)]
pub struct ProjectBuildOptions {
    /// Compile the referenced modules' sources into the target.
    pub include_module_code: bool,

    /// Exporter configuration whose target name is used.
    pub configuration: String,

    /// Module root consulted before the exporter's module paths.
    pub module_root: Option<PathBuf>,
}

impl Default for ProjectBuildOptions {
    fn default() -> Self {
        ProjectBuildOptions {
            include_module_code: true,
            configuration: "Debug".to_string(),
            module_root: None,
        }
    }
}

/// Declare one shared library per module.
///
/// Each library is built from the module's unity source and uses the
/// libraries of its dependencies plus its frameworks.
pub fn build_modular_libs(
    config: &BuildConfig,
    mods: &[String],
    vnum: Option<&str>,
    sink: &mut dyn Orchestrator,
) -> Result<Vec<TargetDescriptor>> {
    let catalog = config.catalog();
    let mut declared = Vec::new();

    for id in dedup(mods) {
        let reqs = catalog
            .requirements(id)
            .with_context(|| format!("failed to read requirements of module `{}`", id))?;
        let source = catalog.unity_source(id)?;

        let output = format!("{}{}", id, PACKAGE_SUFFIX);
        let target = TargetDescriptor::sharedlib(package_name(id), output)
            .with_sources(vec![source])
            .with_includes(vec![config.module_root.clone()])
            .with_linkflags(reqs.link_flags.clone())
            .with_use(reqs.use_tokens())
            .with_vnum(vnum)?;

        tracing::debug!("module {} uses {:?} ({})", id, target.use_libs, reqs.source);
        declared.push(declare(sink, target)?);
    }

    tracing::info!("declared {} module libraries", declared.len());
    Ok(declared)
}

/// Declare a single library aggregating the unity sources of `mods`.
pub fn create_unified_lib(
    config: &BuildConfig,
    name: &str,
    mods: &[String],
    kind: TargetKind,
    sink: &mut dyn Orchestrator,
) -> Result<TargetDescriptor> {
    let catalog = config.catalog();
    let mut sources = Vec::new();
    let mut frameworks = Vec::new();
    let mut linkflags: Vec<String> = Vec::new();

    for id in dedup(mods) {
        let reqs = catalog
            .requirements(id)
            .with_context(|| format!("failed to read requirements of module `{}`", id))?;
        sources.push(catalog.unity_source(id)?);
        frameworks.extend(reqs.frameworks);
        for flag in reqs.link_flags {
            if !linkflags.contains(&flag) {
                linkflags.push(flag);
            }
        }
    }

    let target = TargetDescriptor::new(kind, name, name)
        .with_sources(sources)
        .with_includes(vec![config.module_root.clone()])
        .with_linkflags(linkflags)
        .with_use(frameworks);

    let target = declare(sink, target)?;
    tracing::info!(
        "declared unified library {} from {} modules",
        target.name,
        target.source.len()
    );
    Ok(target)
}

/// Declare the target for a whole project.
pub fn compile_project(
    config: &BuildConfig,
    project: &Project,
    opts: &ProjectBuildOptions,
    sink: &mut dyn Orchestrator,
) -> Result<TargetDescriptor> {
    let platform = &config.platform;
    let module_root = opts.module_root.as_deref();
    let kind = TargetKind::for_project(&project.project_type);

    // Module link flags and framework tokens only travel with module code.
    let (sources, use_libs, linkflags) = if opts.include_module_code {
        (
            project.buildable_code(platform, module_root)?,
            project.use_flags(platform, module_root)?,
            project.link_flags(platform, module_root)?,
        )
    } else {
        (project.project_code(), Vec::new(), Vec::new())
    };
    let sources: Vec<PathBuf> = sources
        .into_iter()
        .filter(|src| {
            let compiled = config.compiled_task_for(src).is_some();
            if !compiled {
                tracing::debug!("not compiling {} on {}", src.display(), platform);
            }
            compiled
        })
        .collect();

    let mut output = project.target_name(&opts.configuration, platform);
    if output.trim().is_empty() {
        output = FALLBACK_PROGRAM_NAME.to_string();
    }

    let target = TargetDescriptor::new(kind, project.name.as_str(), output)
        .with_sources(sources)
        .with_includes(vec![project.library_code_path()])
        .with_linkflags(linkflags)
        .with_use(use_libs);

    let target = declare(sink, target)
        .with_context(|| format!("failed to declare project `{}`", project.name))?;
    tracing::info!(
        "declared {} target {} ({} sources)",
        project.project_type.as_str(),
        target.target,
        target.source.len()
    );
    Ok(target)
}

fn declare(sink: &mut dyn Orchestrator, target: TargetDescriptor) -> Result<TargetDescriptor> {
    target.validate()?;
    sink.declare(target.clone())?;
    Ok(target)
}

fn dedup(ids: &[String]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for id in ids {
        if !out.contains(&id.as_str()) {
            out.push(id.as_str());
        }
    }
    out
}

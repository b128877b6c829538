//! Build planning: run an emitter against a recording orchestrator.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::builder::context::BuildConfig;
use crate::builder::emit::{self, ProjectBuildOptions};
use crate::builder::orchestrator::BuildPlan;
use crate::builder::target::TargetKind;
use crate::core::project::Project;
use crate::util::diagnostic::suggestions;

/// Plan one shared library per module.
///
/// With no modules given, every module under the module root is planned,
/// dependencies first.
pub fn plan_modular(
    config: &BuildConfig,
    mods: &[String],
    vnum: Option<&str>,
) -> Result<BuildPlan> {
    let mods = if mods.is_empty() {
        all_modules(config)?
    } else {
        mods.to_vec()
    };

    let mut plan = BuildPlan::new();
    emit::build_modular_libs(config, &mods, vnum, &mut plan)
        .context("failed to plan module libraries")?;
    Ok(plan)
}

/// Plan a single library built from `mods`.
pub fn plan_unified(
    config: &BuildConfig,
    name: &str,
    mods: &[String],
    kind: TargetKind,
) -> Result<BuildPlan> {
    if mods.is_empty() {
        bail!("a unified library needs at least one module");
    }

    let mut plan = BuildPlan::new();
    emit::create_unified_lib(config, name, mods, kind, &mut plan)
        .with_context(|| format!("failed to plan unified library `{}`", name))?;
    Ok(plan)
}

/// Plan the target of a project file.
pub fn plan_project(
    config: &BuildConfig,
    path: &Path,
    opts: &ProjectBuildOptions,
) -> Result<BuildPlan> {
    let project = Project::load(path)?;
    let mut plan = BuildPlan::new();
    emit::compile_project(config, &project, opts, &mut plan)?;
    Ok(plan)
}

fn all_modules(config: &BuildConfig) -> Result<Vec<String>> {
    let catalog = config.catalog();
    if !catalog.root().is_dir() {
        bail!(
            "module path {} does not exist\n{}",
            catalog.root().display(),
            suggestions::NO_MODULE_ROOT
        );
    }
    let available = catalog.available_modules()?;
    let ids: Vec<&str> = available.iter().map(String::as_str).collect();
    let order = catalog.transitive_dependencies(&ids)?;

    let missing: Vec<&str> = order
        .iter()
        .map(String::as_str)
        .filter(|id| !available.iter().any(|a| a == id))
        .collect();
    if !missing.is_empty() {
        bail!(
            "missing dependency: {} not found under module path {}",
            missing.join(", "),
            catalog.root().display()
        );
    }
    Ok(order)
}

//! `juce-build plan` command
//!
//! Runs an emitter against a recording orchestrator and prints the declared
//! targets as JSON.

use anyhow::{anyhow, Result};

use crate::cli::{PlanArgs, PlanKind};
use juce_build::builder::{ProjectBuildOptions, TargetKind};
use juce_build::ops::{
    chosen_module_root, configure, plan_modular, plan_project, plan_unified, Overrides,
};
use juce_build::GlobalContext;

pub fn execute(args: PlanArgs, overrides: &Overrides) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = configure(&ctx, overrides)?;

    let plan = match args.kind {
        PlanKind::Modular { modules, vnum } => {
            // The flag wins over `build.vnum` from the config files.
            let vnum = vnum.or(ctx.load_config().build.vnum);
            plan_modular(&config, &modules, vnum.as_deref())?
        }
        PlanKind::Unified {
            name,
            kind,
            modules,
        } => {
            let kind: TargetKind = kind.parse().map_err(|e: String| anyhow!(e))?;
            plan_unified(&config, &name, &modules, kind)?
        }
        PlanKind::Project {
            file,
            no_module_code,
            config: configuration,
        } => {
            let opts = ProjectBuildOptions {
                include_module_code: !no_module_code,
                configuration,
                module_root: chosen_module_root(&ctx, overrides, &config)?,
            };
            plan_project(&config, &ctx.resolve(&file), &opts)?
        }
    };

    println!("{}", plan.to_json()?);
    Ok(())
}

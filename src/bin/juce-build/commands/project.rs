//! `juce-build project` command

use anyhow::Result;

use crate::cli::ProjectArgs;
use juce_build::ops::{
    chosen_module_root, configure, format_project_report, project_report, Overrides,
};
use juce_build::GlobalContext;

pub fn execute(args: ProjectArgs, overrides: &Overrides) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = configure(&ctx, overrides)?;

    let path = ctx.resolve(&args.file);
    let module_root = chosen_module_root(&ctx, overrides, &config)?;
    let report = project_report(&config, &path, &args.config, module_root.as_deref())?;
    print!("{}", format_project_report(&report));
    Ok(())
}

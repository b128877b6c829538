//! `juce-build info` command

use anyhow::Result;

use crate::cli::InfoArgs;
use juce_build::ops::{configure, format_module_report, module_report, Overrides};
use juce_build::GlobalContext;

pub fn execute(args: InfoArgs, overrides: &Overrides) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = configure(&ctx, overrides)?;

    let report = module_report(&config, &args.module)?;
    print!("{}", format_module_report(&report, &config));
    Ok(())
}

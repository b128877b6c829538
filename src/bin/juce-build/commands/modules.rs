//! `juce-build modules` command

use anyhow::Result;

use juce_build::ops::{configure, format_modules, list_modules, Overrides};
use juce_build::GlobalContext;

pub fn execute(overrides: &Overrides) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = configure(&ctx, overrides)?;

    let modules = list_modules(&config)?;
    if modules.is_empty() {
        println!("No modules in {}", config.module_root.display());
        return Ok(());
    }
    print!("{}", format_modules(&modules));
    Ok(())
}

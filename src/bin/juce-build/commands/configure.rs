//! `juce-build configure` command

use anyhow::Result;

use juce_build::ops::{configure_report, format_report, Overrides};
use juce_build::GlobalContext;

pub fn execute(overrides: &Overrides) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let report = configure_report(&ctx, overrides)?;
    print!("{}", format_report(&report));
    Ok(())
}

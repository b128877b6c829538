//! juce-build CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use juce_build::ops::Overrides;
use juce_build::util::diagnostic;
use juce_build::Platform;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprint!("{}", diagnostic::render(&e));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("juce_build=debug")
    } else {
        EnvFilter::new("juce_build=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let overrides = Overrides {
        debug: cli.debug,
        module_path: cli.module_path,
        out: cli.out,
        platform: cli
            .platform
            .as_deref()
            .map(str::parse::<Platform>)
            .transpose()?,
    };

    // Execute command
    match cli.command {
        Commands::Configure => commands::configure::execute(&overrides),
        Commands::Modules => commands::modules::execute(&overrides),
        Commands::Info(args) => commands::info::execute(args, &overrides),
        Commands::Project(args) => commands::project::execute(args, &overrides),
        Commands::Plan(args) => commands::plan::execute(args, &overrides),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// juce-build - plan builds of JUCE modules and .jucer projects
#[derive(Parser)]
#[command(name = "juce-build")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configure a debug build
    #[arg(long, global = true)]
    pub debug: bool,

    /// Directory containing the JUCE modules
    #[arg(long, global = true, env = "JUCE_MODULE_PATH")]
    pub module_path: Option<PathBuf>,

    /// Output directory
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    /// Platform to configure for (macos, linux, windows)
    #[arg(long, global = true)]
    pub platform: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the build configuration and the JUCE version found
    Configure,

    /// List the modules under the module path
    Modules,

    /// Show what a module needs
    Info(InfoArgs),

    /// Summarize a .jucer project
    Project(ProjectArgs),

    /// Print the targets a build would declare, as JSON
    Plan(PlanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct InfoArgs {
    /// Module identifier, e.g. juce_core
    pub module: String,
}

#[derive(Args)]
pub struct ProjectArgs {
    /// Path to the .jucer file
    pub file: PathBuf,

    /// Exporter configuration to report the target name of
    #[arg(long, default_value = "Debug")]
    pub config: String,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(subcommand)]
    pub kind: PlanKind,
}

#[derive(Subcommand)]
pub enum PlanKind {
    /// One shared library per module
    Modular {
        /// Modules to build (default: every module under the module path)
        modules: Vec<String>,

        /// Library version number, e.g. 3.0.8
        #[arg(long)]
        vnum: Option<String>,
    },

    /// A single library built from several modules
    Unified {
        /// Library name
        #[arg(long)]
        name: String,

        /// Artifact kind (sharedlib, staticlib, objects, program)
        #[arg(long, default_value = "sharedlib")]
        kind: String,

        /// Modules to include
        #[arg(required = true)]
        modules: Vec<String>,
    },

    /// The target of a .jucer project
    Project {
        /// Path to the .jucer file
        file: PathBuf,

        /// Leave the modules' sources out of the target
        #[arg(long)]
        no_module_code: bool,

        /// Exporter configuration whose target name is used
        #[arg(long, default_value = "Debug")]
        config: String,
    },
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

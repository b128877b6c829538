//! The configure operation.
//!
//! Settings are layered: built-in defaults, then the global and project
//! config files, then command line flags.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::builder::context::{BuildConfig, ConfigureOptions};
use crate::core::platform::Platform;
use crate::util::config::Config;
use crate::util::GlobalContext;

/// Settings given on the command line; `None` defers to the config files.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub debug: bool,
    pub module_path: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub platform: Option<Platform>,
}

/// Combine config file settings with command line overrides.
pub fn resolve_options(config: &Config, overrides: &Overrides) -> Result<ConfigureOptions> {
    let mut opts = config.configure_options()?;
    if overrides.debug {
        opts.debug = true;
    }
    if overrides.module_path.is_some() {
        opts.module_path = overrides.module_path.clone();
    }
    if overrides.out.is_some() {
        opts.out = overrides.out.clone();
    }
    if overrides.platform.is_some() {
        opts.platform = overrides.platform.clone();
    }
    Ok(opts)
}

/// Run the configure step for the current context.
pub fn configure(ctx: &GlobalContext, overrides: &Overrides) -> Result<BuildConfig> {
    let config = ctx.load_config();
    let mut opts = resolve_options(&config, overrides)?;
    opts.module_path = opts.module_path.map(|p| ctx.resolve(&p));

    let build = BuildConfig::configure(&opts).context("failed to configure build")?;
    tracing::debug!(
        "module root {} ({})",
        build.module_root.display(),
        if build.module_root.is_dir() {
            "found"
        } else {
            "missing"
        }
    );
    Ok(build)
}

/// The configured module root, when one was chosen rather than defaulted.
///
/// A module path from the command line, `JUCE_MODULE_PATH` or a config file
/// overrides the exporter paths recorded in project files.
pub fn chosen_module_root(
    ctx: &GlobalContext,
    overrides: &Overrides,
    config: &BuildConfig,
) -> Result<Option<PathBuf>> {
    let opts = resolve_options(&ctx.load_config(), overrides)?;
    Ok(opts.module_path.map(|_| config.module_root.clone()))
}

/// What `configure` reports back.
#[derive(Debug, Clone)]
pub struct ConfigureReport {
    pub config: BuildConfig,

    /// Framework version read from `juce_core`, if the module root has it.
    pub juce_version: Option<String>,
}

/// Configure and probe the framework version.
pub fn configure_report(ctx: &GlobalContext, overrides: &Overrides) -> Result<ConfigureReport> {
    let config = configure(ctx, overrides)?;
    let juce_version = config
        .catalog()
        .framework_version()
        .context("failed to read the framework version")?;

    match juce_version {
        Some(ref v) => tracing::info!("JUCE {} at {}", v, config.module_root.display()),
        None => tracing::warn!(
            "no JUCE modules found at {}",
            config.module_root.display()
        ),
    }

    Ok(ConfigureReport {
        config,
        juce_version,
    })
}

/// Format a configure report for display.
pub fn format_report(report: &ConfigureReport) -> String {
    let config = &report.config;
    let mut out = String::new();

    let _ = writeln!(out, "platform:     {}", config.platform);
    let _ = writeln!(out, "module root:  {}", config.module_root.display());
    let _ = writeln!(
        out,
        "juce version: {}",
        report.juce_version.as_deref().unwrap_or("not found")
    );
    let _ = writeln!(out, "output:       {}", config.out_dir.display());
    let _ = writeln!(
        out,
        "mode:         {}",
        if config.debug { "debug" } else { "release" }
    );
    let _ = writeln!(out, "defines:      {}", config.define_flags().join(" "));
    let _ = writeln!(out, "cflags:       {}", config.cflags.join(" "));
    let _ = writeln!(out, "cxxflags:     {}", config.cxxflags.join(" "));
    let _ = writeln!(out, "linkflags:    {}", config.linkflags.join(" "));
    let _ = writeln!(out, "plugins:      {}", config.plugin_pattern);
    if !config.frameworks.is_empty() {
        let _ = writeln!(out, "frameworks:   {}", config.frameworks.len());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_beat_config() {
        let mut config = Config::default();
        config.build.out = Some(PathBuf::from("from-config"));
        config.juce.module_path = Some(PathBuf::from("/config/modules"));
        config.build.platform = Some("mac".to_string());

        let overrides = Overrides {
            out: Some(PathBuf::from("from-flag")),
            platform: Some(Platform::Linux),
            ..Default::default()
        };
        let opts = resolve_options(&config, &overrides).unwrap();
        assert_eq!(opts.out, Some(PathBuf::from("from-flag")));
        assert_eq!(opts.module_path, Some(PathBuf::from("/config/modules")));
        assert_eq!(opts.platform, Some(Platform::Linux));
        assert!(!opts.debug);
    }

    #[test]
    fn test_config_file_module_root_is_chosen() {
        let tmp = tempfile::TempDir::new().unwrap();
        let home = tmp.path().join("home");
        std::fs::create_dir_all(&home).unwrap();
        let overrides = Overrides {
            platform: Some(Platform::Linux),
            ..Default::default()
        };

        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf())
            .unwrap()
            .with_home(home.clone());
        let config = configure(&ctx, &overrides).unwrap();
        assert_eq!(chosen_module_root(&ctx, &overrides, &config).unwrap(), None);

        std::fs::write(
            home.join("config.toml"),
            "[juce]\nmodule_path = \"/cfg/modules\"\n",
        )
        .unwrap();
        let config = configure(&ctx, &overrides).unwrap();
        assert_eq!(
            chosen_module_root(&ctx, &overrides, &config).unwrap(),
            Some(PathBuf::from("/cfg/modules"))
        );
    }

    #[test]
    fn test_format_report() {
        let config = BuildConfig::configure(&ConfigureOptions {
            debug: true,
            module_path: Some(PathBuf::from("/opt/juce/modules")),
            platform: Some(Platform::Linux),
            ..Default::default()
        })
        .unwrap();
        let report = ConfigureReport {
            config,
            juce_version: None,
        };
        let text = format_report(&report);
        assert!(text.contains("platform:     linux"));
        assert!(text.contains("juce version: not found"));
        assert!(text.contains("mode:         debug"));
        assert!(text.contains("-DLINUX=1"));
    }
}

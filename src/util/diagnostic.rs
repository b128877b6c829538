//! User-facing error reporting.
//!
//! Domain errors carry `miette` diagnostic codes and help text. By the time
//! they reach the binary they are wrapped in `anyhow` context, so the help
//! is recovered by walking the error chain.

use miette::Diagnostic as MietteDiagnostic;

use crate::builder::context::ConfigureError;
use crate::core::module_info::DescriptorError;
use crate::core::platform::PlatformError;
use crate::core::project::ProjectError;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when the module root does not exist.
    pub const NO_MODULE_ROOT: &str =
        "help: Pass --module-path or set `juce.module_path` in ~/.juce-build/config.toml";

    /// Suggestion when a module has no unity source.
    pub const NO_UNITY_SOURCE: &str = "help: Run `juce-build modules` to see available modules";

    /// Suggestion when a project configuration is not found.
    pub const NO_CONFIGURATION: &str =
        "help: Run `juce-build project <file>` to list the exporter's configurations";
}

/// Code and help text of the first diagnostic in an error chain.
pub fn diagnostic_for(err: &anyhow::Error) -> Option<(String, String)> {
    for cause in err.chain() {
        if let Some(diag) = as_diagnostic(cause) {
            let code = diag.code().map(|c| c.to_string()).unwrap_or_default();
            let help = diag.help().map(|h| h.to_string()).unwrap_or_default();
            if !code.is_empty() || !help.is_empty() {
                return Some((code, help));
            }
        }
    }
    None
}

fn as_diagnostic<'a>(
    cause: &'a (dyn std::error::Error + 'static),
) -> Option<&'a dyn MietteDiagnostic> {
    if let Some(e) = cause.downcast_ref::<DescriptorError>() {
        Some(e)
    } else if let Some(e) = cause.downcast_ref::<ProjectError>() {
        Some(e)
    } else if let Some(e) = cause.downcast_ref::<ConfigureError>() {
        Some(e)
    } else {
        cause
            .downcast_ref::<PlatformError>()
            .map(|e| e as &dyn MietteDiagnostic)
    }
}

/// Format an error for stderr: the message chain, then code and help.
pub fn render(err: &anyhow::Error) -> String {
    let mut output = format!("error: {:#}\n", err);
    if let Some((code, help)) = diagnostic_for(err) {
        if !code.is_empty() {
            output.push_str(&format!("  code: {}\n", code));
        }
        if !help.is_empty() {
            output.push_str(&format!("  help: {}\n", help));
        }
    }
    output
}

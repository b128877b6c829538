//! Filesystem and path utilities.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;
use unicode_normalization::UnicodeNormalization;

/// Reduce a path string to ASCII.
///
/// Characters are decomposed (NFKD) and anything outside ASCII is dropped,
/// so `Café.cpp` becomes `Cafe.cpp`. Characters with no ASCII base are lost.
pub fn ascii_path(path: &str) -> String {
    let out: String = path.nfkd().filter(char::is_ascii).collect();
    if out != path {
        tracing::debug!("normalized non-ASCII path `{}` to `{}`", path, out);
    }
    out
}

/// Lexically clean a path: drop `.` components and fold `..` where possible.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

/// Join a file path read from a project file onto a base directory.
///
/// The path is ASCII-normalized and cleaned.
pub fn resolve_project_path(base: &Path, file: &str) -> PathBuf {
    let file = ascii_path(file.trim());
    clean_path(&base.join(file))
}

/// Find files matching a glob pattern relative to a base directory.
pub fn glob_files(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full_pattern = base.join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let mut results = Vec::new();
    for entry in glob(&pattern_str).with_context(|| format!("invalid glob pattern: {}", pattern))? {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    results.push(path);
                }
            }
            Err(e) => {
                tracing::warn!("glob error: {}", e);
            }
        }
    }

    results.sort();
    results.dedup();
    Ok(results)
}

/// Names of the directories directly inside `dir`, sorted.
pub fn list_dirs(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

//! Locates and loads the `construct-lint.toml` that applies to a run.
//!
//! The first existing file wins: `--config`, then `construct-lint.toml` or
//! `.construct-lint.toml` next to the linted assemblies, then `config.toml` in
//! the user config directory. With none of them, built-in defaults apply.

use anyhow::{Context, Result};
use construct_lint_core::Config;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Overrides the user config directory (default `~/.construct-lint`).
pub const CONFIG_DIR_ENV: &str = "CONSTRUCT_LINT_CONFIG_DIR";

const PROJECT_FILES: [&str; 2] = ["construct-lint.toml", ".construct-lint.toml"];
const USER_FILE: &str = "config.toml";

/// Loads the configuration for assemblies under `project`.
///
/// # Errors
///
/// Returns an error if the chosen file cannot be read or parsed. An explicit
/// path that does not exist is an error, not a fallback to defaults.
pub fn load_config(project: &Path, explicit: Option<&Path>) -> Result<Config> {
    let user_dir = std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".construct-lint")));
    load_from(project, explicit, user_dir.as_deref())
}

fn load_from(project: &Path, explicit: Option<&Path>, user_dir: Option<&Path>) -> Result<Config> {
    let Some(path) = find_config(project, explicit, user_dir) else {
        debug!("No configuration found, using defaults");
        return Ok(Config::default());
    };
    debug!("Using configuration {}", path.display());
    Config::from_file(&path).with_context(|| format!("Failed to load config: {}", path.display()))
}

fn find_config(project: &Path, explicit: Option<&Path>, user_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    PROJECT_FILES
        .iter()
        .map(|name| project.join(name))
        .chain(user_dir.map(|dir| dir.join(USER_FILE)))
        .find(|path| path.is_file())
}

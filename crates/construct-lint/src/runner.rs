//! `cargo test` integration.

use construct_lint_core::{Config, ConfigError, SchemaCatalog, Severity, TypeModel};
use construct_lint_rules::lint_resources;
use std::path::{Path, PathBuf};

/// Config file names to search for, in priority order.
const CONFIG_CANDIDATES: &[&str] = &["construct-lint.toml", ".construct-lint.toml"];

/// Lints an assembly snapshot against a schema catalog as part of `cargo test`.
///
/// Relative paths are resolved against the workspace root. Configuration is
/// read from `construct-lint.toml` there, if present.
///
/// # Panics
///
/// Panics with a formatted report if violations at or above the configured
/// `fail_on` severity are found, or if any input cannot be loaded.
pub fn check(assembly: &str, schema: &str) {
    check_with(assembly, schema, None, None);
}

/// Like [`check`], with an explicit config path and `fail_on` severity.
///
/// # Panics
///
/// See [`check`].
pub fn check_with(assembly: &str, schema: &str, config_path: Option<&str>, fail_on: Option<&str>) {
    let root = find_project_root();
    let config = read_config(&root, config_path);
    let effective_fail_on = resolve_fail_on(fail_on, &config);

    let assembly_path = resolve(&root, assembly);
    let types = TypeModel::from_file(&assembly_path).unwrap_or_else(|e| {
        panic!("construct-lint: failed to load assembly: {e}");
    });
    let schema_path = resolve(&root, schema);
    let schemas = SchemaCatalog::from_file(&schema_path).unwrap_or_else(|e| {
        panic!("construct-lint: failed to load schema: {e}");
    });

    let result = lint_resources(&types, &schemas, &config, None).unwrap_or_else(|e| {
        panic!("construct-lint: {e}");
    });

    if result.has_violations_at(effective_fail_on) {
        let report = result.format_test_report(effective_fail_on);
        panic!("{report}");
    }
}

fn resolve(root: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        root.join(path)
    }
}

/// Loads the config file, or defaults when none exists.
fn read_config(root: &Path, explicit_path: Option<&str>) -> Config {
    let path = match explicit_path {
        Some(path) => Some(resolve(root, path)),
        None => CONFIG_CANDIDATES
            .iter()
            .map(|candidate| root.join(candidate))
            .find(|path| path.exists()),
    };

    match path {
        Some(path) => Config::from_file(&path).unwrap_or_else(|e| {
            panic!(
                "construct-lint: failed to load config from {}: {e}",
                path.display()
            );
        }),
        None => Config::default(),
    }
}

/// Checks whether a `Cargo.toml` file defines a `[workspace]` section
/// by parsing as TOML, avoiding false positives from comments or strings.
fn has_workspace_section(cargo_toml: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(cargo_toml) else {
        return false;
    };
    let Ok(table) = content.parse::<toml::Table>() else {
        return false;
    };
    table.contains_key("workspace")
}

/// Finds the workspace root, starting from `CARGO_MANIFEST_DIR`.
fn find_project_root() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let manifest_path = PathBuf::from(&manifest_dir);

        let mut candidate = manifest_path.as_path();
        loop {
            let cargo_toml = candidate.join("Cargo.toml");
            if cargo_toml.exists() && has_workspace_section(&cargo_toml) {
                return candidate.to_path_buf();
            }
            match candidate.parent() {
                Some(parent) => candidate = parent,
                None => break,
            }
        }

        return manifest_path;
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Resolves the effective `fail_on` severity.
///
/// An explicit argument wins over the config file's `fail_on`.
fn resolve_fail_on(arg: Option<&str>, config: &Config) -> Severity {
    let resolved = match arg {
        Some(name) => Severity::parse(name).ok_or_else(|| ConfigError::UnknownSeverity {
            value: name.to_string(),
        }),
        None => config.fail_on_severity(),
    };
    resolved.unwrap_or_else(|e| panic!("construct-lint: {e}"))
}

//! Check command implementation.

use anyhow::{anyhow, bail, Context, Result};
use construct_lint_core::{Config, LintResult, SchemaCatalog, TypeModel};
use construct_lint_rules::lint_resources;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// File suffix of assembly snapshots picked up from directories.
const ASSEMBLY_SUFFIX: &str = ".assembly.json";

/// Arguments of the check command.
pub struct CheckOptions<'a> {
    /// Assembly snapshot file or directory.
    pub path: &'a Path,
    /// Schema catalog file.
    pub schema: &'a Path,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule codes to run.
    pub rules: Option<String>,
    /// Extra exclusion patterns.
    pub exclude: Vec<String>,
}

/// Runs the check command.
///
/// Exits with status 1 when any error-severity violation is found.
pub fn run(options: &CheckOptions<'_>, mut config: Config) -> Result<()> {
    config.linter.exclude.extend(options.exclude.iter().cloned());

    let schemas = SchemaCatalog::from_file(options.schema)
        .with_context(|| format!("Failed to load schema: {}", options.schema.display()))?;

    let selected: Option<Vec<&str>> = options
        .rules
        .as_deref()
        .map(|filter| filter.split(',').map(str::trim).filter(|s| !s.is_empty()).collect());

    let assemblies = find_assemblies(options.path)?;
    tracing::info!(
        "Checking {} assembly snapshot(s) against {} schema resource(s)",
        assemblies.len(),
        schemas.len()
    );

    let mut result = LintResult::new();
    for path in &assemblies {
        let types = TypeModel::from_file(path)
            .with_context(|| format!("Failed to load assembly: {}", path.display()))?;
        tracing::debug!("Linting assembly {}", types.name());
        let assembly_result = lint_resources(&types, &schemas, &config, selected.as_deref())
            .map_err(|e| anyhow!("{:?}", miette::Report::new(e)))?;
        result.extend(assembly_result);
    }

    super::output::print(&result, options.format)?;

    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Collects the assembly snapshots to lint, sorted by path.
fn find_assemblies(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        bail!("No such file or directory: {}", path.display());
    }

    let mut found = Vec::new();
    for entry in WalkBuilder::new(path).build() {
        let entry = entry.context("Failed to walk directory")?;
        let is_assembly = entry.file_type().is_some_and(|t| t.is_file())
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(ASSEMBLY_SUFFIX));
        if is_assembly {
            found.push(entry.into_path());
        }
    }
    found.sort();

    if found.is_empty() {
        bail!("No *{ASSEMBLY_SUFFIX} files found under {}", path.display());
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn single_file_is_used_as_is() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("lib.json");
        fs::write(&file, "{}").unwrap();
        assert_eq!(find_assemblies(&file).unwrap(), vec![file]);
    }

    #[test]
    fn directory_is_searched_for_assembly_snapshots() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("b.assembly.json"), "{}").unwrap();
        fs::write(tmp.path().join("nested/a.assembly.json"), "{}").unwrap();
        fs::write(tmp.path().join("schema.json"), "{}").unwrap();

        let found = find_assemblies(tmp.path()).unwrap();
        assert_eq!(
            found,
            vec![
                tmp.path().join("b.assembly.json"),
                tmp.path().join("nested/a.assembly.json"),
            ]
        );
    }

    #[test]
    fn empty_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = find_assemblies(tmp.path()).unwrap_err();
        assert!(err.to_string().starts_with("No *.assembly.json files found"));
    }

    #[test]
    fn missing_path_is_an_error() {
        let err = find_assemblies(Path::new("/definitely/not/here")).unwrap_err();
        assert!(err.to_string().starts_with("No such file or directory"));
    }
}

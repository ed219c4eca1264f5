//! End-to-end pipeline: discover resources, then lint them.

use crate::discovery::ConventionDiscovery;
use crate::resource::{resource_rules, ResourceError, ResourceReflection};
use construct_lint_core::{
    Config, LintResult, Linter, LinterError, RuleRegistry, SchemaLookup, TypeSystem,
};
use miette::Diagnostic;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that abort a lint run.
#[derive(Debug, Error, Diagnostic)]
pub enum LintError {
    /// A resource could not be resolved to its schema.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Resource(#[from] ResourceError),

    /// The linter could not be built or a rule body failed.
    #[error(transparent)]
    Linter(#[from] LinterError),
}

/// Lints every resource of the assembly in `types`.
///
/// Constructs are discovered by convention from `config.core.construct`. When
/// `select` is given, only the listed rules run; unknown codes are logged and
/// ignored.
///
/// # Errors
///
/// Returns an error if a resource has no schema resource, if the configuration
/// is invalid, or if a rule body fails.
pub fn lint_resources(
    types: &dyn TypeSystem,
    schemas: &dyn SchemaLookup,
    config: &Config,
    select: Option<&[&str]>,
) -> Result<LintResult, LintError> {
    let discovery = ConventionDiscovery::new(config.core.construct.as_str());
    let resources = ResourceReflection::find_all(types, schemas, &discovery, &config.core)?;
    info!("Found {} resource(s)", resources.len());

    let mut registry = RuleRegistry::new();
    for rule in resource_rules(&config.core) {
        registry.add(rule)?;
    }
    if let Some(codes) = select {
        for code in registry.select(codes) {
            warn!("Unknown rule code: {code}");
        }
    }

    let linter = Linter::builder()
        .config(config.clone())
        .registry(registry)
        .build()?;
    Ok(linter.eval(&resources)?)
}

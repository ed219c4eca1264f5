//! Linter engine: runs every registered rule against every subject.

use crate::config::{Config, ConfigError, Exclusion};
use crate::rule::{Rule, RuleError, RuleRegistry};
use crate::types::{LintResult, Violation};

use thiserror::Error;
use tracing::{debug, info};

/// Something rules can be evaluated against.
pub trait LintSubject {
    /// FQN identifying the subject in violations.
    fn fqn(&self) -> &str;
}

/// Errors that can occur while building or running a linter.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Two rules share a code.
    #[error("Rule `{code}` is already registered")]
    DuplicateRule {
        /// The duplicated code.
        code: String,
    },

    /// A rule body failed for a reason other than a failed assertion.
    #[error("Rule `{code}` failed on {resource}: {source}")]
    Rule {
        /// Code of the failing rule.
        code: String,
        /// Subject being evaluated.
        resource: String,
        /// The rule's error.
        source: RuleError,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Builder for configuring a [`Linter`].
pub struct LinterBuilder<T> {
    rules: Vec<Rule<T>>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
}

impl<T> Default for LinterBuilder<T> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            exclude_patterns: Vec::new(),
            config: None,
        }
    }
}

impl<T> LinterBuilder<T> {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule(mut self, rule: Rule<T>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds every rule from a registry, in order.
    #[must_use]
    pub fn registry(mut self, registry: RuleRegistry<T>) -> Self {
        self.rules.extend(registry.into_rules());
        self
    }

    /// Adds an exclusion pattern (`<code-glob>:<scope-glob>`).
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the linter.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate rule codes or invalid exclusion patterns.
    pub fn build(self) -> Result<Linter<T>, LinterError> {
        let config = self.config.unwrap_or_default();

        let mut registry = RuleRegistry::new();
        for rule in self.rules {
            registry.add(rule)?;
        }

        let mut exclusions = config.exclusions()?;
        for pattern in &self.exclude_patterns {
            exclusions.push(Exclusion::parse(pattern)?);
        }

        Ok(Linter {
            registry,
            config,
            exclusions,
        })
    }
}

/// The engine that evaluates rules against subjects.
///
/// Use [`Linter::builder()`] to construct an instance. The rule set is fixed
/// once built.
pub struct Linter<T> {
    registry: RuleRegistry<T>,
    config: Config,
    exclusions: Vec<Exclusion>,
}

impl<T> Linter<T> {
    /// Creates a new builder for configuring a linter.
    #[must_use]
    pub fn builder() -> LinterBuilder<T> {
        LinterBuilder::new()
    }

    /// Returns the registered rules.
    #[must_use]
    pub fn rules(&self) -> &RuleRegistry<T> {
        &self.registry
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<T: LintSubject> Linter<T> {
    /// Evaluates every enabled rule against every subject.
    ///
    /// Subjects are visited in order, and rules in registration order for
    /// each subject, so the same input always yields the same violations.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule body fails. Failed assertions are not errors.
    pub fn eval(&self, subjects: &[T]) -> Result<LintResult, LinterError> {
        let rules: Vec<&Rule<T>> = self
            .registry
            .iter()
            .filter(|rule| {
                let enabled = self.config.is_rule_enabled(rule.code());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.code());
                }
                enabled
            })
            .collect();

        info!(
            "Evaluating {} rule(s) against {} resource(s)",
            rules.len(),
            subjects.len()
        );

        let mut result = LintResult::new();
        for subject in subjects {
            debug!("Linting: {}", subject.fqn());
            for rule in &rules {
                let violations = rule.evaluate(subject).map_err(|source| LinterError::Rule {
                    code: rule.code().to_string(),
                    resource: subject.fqn().to_string(),
                    source,
                })?;
                result
                    .violations
                    .extend(self.apply_overrides(rule.code(), violations));
            }
            result.resources_checked += 1;
        }

        info!(
            "Lint complete: {} violation(s) in {} resource(s)",
            result.violations.len(),
            result.resources_checked
        );

        Ok(result)
    }

    /// Drops excluded violations and applies severity overrides.
    fn apply_overrides(&self, code: &str, violations: Vec<Violation>) -> Vec<Violation> {
        let severity = self.config.rule_severity(code);
        violations
            .into_iter()
            .filter(|v| {
                let excluded = self.exclusions.iter().any(|e| e.matches(&v.code, &v.scope));
                if excluded {
                    debug!("Excluded [{}] {}", v.code, v.scope);
                }
                !excluded
            })
            .map(|mut v| {
                if let Some(severity) = severity {
                    v.severity = severity;
                }
                v
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::Evaluation;
    use crate::types::Severity;

    struct Item {
        fqn: &'static str,
        flags: [bool; 2],
    }

    impl LintSubject for Item {
        fn fqn(&self) -> &str {
            self.fqn
        }
    }

    fn two_asserts(e: &mut Evaluation<'_, Item>) -> Result<(), RuleError> {
        let fqn = e.ctx.fqn;
        e.assert(e.ctx.flags[0], format!("{fqn}.first"));
        e.assert(e.ctx.flags[1], format!("{fqn}.second"));
        Ok(())
    }

    fn always_fails(e: &mut Evaluation<'_, Item>) -> Result<(), RuleError> {
        e.assert(false, e.ctx.fqn);
        Ok(())
    }

    fn broken(_e: &mut Evaluation<'_, Item>) -> Result<(), RuleError> {
        Err(RuleError::new("boom"))
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                fqn: "a.One",
                flags: [false, false],
            },
            Item {
                fqn: "a.Two",
                flags: [true, false],
            },
        ]
    }

    #[test]
    fn failed_assertions_do_not_short_circuit() {
        let linter = Linter::builder()
            .rule(Rule::new("two", "both flags", two_asserts))
            .rule(Rule::new("fails", "always", always_fails).warning())
            .build()
            .expect("Failed to build linter");

        let result = linter.eval(&items()).unwrap();
        let seen: Vec<(&str, &str)> = result
            .violations
            .iter()
            .map(|v| (v.code.as_str(), v.scope.as_str()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("two", "a.One.first"),
                ("two", "a.One.second"),
                ("fails", "a.One"),
                ("two", "a.Two.second"),
                ("fails", "a.Two"),
            ]
        );
        assert_eq!(result.resources_checked, 2);
        assert_eq!(result.count_by_severity(), (3, 2));
    }

    #[test]
    fn config_disables_and_overrides_severity() {
        let config = Config::parse(
            r#"
[rules.fails]
enabled = false

[rules.two]
severity = "warning"
"#,
        )
        .unwrap();
        let linter = Linter::builder()
            .config(config)
            .rule(Rule::new("two", "both flags", two_asserts))
            .rule(Rule::new("fails", "always", always_fails))
            .build()
            .unwrap();

        let result = linter.eval(&items()).unwrap();
        assert_eq!(result.violations.len(), 3);
        assert!(result
            .violations
            .iter()
            .all(|v| v.code == "two" && v.severity == Severity::Warning));
    }

    #[test]
    fn exclusions_drop_matching_violations() {
        let linter = Linter::builder()
            .rule(Rule::new("two", "both flags", two_asserts))
            .exclude("two:a.One.*")
            .build()
            .unwrap();

        let result = linter.eval(&items()).unwrap();
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].scope, "a.Two.second");
    }

    #[test]
    fn rule_errors_abort_the_run() {
        let linter = Linter::builder()
            .rule(Rule::new("broken", "never", broken))
            .build()
            .unwrap();

        let err = linter.eval(&items()).unwrap_err();
        assert_eq!(err.to_string(), "Rule `broken` failed on a.One: boom");
    }

    #[test]
    fn duplicate_codes_fail_to_build() {
        let result = Linter::builder()
            .rule(Rule::new("two", "", two_asserts))
            .rule(Rule::new("two", "", always_fails))
            .build();
        assert!(matches!(result, Err(LinterError::DuplicateRule { .. })));
    }
}

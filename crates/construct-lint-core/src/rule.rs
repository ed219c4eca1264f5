//! Rules and the registry that holds them.

use crate::evaluation::Evaluation;
use crate::linter::{LintSubject, LinterError};
use crate::types::{Severity, Violation};
use std::fmt;

/// Body of a rule.
///
/// Failed assertions are recorded on the [`Evaluation`]; an `Err` means the rule
/// itself is broken and aborts the run.
pub type EvalFn<T> = fn(&mut Evaluation<'_, T>) -> Result<(), RuleError>;

/// A rule body failed for a reason other than a failed assertion.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct RuleError {
    message: String,
}

impl RuleError {
    /// Creates a new rule error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A named assertion set evaluated against every subject of type `T`.
///
/// # Example
///
/// ```ignore
/// use construct_lint_core::Rule;
///
/// let rule = Rule::new("resource-interface", "every resource must have a resource interface", |e| {
///     e.assert(e.ctx.construct.interface.is_some(), e.ctx.fqn);
///     Ok(())
/// })
/// .warning();
/// ```
pub struct Rule<T> {
    code: String,
    message: String,
    severity: Severity,
    eval: EvalFn<T>,
}

impl<T> Rule<T> {
    /// Creates a rule whose violations are errors.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>, eval: EvalFn<T>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: Severity::Error,
            eval,
        }
    }

    /// Demotes every violation of this rule to a warning.
    #[must_use]
    pub fn warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    /// Returns the unique rule code (e.g., "resource-attribute").
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the message attached to every violation.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the severity of this rule's violations.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }
}

impl<T: LintSubject> Rule<T> {
    /// Evaluates the rule against one subject and returns its violations.
    ///
    /// # Errors
    ///
    /// Returns the rule body's error, if any.
    pub fn evaluate(&self, subject: &T) -> Result<Vec<Violation>, RuleError> {
        let mut evaluation = Evaluation::new(self, subject);
        (self.eval)(&mut evaluation)?;
        Ok(evaluation.into_violations())
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("code", &self.code)
            .field("message", &self.message)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

/// Ordered set of rules with unique codes.
pub struct RuleRegistry<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Default for RuleRegistry<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> RuleRegistry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule with the same code is already registered.
    pub fn add(&mut self, rule: Rule<T>) -> Result<(), LinterError> {
        if self.get(rule.code()).is_some() {
            return Err(LinterError::DuplicateRule {
                code: rule.code.clone(),
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Finds a rule by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Rule<T>> {
        self.rules.iter().find(|r| r.code == code)
    }

    /// Keeps only the rules whose codes are listed, returning listed codes that
    /// matched no rule.
    pub fn select(&mut self, codes: &[&str]) -> Vec<String> {
        let unknown = codes
            .iter()
            .filter(|code| self.get(code).is_none())
            .map(|code| (*code).to_string())
            .collect();
        self.rules.retain(|r| codes.contains(&r.code.as_str()));
        unknown
    }

    /// Iterates rules in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule<T>> {
        self.rules.iter()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn into_rules(self) -> Vec<Rule<T>> {
        self.rules
    }
}

impl<T> fmt::Debug for RuleRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.iter()).finish()
    }
}

impl<'r, T> IntoIterator for &'r RuleRegistry<T> {
    type Item = &'r Rule<T>;
    type IntoIter = std::slice::Iter<'r, Rule<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

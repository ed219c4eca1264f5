//! Core types for lint violations and results.

use serde::{Deserialize, Serialize};

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory finding, does not block.
    Warning,
    /// Blocking finding that must be fixed.
    Error,
}

impl Severity {
    /// Parses a severity name (`"error"` or `"warning"`).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A failed assertion recorded while evaluating a rule against a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "resource-attribute").
    pub code: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// FQN of the subject (resource) the rule was evaluated against.
    pub resource: String,
    /// What the assertion was about, e.g. `@pkg/foo-bar.Widget.name`.
    pub scope: String,
    /// The rule's message.
    pub message: String,
    /// Extra detail supplied by the assertion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        severity: Severity,
        resource: impl Into<String>,
        scope: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            resource: resource.into(),
            scope: scope.into(),
            message: message.into(),
            extra: None,
        }
    }

    /// Attaches extra detail to this violation.
    #[must_use]
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("[{}] {}\n", self.code, self.scope);
        let _ = write!(output, "  {}: {}", self.severity, self.message);
        if let Some(extra) = &self.extra {
            let _ = write!(output, " {extra}");
        }
        output.push('\n');
        if self.scope != self.resource {
            let _ = writeln!(output, "  = resource: {}", self.resource);
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.severity, self.scope, self.code, self.message
        )?;
        if let Some(extra) = &self.extra {
            write!(f, " {extra}")?;
        }
        Ok(())
    }
}

/// Result of running the linter.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found, in evaluation order.
    pub violations: Vec<Violation>,
    /// Number of subjects (resources) evaluated.
    pub resources_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Returns violations filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Returns violations produced by the given rule code.
    #[must_use]
    pub fn by_code(&self, code: &str) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.code == code).collect()
    }

    /// Counts violations by severity as `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        let errors = self
            .violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count();
        (errors, self.violations.len() - errors)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Formats violations as a test failure report.
    ///
    /// Produces a human-readable multi-line report suitable for `panic!()` messages
    /// in `cargo test` integration.
    #[must_use]
    pub fn format_test_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<&Violation> = self
            .violations
            .iter()
            .filter(|v| v.severity >= fail_on)
            .collect();

        let mut report = String::new();
        let _ = writeln!(
            report,
            "\n=== construct-lint: {} violation(s) ===\n",
            failing.len()
        );

        for v in &failing {
            let _ = writeln!(report, "{}", v.format());
        }

        let (errors, warnings) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Total: {} error(s), {} warning(s) in {} resource(s)",
            errors, warnings, self.resources_checked
        );

        report
    }

    /// Adds violations from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.resources_checked += other.resources_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "resource-attribute-immutable",
            severity,
            "@pkg/foo-bar.Widget",
            "@pkg/foo-bar.Widget.name",
            "resource attributes must be immutable (readonly)",
        )
    }

    #[test]
    fn severity_ordering_puts_error_above_warning() {
        assert!(Severity::Error > Severity::Warning);
        assert_eq!(Severity::parse("warning"), Some(Severity::Warning));
        assert_eq!(Severity::parse("info"), None);
    }

    #[test]
    fn violation_display_includes_extra() {
        let v = make_violation(Severity::Error).with_extra("(expected=\"a\",actual=\"b\")");
        let display = format!("{v}");
        assert!(display.starts_with("error: @pkg/foo-bar.Widget.name [resource-attribute-immutable]"));
        assert!(display.ends_with("(expected=\"a\",actual=\"b\")"));
    }

    #[test]
    fn violation_format_mentions_resource_when_scope_differs() {
        let formatted = make_violation(Severity::Error).format();
        assert!(formatted.contains("= resource: @pkg/foo-bar.Widget"));

        let mut v = make_violation(Severity::Error);
        v.scope = v.resource.clone();
        assert!(!v.format().contains("= resource:"));
    }

    #[test]
    fn has_violations_at_error_only() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        assert!(!result.has_violations_at(Severity::Error));
        assert!(result.has_violations_at(Severity::Warning));
        assert!(!result.has_errors());
    }

    #[test]
    fn format_test_report_filters_by_severity() {
        let mut result = LintResult::new();
        result.resources_checked = 5;
        result.violations.push(make_violation(Severity::Warning));
        result.violations.push(make_violation(Severity::Error));

        let report = result.format_test_report(Severity::Error);
        assert!(report.contains("1 violation(s)"));
        assert!(report.contains("1 error(s), 1 warning(s) in 5 resource(s)"));
    }

    #[test]
    fn extend_accumulates_counts() {
        let mut a = LintResult::new();
        a.resources_checked = 2;
        a.violations.push(make_violation(Severity::Error));
        let mut b = LintResult::new();
        b.resources_checked = 3;
        b.violations.push(make_violation(Severity::Warning));

        a.extend(b);
        assert_eq!(a.resources_checked, 5);
        assert_eq!(a.count_by_severity(), (1, 1));
        assert_eq!(a.by_code("resource-attribute-immutable").len(), 2);
    }
}

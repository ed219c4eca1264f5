//! Assertion primitives available inside rule bodies.

use crate::linter::LintSubject;
use crate::model::{MethodRef, TypeRef};
use crate::rule::Rule;
use crate::types::Violation;

/// Expected shape of a method signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureExpectation {
    /// Expected return type, if checked.
    pub returns: Option<TypeRef>,
    /// Expected parameters, if checked. The count must match exactly.
    pub parameters: Option<Vec<ParameterExpectation>>,
}

impl SignatureExpectation {
    /// Expects the given return type.
    #[must_use]
    pub fn returning(type_ref: TypeRef) -> Self {
        Self {
            returns: Some(type_ref),
            parameters: None,
        }
    }

    /// Expects exactly these parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<ParameterExpectation>) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// Expected shape of a single parameter. Unset fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterExpectation {
    /// Expected name.
    pub name: Option<String>,
    /// Expected type.
    pub type_ref: Option<TypeRef>,
    /// Expected optionality.
    pub optional: Option<bool>,
}

impl ParameterExpectation {
    /// A parameter with no constraints.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Constrains the name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Constrains the type.
    #[must_use]
    pub fn of_type(mut self, type_ref: TypeRef) -> Self {
        self.type_ref = Some(type_ref);
        self
    }

    /// Constrains optionality.
    #[must_use]
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }
}

/// One rule being evaluated against one subject.
///
/// Every failed assertion becomes a [`Violation`] carrying the rule's code,
/// severity and message; evaluation continues with the next assertion.
pub struct Evaluation<'a, T> {
    /// The subject under evaluation.
    pub ctx: &'a T,
    rule: &'a Rule<T>,
    violations: Vec<Violation>,
}

impl<'a, T: LintSubject> Evaluation<'a, T> {
    pub(crate) fn new(rule: &'a Rule<T>, ctx: &'a T) -> Self {
        Self {
            ctx,
            rule,
            violations: Vec::new(),
        }
    }

    /// Records a violation for `scope` unless `condition` holds.
    ///
    /// Returns `condition`.
    pub fn assert(&mut self, condition: bool, scope: impl Into<String>) -> bool {
        if !condition {
            self.record(scope.into(), None);
        }
        condition
    }

    /// Like [`Evaluation::assert`], attaching `extra` detail to the violation.
    pub fn assert_with(
        &mut self,
        condition: bool,
        scope: impl Into<String>,
        extra: impl Into<String>,
    ) -> bool {
        if !condition {
            self.record(scope.into(), Some(extra.into()));
        }
        condition
    }

    /// Compares a method's declared signature against `expected`.
    ///
    /// The return type is checked when expected. When parameters are expected
    /// their count must match; then each parameter's name, type and optionality
    /// are checked where constrained. Every mismatch is recorded.
    ///
    /// Returns `true` if the signature matched.
    pub fn assert_signature(&mut self, method: MethodRef<'_>, expected: &SignatureExpectation) -> bool {
        let scope = method.fqn();
        let mut ok = true;

        if let Some(returns) = &expected.returns {
            ok &= self.assert_types_equal(method.method.returns.as_ref(), returns, &scope);
        }

        if let Some(params) = &expected.parameters {
            let actual = &method.method.parameters;
            let count_ok = self.assert_with(
                params.len() == actual.len(),
                scope.clone(),
                format!(
                    "(expected {} parameter(s), got {})",
                    params.len(),
                    actual.len()
                ),
            );
            if !count_ok {
                return false;
            }

            for (i, (expect, param)) in params.iter().zip(actual).enumerate() {
                let pscope = format!("{scope}.params[{i}]");
                if let Some(name) = &expect.name {
                    ok &= self.assert_with(
                        param.name == *name,
                        pscope.clone(),
                        format!("(expected name \"{name}\", got \"{}\")", param.name),
                    );
                }
                if let Some(type_ref) = &expect.type_ref {
                    ok &= self.assert_types_equal(Some(&param.type_ref), type_ref, &pscope);
                }
                if let Some(optional) = expect.optional {
                    ok &= self.assert_with(
                        param.optional == optional,
                        pscope.clone(),
                        format!("(expected optional={optional}, got {})", param.optional),
                    );
                }
            }
        }

        ok
    }

    /// Violations recorded so far.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub(crate) fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    fn assert_types_equal(&mut self, actual: Option<&TypeRef>, expected: &TypeRef, scope: &str) -> bool {
        let actual_name = actual.map_or_else(|| "void".to_string(), ToString::to_string);
        self.assert_with(
            actual == Some(expected),
            scope,
            format!("(expected=\"{expected}\",actual=\"{actual_name}\")"),
        )
    }

    fn record(&mut self, scope: String, extra: Option<String>) {
        let mut violation = Violation::new(
            self.rule.code(),
            self.rule.severity(),
            self.ctx.fqn(),
            scope,
            self.rule.message(),
        );
        violation.extra = extra;
        self.violations.push(violation);
    }
}

//! Configuration types for construct-lint.

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for construct-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Severity threshold for test failure (default: "error").
    #[serde(default)]
    pub fail_on: Option<String>,

    /// FQNs of the framework types the rules check against.
    #[serde(default)]
    pub core: CoreTypes,

    /// Linter-level configuration.
    #[serde(default)]
    pub linter: LinterConfig,

    /// Per-rule configurations, keyed by rule code.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, code: &str) -> bool {
        self.rules
            .get(code)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, code: &str) -> Option<Severity> {
        self.rules.get(code).and_then(|c| c.severity)
    }

    /// Resolves `fail_on`, defaulting to [`Severity::Error`].
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown severity name.
    pub fn fail_on_severity(&self) -> Result<Severity, ConfigError> {
        match self.fail_on.as_deref() {
            None => Ok(Severity::Error),
            Some(name) => Severity::parse(name).ok_or_else(|| ConfigError::UnknownSeverity {
                value: name.to_string(),
            }),
        }
    }

    /// Compiles the configured exclusion patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern has invalid glob syntax.
    pub fn exclusions(&self) -> Result<Vec<Exclusion>, ConfigError> {
        self.linter
            .exclude
            .iter()
            .map(|p| Exclusion::parse(p))
            .collect()
    }
}

/// FQNs of the framework types the resource rules refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreTypes {
    /// Base class of every construct.
    #[serde(default = "default_construct")]
    pub construct: String,
    /// Base class of every resource wrapper.
    #[serde(default = "default_resource")]
    pub resource: String,
    /// Interface every resource interface must extend.
    #[serde(default = "default_resource_interface")]
    pub resource_interface: String,
    /// Type every `grant*` method must return.
    #[serde(default = "default_grant")]
    pub grant: String,
}

impl Default for CoreTypes {
    fn default() -> Self {
        Self {
            construct: default_construct(),
            resource: default_resource(),
            resource_interface: default_resource_interface(),
            grant: default_grant(),
        }
    }
}

fn default_construct() -> String {
    "constructs.Construct".to_string()
}

fn default_resource() -> String {
    "@cdk/core.Resource".to_string()
}

fn default_resource_interface() -> String {
    "@cdk/core.IResource".to_string()
}

fn default_grant() -> String {
    "@cdk/aws-iam.Grant".to_string()
}

/// Linter-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinterConfig {
    /// Suppressed violations, as `<code-glob>:<scope-glob>`.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// A compiled `<code-glob>:<scope-glob>` suppression.
///
/// A pattern without `:` matches every scope of the matching rules.
#[derive(Debug, Clone)]
pub struct Exclusion {
    code: glob::Pattern,
    scope: glob::Pattern,
}

impl Exclusion {
    /// Parses an exclusion pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if either half is not a valid glob.
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let (code, scope) = pattern.split_once(':').unwrap_or((pattern, "*"));
        let compile = |p: &str| {
            glob::Pattern::new(p).map_err(|e| ConfigError::InvalidExclusion {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
        };
        Ok(Self {
            code: compile(code)?,
            scope: compile(scope)?,
        })
    }

    /// Whether a violation of rule `code` at `scope` is suppressed.
    #[must_use]
    pub fn matches(&self, code: &str, scope: &str) -> bool {
        self.code.matches(code) && self.scope.matches(scope)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Exclusion pattern with invalid glob syntax.
    #[error("Invalid exclusion pattern `{pattern}`: {reason}")]
    InvalidExclusion {
        /// The offending pattern.
        pattern: String,
        /// Why it is invalid.
        reason: String,
    },

    /// Unknown severity name.
    #[error("Unknown severity `{value}`, expected: error, warning")]
    UnknownSeverity {
        /// The invalid value.
        value: String,
    },
}

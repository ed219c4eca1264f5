//! # construct-lint-rules
//!
//! Resource correspondence and the built-in resource rules for construct-lint.
//!
//! A *resource* is a construct class that wraps a schema resource. Each one is
//! resolved to its schema resource (explicit `@resource` tag, then FQN shape,
//! then ancestors), its attributes are matched to properties, and the rules
//! below run against the result.
//!
//! ## Available Rules
//!
//! | Code | Severity | Description |
//! |------|----------|-------------|
//! | `resource-class-extends-resource` | error | Resource classes extend the base resource class |
//! | `resource-interface` | warning | Resources declare a public `I<Name>` interface |
//! | `resource-interface-extends-resource` | error | That interface extends the base resource interface |
//! | `resource-attribute` | error | Every schema attribute is exposed by a property |
//! | `resource-attribute-immutable` | error | Attribute properties are read-only |
//! | `grant-result` | error | `grant*` methods return the grant type |
//!
//! ## Usage
//!
//! ```ignore
//! use construct_lint_core::{Config, SchemaCatalog, TypeModel};
//! use construct_lint_rules::lint_resources;
//!
//! let types = TypeModel::from_file("widgets.assembly.json".as_ref())?;
//! let schemas = SchemaCatalog::from_file("schema.json".as_ref())?;
//! let result = lint_resources(&types, &schemas, &Config::default(), None)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod discovery;
pub mod resource;
mod run;

pub use discovery::ConventionDiscovery;
pub use resource::{is_resource_class, resource_rules, ResourceError, ResourceReflection};
pub use run::{lint_resources, LintError};

/// Re-export core types for convenience.
pub use construct_lint_core::{Rule, Severity, Violation};

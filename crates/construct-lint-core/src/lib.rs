//! # construct-lint-core
//!
//! Core framework for checking construct libraries against their schema
//! resources, driven by a reflected type model.
//!
//! This crate provides the foundational traits and types for building
//! convention linters. It includes:
//!
//! - [`TypeSystem`] and [`Reflect`] for querying reflected classes and interfaces
//! - [`SchemaLookup`] for resolving schema resources by type name
//! - [`ConstructDiscovery`] for finding candidate construct classes
//! - [`Rule`], [`RuleRegistry`] and [`Linter`] for evaluating assertions
//! - [`Violation`] for representing lint findings
//!
//! ## Example
//!
//! ```ignore
//! use construct_lint_core::{Linter, Rule};
//!
//! let linter = Linter::builder()
//!     .rule(Rule::new("resource-interface", "every resource must have a resource interface", eval))
//!     .build()?;
//!
//! let result = linter.eval(&resources)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod discovery;
mod evaluation;
mod linter;
mod model;
mod rule;
mod schema;
mod snapshot;
mod types;

pub use config::{Config, ConfigError, CoreTypes, Exclusion, LinterConfig, RuleConfig};
pub use discovery::{ConstructDiscovery, ConstructReflection};
pub use evaluation::{Evaluation, ParameterExpectation, SignatureExpectation};
pub use linter::{LintSubject, Linter, LinterBuilder, LinterError};
pub use model::{
    ClassType, Docs, InterfaceType, Method, MethodRef, Parameter, Property, PropertyRef, Reflect,
    TypeRef, TypeSystem,
};
pub use rule::{EvalFn, Rule, RuleError, RuleRegistry};
pub use schema::{SchemaCatalog, SchemaLookup, SchemaResource};
pub use snapshot::{AssemblySnapshot, SnapshotError, TypeModel};
pub use types::{LintResult, Severity, Violation};

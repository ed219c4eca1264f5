//! # construct-lint
//!
//! Convention linter for construct libraries: checks that resource wrapper
//! classes line up with the schema resources they wrap.
//!
//! This is the main facade crate that re-exports core functionality and rules.
//!
//! ## Quick Start — `cargo test` Integration
//!
//! ```toml
//! [dev-dependencies]
//! construct-lint = "0.4"
//! ```
//!
//! ```rust,ignore
//! // tests/conventions.rs
//! #[test]
//! fn resources_follow_conventions() {
//!     construct_lint::check("dist/widgets.assembly.json", "schema/resources.json");
//! }
//! ```
//!
//! Paths are relative to the workspace root. Configure via `construct-lint.toml`.
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use construct_lint::{Config, SchemaCatalog, TypeModel};
//! use construct_lint::rules::lint_resources;
//!
//! let types = TypeModel::from_file("widgets.assembly.json".as_ref())?;
//! let schemas = SchemaCatalog::from_file("resources.json".as_ref())?;
//! let result = lint_resources(&types, &schemas, &Config::default(), None)?;
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use construct_lint_core::*;

/// Built-in rules and the resource pipeline.
pub mod rules {
    pub use construct_lint_rules::*;
}

mod runner;

pub use runner::{check, check_with};

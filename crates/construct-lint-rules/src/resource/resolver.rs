//! Maps a wrapper class to the schema resource it corresponds to.
//!
//! Resolution tries, in order, and stops at the first step that applies:
//!
//! 1. an explicit `@resource ORG::NS::Name` doc tag on the class. A tagged
//!    class resolves to exactly that resource or to nothing; later steps are
//!    not attempted.
//! 2. the class FQN, when shaped like `<root>/<org>-<ns>.<Name>`, inferred as
//!    `ORG::NS::Name`.
//! 3. each ancestor class, nearest first, resolved with this same procedure.

use construct_lint_core::{ClassType, Reflect, SchemaLookup, SchemaResource, TypeSystem};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;

/// Doc tag naming the schema resource a class corresponds to.
pub const RESOURCE_TAG: &str = "resource";

#[allow(clippy::expect_used)]
fn fqn_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^@?[A-Za-z0-9_.-]+/([a-z]+)-([a-z0-9]+)\.([A-Za-z0-9]+)$")
            .expect("resource FQN pattern is valid")
    })
}

/// Infers a resource-type name from a class FQN.
///
/// `@pkg/foo-bar.Widget` becomes `FOO::BAR::Widget`. Returns `None` when the
/// FQN does not have the `<root>/<org>-<ns>.<Name>` shape.
#[must_use]
pub fn guess_resource_name(fqn: &str) -> Option<String> {
    let caps = fqn_pattern().captures(fqn)?;
    Some(format!(
        "{}::{}::{}",
        caps[1].to_uppercase(),
        caps[2].to_uppercase(),
        &caps[3]
    ))
}

/// Finds the schema resource for `class`.
#[must_use]
pub fn find_schema_resource<'s>(
    types: &dyn TypeSystem,
    schemas: &'s dyn SchemaLookup,
    class: &ClassType,
) -> Option<&'s SchemaResource> {
    resolve(types, schemas, class, &mut HashSet::new())
}

fn resolve<'t, 's>(
    types: &'t dyn TypeSystem,
    schemas: &'s dyn SchemaLookup,
    class: &'t ClassType,
    visited: &mut HashSet<&'t str>,
) -> Option<&'s SchemaResource> {
    if !visited.insert(class.fqn.as_str()) {
        return None;
    }

    if let Some(name) = class.docs.tag(RESOURCE_TAG) {
        let name = name.trim();
        let found = schemas.find_resource(name);
        debug!(
            "{}: @{RESOURCE_TAG} {name} -> {}",
            class.fqn,
            if found.is_some() { "found" } else { "not found" }
        );
        return found;
    }

    if let Some(guess) = guess_resource_name(&class.fqn) {
        if let Some(found) = schemas.find_resource(&guess) {
            debug!("{}: inferred {guess}", class.fqn);
            return Some(found);
        }
        debug!("{}: inferred {guess} is not a schema resource", class.fqn);
    }

    types
        .ancestors(class)
        .into_iter()
        .find_map(|base| resolve(types, schemas, base, visited))
}

//! Resource reflection: a construct paired with the schema resource it wraps.

mod attributes;
mod resolver;
mod rules;

pub use attributes::{
    attribute_tag, camel_case, expected_property_name, find_attribute_properties, Attribute,
    ATTRIBUTE_TAG,
};
pub use resolver::{find_schema_resource, guess_resource_name, RESOURCE_TAG};
pub use rules::resource_rules;

use construct_lint_core::{
    ClassType, ConstructDiscovery, ConstructReflection, CoreTypes, LintSubject, Reflect,
    SchemaLookup, SchemaResource, TypeSystem,
};
use miette::Diagnostic;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Errors raised while building resource reflections.
#[derive(Debug, Error, Diagnostic)]
pub enum ResourceError {
    /// A resource class could not be matched to any schema resource.
    #[error("Cannot find schema resource for {fqn} (tried {guess})")]
    #[diagnostic(
        code(construct_lint::schema_not_found),
        help("add `@resource ORG::NS::Name` to the class documentation to name its schema resource explicitly")
    )]
    SchemaNotFound {
        /// FQN of the resource class.
        fqn: String,
        /// Resource type the FQN suggested, or `<none>` when it has no inferable shape.
        guess: String,
    },
}

/// A resource construct together with everything the resource rules need.
///
/// Built once per resource and shared by every rule.
pub struct ResourceReflection<'a> {
    /// FQN of the resource class.
    pub fqn: &'a str,
    /// Simple name of the resource class.
    pub basename: &'a str,
    /// The construct class and its public interface.
    pub construct: ConstructReflection<'a>,
    /// The schema resource this class wraps.
    pub schema: &'a SchemaResource,
    /// Attributes in extraction order. May contain duplicates.
    pub attributes: Vec<Attribute<'a>>,
    /// Type system the construct was discovered in.
    pub types: &'a dyn TypeSystem,
    /// Framework type names the rules check against.
    pub core: &'a CoreTypes,
}

impl<'a> ResourceReflection<'a> {
    /// Resolves the schema resource of `construct` and extracts its attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::SchemaNotFound`] when no schema resource can be
    /// resolved.
    pub fn new(
        construct: ConstructReflection<'a>,
        types: &'a dyn TypeSystem,
        schemas: &'a dyn SchemaLookup,
        core: &'a CoreTypes,
    ) -> Result<Self, ResourceError> {
        let class = construct.class;
        let schema = find_schema_resource(types, schemas, class).ok_or_else(|| {
            ResourceError::SchemaNotFound {
                fqn: class.fqn.clone(),
                guess: guess_resource_name(&class.fqn).unwrap_or_else(|| "<none>".to_string()),
            }
        })?;
        debug!("{} -> {}", class.fqn, schema.type_name);

        Ok(Self {
            fqn: construct.fqn(),
            basename: construct.basename(),
            attributes: find_attribute_properties(types, class, schema),
            construct,
            schema,
            types,
            core,
        })
    }

    /// Builds a reflection for every discovered resource construct.
    ///
    /// Constructs that are not resource classes are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first resource whose schema cannot be resolved.
    pub fn find_all(
        types: &'a dyn TypeSystem,
        schemas: &'a dyn SchemaLookup,
        discovery: &dyn ConstructDiscovery,
        core: &'a CoreTypes,
    ) -> Result<Vec<Self>, ResourceError> {
        discovery
            .discover(types)
            .into_iter()
            .filter(|c| is_resource_class(types, c.class, core))
            .map(|c| Self::new(c, types, schemas, core))
            .collect()
    }

    /// The construct class.
    #[must_use]
    pub fn class(&self) -> &'a ClassType {
        self.construct.class
    }
}

impl LintSubject for ResourceReflection<'_> {
    fn fqn(&self) -> &str {
        self.fqn
    }
}

impl fmt::Debug for ResourceReflection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceReflection")
            .field("fqn", &self.fqn)
            .field("schema", &self.schema.type_name)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

/// Whether `class` is linted as a resource: it extends the base resource class
/// or names its schema resource with the `@resource` tag.
#[must_use]
pub fn is_resource_class(types: &dyn TypeSystem, class: &ClassType, core: &CoreTypes) -> bool {
    types.class_extends(class, &core.resource) || class.docs.tag(RESOURCE_TAG).is_some()
}

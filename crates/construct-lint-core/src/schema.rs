//! Schema resources: the generated, low-level definitions wrappers correspond to.

use crate::snapshot::{read, SnapshotError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A schema resource type, e.g. `FOO::BAR::Widget`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaResource {
    /// Resource-type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Attribute names defined by the resource, in schema order.
    #[serde(default, rename = "attributes")]
    pub attribute_names: Vec<String>,
}

impl SchemaResource {
    /// Creates a resource with the given attributes.
    #[must_use]
    pub fn new<I, S>(type_name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_name: type_name.into(),
            attribute_names: attributes.into_iter().map(Into::into).collect(),
        }
    }

    /// Last `::` segment of the type name (`Widget` for `FOO::BAR::Widget`).
    #[must_use]
    pub fn basename(&self) -> &str {
        self.type_name
            .rsplit("::")
            .next()
            .unwrap_or(&self.type_name)
    }
}

/// Lookup of schema resources by exact resource-type name.
pub trait SchemaLookup {
    /// Finds a resource by type name.
    fn find_resource(&self, type_name: &str) -> Option<&SchemaResource>;
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    resources: Vec<SchemaResource>,
}

/// In-memory schema lookup.
///
/// Loaded from JSON of the form
/// `{"resources": [{"type": "FOO::BAR::Widget", "attributes": ["Arn"]}]}`.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    resources: HashMap<String, SchemaResource>,
}

impl SchemaCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource, replacing any previous one with the same type name.
    #[must_use]
    pub fn with_resource(mut self, resource: SchemaResource) -> Self {
        self.resources.insert(resource.type_name.clone(), resource);
        self
    }

    /// Number of resources in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Parses a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn from_json(content: &str) -> Result<Self, SnapshotError> {
        let file: CatalogFile = serde_json::from_str(content).map_err(|e| SnapshotError::Json {
            what: "schema catalog".to_string(),
            source: e,
        })?;
        Ok(file
            .resources
            .into_iter()
            .fold(Self::new(), Self::with_resource))
    }

    /// Loads a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        Self::from_json(&read(path)?)
    }
}

impl SchemaLookup for SchemaCatalog {
    fn find_resource(&self, type_name: &str) -> Option<&SchemaResource> {
        self.resources.get(type_name)
    }
}

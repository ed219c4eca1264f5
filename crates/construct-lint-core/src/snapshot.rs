//! JSON assembly snapshots and the in-memory [`TypeSystem`] built from them.

use crate::model::{ClassType, InterfaceType, TypeSystem};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Errors loading a snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// IO error reading the file.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not valid snapshot JSON.
    #[error("Failed to parse {what}: {source}")]
    Json {
        /// What was being parsed.
        what: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Serialized form of an assembly and the assemblies it depends on.
///
/// ```json
/// {
///   "name": "@pkg/foo-bar",
///   "classes": [{ "fqn": "@pkg/foo-bar.Widget", "base": "@cdk/core.Resource" }],
///   "interfaces": [],
///   "dependencies": [{ "name": "@cdk/core", "classes": [{ "fqn": "@cdk/core.Resource" }] }]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssemblySnapshot {
    /// Assembly name, e.g. `@pkg/foo-bar`.
    pub name: String,
    /// Classes declared by this assembly.
    #[serde(default)]
    pub classes: Vec<ClassType>,
    /// Interfaces declared by this assembly.
    #[serde(default)]
    pub interfaces: Vec<InterfaceType>,
    /// Assemblies whose types are referenced but not linted.
    #[serde(default)]
    pub dependencies: Vec<AssemblySnapshot>,
}

/// In-memory type system.
#[derive(Debug, Clone, Default)]
pub struct TypeModel {
    name: String,
    classes: HashMap<String, ClassType>,
    interfaces: HashMap<String, InterfaceType>,
    local: Vec<String>,
}

impl TypeModel {
    /// Creates an empty model for the named assembly.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds a model from a snapshot. Dependency types are registered first so
    /// that a local declaration wins over a dependency with the same FQN.
    #[must_use]
    pub fn from_snapshot(snapshot: AssemblySnapshot) -> Self {
        let mut model = Self::new(snapshot.name);
        for dep in snapshot.dependencies {
            model.add_dependency(dep);
        }
        for class in snapshot.classes {
            model.add_class(class, true);
        }
        for iface in snapshot.interfaces {
            model.interfaces.insert(iface.fqn.clone(), iface);
        }
        model
    }

    /// Parses a snapshot from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn from_json(content: &str) -> Result<Self, SnapshotError> {
        let snapshot: AssemblySnapshot =
            serde_json::from_str(content).map_err(|e| SnapshotError::Json {
                what: "assembly snapshot".to_string(),
                source: e,
            })?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Loads a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        Self::from_json(&read(path)?)
    }

    /// Name of the assembly under lint.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a class declared by the assembly under lint.
    #[must_use]
    pub fn with_class(mut self, class: ClassType) -> Self {
        self.add_class(class, true);
        self
    }

    /// Adds an interface declared by the assembly under lint.
    #[must_use]
    pub fn with_interface(mut self, iface: InterfaceType) -> Self {
        self.interfaces.insert(iface.fqn.clone(), iface);
        self
    }

    /// Adds a class from a dependency.
    #[must_use]
    pub fn with_dependency_class(mut self, class: ClassType) -> Self {
        self.add_class(class, false);
        self
    }

    /// Adds an interface from a dependency.
    #[must_use]
    pub fn with_dependency_interface(self, iface: InterfaceType) -> Self {
        self.with_interface(iface)
    }

    fn add_dependency(&mut self, dep: AssemblySnapshot) {
        for nested in dep.dependencies {
            self.add_dependency(nested);
        }
        for class in dep.classes {
            self.add_class(class, false);
        }
        for iface in dep.interfaces {
            self.interfaces.insert(iface.fqn.clone(), iface);
        }
    }

    /// The last class registered for an FQN wins, along with its locality.
    fn add_class(&mut self, class: ClassType, local: bool) {
        if local {
            if !self.local.contains(&class.fqn) {
                self.local.push(class.fqn.clone());
            }
        } else {
            self.local.retain(|fqn| *fqn != class.fqn);
        }
        self.classes.insert(class.fqn.clone(), class);
    }
}

impl TypeSystem for TypeModel {
    fn find_class(&self, fqn: &str) -> Option<&ClassType> {
        self.classes.get(fqn)
    }

    fn find_interface(&self, fqn: &str) -> Option<&InterfaceType> {
        self.interfaces.get(fqn)
    }

    fn assembly_classes(&self) -> Vec<&ClassType> {
        self.local
            .iter()
            .filter_map(|fqn| self.classes.get(fqn))
            .collect()
    }
}

pub(crate) fn read(path: &Path) -> Result<String, SnapshotError> {
    std::fs::read_to_string(path).map_err(|e| SnapshotError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"
{
  "name": "@pkg/foo-bar",
  "classes": [
    {
      "fqn": "@pkg/foo-bar.Widget",
      "base": "@cdk/core.Resource",
      "docs": { "custom": { "resource": "FOO::BAR::Widget" } },
      "properties": [
        { "name": "widgetArn", "type": { "primitive": "string" }, "immutable": true }
      ],
      "methods": [
        { "name": "grantRead", "returns": { "named": "@cdk/aws-iam.Grant" },
          "parameters": [{ "name": "grantee", "type": { "named": "@cdk/aws-iam.IGrantable" } }] }
      ]
    },
    { "fqn": "@pkg/foo-bar.Gadget" }
  ],
  "dependencies": [
    { "name": "@cdk/core", "classes": [{ "fqn": "@cdk/core.Resource" }] }
  ]
}
"#;

    #[test]
    fn parses_snapshot_json() {
        let model = TypeModel::from_json(SNAPSHOT).expect("snapshot should parse");
        assert_eq!(model.name(), "@pkg/foo-bar");

        let widget = model.find_class("@pkg/foo-bar.Widget").unwrap();
        assert_eq!(widget.docs.tag("resource"), Some("FOO::BAR::Widget"));
        assert!(widget.properties[0].immutable);
        assert_eq!(widget.methods[0].parameters[0].name, "grantee");
        assert!(model.find_class("@cdk/core.Resource").is_some());
    }

    #[test]
    fn assembly_classes_exclude_dependencies() {
        let model = TypeModel::from_json(SNAPSHOT).unwrap();
        let names: Vec<&str> = model
            .assembly_classes()
            .iter()
            .map(|c| c.fqn.as_str())
            .collect();
        assert_eq!(names, vec!["@pkg/foo-bar.Widget", "@pkg/foo-bar.Gadget"]);
    }

    #[test]
    fn dependency_class_replacing_local_class_is_not_linted() {
        let model = TypeModel::new("@pkg/foo-bar")
            .with_class(ClassType::new("@pkg/foo-bar.Widget"))
            .with_class(ClassType::new("@pkg/foo-bar.Gadget"))
            .with_dependency_class(ClassType::new("@pkg/foo-bar.Widget").extends("@cdk/core.Resource"));

        let names: Vec<&str> = model
            .assembly_classes()
            .iter()
            .map(|c| c.fqn.as_str())
            .collect();
        assert_eq!(names, vec!["@pkg/foo-bar.Gadget"]);
        let widget = model.find_class("@pkg/foo-bar.Widget").unwrap();
        assert_eq!(widget.base.as_deref(), Some("@cdk/core.Resource"));
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = TypeModel::from_json("{ not json").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse assembly snapshot"));
    }
}

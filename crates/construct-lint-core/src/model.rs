//! Reflected type model consumed by rules.
//!
//! The declarations here mirror what a compiled class library exposes through
//! reflection: classes, interfaces, their properties and methods, inheritance
//! edges and string-keyed documentation tags. Loading that metadata is the job
//! of a [`TypeSystem`] implementation; this module only describes its shape and
//! the inheritance-aware queries built on top of it ([`Reflect`]).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Documentation attached to a declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Docs {
    /// First sentence of the documentation comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Custom tags (`@resource FOO::BAR::Widget` becomes `resource -> FOO::BAR::Widget`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, String>,
}

impl Docs {
    /// Looks up a custom documentation tag by key.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.custom.get(key).map(String::as_str)
    }
}

/// Reference to a type as it appears in a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeRef {
    /// A primitive such as `string`, `number`, `boolean` or `any`.
    Primitive(String),
    /// A class, interface or enum, by FQN.
    Named(String),
    /// A homogeneous list.
    Array(Box<TypeRef>),
    /// A string-keyed map.
    Map(Box<TypeRef>),
    /// One of several types.
    Union(Vec<TypeRef>),
}

impl TypeRef {
    /// Creates a reference to a named type.
    #[must_use]
    pub fn named(fqn: impl Into<String>) -> Self {
        Self::Named(fqn.into())
    }

    /// Creates a reference to a primitive type.
    #[must_use]
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Primitive(name.into())
    }

    /// Returns the FQN if this is a named type.
    #[must_use]
    pub fn fqn(&self) -> Option<&str> {
        match self {
            Self::Named(fqn) => Some(fqn),
            _ => None,
        }
    }
}

impl Default for TypeRef {
    fn default() -> Self {
        Self::Primitive("any".to_string())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(name) | Self::Named(name) => write!(f, "{name}"),
            Self::Array(element) => write!(f, "Array<{element}>"),
            Self::Map(element) => write!(f, "Map<string, {element}>"),
            Self::Union(types) => {
                for (i, t) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{t}")?;
                }
                Ok(())
            }
        }
    }
}

/// A property declared on a class or interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Declared type.
    #[serde(default, rename = "type")]
    pub type_ref: TypeRef,
    /// Whether the property is read-only.
    #[serde(default)]
    pub immutable: bool,
    /// Whether the property may be undefined.
    #[serde(default)]
    pub optional: bool,
    /// Whether the property is static.
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// Whether the property is protected.
    #[serde(default)]
    pub protected: bool,
    /// FQN of the class or interface whose property this one overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<String>,
    /// Documentation.
    #[serde(default)]
    pub docs: Docs,
}

impl Property {
    /// Creates a mutable property of type `any`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Marks the property read-only.
    #[must_use]
    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    /// Sets the declared type.
    #[must_use]
    pub fn of_type(mut self, type_ref: TypeRef) -> Self {
        self.type_ref = type_ref;
        self
    }

    /// Records the type whose property this one overrides.
    #[must_use]
    pub fn overrides(mut self, fqn: impl Into<String>) -> Self {
        self.overrides = Some(fqn.into());
        self
    }

    /// Adds a documentation tag.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.docs.custom.insert(key.into(), value.into());
        self
    }
}

/// A method parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    #[serde(default, rename = "type")]
    pub type_ref: TypeRef,
    /// Whether the parameter may be omitted.
    #[serde(default)]
    pub optional: bool,
}

impl Parameter {
    /// Creates a required parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            optional: false,
        }
    }

    /// Marks the parameter optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// A method declared on a class or interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Method name.
    pub name: String,
    /// Return type, `None` for `void`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<TypeRef>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Whether the method is static.
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// Whether the method is protected.
    #[serde(default)]
    pub protected: bool,
    /// Documentation.
    #[serde(default)]
    pub docs: Docs,
}

impl Method {
    /// Creates a `void` method without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the return type.
    #[must_use]
    pub fn returns(mut self, type_ref: TypeRef) -> Self {
        self.returns = Some(type_ref);
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }
}

/// A class declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassType {
    /// Fully-qualified name, e.g. `@pkg/foo-bar.Widget`.
    pub fqn: String,
    /// FQN of the base class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// FQNs of implemented interfaces.
    #[serde(default)]
    pub interfaces: Vec<String>,
    /// Whether the class is abstract.
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    /// Properties declared directly on this class.
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Methods declared directly on this class.
    #[serde(default)]
    pub methods: Vec<Method>,
    /// Documentation.
    #[serde(default)]
    pub docs: Docs,
}

impl ClassType {
    /// Creates an empty class.
    #[must_use]
    pub fn new(fqn: impl Into<String>) -> Self {
        Self {
            fqn: fqn.into(),
            ..Self::default()
        }
    }

    /// Simple name (the segment after the last `.`).
    #[must_use]
    pub fn name(&self) -> &str {
        basename(&self.fqn)
    }

    /// Sets the base class.
    #[must_use]
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Adds an implemented interface.
    #[must_use]
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Adds a documentation tag.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.docs.custom.insert(key.into(), value.into());
        self
    }

    /// Adds a property.
    #[must_use]
    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }
}

/// An interface declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceType {
    /// Fully-qualified name.
    pub fqn: String,
    /// FQNs of extended interfaces.
    #[serde(default)]
    pub interfaces: Vec<String>,
    /// Properties declared directly on this interface.
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Methods declared directly on this interface.
    #[serde(default)]
    pub methods: Vec<Method>,
    /// Documentation.
    #[serde(default)]
    pub docs: Docs,
}

impl InterfaceType {
    /// Creates an empty interface.
    #[must_use]
    pub fn new(fqn: impl Into<String>) -> Self {
        Self {
            fqn: fqn.into(),
            ..Self::default()
        }
    }

    /// Simple name (the segment after the last `.`).
    #[must_use]
    pub fn name(&self) -> &str {
        basename(&self.fqn)
    }

    /// Adds an extended interface.
    #[must_use]
    pub fn extends(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Adds a property.
    #[must_use]
    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }
}

fn basename(fqn: &str) -> &str {
    fqn.rsplit('.').next().unwrap_or(fqn)
}

/// A property together with the FQN of the type that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyRef<'a> {
    /// FQN of the declaring class or interface.
    pub owner: &'a str,
    /// The declaration.
    pub property: &'a Property,
}

impl PropertyRef<'_> {
    /// `<owner>.<name>`.
    #[must_use]
    pub fn fqn(&self) -> String {
        format!("{}.{}", self.owner, self.property.name)
    }
}

/// A method together with the FQN of the type that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodRef<'a> {
    /// FQN of the declaring class or interface.
    pub owner: &'a str,
    /// The declaration.
    pub method: &'a Method,
}

impl MethodRef<'_> {
    /// `<owner>.<name>`.
    #[must_use]
    pub fn fqn(&self) -> String {
        format!("{}.{}", self.owner, self.method.name)
    }
}

/// Source of reflected type metadata.
///
/// Implementations resolve classes and interfaces by FQN. Types from
/// dependencies must be resolvable too, but only the classes declared by the
/// assembly under lint are returned from [`TypeSystem::assembly_classes`].
pub trait TypeSystem {
    /// Finds a class by FQN.
    fn find_class(&self, fqn: &str) -> Option<&ClassType>;

    /// Finds an interface by FQN.
    fn find_interface(&self, fqn: &str) -> Option<&InterfaceType>;

    /// Classes declared by the assembly under lint, in declaration order.
    fn assembly_classes(&self) -> Vec<&ClassType>;
}

/// Inheritance-aware queries over a [`TypeSystem`].
///
/// All walks are guarded against cycles in malformed metadata.
pub trait Reflect: TypeSystem {
    /// Base classes, nearest first. Stops at the first base that cannot be resolved.
    fn ancestors<'a>(&'a self, class: &'a ClassType) -> Vec<&'a ClassType> {
        let mut seen = HashSet::from([class.fqn.as_str()]);
        let mut out = Vec::new();
        let mut current = class;
        while let Some(base) = current.base.as_deref().and_then(|fqn| self.find_class(fqn)) {
            if !seen.insert(base.fqn.as_str()) {
                break;
            }
            out.push(base);
            current = base;
        }
        out
    }

    /// Whether `class` is `base` or transitively derives from it.
    ///
    /// A base that is named but not resolvable still counts as a match.
    fn class_extends(&self, class: &ClassType, base: &str) -> bool {
        let mut seen = HashSet::new();
        let mut current = class;
        loop {
            if current.fqn == base {
                return true;
            }
            if !seen.insert(current.fqn.as_str()) {
                return false;
            }
            let Some(next) = current.base.as_deref() else {
                return false;
            };
            if next == base {
                return true;
            }
            match self.find_class(next) {
                Some(c) => current = c,
                None => return false,
            }
        }
    }

    /// Whether `interface` is `base` or transitively extends it.
    fn interface_extends(&self, interface: &InterfaceType, base: &str) -> bool {
        let mut seen = HashSet::new();
        let mut stack = vec![interface.fqn.as_str()];
        while let Some(fqn) = stack.pop() {
            if fqn == base {
                return true;
            }
            if !seen.insert(fqn) {
                continue;
            }
            if let Some(iface) = self.find_interface(fqn) {
                stack.extend(iface.interfaces.iter().rev().map(String::as_str));
            }
        }
        false
    }

    /// All instance and static properties visible on `class`, base-most first.
    ///
    /// A property redeclared by a subclass replaces the inherited one in place.
    fn all_properties<'a>(&'a self, class: &'a ClassType) -> Vec<PropertyRef<'a>> {
        let mut out: Vec<PropertyRef<'a>> = Vec::new();
        let mut chain = self.ancestors(class);
        chain.reverse();
        chain.push(class);
        for c in chain {
            for p in &c.properties {
                upsert(
                    &mut out,
                    PropertyRef {
                        owner: &c.fqn,
                        property: p,
                    },
                    |r| r.property.name == p.name,
                );
            }
        }
        out
    }

    /// All properties visible on `interface`, extended interfaces first.
    fn all_interface_properties<'a>(
        &'a self,
        interface: &'a InterfaceType,
    ) -> Vec<PropertyRef<'a>> {
        fn collect<'a, S: Reflect + ?Sized>(
            types: &'a S,
            iface: &'a InterfaceType,
            seen: &mut HashSet<&'a str>,
            out: &mut Vec<PropertyRef<'a>>,
        ) {
            if !seen.insert(iface.fqn.as_str()) {
                return;
            }
            for parent in &iface.interfaces {
                if let Some(p) = types.find_interface(parent) {
                    collect(types, p, seen, out);
                }
            }
            for p in &iface.properties {
                upsert(
                    out,
                    PropertyRef {
                        owner: &iface.fqn,
                        property: p,
                    },
                    |r| r.property.name == p.name,
                );
            }
        }

        let mut out = Vec::new();
        collect(self, interface, &mut HashSet::new(), &mut out);
        out
    }

    /// All methods visible on `class`, base-most first.
    fn all_methods<'a>(&'a self, class: &'a ClassType) -> Vec<MethodRef<'a>> {
        let mut out: Vec<MethodRef<'a>> = Vec::new();
        let mut chain = self.ancestors(class);
        chain.reverse();
        chain.push(class);
        for c in chain {
            for m in &c.methods {
                upsert(
                    &mut out,
                    MethodRef {
                        owner: &c.fqn,
                        method: m,
                    },
                    |r| r.method.name == m.name,
                );
            }
        }
        out
    }

    /// The property that `prop` overrides, looked up on the type named by
    /// [`Property::overrides`].
    fn overridden_property<'a>(&'a self, prop: PropertyRef<'a>) -> Option<PropertyRef<'a>> {
        let target = prop.property.overrides.as_deref()?;
        let candidates = if let Some(class) = self.find_class(target) {
            self.all_properties(class)
        } else {
            self.all_interface_properties(self.find_interface(target)?)
        };
        candidates
            .into_iter()
            .find(|p| p.property.name == prop.property.name)
    }
}

impl<T: TypeSystem + ?Sized> Reflect for T {}

fn upsert<T>(out: &mut Vec<T>, item: T, same: impl Fn(&T) -> bool) {
    if let Some(slot) = out.iter_mut().find(|existing| same(existing)) {
        *slot = item;
    } else {
        out.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::TypeModel;

    fn model() -> TypeModel {
        TypeModel::new("@pkg/foo-bar")
            .with_dependency_class(
                ClassType::new("@cdk/core.Resource")
                    .property(Property::new("node").immutable())
                    .property(Property::new("env").immutable()),
            )
            .with_dependency_interface(InterfaceType::new("@cdk/core.IResource"))
            .with_interface(
                InterfaceType::new("@pkg/foo-bar.IWidget")
                    .extends("@cdk/core.IResource")
                    .property(Property::new("widgetArn").tag("attribute", "Arn")),
            )
            .with_class(
                ClassType::new("@pkg/foo-bar.WidgetBase")
                    .extends("@cdk/core.Resource")
                    .property(Property::new("widgetArn").immutable())
                    .method(Method::new("grantRead")),
            )
            .with_class(
                ClassType::new("@pkg/foo-bar.Widget")
                    .extends("@pkg/foo-bar.WidgetBase")
                    .property(Property::new("env"))
                    .property(Property::new("size"))
                    .method(Method::new("grantRead").returns(TypeRef::named("@cdk/iam.Grant"))),
            )
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let m = model();
        let widget = m.find_class("@pkg/foo-bar.Widget").unwrap();
        let names: Vec<&str> = m.ancestors(widget).iter().map(|c| c.fqn.as_str()).collect();
        assert_eq!(names, vec!["@pkg/foo-bar.WidgetBase", "@cdk/core.Resource"]);
    }

    #[test]
    fn extends_is_reflexive_and_transitive() {
        let m = model();
        let widget = m.find_class("@pkg/foo-bar.Widget").unwrap();
        assert!(m.class_extends(widget, "@pkg/foo-bar.Widget"));
        assert!(m.class_extends(widget, "@cdk/core.Resource"));
        assert!(!m.class_extends(widget, "@cdk/core.Stack"));

        let iface = m.find_interface("@pkg/foo-bar.IWidget").unwrap();
        assert!(m.interface_extends(iface, "@cdk/core.IResource"));
        assert!(!m.interface_extends(iface, "@cdk/core.IConstruct"));
    }

    #[test]
    fn extends_matches_unresolvable_base_by_name() {
        let m = TypeModel::new("a").with_class(ClassType::new("a.X").extends("dep.Missing"));
        let x = m.find_class("a.X").unwrap();
        assert!(m.class_extends(x, "dep.Missing"));
        assert!(m.ancestors(x).is_empty());
    }

    #[test]
    fn all_properties_replaces_overridden_in_place() {
        let m = model();
        let widget = m.find_class("@pkg/foo-bar.Widget").unwrap();
        let props: Vec<(String, &str)> = m
            .all_properties(widget)
            .iter()
            .map(|p| (p.property.name.clone(), p.owner))
            .collect();
        assert_eq!(
            props,
            vec![
                ("node".to_string(), "@cdk/core.Resource"),
                ("env".to_string(), "@pkg/foo-bar.Widget"),
                ("widgetArn".to_string(), "@pkg/foo-bar.WidgetBase"),
                ("size".to_string(), "@pkg/foo-bar.Widget"),
            ]
        );
    }

    #[test]
    fn all_methods_prefers_most_derived() {
        let m = model();
        let widget = m.find_class("@pkg/foo-bar.Widget").unwrap();
        let methods = m.all_methods(widget);
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].fqn(), "@pkg/foo-bar.Widget.grantRead");
        assert_eq!(methods[0].method.returns, Some(TypeRef::named("@cdk/iam.Grant")));
    }

    #[test]
    fn overridden_property_follows_interface_link() {
        let m = TypeModel::new("@pkg/foo-bar")
            .with_interface(
                InterfaceType::new("@pkg/foo-bar.IWidget")
                    .property(Property::new("widgetArn").tag("attribute", "Arn")),
            )
            .with_class(
                ClassType::new("@pkg/foo-bar.Widget")
                    .property(Property::new("widgetArn").overrides("@pkg/foo-bar.IWidget")),
            );
        let widget = m.find_class("@pkg/foo-bar.Widget").unwrap();
        let prop = m.all_properties(widget)[0];
        let overridden = m.overridden_property(prop).unwrap();
        assert_eq!(overridden.owner, "@pkg/foo-bar.IWidget");
        assert_eq!(overridden.property.docs.tag("attribute"), Some("Arn"));
    }

    #[test]
    fn cyclic_inheritance_terminates() {
        let m = TypeModel::new("a")
            .with_class(ClassType::new("a.A").extends("a.B"))
            .with_class(ClassType::new("a.B").extends("a.A"));
        let a = m.find_class("a.A").unwrap();
        assert_eq!(m.ancestors(a).len(), 1);
        assert!(!m.class_extends(a, "a.C"));
        assert!(m.all_properties(a).is_empty());
    }

    #[test]
    fn type_ref_display() {
        let t = TypeRef::Union(vec![
            TypeRef::primitive("string"),
            TypeRef::Array(Box::new(TypeRef::named("@pkg/foo-bar.Widget"))),
        ]);
        assert_eq!(t.to_string(), "string | Array<@pkg/foo-bar.Widget>");
        assert_eq!(TypeRef::default().to_string(), "any");
    }
}

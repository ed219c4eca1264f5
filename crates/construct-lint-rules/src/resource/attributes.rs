//! Attribute extraction: which wrapper properties expose which schema attributes.

use construct_lint_core::{ClassType, PropertyRef, Reflect, SchemaResource, TypeSystem};
use std::collections::HashSet;

/// Doc tag naming the schema attribute(s) a property exposes (`ATTR[,ATTR]`).
pub const ATTRIBUTE_TAG: &str = "attribute";

/// A schema attribute and the wrapper property believed to expose it.
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    /// Schema attribute name, e.g. `Arn`.
    pub name: String,
    /// The backing property.
    pub property: PropertyRef<'a>,
    /// `<resource fqn>.<property name>`.
    pub scope: String,
}

/// Builds the attribute list of a resource.
///
/// The result is the schema-name matches (in schema attribute order) followed
/// by the `@attribute`-tagged properties (in property order). A property found
/// by both passes appears twice.
#[must_use]
pub fn find_attribute_properties<'a>(
    types: &'a dyn TypeSystem,
    class: &'a ClassType,
    schema: &SchemaResource,
) -> Vec<Attribute<'a>> {
    let properties = types.all_properties(class);
    let mut result = Vec::new();

    for attr in &schema.attribute_names {
        let candidates = [
            attr.clone(),
            camel_case(attr),
            expected_property_name(schema, attr),
        ];
        let found = properties
            .iter()
            .find(|p| candidates.iter().any(|c| *c == p.property.name));
        if let Some(p) = found {
            result.push(attribute(attr, *p, &class.fqn));
        }
    }

    for p in &properties {
        let Some(tag) = attribute_tag(types, *p) else {
            continue;
        };
        for name in tag.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            result.push(attribute(name, *p, &class.fqn));
        }
    }

    result
}

fn attribute<'a>(name: &str, property: PropertyRef<'a>, resource_fqn: &str) -> Attribute<'a> {
    Attribute {
        name: name.to_string(),
        scope: format!("{resource_fqn}.{}", property.property.name),
        property,
    }
}

/// The `@attribute` tag of a property, inherited through its override chain.
#[must_use]
pub fn attribute_tag<'a>(types: &'a dyn TypeSystem, prop: PropertyRef<'a>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    let mut current = prop;
    loop {
        if let Some(tag) = current.property.docs.tag(ATTRIBUTE_TAG) {
            return Some(tag);
        }
        if !seen.insert((current.owner, current.property.name.as_str())) {
            return None;
        }
        current = types.overridden_property(current)?;
    }
}

/// Conventional property name for a schema attribute: `widgetArn` for `Arn`
/// on `FOO::BAR::Widget`, or just the camelCased attribute when it already
/// starts with the resource name.
#[must_use]
pub fn expected_property_name(schema: &SchemaResource, attr: &str) -> String {
    let own = camel_case(attr);
    if own.starts_with(&camel_case(schema.basename())) {
        own
    } else {
        camel_case(&format!("{}{attr}", schema.basename()))
    }
}

/// camelCases an identifier, treating any non-alphanumeric as a word break.
///
/// A leading acronym is lowercased as a unit: `DBInstanceArn` -> `dbInstanceArn`.
#[must_use]
pub fn camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let words = input
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty());
    for (i, word) in words.enumerate() {
        if i == 0 {
            let run = word.chars().take_while(char::is_ascii_uppercase).count();
            let lower = if run > 1 && run < word.len() { run - 1 } else { run };
            out.push_str(&word[..lower].to_ascii_lowercase());
            out.push_str(&word[lower..]);
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

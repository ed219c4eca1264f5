//! Built-in resource rules.

use super::{expected_property_name, ResourceReflection};
use construct_lint_core::{
    CoreTypes, Evaluation, Reflect, Rule, RuleError, SignatureExpectation, TypeRef,
};

type Eval<'e, 'a> = Evaluation<'e, ResourceReflection<'a>>;

/// The resource rules, in evaluation order, with messages naming `core`'s types.
#[must_use]
pub fn resource_rules<'a>(core: &CoreTypes) -> Vec<Rule<ResourceReflection<'a>>> {
    vec![
        Rule::new(
            "resource-class-extends-resource",
            format!("resource classes must extend {}", core.resource),
            class_extends_resource,
        ),
        Rule::new(
            "resource-interface",
            "every resource must have a resource interface",
            has_interface,
        )
        .warning(),
        Rule::new(
            "resource-interface-extends-resource",
            format!("resource interfaces must extend {}", core.resource_interface),
            interface_extends_resource,
        ),
        Rule::new(
            "resource-attribute",
            "resources must represent all resource attributes as properties",
            attributes_covered,
        ),
        Rule::new(
            "resource-attribute-immutable",
            "resource attributes must be immutable (readonly)",
            attributes_immutable,
        ),
        Rule::new(
            "grant-result",
            format!("\"grant\" method must return {}", core.grant),
            grant_result,
        ),
    ]
}

fn class_extends_resource(e: &mut Eval<'_, '_>) -> Result<(), RuleError> {
    let r = e.ctx;
    e.assert(r.types.class_extends(r.class(), &r.core.resource), r.fqn);
    Ok(())
}

fn has_interface(e: &mut Eval<'_, '_>) -> Result<(), RuleError> {
    let r = e.ctx;
    e.assert(r.construct.interface.is_some(), r.fqn);
    Ok(())
}

fn interface_extends_resource(e: &mut Eval<'_, '_>) -> Result<(), RuleError> {
    let r = e.ctx;
    let Some(interface) = r.construct.interface else {
        return Ok(());
    };
    e.assert(
        r.types
            .interface_extends(interface, &r.core.resource_interface),
        &interface.fqn,
    );
    Ok(())
}

fn attributes_covered(e: &mut Eval<'_, '_>) -> Result<(), RuleError> {
    let r = e.ctx;
    for attr in &r.schema.attribute_names {
        let expected = expected_property_name(r.schema, attr);
        let found = r.attributes.iter().any(|a| a.name == *attr);
        e.assert_with(
            found,
            format!("{}.{expected}", r.fqn),
            format!("(missing attribute {attr})"),
        );
    }
    Ok(())
}

fn attributes_immutable(e: &mut Eval<'_, '_>) -> Result<(), RuleError> {
    let r = e.ctx;
    for attr in &r.attributes {
        e.assert(attr.property.property.immutable, &attr.scope);
    }
    Ok(())
}

fn grant_result(e: &mut Eval<'_, '_>) -> Result<(), RuleError> {
    let r = e.ctx;
    let expected = SignatureExpectation::returning(TypeRef::named(&r.core.grant));
    for method in r.types.all_methods(r.class()) {
        if method.method.name.starts_with("grant") {
            e.assert_signature(method, &expected);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{ATTRIBUTE_TAG, RESOURCE_TAG};
    use construct_lint_core::{
        ClassType, ConstructReflection, InterfaceType, Linter, LintResult, Method, Property,
        SchemaCatalog, SchemaResource, TypeModel, TypeSystem,
    };

    fn lint(types: &TypeModel, schemas: &SchemaCatalog, fqn: &str, interface: Option<&str>) -> LintResult {
        let core = CoreTypes::default();
        let construct = ConstructReflection {
            class: types.find_class(fqn).unwrap(),
            interface: interface.map(|i| types.find_interface(i).unwrap()),
        };
        let resource = ResourceReflection::new(construct, types, schemas, &core).unwrap();

        let mut builder = Linter::builder();
        for rule in resource_rules(&core) {
            builder = builder.rule(rule);
        }
        builder.build().unwrap().eval(&[resource]).unwrap()
    }

    fn base() -> TypeModel {
        TypeModel::new("@pkg/foo-bar")
            .with_dependency_class(ClassType::new("@cdk/core.Resource"))
            .with_dependency_interface(InterfaceType::new("@cdk/core.IResource"))
            .with_dependency_class(ClassType::new("@cdk/aws-iam.Grant"))
    }

    fn codes(result: &LintResult) -> Vec<(&str, &str)> {
        result
            .violations
            .iter()
            .map(|v| (v.code.as_str(), v.scope.as_str()))
            .collect()
    }

    #[test]
    fn attribute_coverage_passes_and_mutable_name_fails_once() {
        let types = base()
            .with_interface(InterfaceType::new("@pkg/foo-bar.IWidget").extends("@cdk/core.IResource"))
            .with_class(
                ClassType::new("@pkg/foo-bar.Widget")
                    .extends("@cdk/core.Resource")
                    .implements("@pkg/foo-bar.IWidget")
                    .property(Property::new("arn").immutable().tag(ATTRIBUTE_TAG, "Arn"))
                    .property(Property::new("name")),
            );
        let schemas = SchemaCatalog::new().with_resource(SchemaResource::new("FOO::BAR::Widget", ["Arn", "Name"]));

        let result = lint(&types, &schemas, "@pkg/foo-bar.Widget", Some("@pkg/foo-bar.IWidget"));
        assert_eq!(
            codes(&result),
            vec![("resource-attribute-immutable", "@pkg/foo-bar.Widget.name")]
        );
        assert!(result.has_errors());
    }

    #[test]
    fn missing_attribute_is_reported_under_expected_property_name() {
        let types = base()
            .with_interface(InterfaceType::new("@pkg/foo-bar.IWidget").extends("@cdk/core.IResource"))
            .with_class(ClassType::new("@pkg/foo-bar.Widget").extends("@cdk/core.Resource"));
        let schemas = SchemaCatalog::new().with_resource(SchemaResource::new("FOO::BAR::Widget", ["Arn"]));

        let result = lint(&types, &schemas, "@pkg/foo-bar.Widget", Some("@pkg/foo-bar.IWidget"));
        assert_eq!(
            codes(&result),
            vec![("resource-attribute", "@pkg/foo-bar.Widget.widgetArn")]
        );
        assert_eq!(
            result.violations[0].extra.as_deref(),
            Some("(missing attribute Arn)")
        );
    }

    #[test]
    fn missing_interface_warns_and_skips_interface_rule() {
        let types = base().with_class(ClassType::new("@pkg/foo-bar.Widget").extends("@cdk/core.Resource"));
        let schemas = SchemaCatalog::new().with_resource(SchemaResource::new("FOO::BAR::Widget", Vec::<String>::new()));

        let result = lint(&types, &schemas, "@pkg/foo-bar.Widget", None);
        assert_eq!(codes(&result), vec![("resource-interface", "@pkg/foo-bar.Widget")]);
        assert!(!result.has_errors());
    }

    #[test]
    fn interface_and_class_must_extend_resource_bases() {
        let types = base()
            .with_interface(InterfaceType::new("@pkg/foo-bar.IWidget"))
            .with_class(
                ClassType::new("@pkg/foo-bar.Widget").tag(RESOURCE_TAG, "FOO::BAR::Widget"),
            );
        let schemas = SchemaCatalog::new().with_resource(SchemaResource::new("FOO::BAR::Widget", Vec::<String>::new()));

        let result = lint(&types, &schemas, "@pkg/foo-bar.Widget", Some("@pkg/foo-bar.IWidget"));
        assert_eq!(
            codes(&result),
            vec![
                ("resource-class-extends-resource", "@pkg/foo-bar.Widget"),
                ("resource-interface-extends-resource", "@pkg/foo-bar.IWidget"),
            ]
        );
    }

    #[test]
    fn grant_methods_must_return_grant() {
        let grant = TypeRef::named("@cdk/aws-iam.Grant");
        let types = base()
            .with_interface(InterfaceType::new("@pkg/foo-bar.IWidget").extends("@cdk/core.IResource"))
            .with_class(
                ClassType::new("@pkg/foo-bar.Widget")
                    .extends("@cdk/core.Resource")
                    .method(Method::new("grantRead").returns(grant.clone()))
                    .method(Method::new("grantWrite"))
                    .method(Method::new("GrantAll"))
                    .method(Method::new("grants").returns(TypeRef::primitive("string"))),
            );
        let schemas = SchemaCatalog::new().with_resource(SchemaResource::new("FOO::BAR::Widget", Vec::<String>::new()));

        let result = lint(&types, &schemas, "@pkg/foo-bar.Widget", Some("@pkg/foo-bar.IWidget"));
        assert_eq!(
            codes(&result),
            vec![
                ("grant-result", "@pkg/foo-bar.Widget.grantWrite"),
                ("grant-result", "@pkg/foo-bar.Widget.grants"),
            ]
        );
        assert_eq!(
            result.violations[1].extra.as_deref(),
            Some("(expected=\"@cdk/aws-iam.Grant\",actual=\"string\")")
        );
    }

    #[test]
    fn rule_messages_name_configured_core_types() {
        let core = CoreTypes {
            grant: "@my/iam.Grant".to_string(),
            ..CoreTypes::default()
        };
        let rules: Vec<Rule<ResourceReflection<'_>>> = resource_rules(&core);
        let grant = rules.iter().find(|r| r.code() == "grant-result").unwrap();
        assert_eq!(grant.message(), "\"grant\" method must return @my/iam.Grant");
        assert_eq!(rules.len(), 6);
    }
}

//! Naming-convention construct discovery.

use construct_lint_core::{ConstructDiscovery, ConstructReflection, Reflect, TypeSystem};
use tracing::debug;

/// Discovers constructs by inheritance and interface naming.
///
/// Every assembly class extending `construct_base` is a construct. Its public
/// interface is the interface named `I<Name>` in the same namespace, if any.
#[derive(Debug, Clone)]
pub struct ConventionDiscovery {
    construct_base: String,
}

impl ConventionDiscovery {
    /// Creates a discovery rooted at the given construct base class.
    #[must_use]
    pub fn new(construct_base: impl Into<String>) -> Self {
        Self {
            construct_base: construct_base.into(),
        }
    }
}

impl ConstructDiscovery for ConventionDiscovery {
    fn discover<'a>(&self, types: &'a dyn TypeSystem) -> Vec<ConstructReflection<'a>> {
        types
            .assembly_classes()
            .into_iter()
            .filter(|class| types.class_extends(class, &self.construct_base))
            .map(|class| {
                let interface_fqn = match class.fqn.rsplit_once('.') {
                    Some((namespace, name)) => format!("{namespace}.I{name}"),
                    None => format!("I{}", class.fqn),
                };
                let interface = types.find_interface(&interface_fqn);
                debug!(
                    "construct {} (interface: {})",
                    class.fqn,
                    interface.map_or("none", |i| i.fqn.as_str())
                );
                ConstructReflection { class, interface }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use construct_lint_core::{ClassType, InterfaceType, TypeModel};

    #[test]
    fn finds_constructs_and_their_interfaces() {
        let types = TypeModel::new("@pkg/foo-bar")
            .with_dependency_class(ClassType::new("constructs.Construct"))
            .with_class(ClassType::new("@pkg/foo-bar.Widget").extends("constructs.Construct"))
            .with_interface(InterfaceType::new("@pkg/foo-bar.IWidget"))
            .with_class(ClassType::new("@pkg/foo-bar.Gadget").extends("@pkg/foo-bar.Widget"))
            .with_class(ClassType::new("@pkg/foo-bar.WidgetProps"));

        let found: Vec<(&str, Option<&str>)> = ConventionDiscovery::new("constructs.Construct")
            .discover(&types)
            .iter()
            .map(|c| (c.fqn(), c.interface.map(|i| i.fqn.as_str())))
            .collect();
        assert_eq!(
            found,
            vec![
                ("@pkg/foo-bar.Widget", Some("@pkg/foo-bar.IWidget")),
                ("@pkg/foo-bar.Gadget", None),
            ]
        );
    }

    #[test]
    fn dependency_classes_are_not_discovered() {
        let types = TypeModel::new("@pkg/foo-bar")
            .with_dependency_class(ClassType::new("constructs.Construct"))
            .with_dependency_class(ClassType::new("@other/lib.Thing").extends("constructs.Construct"));
        assert!(ConventionDiscovery::new("constructs.Construct")
            .discover(&types)
            .is_empty());
    }
}

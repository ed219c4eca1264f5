//! Construct discovery contract.

use crate::model::{ClassType, InterfaceType, TypeSystem};

/// A construct class paired with its declared public interface, if any.
#[derive(Debug, Clone, Copy)]
pub struct ConstructReflection<'a> {
    /// The construct class.
    pub class: &'a ClassType,
    /// The public construct interface (`I<Name>`), if declared.
    pub interface: Option<&'a InterfaceType>,
}

impl<'a> ConstructReflection<'a> {
    /// FQN of the construct class.
    #[must_use]
    pub fn fqn(&self) -> &'a str {
        &self.class.fqn
    }

    /// Simple name of the construct class.
    #[must_use]
    pub fn basename(&self) -> &'a str {
        self.class.name()
    }
}

/// Finds the construct-like classes of an assembly.
pub trait ConstructDiscovery {
    /// Returns every candidate construct in `types`, in a deterministic order.
    fn discover<'a>(&self, types: &'a dyn TypeSystem) -> Vec<ConstructReflection<'a>>;
}

//! ModuleRegistry — the descriptor set of one entity
//!
//! Built once per entity (see [`Entity::registry`]) and immutable
//! afterwards. Installing it into a host registers every descriptor, in
//! discovery order, as a callable of a freshly created host module.

use std::collections::HashMap;

use crate::callable::Callable;
use crate::config::BindingOptions;
use crate::entity::{Entity, MemberKind};
use crate::error::ModuleError;
use crate::host::{HostModule, HostRuntime};

/// Descriptors of one entity, in discovery order.
///
/// Descriptors are owned here for the rest of the process: installed host
/// functions hold `&'static` references into this registry.
#[derive(Debug)]
pub struct ModuleRegistry {
    entity: &'static str,
    callables: Vec<Callable>,
    by_name: HashMap<&'static str, usize>,
    skipped: Vec<(&'static str, &'static str)>,
}

impl ModuleRegistry {
    pub(crate) fn build(entity: &Entity) -> Self {
        let mut callables = Vec::new();
        let mut by_name = HashMap::new();
        let mut skipped = Vec::new();

        for member in entity.members() {
            match member.kind() {
                MemberKind::Function(bind) => {
                    let callable = bind();
                    if by_name.contains_key(callable.name()) {
                        // Kept so that installation reports the collision.
                        tracing::warn!(
                            entity = entity.name(),
                            function = callable.name(),
                            "duplicate function name"
                        );
                    } else {
                        by_name.insert(callable.name(), callables.len());
                    }
                    callables.push(callable);
                }
                MemberKind::Unsupported(reason) => {
                    tracing::warn!(
                        entity = entity.name(),
                        member = member.ident(),
                        reason,
                        "skipping unsupported function"
                    );
                    skipped.push((member.ident(), reason));
                }
                MemberKind::Other => {
                    tracing::debug!(
                        entity = entity.name(),
                        member = member.ident(),
                        "skipping non-function member"
                    );
                }
            }
        }

        tracing::debug!(
            entity = entity.name(),
            functions = callables.len(),
            skipped = skipped.len(),
            "built registry"
        );

        ModuleRegistry {
            entity: entity.name(),
            callables,
            by_name,
            skipped,
        }
    }

    /// Name of the entity this registry was built from
    #[inline]
    pub fn entity_name(&self) -> &'static str {
        self.entity
    }

    /// Get a descriptor by exposed name
    pub fn get(&self, name: &str) -> Option<&Callable> {
        self.by_name.get(name).map(|&i| &self.callables[i])
    }

    /// Check if a function is registered
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Exposed names in discovery order
    pub fn names(&self) -> Vec<&'static str> {
        self.callables.iter().map(Callable::name).collect()
    }

    /// Descriptors in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &Callable> {
        self.callables.iter()
    }

    /// Function members that could not be bound, with reasons
    pub fn skipped(&self) -> &[(&'static str, &'static str)] {
        &self.skipped
    }

    /// Get number of registered descriptors
    pub fn len(&self) -> usize {
        self.callables.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.callables.is_empty()
    }

    /// Create a host module named `module` and register every descriptor.
    ///
    /// The first failure aborts the whole installation. Functions already
    /// registered on the discarded module are not rolled back, and no
    /// module is returned.
    pub fn install<H: HostRuntime>(
        &'static self,
        host: &H,
        module: &str,
        options: BindingOptions,
    ) -> Result<H::Module, ModuleError> {
        let mut object = host
            .create_module(module)
            .map_err(|source| ModuleError::ModuleCreationFailure {
                module: module.to_string(),
                source,
            })?;

        for callable in &self.callables {
            object
                .add_function(callable.name(), callable.doc(), callable, options)
                .map_err(|source| ModuleError::RegistrationFailure {
                    module: module.to_string(),
                    function: callable.name().to_string(),
                    source,
                })?;
        }

        tracing::info!(
            module,
            entity = self.entity,
            functions = self.callables.len(),
            "installed module"
        );
        Ok(object)
    }
}

/// Module entry point: install `entity`'s functions as module `name`.
pub fn init_module<H: HostRuntime>(
    host: &H,
    name: &str,
    entity: &'static Entity,
    options: BindingOptions,
) -> Result<H::Module, ModuleError> {
    entity.registry().install(host, name, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Member;
    use crate::error::{ErrorKind, HostError};
    use crate::value::DynValue;

    fn sum(a: i32, b: i32) -> i32 {
        a + b
    }

    fn half() -> f32 {
        0.5
    }

    const MEMBERS: &[Member] = &[
        Member::function("sum", || Callable::new("sum", "", sum)),
        Member::other("LIMIT"),
        Member::function("half", || Callable::new("half", "", half)),
        Member::unsupported("first", "reference parameters are not supported"),
    ];

    static MATH: Entity = Entity::new("math", MEMBERS);

    const CLASHING: &[Member] = &[
        Member::function("f", || Callable::new("f", "", || 1i32)),
        Member::function("f", || Callable::new("f", "", || 2i32)),
    ];

    static CLASH: Entity = Entity::new("clash", CLASHING);

    /// Records registered names; refuses to create the module named `reject`.
    #[derive(Default)]
    struct RecordingHost {
        reject: Option<&'static str>,
    }

    #[derive(Default, Debug)]
    struct Recorded {
        names: Vec<&'static str>,
    }

    impl HostModule for Recorded {
        fn add_function(
            &mut self,
            name: &'static str,
            _doc: &str,
            _callable: &'static Callable,
            _options: BindingOptions,
        ) -> Result<(), HostError> {
            if self.names.contains(&name) {
                return Err(HostError::DuplicateAttribute(name.to_string()));
            }
            self.names.push(name);
            Ok(())
        }
    }

    impl HostRuntime for RecordingHost {
        type Module = Recorded;

        fn create_module(&self, name: &str) -> Result<Recorded, HostError> {
            if Some(name) == self.reject {
                return Err(HostError::InvalidModuleName(name.to_string()));
            }
            Ok(Recorded::default())
        }
    }

    #[test]
    fn test_discovery_order() {
        let registry = MATH.registry();
        assert_eq!(registry.names(), ["sum", "half"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.entity_name(), "math");
        assert_eq!(
            registry.skipped(),
            &[("first", "reference parameters are not supported")]
        );
    }

    #[test]
    fn test_lookup() {
        let registry = MATH.registry();
        assert!(registry.contains("sum"));
        assert!(!registry.contains("LIMIT"));
        let sum = registry.get("sum").unwrap();
        assert_eq!(sum.call(&[DynValue::long(2), DynValue::long(3)]), Ok(DynValue::i32(5)));
    }

    #[test]
    fn test_install_registers_in_order() {
        let host = RecordingHost::default();
        let module = MATH.registry().install(&host, "math", BindingOptions::default()).unwrap();
        assert_eq!(module.names, ["sum", "half"]);
    }

    #[test]
    fn test_install_module_creation_failure() {
        let host = RecordingHost { reject: Some("math") };
        let err = init_module(&host, "math", &MATH, BindingOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModuleCreationFailure);
    }

    #[test]
    fn test_duplicate_name_fails_registration() {
        let registry = CLASH.registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("f").unwrap().call(&[]), Ok(DynValue::i32(1)));

        let err = registry
            .install(&RecordingHost::default(), "clash", BindingOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            ModuleError::RegistrationFailure {
                module: "clash".to_string(),
                function: "f".to_string(),
                source: HostError::DuplicateAttribute("f".to_string()),
            }
        );
    }
}

//! Host runtime interface and the reference in-process host
//!
//! A host runtime creates module objects and accepts named callables on
//! them. The registry only programs against [`HostRuntime`] and
//! [`HostModule`]; embedding a real dynamic-language runtime means
//! implementing those two traits.
//!
//! [`LocalHost`] is a small reference host used by the CLI and the tests.
//! Its modules are ordered attribute tables, and all calls through its
//! functions are serialized by one runtime lock, the way an interpreter
//! with a global lock admits one native call at a time.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};

use crate::callable::{Callable, Keywords};
use crate::config::BindingOptions;
use crate::error::{CallResult, HostError};
use crate::value::{ArgumentList, DynValue};

// ============================================================================
// Traits
// ============================================================================

/// A module object under construction.
pub trait HostModule {
    /// Register `callable` under `name`.
    ///
    /// `callable` stays valid for the rest of the process, so the host may
    /// keep the reference inside whatever function object it creates.
    fn add_function(
        &mut self,
        name: &'static str,
        doc: &str,
        callable: &'static Callable,
        options: BindingOptions,
    ) -> Result<(), HostError>;
}

/// A dynamic-language runtime that can host native modules.
pub trait HostRuntime {
    /// Module object type
    type Module: HostModule;

    /// Create an empty module object
    fn create_module(&self, name: &str) -> Result<Self::Module, HostError>;
}

// ============================================================================
// LocalHost
// ============================================================================

/// Reference host runtime.
pub struct LocalHost {
    created: Mutex<HashSet<String>>,
    runtime_lock: Arc<ReentrantMutex<()>>,
}

impl LocalHost {
    /// Create a host with no modules
    pub fn new() -> Self {
        Self {
            created: Mutex::new(HashSet::new()),
            runtime_lock: Arc::new(ReentrantMutex::new(())),
        }
    }

    /// Check if a module with this name was created
    pub fn has_module(&self, name: &str) -> bool {
        self.created.lock().contains(name)
    }
}

impl Default for LocalHost {
    fn default() -> Self {
        Self::new()
    }
}

fn is_valid_module_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}

impl HostRuntime for LocalHost {
    type Module = ModuleObject;

    fn create_module(&self, name: &str) -> Result<ModuleObject, HostError> {
        if !is_valid_module_name(name) {
            return Err(HostError::InvalidModuleName(name.to_string()));
        }
        if !self.created.lock().insert(name.to_string()) {
            return Err(HostError::ModuleExists(name.to_string()));
        }
        Ok(ModuleObject::new(name, self.runtime_lock.clone()))
    }
}

// ============================================================================
// ModuleObject
// ============================================================================

/// Attribute of a module object
#[derive(Debug)]
pub enum Attribute {
    /// Plain value
    Value(DynValue),
    /// Installed native function
    Function(HostFunction),
}

/// Module object of the reference host: an ordered attribute table.
///
/// Created with `__name__` and `__doc__` already set.
pub struct ModuleObject {
    name: String,
    attributes: Vec<(String, Attribute)>,
    index: HashMap<String, usize>,
    runtime_lock: Arc<ReentrantMutex<()>>,
}

impl ModuleObject {
    fn new(name: &str, runtime_lock: Arc<ReentrantMutex<()>>) -> Self {
        let mut module = ModuleObject {
            name: name.to_string(),
            attributes: Vec::new(),
            index: HashMap::new(),
            runtime_lock,
        };
        module.insert("__name__", Attribute::Value(DynValue::str(name)));
        module.insert("__doc__", Attribute::Value(DynValue::None));
        module
    }

    fn insert(&mut self, name: &str, attribute: Attribute) {
        self.index.insert(name.to_string(), self.attributes.len());
        self.attributes.push((name.to_string(), attribute));
    }

    /// Module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get an attribute by name
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.index.get(name).map(|&i| &self.attributes[i].1)
    }

    /// Get an installed function by name
    pub fn function(&self, name: &str) -> Result<&HostFunction, HostError> {
        match self.get(name) {
            Some(Attribute::Function(function)) => Ok(function),
            _ => Err(HostError::UnknownAttribute(name.to_string())),
        }
    }

    /// Installed functions in registration order
    pub fn functions(&self) -> impl Iterator<Item = &HostFunction> {
        self.attributes.iter().filter_map(|(_, attribute)| match attribute {
            Attribute::Function(function) => Some(function),
            Attribute::Value(_) => None,
        })
    }

    /// Attribute names in insertion order
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl HostModule for ModuleObject {
    fn add_function(
        &mut self,
        name: &'static str,
        doc: &str,
        callable: &'static Callable,
        options: BindingOptions,
    ) -> Result<(), HostError> {
        if self.index.contains_key(name) {
            return Err(HostError::DuplicateAttribute(name.to_string()));
        }
        let function = HostFunction {
            name,
            doc: doc.to_string(),
            callable,
            options,
            runtime_lock: self.runtime_lock.clone(),
        };
        self.insert(name, Attribute::Function(function));
        Ok(())
    }
}

impl fmt::Debug for ModuleObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleObject")
            .field("name", &self.name)
            .field("attributes", &self.attribute_names())
            .finish()
    }
}

// ============================================================================
// HostFunction
// ============================================================================

/// A native function as seen by the reference host.
pub struct HostFunction {
    name: &'static str,
    doc: String,
    callable: &'static Callable,
    options: BindingOptions,
    runtime_lock: Arc<ReentrantMutex<()>>,
}

impl HostFunction {
    /// Exposed name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Doc string
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Underlying descriptor
    pub fn callable(&self) -> &'static Callable {
        self.callable
    }

    /// Call with positional arguments
    pub fn call(&self, args: &ArgumentList) -> CallResult<DynValue> {
        self.call_with_keywords(args, &[])
    }

    /// Call through the full host calling convention
    pub fn call_with_keywords(&self, args: &ArgumentList, kwargs: &Keywords) -> CallResult<DynValue> {
        let _guard = self.runtime_lock.lock();
        self.callable.invoke(args, kwargs, &self.options)
    }
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFunction")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, Member};
    use crate::error::{ErrorKind, ModuleError};
    use crate::registry::init_module;

    fn twice(x: i64) -> i64 {
        x * 2
    }

    const MEMBERS: &[Member] = &[
        Member::function("twice", || Callable::new("twice", "Doubles x.", twice)),
        Member::function("__doc__", || Callable::new("__doc__", "", || ())),
    ];

    static SHADOWING: Entity = Entity::new("shadowing", MEMBERS);

    const PLAIN: &[Member] = &[Member::function("twice", || Callable::new("twice", "", twice))];

    static DOUBLER: Entity = Entity::new("doubler", PLAIN);

    #[test]
    fn test_module_has_dunder_attributes() {
        let host = LocalHost::new();
        let module = host.create_module("plain").unwrap();
        assert_eq!(module.attribute_names(), ["__name__", "__doc__"]);
        assert!(matches!(
            module.get("__name__"),
            Some(Attribute::Value(DynValue::Str(name))) if name == "plain"
        ));
        assert!(host.has_module("plain"));
    }

    #[test]
    fn test_invalid_and_duplicate_module_names() {
        let host = LocalHost::new();
        assert_eq!(
            host.create_module("").unwrap_err(),
            HostError::InvalidModuleName(String::new())
        );
        assert!(host.create_module("9lives").is_err());
        assert!(host.create_module("has space").is_err());

        host.create_module("once").unwrap();
        assert_eq!(
            host.create_module("once").unwrap_err(),
            HostError::ModuleExists("once".to_string())
        );
    }

    #[test]
    fn test_install_and_call() {
        let host = LocalHost::new();
        let module = init_module(&host, "doubler", &DOUBLER, BindingOptions::default()).unwrap();

        let function = module.function("twice").unwrap();
        assert_eq!(function.call(&[DynValue::long(21)]), Ok(DynValue::i64(42)));
        assert_eq!(function.doc(), "twice(i64) -> i64");
        assert_eq!(module.functions().count(), 1);
        assert_eq!(
            module.function("__name__").unwrap_err(),
            HostError::UnknownAttribute("__name__".to_string())
        );
    }

    #[test]
    fn test_collision_with_dunder_aborts_load() {
        let host = LocalHost::new();
        let err = init_module(&host, "shadowing", &SHADOWING, BindingOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RegistrationFailure);
        assert!(matches!(
            err,
            ModuleError::RegistrationFailure { ref function, .. } if function == "__doc__"
        ));
    }

    #[test]
    fn test_keywords_through_host() {
        let host = LocalHost::new();
        let module = init_module(&host, "doubler2", &DOUBLER, BindingOptions::default()).unwrap();
        let kwargs = vec![("x".to_string(), DynValue::long(1))];
        let err = module.function("twice").unwrap().call_with_keywords(&[], &kwargs).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeywordArgumentsUnsupported);
    }

    #[test]
    fn test_nested_calls_do_not_deadlock() {
        let host = LocalHost::new();
        let module = init_module(&host, "outer", &DOUBLER, BindingOptions::default()).unwrap();
        let function = module.function("twice").unwrap();

        let _held = host.runtime_lock.lock();
        assert_eq!(function.call(&[DynValue::long(1)]), Ok(DynValue::i64(2)));
    }
}

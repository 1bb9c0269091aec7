//! Frozen converter and factory registries
//!
//! Both registries are built once by [`TypeParserBuilder`](crate::TypeParserBuilder)
//! and never mutated afterwards. Cloning shares the underlying map.

use crate::converter::Converter;
use crate::error::BoxError;
use crate::types::{ContainerKind, Type};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry key: exact types plus the fixed container and array slots
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConverterKey {
    /// A converter for one exact type, looked up before any structural rule
    Exact(Type),
    List,
    Set,
    Map,
    Array,
}

impl ConverterKey {
    /// Key for an exact type; nullability does not take part in lookups
    pub fn exact(target: &Type) -> Self {
        ConverterKey::Exact(target.registry_key())
    }
}

impl From<Type> for ConverterKey {
    fn from(target: Type) -> Self {
        ConverterKey::exact(&target)
    }
}

impl From<&Type> for ConverterKey {
    fn from(target: &Type) -> Self {
        ConverterKey::exact(target)
    }
}

impl From<ContainerKind> for ConverterKey {
    fn from(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::List => ConverterKey::List,
            ContainerKind::Set => ConverterKey::Set,
            ContainerKind::Map => ConverterKey::Map,
        }
    }
}

impl fmt::Display for ConverterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConverterKey::Exact(target) => write!(f, "{target}"),
            ConverterKey::List => f.write_str("<any list>"),
            ConverterKey::Set => f.write_str("<any set>"),
            ConverterKey::Map => f.write_str("<any map>"),
            ConverterKey::Array => f.write_str("<any array>"),
        }
    }
}

/// Read-only mapping from [`ConverterKey`] to converter
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: Arc<HashMap<ConverterKey, Arc<dyn Converter>>>,
}

impl ConverterRegistry {
    pub(crate) fn new(converters: HashMap<ConverterKey, Arc<dyn Converter>>) -> Self {
        Self {
            converters: Arc::new(converters),
        }
    }

    /// Look up a converter; absence is not an error here
    pub fn get(&self, key: &ConverterKey) -> Option<&Arc<dyn Converter>> {
        self.converters.get(key)
    }

    /// Exact-match lookup for a target type
    pub fn exact(&self, target: &Type) -> Option<&Arc<dyn Converter>> {
        self.get(&ConverterKey::exact(target))
    }

    pub fn contains_exact(&self, target: &Type) -> bool {
        self.exact(target).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ConverterKey> {
        self.converters.keys()
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.converters.keys()).finish()
    }
}

/// Factory produced from a [`FromText`](crate::FromText) implementation
pub type Factory = Arc<dyn Fn(&str) -> Result<Value, BoxError> + Send + Sync>;

/// Read-only mapping from named types to their factory
#[derive(Clone, Default)]
pub struct FactoryRegistry {
    factories: Arc<HashMap<Type, Factory>>,
}

impl FactoryRegistry {
    pub(crate) fn new(factories: HashMap<Type, Factory>) -> Self {
        Self {
            factories: Arc::new(factories),
        }
    }

    pub fn get(&self, target: &Type) -> Option<&Factory> {
        self.factories.get(&target.registry_key())
    }

    pub fn contains(&self, target: &Type) -> bool {
        self.get(target).is_some()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{from_fn, ConvertError};
    use crate::context::ParseContext;
    use pretty_assertions::assert_eq;

    fn registry() -> ConverterRegistry {
        let mut converters: HashMap<ConverterKey, Arc<dyn Converter>> = HashMap::new();
        converters.insert(
            ConverterKey::exact(&Type::primitive("i32")),
            Arc::new(from_fn(|input: &str| input.trim().parse::<i32>())),
        );
        converters.insert(
            ConverterKey::List,
            Arc::new(|_: &str, _: &ParseContext<'_>| -> Result<Value, ConvertError> {
                Ok(Value::List(vec![]))
            }),
        );
        ConverterRegistry::new(converters)
    }

    #[test]
    fn test_exact_lookup_ignores_nullability() {
        let registry = registry();
        assert!(registry.contains_exact(&Type::primitive("i32")));
        assert!(registry.contains_exact(&Type::named("i32")));
        assert!(!registry.contains_exact(&Type::primitive("i64")));
    }

    #[test]
    fn test_unknown_key_is_absent() {
        let registry = registry();
        assert!(registry.get(&ConverterKey::Map).is_none());
        assert!(registry.get(&ConverterKey::List).is_some());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_container_kind_keys() {
        assert_eq!(ConverterKey::from(ContainerKind::Set), ConverterKey::Set);
        assert_eq!(
            ConverterKey::from(Type::list(Type::primitive("u8"))),
            ConverterKey::Exact(Type::list(Type::named("u8")))
        );
        assert_eq!(ConverterKey::Array.to_string(), "<any array>");
    }

    #[test]
    fn test_clones_share_storage() {
        let registry = registry();
        let copy = registry.clone();
        assert!(Arc::ptr_eq(&registry.converters, &copy.converters));
    }
}

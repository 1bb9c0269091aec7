//! Type descriptors: the shape a piece of text should be parsed into.
//!
//! A [`Type`] is pure data. Equality and hashing are structural, so two
//! independently built descriptors for `List<i32>` are interchangeable as
//! registry keys. Rust types obtain their descriptor through [`Typed`].

use indexmap::{IndexMap, IndexSet};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::marker::PhantomData;
use std::net::IpAddr;
use std::path::PathBuf;

/// Name of a nominal type, e.g. `i32`, `List`, `Email`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(pub String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The generic container shapes that have built-in converters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    List,
    Set,
    Map,
}

impl ContainerKind {
    /// Number of type arguments a parameterized container of this kind takes
    pub fn arity(self) -> usize {
        match self {
            ContainerKind::List | ContainerKind::Set => 1,
            ContainerKind::Map => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ContainerKind::List => "List",
            ContainerKind::Set => "Set",
            ContainerKind::Map => "Map",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Descriptor of a parse target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Nominal types, generic or not: `i32`, `Email`, `List<String>`, `VecDeque<u8>`
    Named {
        name: TypeName,
        args: Vec<Type>,
        /// Container capability. Any type that is a list carries `Some(List)`,
        /// whatever its name.
        kind: Option<ContainerKind>,
        /// Non-nullable types reject the `null` literal
        primitive: bool,
    },

    /// Arrays; multi-dimensional arrays nest their element
    Array { element: Box<Type> },
}

impl Type {
    /// A nullable, non-generic named type
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: TypeName::new(name),
            args: vec![],
            kind: None,
            primitive: false,
        }
    }

    /// A non-nullable named type such as `i32` or `bool`
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Named {
            name: TypeName::new(name),
            args: vec![],
            kind: None,
            primitive: true,
        }
    }

    /// A named type with type arguments and no container capability
    pub fn generic(name: impl Into<String>, args: Vec<Type>) -> Self {
        Self::Named {
            name: TypeName::new(name),
            args,
            kind: None,
            primitive: false,
        }
    }

    /// `List<element>`
    pub fn list(element: Type) -> Self {
        Self::container(ContainerKind::List, vec![element])
    }

    /// `Set<element>`
    pub fn set(element: Type) -> Self {
        Self::container(ContainerKind::Set, vec![element])
    }

    /// `Map<key, value>`
    pub fn map(key: Type, value: Type) -> Self {
        Self::container(ContainerKind::Map, vec![key, value])
    }

    /// `[element]`
    pub fn array(element: Type) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    fn container(kind: ContainerKind, args: Vec<Type>) -> Self {
        Self::Named {
            name: TypeName::new(kind.name()),
            args,
            kind: Some(kind),
            primitive: false,
        }
    }

    /// Mark a named type as being a container of the given kind.
    /// Arrays are returned unchanged.
    pub fn assignable_to(self, kind: ContainerKind) -> Self {
        match self {
            Self::Named {
                name,
                args,
                primitive,
                ..
            } => Self::Named {
                name,
                args,
                kind: Some(kind),
                primitive,
            },
            array @ Self::Array { .. } => array,
        }
    }

    /// The nullable counterpart of this type
    pub fn nullable(self) -> Self {
        match self {
            Self::Named {
                name, args, kind, ..
            } => Self::Named {
                name,
                args,
                kind,
                primitive: false,
            },
            array @ Self::Array { .. } => array,
        }
    }

    pub fn name(&self) -> Option<&TypeName> {
        match self {
            Self::Named { name, .. } => Some(name),
            Self::Array { .. } => None,
        }
    }

    /// Type arguments; empty for arrays and non-generic types
    pub fn args(&self) -> &[Type] {
        match self {
            Self::Named { args, .. } => args,
            Self::Array { .. } => &[],
        }
    }

    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            Self::Named { kind, .. } => *kind,
            Self::Array { .. } => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Named { primitive: true, .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    /// Element type of an array
    pub fn element(&self) -> Option<&Type> {
        match self {
            Self::Array { element } => Some(element),
            Self::Named { .. } => None,
        }
    }

    /// Array nesting depth; 0 for named types
    pub fn dimensions(&self) -> usize {
        match self {
            Self::Array { element } => 1 + element.dimensions(),
            Self::Named { .. } => 0,
        }
    }

    /// The form used to key registries: nullability stripped at every level,
    /// so `i32` and `Option<i32>` share one converter.
    pub(crate) fn registry_key(&self) -> Type {
        match self {
            Self::Named {
                name, args, kind, ..
            } => Self::Named {
                name: name.clone(),
                args: args.iter().map(Type::registry_key).collect(),
                kind: *kind,
                primitive: false,
            },
            Self::Array { element } => Self::array(element.registry_key()),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name, args, .. } if args.is_empty() => write!(f, "{name}"),
            Self::Named { name, args, .. } => {
                let args = args
                    .iter()
                    .map(|arg| arg.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{name}<{args}>")
            }
            Self::Array { element } => write!(f, "[{element}]"),
        }
    }
}

/// Rust types that know their own descriptor
pub trait Typed {
    fn descriptor() -> Type;
}

macro_rules! primitive_typed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Typed for $ty {
                fn descriptor() -> Type {
                    Type::primitive(stringify!($ty))
                }
            }
        )*
    };
}

primitive_typed!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl Typed for String {
    fn descriptor() -> Type {
        Type::named("String")
    }
}

impl Typed for PathBuf {
    fn descriptor() -> Type {
        Type::named("PathBuf")
    }
}

impl Typed for IpAddr {
    fn descriptor() -> Type {
        Type::named("IpAddr")
    }
}

impl<T: Typed> Typed for Option<T> {
    fn descriptor() -> Type {
        T::descriptor().nullable()
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn descriptor() -> Type {
        Type::list(T::descriptor())
    }
}

impl<T: Typed> Typed for VecDeque<T> {
    fn descriptor() -> Type {
        Type::generic("VecDeque", vec![T::descriptor()]).assignable_to(ContainerKind::List)
    }
}

impl<T: Typed, S> Typed for HashSet<T, S> {
    fn descriptor() -> Type {
        Type::set(T::descriptor())
    }
}

impl<T: Typed, S> Typed for IndexSet<T, S> {
    fn descriptor() -> Type {
        Type::set(T::descriptor())
    }
}

impl<T: Typed> Typed for BTreeSet<T> {
    fn descriptor() -> Type {
        Type::generic("BTreeSet", vec![T::descriptor()]).assignable_to(ContainerKind::Set)
    }
}

impl<K: Typed, V: Typed, S> Typed for HashMap<K, V, S> {
    fn descriptor() -> Type {
        Type::map(K::descriptor(), V::descriptor())
    }
}

impl<K: Typed, V: Typed, S> Typed for IndexMap<K, V, S> {
    fn descriptor() -> Type {
        Type::map(K::descriptor(), V::descriptor())
    }
}

impl<K: Typed, V: Typed> Typed for BTreeMap<K, V> {
    fn descriptor() -> Type {
        Type::generic("BTreeMap", vec![K::descriptor(), V::descriptor()])
            .assignable_to(ContainerKind::Map)
    }
}

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn descriptor() -> Type {
        Type::array(T::descriptor())
    }
}

impl<T: Typed> Typed for Box<[T]> {
    fn descriptor() -> Type {
        Type::array(T::descriptor())
    }
}

/// A fully reified descriptor tied to the Rust type it produces.
///
/// Used for targets whose descriptor is not the one [`Typed`] would derive,
/// e.g. a custom container name with a registered converter.
pub struct GenericType<T> {
    descriptor: Type,
    marker: PhantomData<fn() -> T>,
}

impl<T> GenericType<T> {
    pub fn new(descriptor: Type) -> Self {
        Self {
            descriptor,
            marker: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &Type {
        &self.descriptor
    }
}

impl<T: Typed> GenericType<T> {
    pub fn of() -> Self {
        Self::new(T::descriptor())
    }
}

impl<T> Clone for GenericType<T> {
    fn clone(&self) -> Self {
        Self::new(self.descriptor.clone())
    }
}

impl<T> fmt::Debug for GenericType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GenericType").field(&self.descriptor).finish()
    }
}

//! Parse results.
//!
//! Dispatch works over runtime descriptors, so every converter produces a
//! [`Value`]. The typed entry points turn that back into Rust types through
//! [`FromValue`]; converters build values from Rust types through [`IntoValue`].

use indexmap::{IndexMap, IndexSet};
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// A parsed value
#[derive(Debug, Clone)]
pub enum Value {
    /// The `null` literal parsed into a nullable type
    Null,
    Boolean(bool),
    Char(char),
    /// Any signed integer width
    Integer(i128),
    /// Any unsigned integer width
    Unsigned(u128),
    Float(f64),
    String(String),

    /// Ordered elements in input order
    List(Vec<Value>),
    /// Distinct elements in first-seen order
    Set(IndexSet<Value>),
    /// Entries in encounter order
    Map(IndexMap<Value, Value>),
    /// Fixed-length sequence
    Array(Vec<Value>),

    /// A value of a type the crate does not model itself
    Object(Object),
}

impl Value {
    /// Wrap an arbitrary Rust value
    pub fn object<T: ObjectValue>(value: T) -> Self {
        Value::Object(Object::new(value))
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Char(_) => "Char",
            Value::Integer(_) => "Integer",
            Value::Unsigned(_) => "Unsigned",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Set(_) => "Set",
            Value::Map(_) => "Map",
            Value::Array(_) => "Array",
            Value::Object(object) => object.type_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of a list or array
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&IndexSet<Value>> {
        match self {
            Value::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Value, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Take the wrapped Rust value out of an [`Value::Object`]
    pub fn into_object<T: ObjectValue + Clone>(self) -> Result<T, ValueError> {
        let found = self.type_name();
        match self {
            Value::Object(object) => object.downcast::<T>().map_err(|object| {
                ValueError::TypeMismatch {
                    expected: std::any::type_name::<T>(),
                    found: object.type_name(),
                }
            }),
            _ => Err(ValueError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                found,
            }),
        }
    }
}

// Floats compare by bit pattern so that Eq and Hash agree
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Unsigned(a), Value::Unsigned(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Boolean(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Value::Char(c) => {
                2u8.hash(state);
                c.hash(state);
            }
            Value::Integer(n) => {
                3u8.hash(state);
                n.hash(state);
            }
            Value::Unsigned(n) => {
                4u8.hash(state);
                n.hash(state);
            }
            Value::Float(f) => {
                5u8.hash(state);
                f.to_bits().hash(state);
            }
            Value::String(s) => {
                6u8.hash(state);
                s.hash(state);
            }
            Value::List(items) => {
                7u8.hash(state);
                items.hash(state);
            }
            // Set and map equality ignore order, so only the size is hashed
            Value::Set(items) => {
                8u8.hash(state);
                items.len().hash(state);
            }
            Value::Map(entries) => {
                9u8.hash(state);
                entries.len().hash(state);
            }
            Value::Array(items) => {
                10u8.hash(state);
                items.hash(state);
            }
            Value::Object(object) => {
                11u8.hash(state);
                object.hash(state);
            }
        }
    }
}

/// Canonical text form. Flat values re-parse to an equal value with the
/// default splitters.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<'a>(
            f: &mut fmt::Formatter<'_>,
            items: impl Iterator<Item = &'a Value>,
        ) -> fmt::Result {
            for (i, item) in items.enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Unsigned(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::List(items) | Value::Array(items) => join(f, items.iter()),
            Value::Set(items) => join(f, items.iter()),
            Value::Map(entries) => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                Ok(())
            }
            Value::Object(object) => write!(f, "{object}"),
        }
    }
}

/// Canonical text of an object, as rendered by `Value`'s `Display`.
///
/// It must re-parse to an equal object with the type's converter.
/// [`object_value!`](crate::object_value) implements it from `Display` or
/// from a named method such as `PathBuf::display`.
pub trait ObjectText {
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Rust values that can live inside [`Value::Object`].
///
/// Implemented for every `'static` type with `Debug + ObjectText + Eq + Hash +
/// Send + Sync`, which lets objects take part in set and map equality.
pub trait ObjectValue: Any + fmt::Debug + ObjectText + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
    fn dyn_eq(&self, other: &dyn ObjectValue) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
    fn type_name(&self) -> &'static str;
}

impl<T> ObjectValue for T
where
    T: Any + fmt::Debug + ObjectText + Eq + Hash + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn dyn_eq(&self, other: &dyn ObjectValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Shared handle to a user value
#[derive(Clone)]
pub struct Object(Arc<dyn ObjectValue>);

impl Object {
    pub fn new<T: ObjectValue>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Unwrap into `T`, cloning only when the object is shared
    pub fn downcast<T: ObjectValue + Clone>(self) -> Result<T, Object> {
        if !self.is::<T>() {
            return Err(self);
        }
        match Arc::clone(&self.0).into_any().downcast::<T>() {
            Ok(inner) => {
                drop(self);
                Ok(Arc::try_unwrap(inner).unwrap_or_else(|shared| (*shared).clone()))
            }
            Err(_) => Err(self),
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        self.0.dyn_eq(other.0.as_ref())
    }
}

impl Eq for Object {}

impl Hash for Object {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.dyn_hash(state);
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_text(f)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Errors converting a [`Value`] into a Rust type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("expected {expected} elements, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}

impl ValueError {
    fn mismatch(expected: &'static str, found: &Value) -> Self {
        ValueError::TypeMismatch {
            expected,
            found: found.type_name(),
        }
    }
}

/// Build a [`Value`] from a Rust value
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Recover a Rust value from a [`Value`]
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

macro_rules! integer_value {
    ($variant:ident: $($ty:ty),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self as _)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    let out_of_range = |value: String| ValueError::OutOfRange {
                        value,
                        target: stringify!($ty),
                    };
                    match value {
                        Value::Integer(n) => <$ty>::try_from(n).map_err(|_| out_of_range(n.to_string())),
                        Value::Unsigned(n) => <$ty>::try_from(n).map_err(|_| out_of_range(n.to_string())),
                        other => Err(ValueError::mismatch(stringify!($ty), &other)),
                    }
                }
            }
        )*
    };
}

integer_value!(Integer: i8, i16, i32, i64, i128, isize);
integer_value!(Unsigned: u8, u16, u32, u64, u128, usize);

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(x) => Ok(x),
            other => Err(ValueError::mismatch("f64", &other)),
        }
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(x) => Ok(x as f32),
            other => Err(ValueError::mismatch("f32", &other)),
        }
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Boolean(self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(ValueError::mismatch("bool", &other)),
        }
    }
}

impl IntoValue for char {
    fn into_value(self) -> Value {
        Value::Char(self)
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Char(c) => Ok(c),
            other => Err(ValueError::mismatch("char", &other)),
        }
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(ValueError::mismatch("String", &other)),
        }
    }
}

/// Implement [`ObjectText`], [`IntoValue`] and [`FromValue`] for types stored
/// as [`Value::Object`].
///
/// `object_value!(A, B)` renders through `Display`; `object_value!(T => method)`
/// renders through the `Display` value returned by `T::method(&self)`.
/// The types must be `Clone + Debug + Eq + Hash + Send + Sync`.
#[macro_export]
macro_rules! object_value {
    (@convert $ty:ty) => {
        impl $crate::IntoValue for $ty {
            fn into_value(self) -> $crate::Value {
                $crate::Value::object(self)
            }
        }

        impl $crate::FromValue for $ty {
            fn from_value(value: $crate::Value) -> ::std::result::Result<Self, $crate::ValueError> {
                value.into_object::<$ty>()
            }
        }
    };
    ($ty:ty => $text:ident) => {
        impl $crate::ObjectText for $ty {
            fn fmt_text(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.$text(), f)
            }
        }

        $crate::object_value!(@convert $ty);
    };
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::ObjectText for $ty {
                fn fmt_text(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    ::std::fmt::Display::fmt(self, f)
                }
            }

            $crate::object_value!(@convert $ty);
        )*
    };
}

object_value!(PathBuf => display);
object_value!(IpAddr);

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(value) => value.into_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

fn sequence<T: FromValue>(value: Value, expected: &'static str) -> Result<Vec<T>, ValueError> {
    match value {
        Value::List(items) | Value::Array(items) => items.into_iter().map(T::from_value).collect(),
        other => Err(ValueError::mismatch(expected, &other)),
    }
}

fn set_elements<T: FromValue>(value: Value, expected: &'static str) -> Result<Vec<T>, ValueError> {
    match value {
        Value::Set(items) => items.into_iter().map(T::from_value).collect(),
        other => Err(ValueError::mismatch(expected, &other)),
    }
}

fn map_entries<K: FromValue, V: FromValue>(
    value: Value,
    expected: &'static str,
) -> Result<Vec<(K, V)>, ValueError> {
    match value {
        Value::Map(entries) => entries
            .into_iter()
            .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
            .collect(),
        other => Err(ValueError::mismatch(expected, &other)),
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        sequence(value, "Vec")
    }
}

impl<T: IntoValue> IntoValue for VecDeque<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for VecDeque<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        sequence(value, "VecDeque").map(VecDeque::from)
    }
}

impl<T: FromValue, const N: usize> FromValue for [T; N] {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        let items: Vec<T> = sequence(value, "array")?;
        let found = items.len();
        <[T; N]>::try_from(items).map_err(|_| ValueError::LengthMismatch { expected: N, found })
    }
}

impl<T: IntoValue, const N: usize> IntoValue for [T; N] {
    fn into_value(self) -> Value {
        Value::Array(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for Box<[T]> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        sequence(value, "array").map(Vec::into_boxed_slice)
    }
}

impl<T: IntoValue> IntoValue for Box<[T]> {
    fn into_value(self) -> Value {
        Value::Array(
            self.into_vec()
                .into_iter()
                .map(IntoValue::into_value)
                .collect(),
        )
    }
}

impl<T: IntoValue, S> IntoValue for HashSet<T, S> {
    fn into_value(self) -> Value {
        Value::Set(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T, S> FromValue for HashSet<T, S>
where
    T: FromValue + Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(set_elements(value, "HashSet")?.into_iter().collect())
    }
}

impl<T: IntoValue, S> IntoValue for IndexSet<T, S> {
    fn into_value(self) -> Value {
        Value::Set(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T, S> FromValue for IndexSet<T, S>
where
    T: FromValue + Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(set_elements(value, "IndexSet")?.into_iter().collect())
    }
}

impl<T: IntoValue> IntoValue for BTreeSet<T> {
    fn into_value(self) -> Value {
        Value::Set(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(set_elements(value, "BTreeSet")?.into_iter().collect())
    }
}

impl<K: IntoValue, V: IntoValue, S> IntoValue for HashMap<K, V, S> {
    fn into_value(self) -> Value {
        Value::Map(
            self.into_iter()
                .map(|(k, v)| (k.into_value(), v.into_value()))
                .collect(),
        )
    }
}

impl<K, V, S> FromValue for HashMap<K, V, S>
where
    K: FromValue + Eq + Hash,
    V: FromValue,
    S: BuildHasher + Default,
{
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(map_entries(value, "HashMap")?.into_iter().collect())
    }
}

impl<K: IntoValue, V: IntoValue, S> IntoValue for IndexMap<K, V, S> {
    fn into_value(self) -> Value {
        Value::Map(
            self.into_iter()
                .map(|(k, v)| (k.into_value(), v.into_value()))
                .collect(),
        )
    }
}

impl<K, V, S> FromValue for IndexMap<K, V, S>
where
    K: FromValue + Eq + Hash,
    V: FromValue,
    S: BuildHasher + Default,
{
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(map_entries(value, "IndexMap")?.into_iter().collect())
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for BTreeMap<K, V> {
    fn into_value(self) -> Value {
        Value::Map(
            self.into_iter()
                .map(|(k, v)| (k.into_value(), v.into_value()))
                .collect(),
        )
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(map_entries(value, "BTreeMap")?.into_iter().collect())
    }
}

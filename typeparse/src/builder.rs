//! Builder producing frozen [`TypeParser`] instances
//!
//! Registration happens here, on a mutable builder. [`TypeParserBuilder::build`]
//! copies the registrations into read-only registries, so later changes to the
//! builder never reach parsers already built.

use crate::builtins;
use crate::containers::{ArrayConverter, ListConverter, MapConverter, SetConverter};
use crate::converter::{from_fn, Converter, FromText};
use crate::dispatch::TypeParser;
use crate::error::BoxError;
use crate::registry::{ConverterKey, ConverterRegistry, Factory, FactoryRegistry};
use crate::splitter::{DelimiterSplitter, Splitter};
use crate::types::{Type, Typed};
use crate::value::{IntoValue, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub struct TypeParserBuilder {
    converters: HashMap<ConverterKey, Arc<dyn Converter>>,
    factories: HashMap<Type, Factory>,
    splitter: Arc<dyn Splitter>,
    key_value_splitter: Arc<dyn Splitter>,
}

impl TypeParserBuilder {
    /// Builder preloaded with every built-in scalar converter
    pub fn new() -> Self {
        let mut builder = Self::empty();
        for (target, converter) in builtins::scalar_converters() {
            builder
                .converters
                .insert(ConverterKey::exact(&target), converter);
        }
        builder
    }

    /// Builder with only the container and array converters and the default
    /// splitters
    pub fn empty() -> Self {
        let mut converters: HashMap<ConverterKey, Arc<dyn Converter>> = HashMap::new();
        converters.insert(ConverterKey::List, Arc::new(ListConverter));
        converters.insert(ConverterKey::Set, Arc::new(SetConverter));
        converters.insert(ConverterKey::Map, Arc::new(MapConverter));
        converters.insert(ConverterKey::Array, Arc::new(ArrayConverter));

        Self {
            converters,
            factories: HashMap::new(),
            splitter: Arc::new(DelimiterSplitter::elements()),
            key_value_splitter: Arc::new(DelimiterSplitter::key_value()),
        }
    }

    /// Register a converter, replacing any previous one for the same key.
    ///
    /// Exact keys win over container, array and factory handling, so this can
    /// also override how one particular container type is parsed.
    pub fn register_converter(
        &mut self,
        key: impl Into<ConverterKey>,
        converter: impl Converter + 'static,
    ) -> &mut Self {
        self.converters.insert(key.into(), Arc::new(converter));
        self
    }

    /// Register a plain parsing function for `T`
    pub fn register_fn<T, E, F>(&mut self, parse: F) -> &mut Self
    where
        T: Typed + IntoValue + 'static,
        E: std::error::Error + Send + Sync + 'static,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        self.register_converter(T::descriptor(), from_fn(parse))
    }

    /// Register `T`'s [`FromText`] implementation as its fallback factory
    pub fn register_factory<T>(&mut self) -> &mut Self
    where
        T: FromText + Typed + IntoValue + 'static,
    {
        let factory: Factory = Arc::new(|input: &str| -> Result<Value, BoxError> {
            T::from_text(input)
                .map(IntoValue::into_value)
                .map_err(BoxError::from)
        });
        self.factories
            .insert(T::descriptor().registry_key(), factory);
        self
    }

    /// Remove the converter registered under `key`, if any
    pub fn unregister(&mut self, key: impl Into<ConverterKey>) -> &mut Self {
        self.converters.remove(&key.into());
        self
    }

    /// Replace the splitter that breaks container input into elements
    pub fn with_splitter(&mut self, splitter: impl Splitter + 'static) -> &mut Self {
        self.splitter = Arc::new(splitter);
        self
    }

    /// Replace the splitter that breaks a map entry into key and value
    pub fn with_key_value_splitter(&mut self, splitter: impl Splitter + 'static) -> &mut Self {
        self.key_value_splitter = Arc::new(splitter);
        self
    }

    pub fn build(&self) -> TypeParser {
        tracing::debug!(
            converters = self.converters.len(),
            factories = self.factories.len(),
            "built type parser"
        );
        TypeParser::from_parts(
            ConverterRegistry::new(self.converters.clone()),
            FactoryRegistry::new(self.factories.clone()),
            Arc::clone(&self.splitter),
            Arc::clone(&self.key_value_splitter),
        )
    }
}

impl Default for TypeParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeParserBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeParserBuilder")
            .field("converters", &self.converters.keys().collect::<Vec<_>>())
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

//! The dispatcher: classification, strategy selection and error normalization
//!
//! A parse runs in three steps:
//! 1. The target is classified into a [`Shape`]. Exact registrations win,
//!    then parameterized containers, then arrays, then plain named types.
//! 2. A strategy is chosen for the shape: the exact converter, the container
//!    or array slot, or the type's `from_text` factory.
//! 3. The null literal is handled, otherwise the strategy runs and any
//!    failure is normalized into a [`ParseError`].
//!
//! Container converters re-enter step 1 through their [`ParseContext`] for
//! every element, so nesting depth is bounded only by the target type.

use crate::builder::TypeParserBuilder;
use crate::context::ParseContext;
use crate::converter::{Converter, FACTORY_METHOD};
use crate::error::ParseError;
use crate::registry::{ConverterKey, ConverterRegistry, Factory, FactoryRegistry};
use crate::splitter::Splitter;
use crate::types::{ContainerKind, GenericType, Type, TypeName, Typed};
use crate::value::{FromValue, Value};
use std::fmt;
use std::sync::Arc;

/// Input text standing for an absent value, compared trimmed and ignoring case
pub const NULL_LITERAL: &str = "null";

/// How the dispatcher sees a target type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape<'a> {
    /// A converter is registered for this exact type
    Exact,
    /// A list, set or map with its full set of type arguments
    Parameterized(ContainerKind),
    /// An array of any dimension
    Array,
    /// A non-generic named type; only a factory can parse it
    Nominal(&'a TypeName),
    /// Generic, but neither registered nor a complete container
    Unresolved,
}

enum Strategy<'p> {
    Convert(&'p Arc<dyn Converter>),
    Construct(&'p Factory),
}

/// Type-directed string parser.
///
/// Immutable once built, so one instance (or an `Arc` of it) can serve any
/// number of threads. Cloning is cheap and shares the registries.
#[derive(Clone)]
pub struct TypeParser {
    converters: ConverterRegistry,
    factories: FactoryRegistry,
    splitter: Arc<dyn Splitter>,
    key_value_splitter: Arc<dyn Splitter>,
}

impl TypeParser {
    pub fn builder() -> TypeParserBuilder {
        TypeParserBuilder::new()
    }

    pub(crate) fn from_parts(
        converters: ConverterRegistry,
        factories: FactoryRegistry,
        splitter: Arc<dyn Splitter>,
        key_value_splitter: Arc<dyn Splitter>,
    ) -> Self {
        Self {
            converters,
            factories,
            splitter,
            key_value_splitter,
        }
    }

    /// Parse `input` as `T`
    ///
    /// ```
    /// use std::collections::HashMap;
    ///
    /// let parser = typeparse::TypeParser::builder().build();
    /// let ports: HashMap<String, u16> = parser.parse("http=80, https=443").unwrap();
    /// assert_eq!(ports["https"], 443);
    /// ```
    pub fn parse<T: Typed + FromValue>(&self, input: &str) -> Result<T, ParseError> {
        let target = T::descriptor();
        let value = self.dispatch(input, &target)?;
        Self::extract(input, &target, value)
    }

    /// Parse `input` as the type described by `generic`
    pub fn parse_generic<T: FromValue>(
        &self,
        input: &str,
        generic: &GenericType<T>,
    ) -> Result<T, ParseError> {
        let target = generic.descriptor();
        let value = self.dispatch(input, target)?;
        Self::extract(input, target, value)
    }

    /// Untyped entry point; both arguments are required
    pub fn parse_type(
        &self,
        input: Option<&str>,
        target: Option<&Type>,
    ) -> Result<Value, ParseError> {
        let input = input.ok_or(ParseError::ArgumentMissing { argument: "input" })?;
        let target = target.ok_or(ParseError::ArgumentMissing { argument: "target" })?;
        self.dispatch(input, target)
    }

    /// Classify `target` against this parser's registrations
    pub fn classify<'t>(&self, target: &'t Type) -> Shape<'t> {
        if self.converters.contains_exact(target) {
            return Shape::Exact;
        }
        match target {
            Type::Named {
                kind: Some(kind),
                args,
                ..
            } if args.len() == kind.arity() => Shape::Parameterized(*kind),
            Type::Array { .. } => Shape::Array,
            Type::Named { name, args, .. } if args.is_empty() => Shape::Nominal(name),
            Type::Named { .. } => Shape::Unresolved,
        }
    }

    pub(crate) fn dispatch(&self, input: &str, target: &Type) -> Result<Value, ParseError> {
        let shape = self.classify(target);
        tracing::trace!(descriptor = %target, ?shape, "dispatching");

        let result = self.run(input, target, shape);
        if let Err(error) = &result {
            tracing::debug!(descriptor = %target, input, %error, "parse failed");
        }
        result
    }

    fn run(&self, input: &str, target: &Type, shape: Shape<'_>) -> Result<Value, ParseError> {
        let Some(strategy) = self.strategy(target, shape) else {
            return Err(ParseError::unresolved(input, target, convention(target)));
        };

        if is_null_literal(input) {
            return if target.is_primitive() {
                Err(ParseError::null_not_allowed(input, target))
            } else {
                Ok(Value::Null)
            };
        }

        match strategy {
            Strategy::Convert(converter) => {
                let cx = ParseContext::new(self, target);
                converter
                    .convert(input, &cx)
                    .map_err(|error| ParseError::from_convert(input, target, error))
            }
            Strategy::Construct(factory) => {
                factory(input).map_err(|error| ParseError::conversion(input, target, error))
            }
        }
    }

    fn strategy(&self, target: &Type, shape: Shape<'_>) -> Option<Strategy<'_>> {
        match shape {
            Shape::Exact => self.converters.exact(target).map(Strategy::Convert),
            Shape::Parameterized(kind) => self
                .converters
                .get(&ConverterKey::from(kind))
                .map(Strategy::Convert),
            Shape::Array => self
                .converters
                .get(&ConverterKey::Array)
                .map(Strategy::Convert),
            Shape::Nominal(_) => self.factories.get(target).map(Strategy::Construct),
            Shape::Unresolved => None,
        }
    }

    /// A null that the Rust type cannot hold is a null on a non-nullable target
    fn extract<T: FromValue>(input: &str, target: &Type, value: Value) -> Result<T, ParseError> {
        let null = value.is_null();
        T::from_value(value).map_err(|error| {
            if null {
                ParseError::null_not_allowed(input, target)
            } else {
                ParseError::conversion(input, target, Box::new(error))
            }
        })
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn factories(&self) -> &FactoryRegistry {
        &self.factories
    }

    /// Splitter between container elements
    pub fn splitter(&self) -> &dyn Splitter {
        self.splitter.as_ref()
    }

    /// Splitter between a map key and its value
    pub fn key_value_splitter(&self) -> &dyn Splitter {
        self.key_value_splitter.as_ref()
    }
}

impl Default for TypeParser {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for TypeParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeParser")
            .field("converters", &self.converters)
            .field("factories", &self.factories)
            .finish_non_exhaustive()
    }
}

fn is_null_literal(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(NULL_LITERAL)
}

fn convention(target: &Type) -> String {
    match target.name() {
        Some(name) => format!("{name}::{FACTORY_METHOD}(&str)"),
        None => format!("{target}::{FACTORY_METHOD}(&str)"),
    }
}

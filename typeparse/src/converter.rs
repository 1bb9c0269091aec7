//! The converter contract and the factory convention.
//!
//! A [`Converter`] turns text into a [`Value`] for one registry key. It gets a
//! [`ParseContext`] so container converters can hand sub-strings back to the
//! dispatcher. A [`FromText`] type is the last-resort strategy for named types
//! with no converter.

use crate::context::ParseContext;
use crate::error::{BoxError, ParseError};
use crate::value::{IntoValue, Value};
use std::fmt;

/// Name of the factory convention, as reported in `UnresolvedType` errors
pub const FACTORY_METHOD: &str = "from_text";

/// Text-to-value conversion for one registry key.
///
/// Converters must not rely on state mutated between calls: one converter
/// instance serves every thread sharing the parser.
pub trait Converter: Send + Sync {
    fn convert(&self, input: &str, cx: &ParseContext<'_>) -> Result<Value, ConvertError>;
}

impl<F> Converter for F
where
    F: Fn(&str, &ParseContext<'_>) -> Result<Value, ConvertError> + Send + Sync,
{
    fn convert(&self, input: &str, cx: &ParseContext<'_>) -> Result<Value, ConvertError> {
        self(input, cx)
    }
}

/// Build a converter from a plain parsing function that ignores the context
pub fn from_fn<T, E, F>(parse: F) -> impl Converter
where
    T: IntoValue,
    E: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Result<T, E> + Send + Sync,
{
    move |input: &str, _cx: &ParseContext<'_>| -> Result<Value, ConvertError> {
        Ok(parse(input)?.into_value())
    }
}

/// Failure reported by a converter.
///
/// Any `std::error::Error` converts into `Failed` through `?`; a
/// [`ParseError`] returned that way is kept as a nested dispatch failure.
#[derive(Debug)]
pub enum ConvertError {
    /// A container element failed to parse
    Element {
        index: usize,
        element: String,
        source: ParseError,
    },

    /// A map entry did not split into exactly a key and a value
    MalformedPair { pair: String, parts: usize },

    Failed(BoxError),
}

impl ConvertError {
    /// A failure described only by a message
    pub fn msg(message: impl fmt::Display) -> Self {
        ConvertError::Failed(message.to_string().into())
    }

    pub fn element(index: usize, element: &str, source: ParseError) -> Self {
        ConvertError::Element {
            index,
            element: element.to_string(),
            source,
        }
    }
}

impl<E> From<E> for ConvertError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        ConvertError::Failed(Box::new(error))
    }
}

/// Opt-in single-string construction, used when no converter is registered
/// for a named type.
///
/// Register implementors with
/// [`TypeParserBuilder::register_factory`](crate::TypeParserBuilder::register_factory).
pub trait FromText: Sized {
    type Err: std::error::Error + Send + Sync + 'static;

    fn from_text(input: &str) -> Result<Self, Self::Err>;
}

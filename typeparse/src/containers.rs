//! Built-in converters for generic containers and arrays
//!
//! Each converter splits its input with the context's splitters and parses
//! every piece as the nested type through the context, so containers of
//! containers recurse through the dispatcher. The first failing piece aborts
//! the whole container.

use crate::context::ParseContext;
use crate::converter::{ConvertError, Converter};
use crate::types::Type;
use crate::value::Value;
use indexmap::IndexMap;

/// `List<T>` and every list-capable type
#[derive(Debug, Clone, Copy, Default)]
pub struct ListConverter;

/// `Set<T>` and every set-capable type; duplicates collapse by value equality
#[derive(Debug, Clone, Copy, Default)]
pub struct SetConverter;

/// `Map<K, V>` and every map-capable type; entries keep encounter order
#[derive(Debug, Clone, Copy, Default)]
pub struct MapConverter;

/// `[T]` at any number of dimensions
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayConverter;

fn parse_elements<C: FromIterator<Value>>(
    input: &str,
    element: &Type,
    cx: &ParseContext<'_>,
) -> Result<C, ConvertError> {
    cx.split(input)
        .into_iter()
        .enumerate()
        .map(|(index, piece)| {
            cx.parse(&piece, element)
                .map_err(|source| ConvertError::element(index, &piece, source))
        })
        .collect()
}

impl Converter for ListConverter {
    fn convert(&self, input: &str, cx: &ParseContext<'_>) -> Result<Value, ConvertError> {
        let element = cx.element_type()?;
        parse_elements(input, element, cx).map(Value::List)
    }
}

impl Converter for SetConverter {
    fn convert(&self, input: &str, cx: &ParseContext<'_>) -> Result<Value, ConvertError> {
        let element = cx.element_type()?;
        parse_elements(input, element, cx).map(Value::Set)
    }
}

impl Converter for ArrayConverter {
    fn convert(&self, input: &str, cx: &ParseContext<'_>) -> Result<Value, ConvertError> {
        let element = cx.element_type()?;
        parse_elements(input, element, cx).map(Value::Array)
    }
}

impl Converter for MapConverter {
    fn convert(&self, input: &str, cx: &ParseContext<'_>) -> Result<Value, ConvertError> {
        let key_type = cx.key_type()?;
        let value_type = cx.value_type()?;

        let mut entries = IndexMap::new();
        for (index, pair) in cx.split(input).into_iter().enumerate() {
            let parts = cx.split_pair(&pair);
            let [key, value] = parts.as_slice() else {
                return Err(ConvertError::MalformedPair {
                    pair,
                    parts: parts.len(),
                });
            };

            let key = cx
                .parse(key, key_type)
                .map_err(|source| ConvertError::element(index, &pair, source))?;
            let value = cx
                .parse(value, value_type)
                .map_err(|source| ConvertError::element(index, &pair, source))?;
            entries.insert(key, value);
        }
        Ok(Value::Map(entries))
    }
}

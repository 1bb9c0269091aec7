//! Typeparse
//!
//! Type-directed string parsing: turn text into typed values, including nested
//! generic containers such as `Vec<HashMap<String, i32>>`.
//!
//! ## Architecture
//!
//! - **Type descriptors** (`types`): runtime `Type` values standing in for Rust
//!   types, with container capability and nullability
//! - **Dispatcher** (`dispatch`): classifies a descriptor, picks a converter or
//!   factory and normalizes failures into `ParseError`
//! - **Converters** (`converter`, `builtins`, `containers`): scalar parsing and
//!   the recursive list/set/map/array converters
//! - **Registries** (`registry`, `builder`): frozen converter and factory
//!   tables produced by `TypeParserBuilder`
//!
//! ## Usage
//!
//! ```
//! let numbers: Vec<i32> = typeparse::parse("1, 2, 3").unwrap();
//! assert_eq!(numbers, vec![1, 2, 3]);
//!
//! let missing: Option<String> = typeparse::parse("null").unwrap();
//! assert_eq!(missing, None);
//! ```

pub mod builder;
pub mod builtins;
pub mod containers;
pub mod context;
pub mod converter;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod splitter;
pub mod types;
pub mod value;

use lazy_static::lazy_static;

// Re-export public API
pub use builder::TypeParserBuilder;
pub use builtins::{scalar_converters, ScalarError};
pub use containers::{ArrayConverter, ListConverter, MapConverter, SetConverter};
pub use context::ParseContext;
pub use converter::{from_fn, ConvertError, Converter, FromText, FACTORY_METHOD};
pub use dispatch::{Shape, TypeParser, NULL_LITERAL};
pub use error::{BoxError, ErrorKind, ParseError};
pub use registry::{ConverterKey, ConverterRegistry, Factory, FactoryRegistry};
pub use splitter::{DelimiterSplitter, Splitter};
pub use types::{ContainerKind, GenericType, Type, TypeName, Typed};
pub use value::{FromValue, IntoValue, Object, ObjectText, ObjectValue, Value, ValueError};

lazy_static! {
    /// Parser with the built-in converters and default splitters
    static ref DEFAULT_PARSER: TypeParser = TypeParser::builder().build();
}

/// The shared parser behind [`parse`] and [`parse_type`]
pub fn default_parser() -> &'static TypeParser {
    &DEFAULT_PARSER
}

// Main parsing functions
pub fn parse<T: Typed + FromValue>(input: &str) -> Result<T, ParseError> {
    DEFAULT_PARSER.parse(input)
}

pub fn parse_type(input: Option<&str>, target: Option<&Type>) -> Result<Value, ParseError> {
    DEFAULT_PARSER.parse_type(input, target)
}

// Version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Error types for type-directed parsing
//!
//! Every failure leaving the dispatcher is a [`ParseError`]. Apart from
//! `ArgumentMissing`, each variant carries the original input text and the
//! display form of the target type, so a message stands on its own.

use crate::converter::ConvertError;
use crate::types::Type;
use miette::Diagnostic;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// Boxed error produced by converters and factories
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The condition behind a [`ParseError`], independent of annotation layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ArgumentMissing,
    NullNotAllowed,
    UnresolvedType,
    MalformedPair,
    ConversionFailed,
}

/// Main parse error type with miette integration
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("required argument '{argument}' is missing")]
    #[diagnostic(
        code(typeparse::argument_missing),
        help("Pass both the input text and the target type")
    )]
    ArgumentMissing { argument: &'static str },

    #[error("can not parse \"{input}\" to type {target}: primitive type can not be null")]
    #[diagnostic(
        code(typeparse::null_not_allowed),
        help("Use a nullable target such as Option<{target}> to accept null")
    )]
    NullNotAllowed { input: String, target: String },

    #[error(
        "can not parse \"{input}\" to type {target}: there is either no registered converter \
         for that type, or that type does not provide '{convention}'"
    )]
    #[diagnostic(
        code(typeparse::unresolved_type),
        help("Register a converter for {target}, or implement FromText and register it as a factory")
    )]
    UnresolvedType {
        input: String,
        target: String,
        convention: String,
    },

    #[error(
        "can not parse \"{input}\" to type {target}: \"{pair}\" split into {parts} part(s), \
         expected a key and a value"
    )]
    #[diagnostic(
        code(typeparse::malformed_pair),
        help("Each map entry must hold exactly one key/value separator")
    )]
    MalformedPair {
        input: String,
        target: String,
        pair: String,
        parts: usize,
    },

    #[error("can not parse \"{input}\" to type {target}: {cause}")]
    #[diagnostic(code(typeparse::conversion_failed))]
    ConversionFailed {
        input: String,
        target: String,
        cause: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("can not parse \"{input}\" to type {target}: element {index} (\"{element}\"): {source}")]
    #[diagnostic(code(typeparse::element))]
    Element {
        input: String,
        target: String,
        index: usize,
        element: String,
        #[source]
        source: Box<ParseError>,
    },

    #[error("can not parse \"{input}\" to type {target}: {source}")]
    #[diagnostic(code(typeparse::nested))]
    Nested {
        input: String,
        target: String,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// The underlying condition; annotation layers report what they wrap
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::ArgumentMissing { .. } => ErrorKind::ArgumentMissing,
            ParseError::NullNotAllowed { .. } => ErrorKind::NullNotAllowed,
            ParseError::UnresolvedType { .. } => ErrorKind::UnresolvedType,
            ParseError::MalformedPair { .. } => ErrorKind::MalformedPair,
            ParseError::ConversionFailed { .. } => ErrorKind::ConversionFailed,
            ParseError::Element { source, .. } | ParseError::Nested { source, .. } => {
                source.kind()
            }
        }
    }

    /// The input text this error was raised for
    pub fn input(&self) -> Option<&str> {
        match self {
            ParseError::ArgumentMissing { .. } => None,
            ParseError::NullNotAllowed { input, .. }
            | ParseError::UnresolvedType { input, .. }
            | ParseError::MalformedPair { input, .. }
            | ParseError::ConversionFailed { input, .. }
            | ParseError::Element { input, .. }
            | ParseError::Nested { input, .. } => Some(input),
        }
    }

    /// Display form of the target type
    pub fn target(&self) -> Option<&str> {
        match self {
            ParseError::ArgumentMissing { .. } => None,
            ParseError::NullNotAllowed { target, .. }
            | ParseError::UnresolvedType { target, .. }
            | ParseError::MalformedPair { target, .. }
            | ParseError::ConversionFailed { target, .. }
            | ParseError::Element { target, .. }
            | ParseError::Nested { target, .. } => Some(target),
        }
    }

    /// The innermost error, past every annotation layer
    pub fn root(&self) -> &ParseError {
        match self {
            ParseError::Element { source, .. } | ParseError::Nested { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn null_not_allowed(input: &str, target: &Type) -> Self {
        ParseError::NullNotAllowed {
            input: input.to_string(),
            target: target.to_string(),
        }
    }

    pub(crate) fn unresolved(input: &str, target: &Type, convention: String) -> Self {
        ParseError::UnresolvedType {
            input: input.to_string(),
            target: target.to_string(),
            convention,
        }
    }

    pub(crate) fn conversion(input: &str, target: &Type, error: BoxError) -> Self {
        ParseError::ConversionFailed {
            input: input.to_string(),
            target: target.to_string(),
            cause: describe(error.as_ref()),
            source: Some(error),
        }
    }

    /// Normalize a converter failure into the dispatcher's error shape
    pub(crate) fn from_convert(input: &str, target: &Type, error: ConvertError) -> Self {
        match error {
            ConvertError::Element {
                index,
                element,
                source,
            } => ParseError::Element {
                input: input.to_string(),
                target: target.to_string(),
                index,
                element,
                source: Box::new(source),
            },
            ConvertError::MalformedPair { pair, parts } => ParseError::MalformedPair {
                input: input.to_string(),
                target: target.to_string(),
                pair,
                parts,
            },
            ConvertError::Failed(error) => match error.downcast::<ParseError>() {
                Ok(nested) => ParseError::Nested {
                    input: input.to_string(),
                    target: target.to_string(),
                    source: nested,
                },
                Err(error) => ParseError::conversion(input, target, error),
            },
        }
    }
}

fn describe(error: &(dyn std::error::Error + Send + Sync + 'static)) -> String {
    if error.is::<ParseIntError>() || error.is::<ParseFloatError>() {
        format!("number format: {error}")
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int_error() -> BoxError {
        Box::new("x1".parse::<i32>().unwrap_err())
    }

    #[test]
    fn test_number_format_cause() {
        let error = ParseError::conversion("x1", &Type::primitive("i32"), int_error());
        assert_eq!(error.kind(), ErrorKind::ConversionFailed);
        assert_eq!(
            error.to_string(),
            "can not parse \"x1\" to type i32: number format: invalid digit found in string"
        );
    }

    #[test]
    fn test_plain_cause_is_kept() {
        let error =
            ParseError::conversion("?", &Type::named("Email"), "missing '@'".into());
        assert_eq!(
            error.to_string(),
            "can not parse \"?\" to type Email: missing '@'"
        );
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_element_wrapper_reports_inner_kind() {
        let list = Type::list(Type::primitive("i32"));
        let inner = ParseError::null_not_allowed("null", &Type::primitive("i32"));
        let error = ParseError::from_convert(
            "1,null",
            &list,
            ConvertError::Element {
                index: 1,
                element: "null".to_string(),
                source: inner,
            },
        );

        assert_eq!(error.kind(), ErrorKind::NullNotAllowed);
        assert_eq!(error.input(), Some("1,null"));
        assert_eq!(error.target(), Some("List<i32>"));
        assert_eq!(error.root().input(), Some("null"));
        assert!(error.to_string().contains("element 1 (\"null\")"));
    }

    #[test]
    fn test_nested_parse_error_is_not_flattened() {
        let inner = ParseError::unresolved("x", &Type::named("Thing"), "Thing::from_text(&str)".into());
        let error = ParseError::from_convert(
            "x",
            &Type::named("Wrapper"),
            ConvertError::Failed(Box::new(inner)),
        );

        assert!(matches!(error, ParseError::Nested { .. }));
        assert_eq!(error.kind(), ErrorKind::UnresolvedType);
        assert_eq!(error.target(), Some("Wrapper"));
    }

    #[test]
    fn test_argument_missing_has_no_input() {
        let error = ParseError::ArgumentMissing { argument: "input" };
        assert_eq!(error.kind(), ErrorKind::ArgumentMissing);
        assert_eq!(error.input(), None);
        assert_eq!(error.to_string(), "required argument 'input' is missing");
    }
}

//! Per-call parse context handed to converters.
//!
//! A [`ParseContext`] is bound to the parser and to the target type of the
//! current dispatch step. Converters use it to learn their element, key and
//! value types and to parse sub-strings as those types, which is how nested
//! generic targets recurse without converters knowing about dispatch.

use crate::converter::ConvertError;
use crate::dispatch::TypeParser;
use crate::error::ParseError;
use crate::types::Type;
use crate::value::Value;
use std::fmt;

#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    parser: &'a TypeParser,
    target: &'a Type,
}

impl<'a> ParseContext<'a> {
    pub(crate) fn new(parser: &'a TypeParser, target: &'a Type) -> Self {
        Self { parser, target }
    }

    /// The type being parsed in this step
    pub fn target(&self) -> &'a Type {
        self.target
    }

    /// Parse `input` as `target` through the full dispatch rules
    pub fn parse(&self, input: &str, target: &Type) -> Result<Value, ParseError> {
        self.parser.dispatch(input, target)
    }

    /// Element type of a list, set or array target
    pub fn element_type(&self) -> Result<&'a Type, ConvertError> {
        match self.target {
            Type::Array { element } => Ok(element),
            Type::Named { .. } => self.type_argument(0, "element"),
        }
    }

    /// Key type of a map target
    pub fn key_type(&self) -> Result<&'a Type, ConvertError> {
        self.type_argument(0, "key")
    }

    /// Value type of a map target
    pub fn value_type(&self) -> Result<&'a Type, ConvertError> {
        self.type_argument(1, "value")
    }

    fn type_argument(&self, index: usize, role: &str) -> Result<&'a Type, ConvertError> {
        self.target
            .args()
            .get(index)
            .ok_or_else(|| ConvertError::msg(format!("{} has no {role} type", self.target)))
    }

    /// Split `input` into elements with the parser's element splitter
    pub fn split(&self, input: &str) -> Vec<String> {
        self.parser.splitter().split(input)
    }

    /// Split one map entry with the parser's key/value splitter
    pub fn split_pair(&self, input: &str) -> Vec<String> {
        self.parser.key_value_splitter().split(input)
    }
}

impl fmt::Debug for ParseContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseContext")
            .field("target", self.target)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeParser;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_types_follow_target() {
        let parser = TypeParser::builder().build();

        let map = Type::map(Type::named("String"), Type::primitive("i32"));
        let cx = ParseContext::new(&parser, &map);
        assert_eq!(cx.key_type().ok(), Some(&Type::named("String")));
        assert_eq!(cx.value_type().ok(), Some(&Type::primitive("i32")));

        let array = Type::array(Type::primitive("u8"));
        let cx = ParseContext::new(&parser, &array);
        assert_eq!(cx.element_type().ok(), Some(&Type::primitive("u8")));
        assert!(cx.value_type().is_err());
    }

    #[test]
    fn test_parse_recurses_through_dispatcher() {
        let parser = TypeParser::builder().build();
        let list = Type::list(Type::primitive("i32"));
        let cx = ParseContext::new(&parser, &list);

        let element = cx.element_type().unwrap();
        assert_eq!(cx.parse("42", element).unwrap(), Value::Integer(42));
        assert_eq!(cx.split("1, 2"), vec!["1", "2"]);
        assert_eq!(cx.split_pair("a = 1"), vec!["a", "1"]);
    }
}

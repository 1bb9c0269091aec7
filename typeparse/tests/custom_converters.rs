// Custom converter tests
// Exact registrations, context-driven recursion, splitters and container capability

use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::fmt;
use typeparse::{
    object_value, ContainerKind, ConvertError, ConverterKey, ErrorKind, FromValue, GenericType,
    ParseContext, ParseError, Shape, Type, TypeParser, Typed, Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Point {
    x: i32,
    y: i32,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.x, self.y)
    }
}

impl Typed for Point {
    fn descriptor() -> Type {
        Type::named("Point")
    }
}

object_value!(Point);

fn point_converter(input: &str, cx: &ParseContext<'_>) -> Result<Value, ConvertError> {
    let (x, y) = input
        .split_once(':')
        .ok_or_else(|| ConvertError::msg(format!("expected x:y, got \"{input}\"")))?;
    let coordinate = Type::primitive("i32");
    let x = i32::from_value(cx.parse(x, &coordinate)?)?;
    let y = i32::from_value(cx.parse(y, &coordinate)?)?;
    Ok(Value::object(Point { x, y }))
}

fn parser() -> TypeParser {
    TypeParser::builder()
        .register_converter(Point::descriptor(), point_converter)
        .build()
}

#[test]
fn test_custom_named_converter() {
    let parser = parser();
    assert_eq!(parser.classify(&Point::descriptor()), Shape::Exact);
    assert_eq!(parser.parse::<Point>("3:-4").unwrap(), Point { x: 3, y: -4 });

    let points: Vec<Point> = parser.parse("1:1, 2:2").unwrap();
    assert_eq!(points, vec![Point { x: 1, y: 1 }, Point { x: 2, y: 2 }]);
}

#[test]
fn test_custom_converter_failures() {
    let parser = parser();

    let error = parser.parse::<Point>("3;4").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ConversionFailed);
    assert!(error.to_string().contains("expected x:y"));

    // The nested dispatch failure is kept, not flattened into a message
    let error = parser.parse::<Point>("3:null").unwrap_err();
    assert!(matches!(error, ParseError::Nested { .. }));
    assert_eq!(error.kind(), ErrorKind::NullNotAllowed);
    assert_eq!(error.target(), Some("Point"));
    assert_eq!(error.root().target(), Some("i32"));
}

#[test]
fn test_exact_converter_overrides_container() {
    let words = Type::list(Type::named("String"));
    let parser = TypeParser::builder()
        .register_converter(&words, |input: &str, cx: &ParseContext<'_>| -> Result<Value, ConvertError> {
            let element = cx.element_type()?;
            let items = input
                .split_whitespace()
                .map(|word| cx.parse(word, element))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(items))
        })
        .build();

    assert_eq!(
        parser.parse::<Vec<String>>("a,b c").unwrap(),
        vec!["a,b".to_string(), "c".to_string()]
    );
    // Other lists keep the built-in converter
    assert_eq!(parser.parse::<Vec<u8>>("1,2").unwrap(), vec![1, 2]);
}

#[test]
fn test_replaced_container_slot() {
    let parser = TypeParser::builder()
        .register_converter(ContainerKind::Set, |_: &str, _: &ParseContext<'_>| {
            Err::<Value, _>(ConvertError::msg("sets are disabled"))
        })
        .build();

    let error = parser.parse::<HashSet<i32>>("1").unwrap_err();
    assert!(error.to_string().contains("sets are disabled"));
    assert!(parser.converters().get(&ConverterKey::Set).is_some());
}

#[test]
fn test_user_container_by_capability() {
    let parser = TypeParser::builder().build();
    let bag = Type::generic("Bag", vec![Type::primitive("i32")]).assignable_to(ContainerKind::Set);
    assert_eq!(parser.classify(&bag), Shape::Parameterized(ContainerKind::Set));

    let parsed = parser
        .parse_generic("2,2,5", &GenericType::<HashSet<i32>>::new(bag))
        .unwrap();
    assert_eq!(parsed, HashSet::from([2, 5]));
}

#[test]
fn test_closure_splitter() {
    let parser = TypeParser::builder()
        .with_splitter(|input: &str| input.split('|').map(str::to_string).collect::<Vec<_>>())
        .build();

    assert_eq!(
        parser.parse::<Vec<String>>("a, b|c").unwrap(),
        vec!["a, b".to_string(), "c".to_string()]
    );
}

#[test]
fn test_empty_builder_has_no_scalars() {
    let parser = typeparse::TypeParserBuilder::empty()
        .register_fn(|input: &str| input.trim().parse::<u32>())
        .build();

    assert_eq!(parser.parse::<Vec<u32>>("4,5").unwrap(), vec![4, 5]);
    assert_eq!(
        parser.parse::<Vec<i32>>("4,5").unwrap_err().kind(),
        ErrorKind::UnresolvedType
    );
}

// Error reporting tests
// Diagnostic codes, missing arguments and error chains

use miette::Diagnostic;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::error::Error;
use typeparse::{parse, parse_type, ErrorKind, ParseError, Type};

fn code(error: &ParseError) -> Option<String> {
    error.code().map(|code| code.to_string())
}

#[test]
fn test_missing_arguments() {
    let target = Type::primitive("i32");

    let error = parse_type(None, Some(&target)).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ArgumentMissing);
    assert_eq!(error.to_string(), "required argument 'input' is missing");

    let error = parse_type(Some("1"), None).unwrap_err();
    assert!(matches!(error, ParseError::ArgumentMissing { argument: "target" }));
    assert_eq!(code(&error).as_deref(), Some("typeparse::argument_missing"));
}

#[test]
fn test_diagnostic_codes() {
    assert_eq!(
        code(&parse::<i32>("null").unwrap_err()).as_deref(),
        Some("typeparse::null_not_allowed")
    );
    assert_eq!(
        code(&parse::<i32>("x").unwrap_err()).as_deref(),
        Some("typeparse::conversion_failed")
    );
    assert_eq!(
        code(&parse::<HashMap<String, i32>>("a").unwrap_err()).as_deref(),
        Some("typeparse::malformed_pair")
    );
    assert_eq!(
        code(&parse_type(Some("x"), Some(&Type::named("Nope"))).unwrap_err()).as_deref(),
        Some("typeparse::unresolved_type")
    );
}

#[test]
fn test_unresolved_type_has_help() {
    let error = parse_type(Some("x"), Some(&Type::named("Nope"))).unwrap_err();
    let help = error.help().map(|help| help.to_string()).unwrap_or_default();
    assert!(help.contains("Nope"), "Help should name the type: {help}");
}

#[test]
fn test_element_error_chain() {
    let error = parse::<Vec<u8>>("1,2,999").unwrap_err();
    assert_eq!(code(&error).as_deref(), Some("typeparse::element"));

    let inner = error.source().expect("element errors have a source");
    assert!(inner.to_string().contains("\"999\""));
    assert!(inner.source().is_some(), "the number format error stays reachable");
    assert_eq!(error.root().input(), Some("999"));
}

#[test]
fn test_every_failure_names_input_and_target() {
    let failures = [
        parse::<bool>("maybe").unwrap_err(),
        parse::<Vec<i32>>("1,a").unwrap_err(),
        parse::<HashMap<String, i32>>("k=v=w").unwrap_err(),
        parse::<char>("null").unwrap_err(),
    ];
    for error in failures {
        assert!(error.input().is_some(), "{error:?}");
        assert!(error.target().is_some(), "{error:?}");
        assert!(error.to_string().starts_with("can not parse"), "{error}");
    }
}

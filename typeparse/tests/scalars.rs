// Scalar parsing tests
// Numbers, booleans, characters, strings and the object-backed std types

use pretty_assertions::assert_eq;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use typeparse::{parse, ErrorKind};

#[test]
fn test_parse_integers() {
    assert_eq!(parse::<i32>("42").unwrap(), 42);
    assert_eq!(parse::<i64>(" -7 ").unwrap(), -7);
    assert_eq!(parse::<u128>("340282366920938463463374607431768211455").unwrap(), u128::MAX);
    assert_eq!(parse::<i8>("-128").unwrap(), i8::MIN);
}

#[test]
fn test_parse_floats() {
    assert_eq!(parse::<f64>("2.5").unwrap(), 2.5);
    assert_eq!(parse::<f32>("-0.25").unwrap(), -0.25);
}

#[test]
fn test_parse_booleans_ignore_case() {
    assert!(parse::<bool>("true").unwrap());
    assert!(parse::<bool>("True").unwrap());
    assert!(!parse::<bool>("FALSE").unwrap());

    let error = parse::<bool>("yes").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ConversionFailed);
}

#[test]
fn test_parse_char() {
    assert_eq!(parse::<char>("z").unwrap(), 'z');
    assert_eq!(parse::<char>("é").unwrap(), 'é');
    assert_eq!(parse::<char>("ab").unwrap_err().kind(), ErrorKind::ConversionFailed);
}

#[test]
fn test_string_is_returned_unchanged() {
    assert_eq!(parse::<String>("  keep me  ").unwrap(), "  keep me  ");
    assert_eq!(parse::<String>("").unwrap(), "");
}

#[test]
fn test_parse_object_backed_types() {
    assert_eq!(parse::<PathBuf>("/tmp/data").unwrap(), PathBuf::from("/tmp/data"));
    assert_eq!(
        parse::<IpAddr>("127.0.0.1").unwrap(),
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    );
    assert_eq!(parse::<IpAddr>("localhost").unwrap_err().kind(), ErrorKind::ConversionFailed);
}

#[test]
fn test_number_format_failures() {
    let error = parse::<u8>("256").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ConversionFailed);
    assert_eq!(error.input(), Some("256"));
    assert_eq!(error.target(), Some("u8"));
    assert!(
        error.to_string().contains("number format"),
        "Expected a number format cause, got: {error}"
    );

    let error = parse::<f64>("two").unwrap_err();
    assert!(error.to_string().contains("number format"));

    assert_eq!(parse::<i32>("").unwrap_err().kind(), ErrorKind::ConversionFailed);
}

//! Default scalar converters registered by [`TypeParserBuilder::new`](crate::TypeParserBuilder::new)

use crate::converter::{from_fn, Converter};
use crate::types::{Type, Typed};
use std::convert::Infallible;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Failures of the non-numeric scalar converters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScalarError {
    #[error("\"{0}\" is not a boolean, expected 'true' or 'false'")]
    Boolean(String),

    #[error("\"{0}\" must be exactly one character")]
    Character(String),
}

fn parse_bool(input: &str) -> Result<bool, ScalarError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ScalarError::Boolean(input.to_string()))
    }
}

// A lone whitespace character is a valid char, so trimming is only a fallback
fn parse_char(input: &str) -> Result<char, ScalarError> {
    let single = |text: &str| {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    };
    single(input)
        .or_else(|| single(input.trim()))
        .ok_or_else(|| ScalarError::Character(input.to_string()))
}

fn entry<T: Typed>(converter: impl Converter + 'static) -> (Type, Arc<dyn Converter>) {
    (T::descriptor(), Arc::new(converter))
}

macro_rules! numeric_entries {
    ($($ty:ty),* $(,)?) => {
        vec![
            $(entry::<$ty>(from_fn(|input: &str| input.trim().parse::<$ty>())),)*
        ]
    };
}

/// Every built-in scalar converter keyed by its type
pub fn scalar_converters() -> Vec<(Type, Arc<dyn Converter>)> {
    let mut converters = numeric_entries!(
        i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    );
    converters.extend([
        entry::<bool>(from_fn(parse_bool)),
        entry::<char>(from_fn(parse_char)),
        entry::<String>(from_fn(|input: &str| Ok::<_, Infallible>(input.to_string()))),
        entry::<PathBuf>(from_fn(|input: &str| Ok::<_, Infallible>(PathBuf::from(input.trim())))),
        entry::<IpAddr>(from_fn(|input: &str| input.trim().parse::<IpAddr>())),
    ]);
    converters
}

//! Splitting strategies for container input.
//!
//! The element splitter breaks list/set/array/map input into pieces; the
//! key/value splitter breaks one map entry into its parts. Both are injected
//! into the parser by the builder.

/// Splits text into an ordered sequence of pieces
pub trait Splitter: Send + Sync {
    fn split(&self, input: &str) -> Vec<String>;
}

impl<F> Splitter for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn split(&self, input: &str) -> Vec<String> {
        self(input)
    }
}

/// Splits on every occurrence of a delimiter and trims each piece.
///
/// Blank input yields no pieces, so an empty string parses into an empty
/// container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterSplitter {
    delimiter: String,
}

impl DelimiterSplitter {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    /// `,` between elements
    pub fn elements() -> Self {
        Self::new(",")
    }

    /// `=` between a map key and its value
    pub fn key_value() -> Self {
        Self::new("=")
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }
}

impl Splitter for DelimiterSplitter {
    fn split(&self, input: &str) -> Vec<String> {
        if input.trim().is_empty() {
            return Vec::new();
        }
        input
            .split(self.delimiter.as_str())
            .map(|piece| piece.trim().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_elements_are_trimmed() {
        let splitter = DelimiterSplitter::elements();
        assert_eq!(splitter.delimiter(), ",");
        assert_eq!(splitter.split(" a, b ,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_blank_input_has_no_elements() {
        let splitter = DelimiterSplitter::elements();
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("   ").is_empty());
    }

    #[test]
    fn test_key_value_keeps_every_part() {
        let splitter = DelimiterSplitter::key_value();
        assert_eq!(splitter.delimiter(), "=");
        assert_eq!(splitter.split("a=1"), vec!["a", "1"]);
        assert_eq!(splitter.split("a=1=2"), vec!["a", "1", "2"]);
        assert_eq!(splitter.split("a"), vec!["a"]);
    }

    #[test]
    fn test_empty_pieces_are_kept() {
        let splitter = DelimiterSplitter::new(";");
        assert_eq!(splitter.split("1;;2"), vec!["1", "", "2"]);
    }

    #[test]
    fn test_closure_splitter() {
        let splitter = |input: &str| input.split('|').map(String::from).collect::<Vec<_>>();
        assert_eq!(Splitter::split(&splitter, "x|y"), vec!["x", "y"]);
    }
}

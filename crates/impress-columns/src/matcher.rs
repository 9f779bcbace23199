//! Label matchers
//!
//! Pure tests of a single label (or one level of a hierarchical label)
//! against a criterion. Matchers only ever look at column metadata: the
//! label itself or the column dtype, never cell values.

use crate::error::{SelectError, SelectResult};
use crate::label::{Dtype, Label, Scalar};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A compiled regular expression, compared and serialized by its source
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile a pattern
    pub fn new(pattern: &str) -> SelectResult<Self> {
        Regex::new(pattern)
            .map(Pattern)
            .map_err(|e| SelectError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
    }

    /// Get the pattern source
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Unanchored search
    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(serde::de::Error::custom)
    }
}

/// A criterion applied to a label or a column dtype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Matcher {
    /// Label starts with a prefix
    StartsWith(String),
    /// Label ends with a suffix
    EndsWith(String),
    /// Label contains a substring
    Contains(String),
    /// Regex search over the label's string form
    Regex(Pattern),
    /// Column dtype equals
    DtypeEq(Dtype),
    /// Column dtype is one of
    DtypeIn(Vec<Dtype>),
}

impl Matcher {
    /// Whether this matcher reads the column dtype rather than the label
    pub fn is_dtype(&self) -> bool {
        matches!(self, Matcher::DtypeEq(_) | Matcher::DtypeIn(_))
    }

    /// Name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Matcher::StartsWith(_) => "startswith",
            Matcher::EndsWith(_) => "endswith",
            Matcher::Contains(_) => "contains",
            Matcher::Regex(_) => "match",
            Matcher::DtypeEq(_) => "dtype ==",
            Matcher::DtypeIn(_) => "dtype.isin",
        }
    }

    /// Test a whole label
    ///
    /// Tuple labels are never string-like; only the regex matcher accepts
    /// them, searching their `(a, X)` form.
    pub fn matches_value(&self, value: &Label) -> SelectResult<bool> {
        match (self, value) {
            (_, Label::Scalar(scalar)) => self.matches_scalar(scalar),
            (Matcher::Regex(pattern), Label::Tuple(_)) => Ok(pattern.is_match(&value.to_string())),
            (_, Label::Tuple(_)) => Err(SelectError::type_mismatch(self.name(), value)),
        }
    }

    /// Test a flat label or a single level value
    pub fn matches_scalar(&self, value: &Scalar) -> SelectResult<bool> {
        match self {
            Matcher::StartsWith(prefix) => Ok(self.string_value(value)?.starts_with(prefix.as_str())),
            Matcher::EndsWith(suffix) => Ok(self.string_value(value)?.ends_with(suffix.as_str())),
            Matcher::Contains(needle) => Ok(self.string_value(value)?.contains(needle.as_str())),
            Matcher::Regex(pattern) => Ok(pattern.is_match(&value.to_string())),
            Matcher::DtypeEq(_) | Matcher::DtypeIn(_) => {
                Err(SelectError::type_mismatch(self.name(), value))
            }
        }
    }

    /// Test a column dtype; label matchers never match here
    pub fn matches_dtype(&self, dtype: Dtype) -> bool {
        match self {
            Matcher::DtypeEq(expected) => *expected == dtype,
            Matcher::DtypeIn(expected) => expected.contains(&dtype),
            _ => false,
        }
    }

    fn string_value<'a>(&self, value: &'a Scalar) -> SelectResult<&'a str> {
        value
            .as_str()
            .ok_or_else(|| SelectError::type_mismatch(self.name(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_matchers() {
        let label = Label::from("price_usd");
        assert!(Matcher::StartsWith("price".into()).matches_value(&label).unwrap());
        assert!(Matcher::EndsWith("usd".into()).matches_value(&label).unwrap());
        assert!(Matcher::Contains("e_u".into()).matches_value(&label).unwrap());
        assert!(!Matcher::Contains("eur".into()).matches_value(&label).unwrap());
    }

    #[test]
    fn test_string_matcher_rejects_non_strings() {
        let err = Matcher::StartsWith("1".into())
            .matches_value(&Label::from(10))
            .unwrap_err();
        assert!(matches!(err, SelectError::TypeMismatch { .. }));

        let err = Matcher::Contains("a".into())
            .matches_value(&Label::from(("a", "X")))
            .unwrap_err();
        assert!(matches!(err, SelectError::TypeMismatch { .. }));
    }

    #[test]
    fn test_regex_is_unanchored_and_total() {
        let re = Matcher::Regex(Pattern::new("c").unwrap());
        assert!(re.matches_value(&Label::from("abc")).unwrap());
        assert!(!re.matches_value(&Label::from("xyz")).unwrap());

        let digits = Matcher::Regex(Pattern::new(r"^\d{4}$").unwrap());
        assert!(digits.matches_value(&Label::from(2024)).unwrap());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Pattern::new("(unclosed").unwrap_err();
        assert!(matches!(err, SelectError::InvalidPattern { .. }));
    }

    #[test]
    fn test_dtype_matchers() {
        assert!(Matcher::DtypeEq(Dtype::String).matches_dtype(Dtype::String));
        assert!(!Matcher::DtypeEq(Dtype::String).matches_dtype(Dtype::Integer));
        let isin = Matcher::DtypeIn(vec![Dtype::String, Dtype::Floating]);
        assert!(isin.matches_dtype(Dtype::Floating));
        assert!(!isin.matches_dtype(Dtype::Boolean));
        assert!(Matcher::DtypeEq(Dtype::String).is_dtype());
        assert!(!Matcher::StartsWith("a".into()).is_dtype());
    }
}

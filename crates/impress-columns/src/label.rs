//! Column labels, dtypes and level references
//!
//! A [`Label`] is either a single [`Scalar`] (flat column index) or a tuple
//! of scalars (hierarchical column index, one slot per level).

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A single label component
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scalar {
    /// A string label
    Str(String),
    /// An integer label
    Int(i64),
    /// A boolean label
    Bool(bool),
}

impl Scalar {
    /// Borrow the string if this scalar is string-like
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<char> for Scalar {
    fn from(c: char) -> Self {
        Scalar::Str(c.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Int(i as i64)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// A column label
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    /// Label of a flat index
    Scalar(Scalar),
    /// Label of a hierarchical index, one scalar per level
    Tuple(Vec<Scalar>),
}

impl Label {
    /// Build a tuple label
    pub fn tuple<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        Label::Tuple(parts.into_iter().map(Into::into).collect())
    }

    /// Number of levels in this label
    pub fn arity(&self) -> usize {
        match self {
            Label::Scalar(_) => 1,
            Label::Tuple(parts) => parts.len(),
        }
    }

    /// Get the value at a level position
    pub fn level(&self, pos: usize) -> Option<&Scalar> {
        match self {
            Label::Scalar(s) if pos == 0 => Some(s),
            Label::Scalar(_) => None,
            Label::Tuple(parts) => parts.get(pos),
        }
    }

    /// Borrow the scalar of a flat label
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Label::Scalar(s) => Some(s),
            Label::Tuple(_) => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Scalar(s) => write!(f, "{}", s),
            Label::Tuple(parts) => {
                f.write_str("(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", part)?;
                }
                f.write_str(")")
            }
        }
    }
}

macro_rules! label_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Label {
                fn from(value: $ty) -> Self {
                    Label::Scalar(value.into())
                }
            }
        )*
    };
}

label_from_scalar!(Scalar, &str, String, char, i64, i32, bool);

impl<A: Into<Scalar>, B: Into<Scalar>> From<(A, B)> for Label {
    fn from((a, b): (A, B)) -> Self {
        Label::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<Scalar>, B: Into<Scalar>, D: Into<Scalar>> From<(A, B, D)> for Label {
    fn from((a, b, d): (A, B, D)) -> Self {
        Label::Tuple(vec![a.into(), b.into(), d.into()])
    }
}

/// Abstract dtype category of a column
///
/// Host dtypes are mapped onto this closed set by [`Dtype::from_host_name`];
/// dtype selectors compare against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum Dtype {
    Integer,
    Floating,
    String,
    Boolean,
    Categorical,
    Datetime,
    Other,
}

impl Dtype {
    /// Map a host dtype name (numpy/pandas spelling or Python type name)
    ///
    /// Fixed-width and variable-length string storage both map to
    /// [`Dtype::String`]. Unknown names map to [`Dtype::Other`].
    pub fn from_host_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        // numpy scalar types carry a trailing underscore (`np.str_`, `np.bool_`)
        let name = name.trim_end_matches('_');

        if name.starts_with("interval") {
            return Dtype::Other;
        }
        if name.starts_with("int") || name.starts_with("uint") {
            return Dtype::Integer;
        }
        if name.starts_with("float") || name == "double" {
            return Dtype::Floating;
        }
        if name == "object"
            || sized_name(name, "str")
            || sized_name(name, "unicode")
            || sized_name(name, "bytes")
            || name.starts_with("string")
            || name.starts_with("<u")
            || name.starts_with(">u")
            || name.starts_with("|s")
            || name.starts_with("<s")
        {
            return Dtype::String;
        }
        if matches!(name, "bool" | "boolean") {
            return Dtype::Boolean;
        }
        if name == "category" {
            return Dtype::Categorical;
        }
        if name.starts_with("datetime") {
            return Dtype::Datetime;
        }
        Dtype::Other
    }

    /// Get the canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            Dtype::Integer => "integer",
            Dtype::Floating => "floating",
            Dtype::String => "string",
            Dtype::Boolean => "boolean",
            Dtype::Categorical => "categorical",
            Dtype::Datetime => "datetime",
            Dtype::Other => "other",
        }
    }
}

/// `base` alone or followed by an item width, as in numpy's `str160`
fn sized_name(name: &str, base: &str) -> bool {
    name.strip_prefix(base)
        .map_or(false, |width| width.chars().all(|c| c.is_ascii_digit()))
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dtype {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Dtype::from_host_name(s))
    }
}

/// Reference to one level of a hierarchical column index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelRef {
    /// Zero-based level position
    Position(usize),
    /// Level name
    Name(String),
}

impl fmt::Display for LevelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelRef::Position(pos) => write!(f, "{}", pos),
            LevelRef::Name(name) => write!(f, "'{}'", name),
        }
    }
}

impl From<usize> for LevelRef {
    fn from(pos: usize) -> Self {
        LevelRef::Position(pos)
    }
}

impl From<&str> for LevelRef {
    fn from(name: &str) -> Self {
        LevelRef::Name(name.to_string())
    }
}

impl From<String> for LevelRef {
    fn from(name: String) -> Self {
        LevelRef::Name(name)
    }
}

//! Composer facade
//!
//! `C` is the entry point for building selectors:
//!
//! ```ignore
//! use impress_columns::{cols, C, Dtype, Rest};
//!
//! let sel = cols!["y", "z"] | C::starts_with("x") | Rest;
//! let sel = C::dtype().is_in([Dtype::String, Dtype::Floating]);
//! let sel = C::level("one").select(["c", "a"]);
//! ```

use crate::ast::Selector;
use crate::error::SelectResult;
use crate::label::{Dtype, Label, LevelRef};
use crate::levels::Level;
use crate::matcher::{Matcher, Pattern};

/// Selector constructors
#[derive(Debug, Clone, Copy, Default)]
pub struct C;

impl C {
    /// Columns with these labels, in the given order
    pub fn cols<I, L>(values: I) -> Selector
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        Selector::by_label(values)
    }

    /// A single column by label
    pub fn col(value: impl Into<Label>) -> Selector {
        Selector::by_label([value.into()])
    }

    pub fn starts_with(prefix: impl Into<String>) -> Selector {
        Selector::predicate(Matcher::StartsWith(prefix.into()))
    }

    pub fn ends_with(suffix: impl Into<String>) -> Selector {
        Selector::predicate(Matcher::EndsWith(suffix.into()))
    }

    pub fn contains(needle: impl Into<String>) -> Selector {
        Selector::predicate(Matcher::Contains(needle.into()))
    }

    /// Unanchored regex search over column labels
    pub fn matches(pattern: &str) -> SelectResult<Selector> {
        Ok(Selector::predicate(Matcher::Regex(Pattern::new(pattern)?)))
    }

    /// Dtype comparator
    pub fn dtype() -> DtypeSelector {
        DtypeSelector
    }

    /// Accessor for one level of a hierarchical index
    pub fn level(level: impl Into<LevelRef>) -> Level {
        Level::new(level)
    }
}

/// Builds dtype selectors
#[derive(Debug, Clone, Copy, Default)]
pub struct DtypeSelector;

impl DtypeSelector {
    /// Columns whose dtype is `dtype`
    pub fn eq(&self, dtype: Dtype) -> Selector {
        Selector::predicate(Matcher::DtypeEq(dtype))
    }

    /// Columns whose dtype is any of `dtypes`
    pub fn is_in(&self, dtypes: impl IntoIterator<Item = Dtype>) -> Selector {
        let mut unique: Vec<Dtype> = Vec::new();
        for dtype in dtypes {
            if !unique.contains(&dtype) {
                unique.push(dtype);
            }
        }
        Selector::predicate(Matcher::DtypeIn(unique))
    }
}

/// Build a label selector: `cols!["y", "z", "x"]`
#[macro_export]
macro_rules! cols {
    ($($value:expr),* $(,)?) => {
        $crate::Selector::by_label(::std::vec![$($crate::Label::from($value)),*])
    };
}

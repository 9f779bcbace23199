//! Level accessor for hierarchical column indices
//!
//! A [`Level`] exposes the same surface as the flat selectors, but every
//! node it builds is scoped to one level. The level reference is resolved
//! only at evaluation time.

use crate::ast::Selector;
use crate::error::SelectResult;
use crate::label::{Label, LevelRef};
use crate::matcher::{Matcher, Pattern};

/// Selector builder scoped to one level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    level: LevelRef,
}

impl Level {
    /// Create an accessor for a level position or name
    pub fn new(level: impl Into<LevelRef>) -> Self {
        Self {
            level: level.into(),
        }
    }

    /// The level this accessor addresses
    pub fn level_ref(&self) -> &LevelRef {
        &self.level
    }

    /// Columns whose level value is one of `values`, grouped in request order
    pub fn select<I, L>(&self, values: I) -> Selector
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        Selector::by_level_label(self.level.clone(), values)
    }

    pub fn starts_with(&self, prefix: impl Into<String>) -> Selector {
        self.scoped(Matcher::StartsWith(prefix.into()))
    }

    pub fn ends_with(&self, suffix: impl Into<String>) -> Selector {
        self.scoped(Matcher::EndsWith(suffix.into()))
    }

    pub fn contains(&self, needle: impl Into<String>) -> Selector {
        self.scoped(Matcher::Contains(needle.into()))
    }

    /// Unanchored regex search over the level value
    pub fn matches(&self, pattern: &str) -> SelectResult<Selector> {
        Ok(self.scoped(Matcher::Regex(Pattern::new(pattern)?)))
    }

    fn scoped(&self, matcher: Matcher) -> Selector {
        Selector::level_predicate(self.level.clone(), matcher)
    }
}

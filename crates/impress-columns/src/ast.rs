//! Selector expression tree
//!
//! Nodes are immutable; every combinator builds a new node. The fallible
//! builders (`or_else`, `and_also`, `negate`) reject illegal structure at
//! composition time. The operator sugar (`|`, `&`, `!`) is infallible, and
//! [`Selector::validate`] runs again before every evaluation.

use crate::error::{SelectError, SelectResult};
use crate::label::{Label, LevelRef};
use crate::matcher::Matcher;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::{BitAnd, BitOr, Not};

/// A column selector expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selector {
    /// Labels equal to any of the values, in request order
    ByLabel {
        level: Option<LevelRef>,
        values: Vec<Label>,
    },

    /// Labels (or level values) accepted by a matcher
    ByPredicate {
        level: Option<LevelRef>,
        matcher: Matcher,
    },

    /// Union; left operand keeps its positions
    Or(Box<Selector>, Box<Selector>),

    /// Intersection in left operand order
    And(Box<Selector>, Box<Selector>),

    /// Complement in index order
    Not(Box<Selector>),

    /// Every column not selected by the other `Or` operand
    AllRemaining,
}

/// Marker for "all remaining columns", combined with a selector via `|`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rest;

impl Selector {
    /// Select labels by value, keeping the first occurrence of duplicates
    pub fn by_label<I, L>(values: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        Selector::ByLabel {
            level: None,
            values: dedup(values),
        }
    }

    /// Select labels by the value at one level
    pub fn by_level_label<I, L>(level: LevelRef, values: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        Selector::ByLabel {
            level: Some(level),
            values: dedup(values),
        }
    }

    /// Select labels accepted by a matcher
    pub fn predicate(matcher: Matcher) -> Self {
        Selector::ByPredicate {
            level: None,
            matcher,
        }
    }

    /// Select labels whose value at one level is accepted by a matcher
    pub fn level_predicate(level: LevelRef, matcher: Matcher) -> Self {
        Selector::ByPredicate {
            level: Some(level),
            matcher,
        }
    }

    /// Create an OR expression
    pub fn or_else(left: Selector, right: Selector) -> SelectResult<Self> {
        let expr = Selector::Or(Box::new(left), Box::new(right));
        expr.check_or_chain()?;
        Ok(expr)
    }

    /// Create an AND expression
    pub fn and_also(left: Selector, right: Selector) -> SelectResult<Self> {
        if left.is_rest() || right.is_rest() {
            return Err(SelectError::InvalidComposition(
                "all-remaining cannot be an operand of AND".to_string(),
            ));
        }
        Ok(Selector::And(Box::new(left), Box::new(right)))
    }

    /// Create a NOT expression
    pub fn negate(expr: Selector) -> SelectResult<Self> {
        if expr.is_rest() {
            return Err(SelectError::InvalidComposition(
                "all-remaining cannot be negated".to_string(),
            ));
        }
        Ok(Selector::Not(Box::new(expr)))
    }

    /// `expr | ...`: the selection followed by every other column
    pub fn or_rest(expr: Selector) -> SelectResult<Self> {
        Self::or_else(expr, Selector::AllRemaining)
    }

    /// `... | expr`: every other column followed by the selection
    pub fn rest_or(expr: Selector) -> SelectResult<Self> {
        Self::or_else(Selector::AllRemaining, expr)
    }

    /// Check if this is the all-remaining sentinel
    pub fn is_rest(&self) -> bool {
        matches!(self, Selector::AllRemaining)
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        match self {
            Selector::Or(left, right) | Selector::And(left, right) => {
                1 + left.node_count() + right.node_count()
            }
            Selector::Not(inner) => 1 + inner.node_count(),
            _ => 1,
        }
    }

    /// Check structural rules for the whole tree
    ///
    /// All-remaining may only appear as an `Or` operand, at most once per
    /// chain of `Or` nodes.
    pub fn validate(&self) -> SelectResult<()> {
        match self {
            Selector::ByLabel { .. } | Selector::ByPredicate { .. } | Selector::AllRemaining => {
                Ok(())
            }
            Selector::Or(left, right) => {
                self.check_or_chain()?;
                left.validate()?;
                right.validate()
            }
            Selector::And(left, right) => {
                if left.is_rest() || right.is_rest() {
                    return Err(SelectError::InvalidComposition(
                        "all-remaining cannot be an operand of AND".to_string(),
                    ));
                }
                left.validate()?;
                right.validate()
            }
            Selector::Not(inner) => {
                if inner.is_rest() {
                    return Err(SelectError::InvalidComposition(
                        "all-remaining cannot be negated".to_string(),
                    ));
                }
                inner.validate()
            }
        }
    }

    fn check_or_chain(&self) -> SelectResult<()> {
        if self.rest_in_chain() > 1 {
            return Err(SelectError::InvalidComposition(
                "all-remaining used more than once in one OR chain".to_string(),
            ));
        }
        Ok(())
    }

    fn rest_in_chain(&self) -> usize {
        match self {
            Selector::AllRemaining => 1,
            Selector::Or(left, right) => left.rest_in_chain() + right.rest_in_chain(),
            _ => 0,
        }
    }
}

fn dedup<I, L>(values: I) -> Vec<Label>
where
    I: IntoIterator<Item = L>,
    L: Into<Label>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .map(Into::into)
        .filter(|label: &Label| seen.insert(label.clone()))
        .collect()
}

impl BitOr for Selector {
    type Output = Selector;

    fn bitor(self, rhs: Selector) -> Selector {
        Selector::Or(Box::new(self), Box::new(rhs))
    }
}

impl BitOr<Rest> for Selector {
    type Output = Selector;

    fn bitor(self, _rhs: Rest) -> Selector {
        Selector::Or(Box::new(self), Box::new(Selector::AllRemaining))
    }
}

impl BitOr<Selector> for Rest {
    type Output = Selector;

    fn bitor(self, rhs: Selector) -> Selector {
        Selector::Or(Box::new(Selector::AllRemaining), Box::new(rhs))
    }
}

impl BitAnd for Selector {
    type Output = Selector;

    fn bitand(self, rhs: Selector) -> Selector {
        Selector::And(Box::new(self), Box::new(rhs))
    }
}

impl Not for Selector {
    type Output = Selector;

    fn not(self) -> Selector {
        Selector::Not(Box::new(self))
    }
}

impl From<Label> for Selector {
    fn from(label: Label) -> Self {
        Selector::by_label([label])
    }
}

impl From<&str> for Selector {
    fn from(label: &str) -> Self {
        Selector::by_label([label])
    }
}

impl From<String> for Selector {
    fn from(label: String) -> Self {
        Selector::by_label([label])
    }
}

impl From<i64> for Selector {
    fn from(label: i64) -> Self {
        Selector::by_label([label])
    }
}

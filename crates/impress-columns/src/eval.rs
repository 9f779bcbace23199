//! Selector evaluation
//!
//! Evaluates a [`Selector`] against a [`ColumnSource`], producing an
//! ordered, duplicate-free list of column positions. Evaluation is a pure
//! recursive fold over the tree; the source is only borrowed.

use crate::ast::Selector;
use crate::error::{SelectError, SelectResult};
use crate::index::ColumnSource;
use crate::label::{Label, LevelRef, Scalar};
use crate::matcher::Matcher;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Evaluator for selector expressions
pub struct Evaluator<'a, S: ColumnSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: ColumnSource + ?Sized> Evaluator<'a, S> {
    /// Create a new evaluator
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Evaluate an expression, returning selected column positions in
    /// selection order
    pub fn evaluate(&self, selector: &Selector) -> SelectResult<Vec<usize>> {
        selector.validate()?;
        self.evaluate_node(selector)
    }

    fn evaluate_node(&self, selector: &Selector) -> SelectResult<Vec<usize>> {
        match selector {
            Selector::AllRemaining => Ok(self.all_positions()),

            Selector::ByLabel { level: None, values } => self.evaluate_labels(values),

            Selector::ByLabel {
                level: Some(level),
                values,
            } => self.evaluate_level_labels(level, values),

            Selector::ByPredicate { matcher, .. } if matcher.is_dtype() => {
                self.evaluate_dtype(matcher)
            }

            Selector::ByPredicate {
                level: None,
                matcher,
            } => self.evaluate_predicate(matcher),

            Selector::ByPredicate {
                level: Some(level),
                matcher,
            } => {
                let pos = self.source.resolve_level(level)?;
                self.group_by_level(pos, |value| matcher.matches_scalar(value))
            }

            Selector::Or(left, right) => match (left.as_ref(), right.as_ref()) {
                (_, Selector::AllRemaining) => {
                    let selected = self.evaluate_node(left)?;
                    Ok(union(selected, self.all_positions()))
                }
                (Selector::AllRemaining, _) => {
                    let selected = self.evaluate_node(right)?;
                    let mut result = self.complement(&selected);
                    result.extend(selected);
                    Ok(result)
                }
                _ => {
                    let left = self.evaluate_node(left)?;
                    let right = self.evaluate_node(right)?;
                    Ok(union(left, right))
                }
            },

            Selector::And(left, right) => {
                let left = self.evaluate_node(left)?;
                let right: HashSet<usize> = self.evaluate_node(right)?.into_iter().collect();
                Ok(left.into_iter().filter(|pos| right.contains(pos)).collect())
            }

            Selector::Not(inner) => {
                let selected = self.evaluate_node(inner)?;
                Ok(self.complement(&selected))
            }
        }
    }

    /// Exact label lookup in request order
    ///
    /// On a hierarchical index a scalar value addresses the first level.
    fn evaluate_labels(&self, values: &[Label]) -> SelectResult<Vec<usize>> {
        let mut by_label: HashMap<&Label, Vec<usize>> = HashMap::new();
        let mut by_first_level: HashMap<&Scalar, Vec<usize>> = HashMap::new();
        let hierarchical = self.source.is_hierarchical();

        for pos in 0..self.source.len() {
            let label = self.label_at(pos)?;
            by_label.entry(label).or_default().push(pos);
            if hierarchical {
                if let Some(first) = label.level(0) {
                    by_first_level.entry(first).or_default().push(pos);
                }
            }
        }

        let mut result = Vec::new();
        let mut seen = HashSet::new();
        for value in values {
            let group = match value {
                Label::Scalar(scalar) if hierarchical => by_first_level.get(scalar),
                _ => by_label.get(value),
            };
            for &pos in group.into_iter().flatten() {
                if seen.insert(pos) {
                    result.push(pos);
                }
            }
        }
        Ok(result)
    }

    /// Level value lookup, grouped by request order
    fn evaluate_level_labels(&self, level: &LevelRef, values: &[Label]) -> SelectResult<Vec<usize>> {
        let level = self.source.resolve_level(level)?;
        let mut groups: HashMap<&Scalar, Vec<usize>> = HashMap::new();
        for pos in 0..self.source.len() {
            groups
                .entry(self.level_value(pos, level)?)
                .or_default()
                .push(pos);
        }

        let mut result = Vec::new();
        let mut seen = HashSet::new();
        for value in values.iter().filter_map(Label::as_scalar) {
            for &pos in groups.get(value).into_iter().flatten() {
                if seen.insert(pos) {
                    result.push(pos);
                }
            }
        }
        Ok(result)
    }

    /// Whole-label predicate, index order
    fn evaluate_predicate(&self, matcher: &Matcher) -> SelectResult<Vec<usize>> {
        let mut result = Vec::new();
        for pos in 0..self.source.len() {
            if matcher.matches_value(self.label_at(pos)?)? {
                result.push(pos);
            }
        }
        Ok(result)
    }

    /// Column dtype predicate, index order
    fn evaluate_dtype(&self, matcher: &Matcher) -> SelectResult<Vec<usize>> {
        let mut result = Vec::new();
        for pos in 0..self.source.len() {
            let dtype = self.source.dtype(pos).ok_or_else(|| {
                SelectError::InvalidIndex(format!("no dtype for column position {}", pos))
            })?;
            if matcher.matches_dtype(dtype) {
                result.push(pos);
            }
        }
        Ok(result)
    }

    /// Group columns by the value at `level`, keeping only accepted values
    ///
    /// Groups are concatenated in the order their value was first seen
    /// while scanning the index; within a group positions stay in index
    /// order. Each distinct value is tested once.
    fn group_by_level<F>(&self, level: usize, mut accept: F) -> SelectResult<Vec<usize>>
    where
        F: FnMut(&Scalar) -> SelectResult<bool>,
    {
        // value -> slot in `groups`, or None if rejected
        let mut slots: HashMap<&Scalar, Option<usize>> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();

        for pos in 0..self.source.len() {
            let value = self.level_value(pos, level)?;
            let slot = match slots.get(value) {
                Some(slot) => *slot,
                None => {
                    let slot = if accept(value)? {
                        groups.push(Vec::new());
                        Some(groups.len() - 1)
                    } else {
                        None
                    };
                    slots.insert(value, slot);
                    slot
                }
            };
            if let Some(slot) = slot {
                groups[slot].push(pos);
            }
        }

        trace!(level, groups = groups.len(), "grouped level values");
        Ok(groups.into_iter().flatten().collect())
    }

    fn label_at(&self, pos: usize) -> SelectResult<&'a Label> {
        let source: &'a S = self.source;
        source.label(pos).ok_or_else(|| {
            SelectError::InvalidIndex(format!("no label for column position {}", pos))
        })
    }

    fn level_value(&self, pos: usize, level: usize) -> SelectResult<&'a Scalar> {
        let label = self.label_at(pos)?;
        label.level(level).ok_or_else(|| {
            SelectError::InvalidIndex(format!("label {} has no level {}", label, level))
        })
    }

    fn all_positions(&self) -> Vec<usize> {
        (0..self.source.len()).collect()
    }

    fn complement(&self, selected: &[usize]) -> Vec<usize> {
        let selected: HashSet<usize> = selected.iter().copied().collect();
        (0..self.source.len())
            .filter(|pos| !selected.contains(pos))
            .collect()
    }
}

/// Append positions of `right` not already in `left`
fn union(mut left: Vec<usize>, right: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut seen: HashSet<usize> = left.iter().copied().collect();
    for pos in right {
        if seen.insert(pos) {
            left.push(pos);
        }
    }
    left
}

/// Build a boolean mask in index order from selected positions
pub fn positions_to_mask(positions: &[usize], len: usize) -> Vec<bool> {
    let mut mask = vec![false; len];
    for &pos in positions {
        if let Some(slot) = mask.get_mut(pos) {
            *slot = true;
        }
    }
    mask
}

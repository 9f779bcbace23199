//! Column index abstraction
//!
//! Selectors never own an index; one is supplied at evaluation time through
//! the [`ColumnSource`] trait. [`ColumnIndex`] is the in-memory
//! implementation used by hosts that hand over their column metadata.

use crate::error::{SelectError, SelectResult};
use crate::label::{Dtype, Label, LevelRef, Scalar};

/// Read-only view of a dataframe's column index
pub trait ColumnSource {
    /// Number of columns
    fn len(&self) -> usize;

    /// Get the label at a column position
    fn label(&self, pos: usize) -> Option<&Label>;

    /// Get the dtype at a column position
    fn dtype(&self, pos: usize) -> Option<Dtype>;

    /// Number of levels (1 for a flat index)
    fn nlevels(&self) -> usize;

    /// Level names of a hierarchical index (empty for a flat index)
    fn level_names(&self) -> &[Option<String>];

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether labels are tuples
    fn is_hierarchical(&self) -> bool {
        self.nlevels() > 1
    }

    /// Resolve a level reference to a position
    ///
    /// Flat indices have no addressable levels.
    fn resolve_level(&self, level: &LevelRef) -> SelectResult<usize> {
        if !self.is_hierarchical() {
            return Err(SelectError::level_not_found(level));
        }
        match level {
            LevelRef::Position(pos) if *pos < self.nlevels() => Ok(*pos),
            LevelRef::Position(_) => Err(SelectError::level_not_found(level)),
            LevelRef::Name(name) => self
                .level_names()
                .iter()
                .position(|n| n.as_deref() == Some(name.as_str()))
                .ok_or_else(|| SelectError::level_not_found(level)),
        }
    }
}

/// An ordered column index with per-column dtypes
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnIndex {
    labels: Vec<Label>,
    dtypes: Vec<Dtype>,
    names: Vec<Option<String>>,
    nlevels: usize,
}

impl ColumnIndex {
    /// Build a flat index from `(label, dtype)` pairs
    pub fn flat<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Dtype)>,
        S: Into<Scalar>,
    {
        let (labels, dtypes) = columns
            .into_iter()
            .map(|(label, dtype)| (Label::Scalar(label.into()), dtype))
            .unzip();

        Self {
            labels,
            dtypes,
            names: Vec::new(),
            nlevels: 1,
        }
    }

    /// Build a hierarchical index from tuple labels
    ///
    /// Every label must be a tuple with one slot per level name, and there
    /// must be at least two levels.
    pub fn hierarchical<I>(columns: I, names: Vec<Option<String>>) -> SelectResult<Self>
    where
        I: IntoIterator<Item = (Label, Dtype)>,
    {
        let nlevels = names.len();
        if nlevels < 2 {
            return Err(SelectError::InvalidIndex(format!(
                "hierarchical index needs at least 2 levels, got {}",
                nlevels
            )));
        }

        let mut labels = Vec::new();
        let mut dtypes = Vec::new();
        for (label, dtype) in columns {
            match &label {
                Label::Tuple(parts) if parts.len() == nlevels => {}
                _ => {
                    return Err(SelectError::InvalidIndex(format!(
                        "label {} does not have {} levels",
                        label, nlevels
                    )))
                }
            }
            labels.push(label);
            dtypes.push(dtype);
        }

        Ok(Self {
            labels,
            dtypes,
            names,
            nlevels,
        })
    }

    /// Build a hierarchical index as the cartesian product of level values
    ///
    /// Labels are generated with the last level varying fastest, and every
    /// column gets the same dtype.
    pub fn from_product<N>(levels: Vec<Vec<Scalar>>, names: N, dtype: Dtype) -> SelectResult<Self>
    where
        N: IntoIterator,
        N::Item: Into<String>,
    {
        let names: Vec<Option<String>> = names.into_iter().map(|n| Some(n.into())).collect();
        if names.len() != levels.len() {
            return Err(SelectError::InvalidIndex(format!(
                "{} level names given for {} levels",
                names.len(),
                levels.len()
            )));
        }

        let mut rows: Vec<Vec<Scalar>> = vec![Vec::new()];
        for values in &levels {
            rows = rows
                .iter()
                .flat_map(|prefix| {
                    values.iter().map(move |v| {
                        let mut row = prefix.clone();
                        row.push(v.clone());
                        row
                    })
                })
                .collect();
        }

        Self::hierarchical(
            rows.into_iter().map(|row| (Label::Tuple(row), dtype)),
            names,
        )
    }

    /// Reindex to the given column positions, in that order
    pub fn take(&self, positions: &[usize]) -> SelectResult<Self> {
        let mut labels = Vec::with_capacity(positions.len());
        let mut dtypes = Vec::with_capacity(positions.len());
        for &pos in positions {
            match (self.labels.get(pos), self.dtypes.get(pos)) {
                (Some(label), Some(dtype)) => {
                    labels.push(label.clone());
                    dtypes.push(*dtype);
                }
                _ => {
                    return Err(SelectError::InvalidIndex(format!(
                        "column position {} out of range for {} columns",
                        pos,
                        self.labels.len()
                    )))
                }
            }
        }

        Ok(Self {
            labels,
            dtypes,
            names: self.names.clone(),
            nlevels: self.nlevels,
        })
    }

    /// All labels in index order
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// All dtypes in index order
    pub fn dtypes(&self) -> &[Dtype] {
        &self.dtypes
    }
}

impl ColumnSource for ColumnIndex {
    fn len(&self) -> usize {
        self.labels.len()
    }

    fn label(&self, pos: usize) -> Option<&Label> {
        self.labels.get(pos)
    }

    fn dtype(&self, pos: usize) -> Option<Dtype> {
        self.dtypes.get(pos).copied()
    }

    fn nlevels(&self) -> usize {
        self.nlevels
    }

    fn level_names(&self) -> &[Option<String>] {
        &self.names
    }
}

//! Resolver and host adapter
//!
//! [`resolve`] turns a selector into a [`Selection`] for one column index.
//! [`ColumnIndexer`] is the `.loc`-style hook: it reindexes columns to the
//! selector's order, never the input order.

use crate::ast::Selector;
use crate::error::{SelectError, SelectResult};
use crate::eval::{positions_to_mask, Evaluator};
use crate::index::{ColumnIndex, ColumnSource};
use crate::label::Label;
use tracing::debug;

/// Ordered result of resolving a selector
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    positions: Vec<usize>,
    labels: Vec<Label>,
}

impl Selection {
    /// Selected column positions in selection order
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Selected labels in selection order
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn into_labels(self) -> Vec<Label> {
        self.labels
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Boolean mask in index order
    ///
    /// A mask loses the selection order; hosts that honour order must use
    /// the label list.
    pub fn mask(&self, len: usize) -> Vec<bool> {
        positions_to_mask(&self.positions, len)
    }
}

/// Resolve a selector against a column index
pub fn resolve<S>(selector: &Selector, source: &S) -> SelectResult<Selection>
where
    S: ColumnSource + ?Sized,
{
    let positions = Evaluator::new(source).evaluate(selector)?;
    let labels = positions
        .iter()
        .map(|&pos| {
            source.label(pos).cloned().ok_or_else(|| {
                SelectError::InvalidIndex(format!("no label for column position {}", pos))
            })
        })
        .collect::<SelectResult<Vec<_>>>()?;

    debug!(
        nodes = selector.node_count(),
        columns = source.len(),
        selected = labels.len(),
        "resolved column selector"
    );

    Ok(Selection { positions, labels })
}

/// Column selection along the column axis of a host frame
pub trait ColumnIndexer: Sized {
    /// Select columns, reordered to match the selector
    fn loc_columns(&self, selector: &Selector) -> SelectResult<Self>;
}

impl ColumnIndexer for ColumnIndex {
    fn loc_columns(&self, selector: &Selector) -> SelectResult<Self> {
        let selection = resolve(selector, self)?;
        self.take(selection.positions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cols;
    use crate::label::Dtype;

    #[test]
    fn test_resolve_labels_and_mask() {
        let idx = ColumnIndex::flat([
            ("x", Dtype::Integer),
            ("y", Dtype::Integer),
            ("z", Dtype::String),
        ]);
        let selection = resolve(&cols!["z", "x"], &idx).unwrap();
        assert_eq!(selection.labels(), &[Label::from("z"), Label::from("x")]);
        assert_eq!(selection.positions(), &[2, 0]);
        assert_eq!(selection.mask(idx.len()), vec![true, false, true]);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_loc_columns_carries_dtypes() {
        let idx = ColumnIndex::flat([("x", Dtype::Integer), ("z", Dtype::String)]);
        let selected = idx.loc_columns(&cols!["z", "x"]).unwrap();
        assert_eq!(selected.dtypes(), &[Dtype::String, Dtype::Integer]);
    }

    #[test]
    fn test_empty_selection() {
        let idx = ColumnIndex::flat([("x", Dtype::Integer)]);
        let selection = resolve(&cols!["nope"], &idx).unwrap();
        assert!(selection.is_empty());
        assert!(selection.into_labels().is_empty());
    }
}

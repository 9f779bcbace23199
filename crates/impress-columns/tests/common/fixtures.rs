//! Column index fixtures

use impress_columns::{ColumnIndex, ColumnIndexer, Dtype, Label, Selector};

/// Flat index `x, y, z, u` with dtypes int, int, str, float
pub fn simple_index() -> ColumnIndex {
    ColumnIndex::flat([
        ("x", Dtype::from_host_name("int64")),
        ("y", Dtype::from_host_name("int64")),
        ("z", Dtype::from_host_name("object")),
        ("u", Dtype::from_host_name("float64")),
    ])
}

/// Hierarchical index `{a,b,c} x {X,Y,Z}` with levels named `one`, `two`
pub fn multi_index() -> ColumnIndex {
    ColumnIndex::from_product(
        vec![
            vec!["a".into(), "b".into(), "c".into()],
            vec!["X".into(), "Y".into(), "Z".into()],
        ],
        ["one", "two"],
        Dtype::from_host_name("object"),
    )
    .expect("valid product index")
}

/// Labels left after selecting columns with `selector`
pub fn cols(index: &ColumnIndex, selector: &Selector) -> Vec<Label> {
    index
        .loc_columns(selector)
        .unwrap_or_else(|e| panic!("selection failed: {}", e))
        .labels()
        .to_vec()
}

/// Flat labels from strings
#[allow(dead_code)]
pub fn flat(names: &[&str]) -> Vec<Label> {
    names.iter().map(|n| Label::from(*n)).collect()
}

/// Tuple labels from string pairs
#[allow(dead_code)]
pub fn pairs(names: &[(&str, &str)]) -> Vec<Label> {
    names.iter().map(|&(a, b)| Label::from((a, b))).collect()
}

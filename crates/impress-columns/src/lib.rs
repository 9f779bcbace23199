//! impress-columns - Composable column selectors for dataframes
//!
//! This crate provides a small expression language for picking columns of a
//! flat or hierarchical column index:
//!
//! - **By label**: `cols!["y", "z", "x"]` (request order is kept)
//! - **By name pattern**: `C::starts_with("x")`, `C::ends_with`, `C::contains`, `C::matches`
//! - **By dtype**: `C::dtype().eq(Dtype::String)`, `C::dtype().is_in([...])`
//! - **By level**: `C::level("one").select(["c", "a"])`
//! - **Composition**: `a | b`, `a & b`, `!a`, and `a | Rest` for "all remaining"
//!
//! Resolving a selector yields an ordered, duplicate-free list of labels
//! drawn from the index. The order is always driven by the selector.
//!
//! # Examples
//!
//! ```ignore
//! use impress_columns::{cols, resolve, ColumnIndex, Dtype, Rest, C};
//!
//! let index = ColumnIndex::flat([("x", Dtype::Integer), ("y", Dtype::Integer)]);
//! let selection = resolve(&(cols!["y"] | Rest), &index)?;
//!
//! let selector = impress_columns::parse_selector(r#"C.levels[0]["c", "a"] | ..."#)?;
//! ```

pub mod ast;
pub mod composer;
pub mod error;
pub mod eval;
pub mod index;
pub mod label;
pub mod levels;
pub mod matcher;
pub mod parser;
pub mod resolve;

pub use ast::*;
pub use composer::*;
pub use error::*;
pub use eval::*;
pub use index::*;
pub use label::*;
pub use levels::*;
pub use matcher::*;
pub use parser::*;
pub use resolve::*;

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

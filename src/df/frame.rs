use ndarray::{Array1, Array2};

use super::{Label, Symbol};
use crate::toolkit::array::AFloat;

mod concat;
mod indexing;
mod meta;
mod missing;
mod ops;

pub use concat::{concat_columns, concat_rows, concat_series};
pub use ops::FrameRolling;

/// a labeled two-dimensional table: named float columns over one shared
/// index. `values` is row-major with shape `(index.len(), columns.len())`.
#[derive(Debug, Clone)]
pub struct Frame<L: Label, T: AFloat> {
    pub index: Array1<L>,
    pub columns: Array1<Symbol>,
    pub values: Array2<T>,
}

use ndarray::Array1;

use super::{Label, Symbol};
use crate::toolkit::array::AFloat;

mod indexing;
mod meta;
mod missing;
mod ops;

pub use ops::Rolling;
pub(crate) use missing::fill_in_place;

/// a labeled one-dimensional sequence: an ordered mapping from index labels
/// to float values, with an optional name.
///
/// the index and values always have equal length; labels are not required to
/// be unique, and label lookups resolve to the first occurrence.
#[derive(Debug, Clone)]
pub struct Series<L: Label, T: AFloat> {
    pub index: Array1<L>,
    pub values: Array1<T>,
    pub name: Option<Symbol>,
}

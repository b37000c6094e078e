use ndarray::Axis;

use super::Frame;
use crate::df::{Label, Mask, Series};
use crate::errors::{FrameError, Result};
use crate::toolkit::array::{resolve_position, resolve_slice, AFloat};

impl<L: Label, T: AFloat> Frame<L, T> {
    /// extract one column as a series named after it.
    pub fn col(&self, name: &str) -> Result<Series<L, T>> {
        let j = self
            .col_position(name)
            .ok_or_else(|| FrameError::ColumnNotFound {
                column: name.to_string(),
            })?;
        Ok(Series {
            index: self.index.clone(),
            values: self.values.column(j).to_owned(),
            name: Some(self.columns[j]),
        })
    }

    /// project onto the named columns, in the given order.
    pub fn cols(&self, names: &[&str]) -> Result<Self> {
        let positions: Result<Vec<usize>> = names
            .iter()
            .map(|name| {
                self.col_position(name)
                    .ok_or_else(|| FrameError::ColumnNotFound {
                        column: name.to_string(),
                    })
            })
            .collect();
        Ok(self.take_cols(&positions?))
    }

    /// select rows by position, in order.
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        Self {
            index: self.index.select(Axis(0), indices),
            columns: self.columns.clone(),
            values: self.values.select(Axis(0), indices),
        }
    }

    pub fn take_cols(&self, indices: &[usize]) -> Self {
        Self {
            index: self.index.clone(),
            columns: self.columns.select(Axis(0), indices),
            values: self.values.select(Axis(1), indices),
        }
    }

    /// positional scalar lookup; both positions may be negative.
    pub fn iloc(&self, row: isize, col: isize) -> Result<T> {
        let i = resolve_position(self.nrows(), row)?;
        let j = resolve_position(self.ncols(), col)?;
        Ok(self.values[(i, j)])
    }

    /// positional row slice with `[start:stop:step]` semantics.
    pub fn islice_rows(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
    ) -> Result<Self> {
        let indices = resolve_slice(self.nrows(), start, stop, step)?;
        Ok(self.take_rows(&indices))
    }

    /// row of values at `label` (first occurrence), ordered as the columns.
    pub fn loc_row(&self, label: &L) -> Result<Vec<T>> {
        let i = self
            .index
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| FrameError::KeyNotFound {
                label: format!("{label:?}"),
            })?;
        Ok(self.values.row(i).to_vec())
    }

    /// label-range row selection, inclusive of both endpoints.
    pub fn lslice_rows(&self, start: &L, stop: &L) -> Result<Self> {
        let (lo, hi) = crate::df::label_bounds(&self.index, start, stop)?;
        let indices: Vec<usize> = (lo..hi).collect();
        Ok(self.take_rows(&indices))
    }

    /// keep the rows where the mask holds.
    pub fn filter_rows(&self, mask: &Mask) -> Result<Self> {
        if mask.len() != self.nrows() {
            return Err(FrameError::LengthMismatch {
                left: self.nrows(),
                right: mask.len(),
            });
        }
        Ok(self.take_rows(&mask.positions()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> Frame<i64, f64> {
        Frame::from_columns(
            vec![0, 1, 2, 3],
            vec![
                ("CMG", vec![1.0, 2.0, 3.0, 4.0]),
                ("MCD", vec![4.0, 3.0, 2.0, 1.0]),
                ("WFM", vec![1.0, 1.0, 5.0, 5.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn column_extraction_keeps_index_and_name() {
        let f = toy();
        let c = f.col("MCD").unwrap();
        assert_eq!(c.name.unwrap(), "MCD");
        assert_eq!(c.values.to_vec(), vec![4.0, 3.0, 2.0, 1.0]);
        assert!(f.col("TSLA").is_err());

        let pair = f.cols(&["WFM", "CMG"]).unwrap();
        assert_eq!(pair.columns[0], "WFM");
        assert_eq!(pair.values[(2, 1)], 3.0);
    }

    #[test]
    fn positional_row_and_scalar_access() {
        let f = toy();
        assert_eq!(f.iloc(0, 1).unwrap(), 4.0);
        assert_eq!(f.iloc(-1, -1).unwrap(), 5.0);

        let top = f.islice_rows(Some(0), Some(2), 1).unwrap();
        assert_eq!(top.nrows(), 2);
        let rev = f.islice_rows(None, None, -1).unwrap();
        assert_eq!(rev.index.to_vec(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn label_rows_are_endpoint_inclusive() {
        let f = toy();
        let mid = f.lslice_rows(&1, &2).unwrap();
        assert_eq!(mid.index.to_vec(), vec![1, 2]);
        assert_eq!(f.loc_row(&2).unwrap(), vec![3.0, 2.0, 5.0]);
    }

    #[test]
    fn boolean_row_selection_across_columns() {
        let f = toy();
        let mcd = f.col("MCD").unwrap();
        let wfm = f.col("WFM").unwrap();
        let mask = mcd.gt_series(&wfm).unwrap();
        let picked = f.filter_rows(&mask).unwrap();
        assert_eq!(picked.index.to_vec(), vec![0, 1]);
    }
}

use ndarray::{Array2, Axis};

use super::Frame;
use crate::df::series::Series;
use crate::df::{Fill, FillPolicy, Label};
use crate::errors::Result;
use crate::toolkit::array::AFloat;

impl<L: Label, T: AFloat> Frame<L, T> {
    pub fn fillna(&self, value: T) -> Self {
        Self {
            index: self.index.clone(),
            columns: self.columns.clone(),
            values: self.values.mapv(|v| if v.is_nan() { value } else { v }),
        }
    }

    /// forward/backward fill within each column independently.
    pub fn fillna_method(&self, method: Fill) -> Self {
        let mut values = self.values.clone();
        for mut column in values.axis_iter_mut(Axis(1)) {
            let mut buf = column.to_vec();
            crate::df::series::fill_in_place(&mut buf, method);
            for (v, b) in column.iter_mut().zip(buf) {
                *v = b;
            }
        }
        Self {
            index: self.index.clone(),
            columns: self.columns.clone(),
            values,
        }
    }

    /// drop every row containing at least one missing value. idempotent.
    pub fn dropna_rows(&self) -> Self {
        let keep: Vec<usize> = self
            .values
            .rows()
            .into_iter()
            .enumerate()
            .filter_map(|(i, row)| row.iter().all(|v| !v.is_nan()).then_some(i))
            .collect();
        self.take_rows(&keep)
    }

    /// drop every column containing at least one missing value.
    pub fn dropna_cols(&self) -> Self {
        let keep: Vec<usize> = self
            .values
            .columns()
            .into_iter()
            .enumerate()
            .filter_map(|(j, col)| col.iter().all(|v| !v.is_nan()).then_some(j))
            .collect();
        self.take_cols(&keep)
    }

    /// realign every column to `new_index`; see [`Series::reindex`] for the
    /// fill policies.
    pub fn reindex_rows(&self, new_index: &[L], policy: FillPolicy<T>) -> Result<Self> {
        let mut values = Array2::from_elem((new_index.len(), self.ncols()), T::nan());
        for (j, source) in self.values.columns().into_iter().enumerate() {
            let column = Series {
                index: self.index.clone(),
                values: source.to_owned(),
                name: None,
            };
            let aligned = column.reindex(new_index, policy)?;
            values
                .slice_mut(ndarray::s![.., j])
                .assign(&aligned.values);
        }
        Ok(Self {
            index: ndarray::Array1::from_vec(new_index.to_vec()),
            columns: self.columns.clone(),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;

    fn gappy() -> Frame<i64, f64> {
        Frame::from_columns(
            vec![0, 1, 2],
            vec![("A", vec![1.0, NAN, 3.0]), ("B", vec![NAN, 5.0, 6.0])],
        )
        .unwrap()
    }

    #[test]
    fn fillna_variants() {
        let zeroed = gappy().fillna(0.0);
        assert_eq!(zeroed.values[(1, 0)], 0.0);
        assert_eq!(zeroed.values[(0, 1)], 0.0);

        let ffilled = gappy().fillna_method(Fill::Forward);
        assert_eq!(ffilled.values[(1, 0)], 1.0);
        assert!(ffilled.values[(0, 1)].is_nan());

        let bfilled = gappy().fillna_method(Fill::Backward);
        assert_eq!(bfilled.values[(1, 0)], 3.0);
        assert_eq!(bfilled.values[(0, 1)], 5.0);
    }

    #[test]
    fn dropping_rows_and_columns() {
        let f = gappy();
        let rows = f.dropna_rows();
        assert_eq!(rows.index.to_vec(), vec![2]);
        let again = rows.dropna_rows();
        assert_eq!(again.index.to_vec(), vec![2]);

        let mut with_clean = f.clone();
        with_clean.insert_col(
            "C",
            &Series::from_vecs(vec![0, 1, 2], vec![7.0, 8.0, 9.0]).unwrap(),
        )
        .unwrap();
        let cols = with_clean.dropna_cols();
        assert_eq!(cols.ncols(), 1);
        assert_eq!(cols.columns[0], "C");
    }

    #[test]
    fn reindexing_rows_fills_per_column() {
        let f = Frame::from_columns(vec![0i64, 2], vec![("A", vec![1.0, 2.0])]).unwrap();
        let r = f.reindex_rows(&[0, 1, 2, 3], FillPolicy::Forward).unwrap();
        assert_eq!(
            r.col("A").unwrap().values.to_vec(),
            vec![1.0, 1.0, 2.0, 2.0]
        );
    }
}

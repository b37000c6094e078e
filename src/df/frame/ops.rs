use core::ops::{Add, Div, Mul, Sub};
use std::collections::HashMap;

use itertools::{enumerate, Itertools};
use ndarray::{Array1, Array2};

use super::Frame;
use crate::df::{DescribeStats, Label, Series, Symbol};
use crate::errors::{FrameError, Result};
use crate::toolkit::array::{
    self, nanmean, nanmedian, nanstd, AFloat, UnsafeSlice,
};

const OPS_NUM_THREADS: usize = 8;

impl<L: Label, T: AFloat> Frame<L, T> {
    /// reduce each column with `f`, in parallel, into a series indexed by
    /// the column symbols.
    fn reduce_axis0(&self, f: impl Fn(&[T]) -> T + Sync) -> Series<Symbol, T> {
        let mut res = vec![T::nan(); self.ncols()];
        let slice = UnsafeSlice::new(&mut res);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(OPS_NUM_THREADS)
            .build()
            .unwrap();
        pool.scope(|s| {
            let f = &f;
            for (j, col) in enumerate(self.values.columns()) {
                let mut slice = slice.shadow();
                s.spawn(move |_| slice.set(j, f(&col.to_vec())));
            }
        });
        Series {
            index: self.columns.clone(),
            values: Array1::from_vec(res),
            name: None,
        }
    }

    /// column-wise mean, skipping missing values.
    pub fn mean_axis0(&self) -> Series<Symbol, T> {
        self.reduce_axis0(nanmean)
    }

    pub fn std_axis0(&self) -> Series<Symbol, T> {
        self.reduce_axis0(nanstd)
    }

    pub fn median_axis0(&self) -> Series<Symbol, T> {
        self.reduce_axis0(nanmedian)
    }

    /// row-wise mean, skipping missing values.
    pub fn mean_axis1(&self) -> Series<L, T> {
        let mut res = vec![T::nan(); self.nrows()];
        let slice = UnsafeSlice::new(&mut res);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(OPS_NUM_THREADS)
            .build()
            .unwrap();
        pool.scope(|s| {
            for (i, row) in enumerate(self.values.rows()) {
                let mut slice = slice.shadow();
                s.spawn(move |_| slice.set(i, nanmean(&row.to_vec())));
            }
        });
        Series {
            index: self.index.clone(),
            values: Array1::from_vec(res),
            name: None,
        }
    }

    /// per-column summary statistics, ordered as the columns.
    pub fn describe(&self) -> Vec<(Symbol, DescribeStats<T>)> {
        self.values
            .columns()
            .into_iter()
            .zip(self.columns.iter())
            .map(|(col, &symbol)| {
                let series = Series {
                    index: self.index.clone(),
                    values: col.to_owned(),
                    name: Some(symbol),
                };
                (symbol, series.describe())
            })
            .collect()
    }

    /// rebuild every column through `f`, in parallel. each task writes its
    /// own contiguous chunk of a column-major scratch buffer.
    fn map_cols(&self, f: impl Fn(&[T], &mut [T]) + Sync) -> Self {
        let (nrows, ncols) = self.shape();
        let mut flat = vec![T::nan(); nrows * ncols];
        let slice = UnsafeSlice::new(&mut flat);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(OPS_NUM_THREADS)
            .build()
            .unwrap();
        pool.scope(|s| {
            let f = &f;
            for (j, col) in enumerate(self.values.columns()) {
                let mut slice = slice.shadow();
                s.spawn(move |_| {
                    let mut out = vec![T::nan(); nrows];
                    f(&col.to_vec(), &mut out);
                    if !out.is_empty() {
                        slice.copy_from_slice(j * nrows, &out);
                    }
                });
            }
        });
        let values = Array2::from_shape_vec((ncols, nrows), flat)
            .unwrap_or_else(|_| unreachable!("shape follows from the inputs"))
            .reversed_axes()
            .as_standard_layout()
            .into_owned();
        Self {
            index: self.index.clone(),
            columns: self.columns.clone(),
            values,
        }
    }

    /// multiplicative change from the previous row, per column; the first
    /// row is missing by construction.
    pub fn pct_change(&self) -> Self {
        self.map_cols(|col, out| {
            for i in 0..col.len() {
                if i == 0 {
                    out[i] = T::nan();
                } else {
                    out[i] = col[i] / col[i - 1] - T::one();
                }
            }
        })
    }

    pub fn cumsum(&self) -> Self {
        self.map_cols(|col, out| {
            let mut acc = T::zero();
            for (o, &v) in out.iter_mut().zip(col) {
                if !v.is_nan() {
                    acc += v;
                }
                *o = if v.is_nan() { T::nan() } else { acc };
            }
        })
    }

    pub fn cumprod(&self) -> Self {
        self.map_cols(|col, out| {
            let mut acc = T::one();
            for (o, &v) in out.iter_mut().zip(col) {
                if !v.is_nan() {
                    acc *= v;
                }
                *o = if v.is_nan() { T::nan() } else { acc };
            }
        })
    }

    /// trailing fixed-size window statistics, applied per column.
    pub fn rolling(&self, window: usize) -> Result<FrameRolling<'_, L, T>> {
        if window == 0 {
            return Err(FrameError::InvalidWindow { window });
        }
        Ok(FrameRolling {
            frame: self,
            window,
        })
    }

    /// combine with an equally-labeled structure on the union of indexes and
    /// column sets; anything present on one side only is missing.
    pub fn zip_align_frame(&self, other: &Self, f: impl Fn(T, T) -> T) -> Self {
        let union_index: Vec<L> = self
            .index
            .iter()
            .chain(other.index.iter())
            .copied()
            .sorted_unstable()
            .dedup()
            .collect();
        let union_cols: Vec<Symbol> = self
            .columns
            .iter()
            .chain(other.columns.iter())
            .copied()
            .sorted_unstable()
            .dedup()
            .collect();
        let lrows = first_positions(self.index.iter());
        let rrows = first_positions(other.index.iter());
        let lcols = first_positions(self.columns.iter());
        let rcols = first_positions(other.columns.iter());

        let mut values = Array2::from_elem((union_index.len(), union_cols.len()), T::nan());
        for (i, label) in enumerate(&union_index) {
            let (li, ri) = (lrows.get(label), rrows.get(label));
            for (j, symbol) in enumerate(&union_cols) {
                if let (Some(&li), Some(&ri), Some(&lj), Some(&rj)) =
                    (li, ri, lcols.get(symbol), rcols.get(symbol))
                {
                    values[(i, j)] = f(self.values[(li, lj)], other.values[(ri, rj)]);
                }
            }
        }
        Self {
            index: Array1::from_vec(union_index),
            columns: Array1::from_vec(union_cols),
            values,
        }
    }

    /// broadcast a series across every column, aligning on the index union.
    pub fn zip_align_series(&self, series: &Series<L, T>, f: impl Fn(T, T) -> T) -> Result<Self> {
        let union_index: Vec<L> = self
            .index
            .iter()
            .chain(series.index.iter())
            .copied()
            .sorted_unstable()
            .dedup()
            .collect();
        let frame = self.reindex_rows(&union_index, crate::df::FillPolicy::Leave)?;
        let series = series.reindex(&union_index, crate::df::FillPolicy::Leave)?;
        let mut values = frame.values;
        for (mut row, &s) in values.rows_mut().into_iter().zip(series.values.iter()) {
            for v in row.iter_mut() {
                *v = f(*v, s);
            }
        }
        Ok(Self {
            index: frame.index,
            columns: frame.columns,
            values,
        })
    }

    /// subtract one value per column, matched by symbol, e.g. for
    /// column-wise centering against `mean_axis0`.
    pub fn sub_row(&self, row: &Series<Symbol, T>) -> Result<Self> {
        self.zip_row(row, |a, b| a - b)
    }

    pub fn div_row(&self, row: &Series<Symbol, T>) -> Result<Self> {
        self.zip_row(row, |a, b| a / b)
    }

    /// broadcast a column-indexed series over every row, matching columns by
    /// symbol; frame columns the series lacks come out missing.
    fn zip_row(&self, row: &Series<Symbol, T>, f: impl Fn(T, T) -> T) -> Result<Self> {
        let lookup = first_positions(row.index.iter());
        let per_col: Vec<T> = self
            .columns
            .iter()
            .map(|symbol| lookup.get(symbol).map_or(T::nan(), |&k| row.values[k]))
            .collect();
        let mut values = self.values.clone();
        for mut r in values.rows_mut() {
            for (v, &b) in r.iter_mut().zip(&per_col) {
                *v = f(*v, b);
            }
        }
        Ok(Self {
            index: self.index.clone(),
            columns: self.columns.clone(),
            values,
        })
    }
}

fn first_positions<'a, K: Copy + Eq + std::hash::Hash + 'a>(
    iter: impl Iterator<Item = &'a K>,
) -> HashMap<K, usize> {
    let mut map = HashMap::new();
    for (i, &k) in iter.enumerate() {
        map.entry(k).or_insert(i);
    }
    map
}

/// trailing-window statistics over every column of a frame.
pub struct FrameRolling<'a, L: Label, T: AFloat> {
    frame: &'a Frame<L, T>,
    window: usize,
}

impl<'a, L: Label, T: AFloat> FrameRolling<'a, L, T> {
    fn apply(&self, kernel: impl Fn(&[T], usize, &mut [T]) + Sync) -> Frame<L, T> {
        self.frame.map_cols(|col, out| kernel(col, self.window, out))
    }

    pub fn mean(&self) -> Frame<L, T> {
        self.apply(array::rolling_mean_into)
    }

    pub fn std(&self) -> Frame<L, T> {
        self.apply(array::rolling_std_into)
    }
}

macro_rules! impl_frame_scalar_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<L: Label, T: AFloat> $trait<T> for &Frame<L, T> {
            type Output = Frame<L, T>;

            fn $method(self, rhs: T) -> Frame<L, T> {
                Frame {
                    index: self.index.clone(),
                    columns: self.columns.clone(),
                    values: self.values.mapv(|v| v $op rhs),
                }
            }
        }
    };
}

impl_frame_scalar_binop!(Add, add, +);
impl_frame_scalar_binop!(Sub, sub, -);
impl_frame_scalar_binop!(Mul, mul, *);
impl_frame_scalar_binop!(Div, div, /);

macro_rules! impl_frame_aligned_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<'a, L: Label, T: AFloat> $trait<&'a Frame<L, T>> for &'a Frame<L, T> {
            type Output = Frame<L, T>;

            fn $method(self, rhs: &'a Frame<L, T>) -> Frame<L, T> {
                self.zip_align_frame(rhs, |a, b| a $op b)
            }
        }
    };
}

impl_frame_aligned_binop!(Add, add, +);
impl_frame_aligned_binop!(Sub, sub, -);
impl_frame_aligned_binop!(Mul, mul, *);
impl_frame_aligned_binop!(Div, div, /);

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;

    fn toy() -> Frame<i64, f64> {
        Frame::from_columns(
            vec![0, 1, 2, 3],
            vec![
                ("A", vec![1.0, 2.0, 3.0, 4.0]),
                ("B", vec![2.0, 4.0, NAN, 8.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn axis0_reductions_skip_missing() {
        let f = toy();
        let means = f.mean_axis0();
        assert_eq!(means.index.to_vec(), f.columns.to_vec());
        assert_eq!(means.loc(&Symbol::new("A").unwrap()).unwrap(), 2.5);
        assert!((means.loc(&Symbol::new("B").unwrap()).unwrap() - 14.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn axis1_means_are_row_wise() {
        let f = toy();
        let means = f.mean_axis1();
        assert_eq!(means.values.to_vec()[..2], [1.5, 3.0]);
        assert_eq!(means.values[2], 3.0);
    }

    #[test]
    fn describe_reports_per_column() {
        let stats = toy().describe();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].0, "A");
        assert_eq!(stats[0].1.count, 4);
        assert_eq!(stats[1].1.count, 3);
    }

    #[test]
    fn pct_change_and_cumprod_per_column() {
        let f = Frame::from_columns(
            vec![0i64, 1, 2],
            vec![("A", vec![1.0f64, 1.1, 0.99]), ("B", vec![2.0, 2.0, 2.0])],
        )
        .unwrap();
        let r = f.pct_change();
        assert!(r.values[(0, 0)].is_nan());
        assert!((r.values[(1, 0)] - 0.1).abs() < 1e-12);
        assert_eq!(r.values[(1, 1)], 0.0);

        let prices = f.cumprod();
        assert!((prices.values[(2, 1)] - 8.0).abs() < 1e-12);
    }

    #[test]
    fn rolling_applies_per_column() {
        let f = toy();
        let m = f.rolling(2).unwrap().mean();
        assert!(m.values[(0, 0)].is_nan());
        assert_eq!(m.values[(1, 0)], 1.5);
        // the NaN at (2, B) poisons windows 2 and 3 of column B
        assert!(m.values[(2, 1)].is_nan() && m.values[(3, 1)].is_nan());
        assert!(f.rolling(0).is_err());
    }

    #[test]
    fn frame_rolling_matches_per_column_series() {
        // many columns so the per-column tasks actually fan out
        let index: Vec<i64> = (0..64).collect();
        let columns: Vec<(String, Vec<f64>)> = (0..16)
            .map(|j| {
                let name = format!("C{j}");
                let values = (0..64).map(|i| ((i * 7 + j * 3) % 11) as f64).collect();
                (name, values)
            })
            .collect();
        let named: Vec<(&str, Vec<f64>)> = columns
            .iter()
            .map(|(n, v)| (n.as_str(), v.clone()))
            .collect();
        let f = Frame::from_columns(index, named).unwrap();

        let frame_mean = f.rolling(5).unwrap().mean();
        let frame_std = f.rolling(5).unwrap().std();
        for symbol in f.columns.iter() {
            let col = f.col(symbol.as_str()).unwrap();
            let series_mean = col.rolling(5).unwrap().mean();
            let series_std = col.rolling(5).unwrap().std();
            let j = f.col_position(symbol.as_str()).unwrap();
            for i in 0..f.nrows() {
                let (a, b) = (frame_mean.values[(i, j)], series_mean.values[i]);
                assert!(a == b || (a.is_nan() && b.is_nan()));
                let (a, b) = (frame_std.values[(i, j)], series_std.values[i]);
                assert!(a == b || (a.is_nan() && b.is_nan()));
            }
        }
    }

    #[test]
    fn frame_arithmetic_aligns_like_series() {
        let a = Frame::from_columns(vec![0i64, 1], vec![("X", vec![1.0f64, 2.0])]).unwrap();
        let b = Frame::from_columns(vec![1i64, 2], vec![("X", vec![10.0f64, 20.0])]).unwrap();
        let sum = &a + &b;
        assert_eq!(sum.index.to_vec(), vec![0, 1, 2]);
        assert!(sum.values[(0, 0)].is_nan());
        assert_eq!(sum.values[(1, 0)], 12.0);
        assert!(sum.values[(2, 0)].is_nan());
    }

    #[test]
    fn series_broadcast_across_columns() {
        let f = toy();
        let s = Series::from_vecs(vec![0i64, 1, 2, 3], vec![1.0, 1.0, 1.0, 1.0]).unwrap();
        let shifted = f.zip_align_series(&s, |a, b| a + b).unwrap();
        assert_eq!(shifted.values[(0, 0)], 2.0);
        assert_eq!(shifted.values[(3, 1)], 9.0);
    }

    #[test]
    fn column_wise_normalization_via_row_broadcast() {
        let f = Frame::from_columns(
            vec![0i64, 1],
            vec![("A", vec![1.0, 3.0]), ("B", vec![10.0, 30.0])],
        )
        .unwrap();
        let centered = f.sub_row(&f.mean_axis0()).unwrap();
        assert_eq!(centered.values[(0, 0)], -1.0);
        assert_eq!(centered.values[(1, 1)], 10.0);
    }

    #[test]
    fn scalar_ops() {
        let f = toy();
        let doubled = &f * 2.0;
        assert_eq!(doubled.values[(0, 0)], 2.0);
        let shifted = &doubled + 1.0;
        assert_eq!(shifted.values[(3, 0)], 9.0);
    }
}

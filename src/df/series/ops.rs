use core::ops::{Add, Div, Mul, Sub};
use std::collections::HashMap;

use itertools::Itertools;
use ndarray::Array1;

use super::Series;
use crate::df::{DescribeStats, Label};
use crate::errors::{FrameError, Result};
use crate::toolkit::array::{
    self, nancorr, nancount, nanmax, nanmean, nanmedian, nanmin, nanquantile, nanstd, nansum,
    AFloat,
};

impl<L: Label, T: AFloat> Series<L, T> {
    fn values_slice(&self) -> &[T] {
        self.values.as_slice().unwrap_or_else(|| {
            unreachable!("1-D owned arrays are always contiguous")
        })
    }

    pub fn mean(&self) -> T {
        nanmean(self.values_slice())
    }

    pub fn std(&self) -> T {
        nanstd(self.values_slice())
    }

    pub fn median(&self) -> T {
        nanmedian(self.values_slice())
    }

    pub fn min(&self) -> T {
        nanmin(self.values_slice())
    }

    pub fn max(&self) -> T {
        nanmax(self.values_slice())
    }

    pub fn sum(&self) -> T {
        nansum(self.values_slice())
    }

    /// number of non-missing entries.
    pub fn count(&self) -> usize {
        nancount(self.values_slice())
    }

    pub fn quantile(&self, q: f64) -> T {
        nanquantile(self.values_slice(), q)
    }

    pub fn describe(&self) -> DescribeStats<T> {
        let v = self.values_slice();
        DescribeStats {
            count: nancount(v),
            mean: nanmean(v),
            std: nanstd(v),
            min: nanmin(v),
            q25: nanquantile(v, 0.25),
            q50: nanquantile(v, 0.5),
            q75: nanquantile(v, 0.75),
            max: nanmax(v),
        }
    }

    /// Pearson correlation with `other`, positional, over pairwise-complete
    /// observations.
    pub fn corr(&self, other: &Self) -> Result<T> {
        if self.len() != other.len() {
            return Err(FrameError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(nancorr(self.values_slice(), other.values_slice()))
    }

    pub fn cumsum(&self) -> Self {
        let mut acc = T::zero();
        let values = self.values.mapv(|v| {
            if !v.is_nan() {
                acc += v;
            }
            if v.is_nan() {
                T::nan()
            } else {
                acc
            }
        });
        self.derive(self.index.clone(), values)
    }

    pub fn cumprod(&self) -> Self {
        let mut acc = T::one();
        let values = self.values.mapv(|v| {
            if !v.is_nan() {
                acc *= v;
            }
            if v.is_nan() {
                T::nan()
            } else {
                acc
            }
        });
        self.derive(self.index.clone(), values)
    }

    /// multiplicative change from the previous entry; the first position is
    /// missing by construction.
    pub fn pct_change(&self) -> Self {
        let mut values = Vec::with_capacity(self.len());
        for i in 0..self.len() {
            if i == 0 {
                values.push(T::nan());
            } else {
                values.push(self.values[i] / self.values[i - 1] - T::one());
            }
        }
        self.derive(self.index.clone(), Array1::from_vec(values))
    }

    /// trailing fixed-size window statistics.
    pub fn rolling(&self, window: usize) -> Result<Rolling<'_, L, T>> {
        if window == 0 {
            return Err(FrameError::InvalidWindow { window });
        }
        Ok(Rolling {
            series: self,
            window,
        })
    }

    /// map every non-missing value; NaN stays NaN.
    pub fn map<F: Fn(T) -> T>(&self, f: F) -> Self {
        let values = self.values.mapv(|v| if v.is_nan() { T::nan() } else { f(v) });
        self.derive(self.index.clone(), values)
    }

    /// align with `other` on the sorted union of unique labels, then combine
    /// positionwise; labels present on one side only produce missing values.
    pub fn zip_align<F: Fn(T, T) -> T>(&self, other: &Self, f: F) -> Self {
        let union: Vec<L> = self
            .index
            .iter()
            .chain(other.index.iter())
            .copied()
            .sorted_unstable()
            .dedup()
            .collect();
        let left: HashMap<L, usize> = first_positions(&self.index);
        let right: HashMap<L, usize> = first_positions(&other.index);
        let values: Vec<T> = union
            .iter()
            .map(|label| match (left.get(label), right.get(label)) {
                (Some(&i), Some(&j)) => f(self.values[i], other.values[j]),
                _ => T::nan(),
            })
            .collect();
        self.derive(Array1::from_vec(union), Array1::from_vec(values))
    }
}

fn first_positions<L: Label>(index: &Array1<L>) -> HashMap<L, usize> {
    let mut map = HashMap::with_capacity(index.len());
    for (i, &label) in index.iter().enumerate() {
        map.entry(label).or_insert(i);
    }
    map
}

/// a trailing-window view over a series; the first `window - 1` outputs are
/// missing, as is any window containing a missing value.
pub struct Rolling<'a, L: Label, T: AFloat> {
    series: &'a Series<L, T>,
    window: usize,
}

impl<'a, L: Label, T: AFloat> Rolling<'a, L, T> {
    pub fn mean(&self) -> Series<L, T> {
        let mut out = vec![T::nan(); self.series.len()];
        array::rolling_mean_into(self.series.values_slice(), self.window, &mut out);
        self.series
            .derive(self.series.index.clone(), Array1::from_vec(out))
    }

    pub fn std(&self) -> Series<L, T> {
        let mut out = vec![T::nan(); self.series.len()];
        array::rolling_std_into(self.series.values_slice(), self.window, &mut out);
        self.series
            .derive(self.series.index.clone(), Array1::from_vec(out))
    }
}

macro_rules! impl_aligned_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<'a, L: Label, T: AFloat> $trait<&'a Series<L, T>> for &'a Series<L, T> {
            type Output = Series<L, T>;

            fn $method(self, rhs: &'a Series<L, T>) -> Series<L, T> {
                self.zip_align(rhs, |a, b| a $op b)
            }
        }
    };
}

impl_aligned_binop!(Add, add, +);
impl_aligned_binop!(Sub, sub, -);
impl_aligned_binop!(Mul, mul, *);
impl_aligned_binop!(Div, div, /);

macro_rules! impl_scalar_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<L: Label, T: AFloat> $trait<T> for &Series<L, T> {
            type Output = Series<L, T>;

            fn $method(self, rhs: T) -> Series<L, T> {
                let values = self.values.mapv(|v| v $op rhs);
                self.derive(self.index.clone(), values)
            }
        }
    };
}

impl_scalar_binop!(Add, add, +);
impl_scalar_binop!(Sub, sub, -);
impl_scalar_binop!(Mul, mul, *);
impl_scalar_binop!(Div, div, /);

use ndarray::Axis;

use super::Series;
use crate::df::{Label, Mask};
use crate::errors::{FrameError, Result};
use crate::toolkit::array::{resolve_position, resolve_slice, AFloat};

impl<L: Label, T: AFloat> Series<L, T> {
    /// positional lookup; negative positions count from the end.
    pub fn iloc(&self, i: isize) -> Result<T> {
        let i = resolve_position(self.len(), i)?;
        Ok(self.values[i])
    }

    /// positional slice with `[start:stop:step]` semantics: half-open,
    /// signed bounds, negative steps traverse in reverse.
    pub fn islice(&self, start: Option<isize>, stop: Option<isize>, step: isize) -> Result<Self> {
        let indices = resolve_slice(self.len(), start, stop, step)?;
        Ok(self.take(&indices))
    }

    /// select the given positions, in order.
    pub fn take(&self, indices: &[usize]) -> Self {
        self.derive(
            self.index.select(Axis(0), indices),
            self.values.select(Axis(0), indices),
        )
    }

    /// position of the first occurrence of `label`.
    pub fn position(&self, label: &L) -> Option<usize> {
        self.index.iter().position(|l| l == label)
    }

    /// label lookup (first occurrence).
    pub fn loc(&self, label: &L) -> Result<T> {
        let i = self.position(label).ok_or_else(|| FrameError::KeyNotFound {
            label: format!("{label:?}"),
        })?;
        Ok(self.values[i])
    }

    /// label-range selection, inclusive of BOTH endpoints (unlike positional
    /// slicing). monotonic indexes select every label in `start..=stop`;
    /// otherwise both endpoints must be present and the contiguous span
    /// between their first occurrences is returned.
    pub fn lslice(&self, start: &L, stop: &L) -> Result<Self> {
        let (lo, hi) = self.label_bounds(start, stop)?;
        let indices: Vec<usize> = (lo..hi).collect();
        Ok(self.take(&indices))
    }

    /// resolve an inclusive label range to half-open positions `lo..hi`.
    pub(crate) fn label_bounds(&self, start: &L, stop: &L) -> Result<(usize, usize)> {
        crate::df::label_bounds(&self.index, start, stop)
    }

    /// keep the rows where the mask holds.
    pub fn filter(&self, mask: &Mask) -> Result<Self> {
        if mask.len() != self.len() {
            return Err(FrameError::LengthMismatch {
                left: self.len(),
                right: mask.len(),
            });
        }
        Ok(self.take(&mask.positions()))
    }

    pub fn lt(&self, rhs: T) -> Mask {
        self.values.iter().map(|&v| v < rhs).collect()
    }

    pub fn le(&self, rhs: T) -> Mask {
        self.values.iter().map(|&v| v <= rhs).collect()
    }

    pub fn gt(&self, rhs: T) -> Mask {
        self.values.iter().map(|&v| v > rhs).collect()
    }

    pub fn ge(&self, rhs: T) -> Mask {
        self.values.iter().map(|&v| v >= rhs).collect()
    }

    /// element-wise `self > other`; both series must have equal length and
    /// are compared positionally.
    pub fn gt_series(&self, other: &Self) -> Result<Mask> {
        self.zip_compare(other, |a, b| a > b)
    }

    pub fn lt_series(&self, other: &Self) -> Result<Mask> {
        self.zip_compare(other, |a, b| a < b)
    }

    fn zip_compare(&self, other: &Self, cmp: impl Fn(T, T) -> bool) -> Result<Mask> {
        if self.len() != other.len() {
            return Err(FrameError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(&a, &b)| cmp(a, b))
            .collect())
    }

    pub fn isnull(&self) -> Mask {
        self.values.iter().map(|v| v.is_nan()).collect()
    }

    pub fn notnull(&self) -> Mask {
        self.values.iter().map(|v| !v.is_nan()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> Series<i64, f64> {
        Series::from_values(vec![1.0, 2.0, 3.0, 4.0, 5.0])
    }

    #[test]
    fn iloc_handles_signed_positions() {
        let s = toy();
        assert_eq!(s.iloc(0).unwrap(), 1.0);
        assert_eq!(s.iloc(-1).unwrap(), 5.0);
        assert!(s.iloc(5).is_err());
    }

    #[test]
    fn islice_with_negative_step_reverses() {
        let s = toy();
        let rev = s.islice(None, None, -1).unwrap();
        assert_eq!(rev.values.to_vec(), vec![5.0, 4.0, 3.0, 2.0, 1.0]);
        assert_eq!(rev.index.to_vec(), vec![4, 3, 2, 1, 0]);

        let mid = s.islice(Some(-2), Some(-4), -1).unwrap();
        assert_eq!(mid.values.to_vec(), vec![4.0, 3.0]);
    }

    #[test]
    fn islice_is_end_exclusive_but_lslice_is_inclusive() {
        let s = toy();
        assert_eq!(s.islice(Some(1), Some(3), 1).unwrap().len(), 2);
        let l = s.lslice(&1, &3).unwrap();
        assert_eq!(l.values.to_vec(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn lslice_between_absent_labels_on_monotonic_index() {
        let s = Series::from_vecs(vec![0i64, 2, 4, 6], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        // labels 1 and 5 are absent; the monotonic span still resolves
        let l = s.lslice(&1, &5).unwrap();
        assert_eq!(l.values.to_vec(), vec![2.0, 3.0]);
    }

    #[test]
    fn loc_reports_missing_labels() {
        let s = toy();
        assert_eq!(s.loc(&2).unwrap(), 3.0);
        assert!(matches!(s.loc(&9), Err(FrameError::KeyNotFound { .. })));
    }

    #[test]
    fn masking_with_combinators() {
        let s = toy();
        let picked = s.filter(&(&s.lt(3.0) & &s.gt(1.0))).unwrap();
        assert_eq!(picked.values.to_vec(), vec![2.0]);
        assert_eq!(picked.index.to_vec(), vec![1]);
    }

    #[test]
    fn null_masks() {
        let s = Series::from_values(vec![1.0, f64::NAN, 3.0]);
        assert_eq!(s.isnull().positions(), vec![1]);
        assert_eq!(s.notnull().positions(), vec![0, 2]);
    }
}

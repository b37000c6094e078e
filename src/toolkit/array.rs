//! # toolkit/array
//!
//! NaN-aware numeric kernels shared by [`Series`](crate::df::series::Series)
//! and [`Frame`](crate::df::frame::Frame), plus the parallel row-concatenation
//! machinery.
//!
//! every reduction here treats NaN as "missing": it is skipped, and an
//! all-missing input reduces to NaN instead of an error.

use core::cell::UnsafeCell;
use core::fmt::{Debug, Display};
use core::mem;
use core::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use ndarray::ArrayView2;
use num_traits::{Float, FromPrimitive};

use crate::errors::{FrameError, Result};

/// the float types a series/frame can hold (`f32` / `f64`).
pub trait AFloat:
    Float
    + FromPrimitive
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Debug
    + Display
    + Send
    + Sync
    + 'static
{
}

impl AFloat for f32 {}
impl AFloat for f64 {}

/// a sliced region that can be written to from multiple threads at once.
///
/// callers are responsible for handing out disjoint positions to each thread.
#[derive(Copy, Clone)]
pub struct UnsafeSlice<'a, T> {
    slice: &'a [UnsafeCell<T>],
}
unsafe impl<'a, T: Send + Sync> Send for UnsafeSlice<'a, T> {}
unsafe impl<'a, T: Send + Sync> Sync for UnsafeSlice<'a, T> {}
impl<'a, T> UnsafeSlice<'a, T> {
    pub fn new(slice: &'a mut [T]) -> Self {
        let ptr = slice as *mut [T] as *const [UnsafeCell<T>];
        Self {
            slice: unsafe { &*ptr },
        }
    }

    pub fn shadow(&self) -> Self {
        Self { slice: self.slice }
    }

    /// no two threads may write the same `i`.
    pub fn set(&mut self, i: usize, value: T) {
        let ptr = self.slice[i].get();
        unsafe { *ptr = value }
    }

    pub fn copy_from_slice(&mut self, offset: usize, src: &[T])
    where
        T: Copy,
    {
        let ptr = self.slice[offset].get();
        unsafe {
            core::ptr::copy_nonoverlapping(src.as_ptr(), ptr, src.len());
        }
    }
}

/// bytes copied per task before another worker is worth spawning.
const CONCAT_GROUP_NBYTES: usize = 4 * 1024 * 1024;

/// concatenate 2-D arrays along axis 0 into `out` (row-major, pre-sized).
///
/// arrays must all have the same column count and `out` must hold exactly the
/// total element count. copies are grouped into byte-budgeted tasks and run
/// on the rayon pool when more than one group exists.
pub fn fast_concat_2d_axis0<T: Copy + Send + Sync>(arrays: &[ArrayView2<T>], out: &mut [T]) {
    let num_columns = arrays.first().map_or(0, |a| a.ncols());
    let nbytes_per_row = num_columns * mem::size_of::<T>();
    let out = UnsafeSlice::new(out);

    // (element offset into `out`, source array) per input, grouped by byte budget
    let mut offset = 0;
    let mut tasks: Vec<Vec<(usize, &ArrayView2<T>)>> = vec![Vec::new()];
    let mut group_nbytes = 0;
    for array in arrays {
        if group_nbytes >= CONCAT_GROUP_NBYTES {
            tasks.push(Vec::new());
            group_nbytes = 0;
        }
        tasks.last_mut().unwrap().push((offset, array));
        offset += array.len();
        group_nbytes += array.nrows() * nbytes_per_row;
    }

    fn run<T: Copy>(mut out: UnsafeSlice<T>, group: &[(usize, &ArrayView2<T>)]) {
        for &(mut offset, array) in group {
            match array.as_slice() {
                Some(flat) => out.copy_from_slice(offset, flat),
                None => {
                    for row in array.rows() {
                        for &v in row {
                            out.set(offset, v);
                            offset += 1;
                        }
                    }
                }
            }
        }
    }

    if tasks.len() <= 1 {
        tasks.iter().for_each(|group| run(out.shadow(), group));
    } else {
        rayon::scope(|s| {
            for group in &tasks {
                let out = out.shadow();
                s.spawn(move |_| run(out, group));
            }
        });
    }
}

/// resolve `[start:stop:step]` against a sequence of `len` elements.
///
/// optional signed bounds count from the end when negative, the stop bound is
/// exclusive, and a negative step traverses in reverse.
pub fn resolve_slice(
    len: usize,
    start: Option<isize>,
    stop: Option<isize>,
    step: isize,
) -> Result<Vec<usize>> {
    if step == 0 {
        return Err(FrameError::InvalidStep);
    }
    let len = len as isize;
    let normalize = |bound: isize, low: isize, high: isize| -> isize {
        let bound = if bound < 0 { bound + len } else { bound };
        bound.clamp(low, high)
    };
    let (start, stop) = if step > 0 {
        (
            start.map_or(0, |b| normalize(b, 0, len)),
            stop.map_or(len, |b| normalize(b, 0, len)),
        )
    } else {
        (
            start.map_or(len - 1, |b| normalize(b, -1, len - 1)),
            stop.map_or(-1, |b| normalize(b, -1, len - 1)),
        )
    };

    let mut indices = Vec::new();
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        indices.push(i as usize);
        i += step;
    }
    Ok(indices)
}

/// resolve a signed position (`-1` is the last element).
pub fn resolve_position(len: usize, i: isize) -> Result<usize> {
    let resolved = if i < 0 { i + len as isize } else { i };
    if resolved < 0 || resolved >= len as isize {
        return Err(FrameError::PositionOutOfBounds { position: i, len });
    }
    Ok(resolved as usize)
}

pub fn nancount<T: AFloat>(values: &[T]) -> usize {
    values.iter().filter(|v| !v.is_nan()).count()
}

pub fn nansum<T: AFloat>(values: &[T]) -> T {
    let mut sum = T::zero();
    for &v in values {
        if !v.is_nan() {
            sum += v;
        }
    }
    sum
}

pub fn nanmean<T: AFloat>(values: &[T]) -> T {
    let mut sum = T::zero();
    let mut num = 0usize;
    for &v in values {
        if v.is_nan() {
            continue;
        }
        sum += v;
        num += 1;
    }
    if num == 0 {
        T::nan()
    } else {
        sum / T::from_usize(num).unwrap()
    }
}

/// sample standard deviation (`ddof = 1`) over the non-missing entries.
pub fn nanstd<T: AFloat>(values: &[T]) -> T {
    let mean = nanmean(values);
    if mean.is_nan() {
        return T::nan();
    }
    let mut acc = T::zero();
    let mut num = 0usize;
    for &v in values {
        if v.is_nan() {
            continue;
        }
        let d = v - mean;
        acc += d * d;
        num += 1;
    }
    if num < 2 {
        T::nan()
    } else {
        (acc / T::from_usize(num - 1).unwrap()).sqrt()
    }
}

pub fn nanmin<T: AFloat>(values: &[T]) -> T {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(T::nan(), |acc, v| if acc.is_nan() || v < acc { v } else { acc })
}

pub fn nanmax<T: AFloat>(values: &[T]) -> T {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(T::nan(), |acc, v| if acc.is_nan() || v > acc { v } else { acc })
}

/// `q`-quantile (`0..=1`) of the non-missing entries, linearly interpolated.
pub fn nanquantile<T: AFloat>(values: &[T], q: f64) -> T {
    let mut valid: Vec<T> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if valid.is_empty() {
        return T::nan();
    }
    valid.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let pos = q * (valid.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        valid[lo]
    } else {
        let frac = T::from_f64(pos - lo as f64).unwrap();
        valid[lo] + (valid[hi] - valid[lo]) * frac
    }
}

pub fn nanmedian<T: AFloat>(values: &[T]) -> T {
    nanquantile(values, 0.5)
}

/// Pearson correlation over pairwise-complete observations.
pub fn nancorr<T: AFloat>(a: &[T], b: &[T]) -> T {
    let pairs: Vec<(T, T)> = a
        .iter()
        .zip(b.iter())
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(&x, &y)| (x, y))
        .collect();
    if pairs.is_empty() {
        return T::nan();
    }
    let n = T::from_usize(pairs.len()).unwrap();
    let (mut sa, mut sb) = (T::zero(), T::zero());
    for &(x, y) in &pairs {
        sa += x;
        sb += y;
    }
    let (ma, mb) = (sa / n, sb / n);
    let (mut cov, mut va, mut vb) = (T::zero(), T::zero(), T::zero());
    for &(x, y) in &pairs {
        let (dx, dy) = (x - ma, y - mb);
        cov += dx * dy;
        va += dx * dx;
        vb += dy * dy;
    }
    cov / (va.sqrt() * vb.sqrt())
}

/// trailing-window mean; the first `window - 1` positions and any window that
/// contains a missing value come out as NaN.
pub fn rolling_mean_into<T: AFloat>(values: &[T], window: usize, out: &mut [T]) {
    debug_assert_eq!(values.len(), out.len());
    let mut sum = T::zero();
    let mut missing = 0usize;
    let w = T::from_usize(window).unwrap();
    for i in 0..values.len() {
        let v = values[i];
        if v.is_nan() {
            missing += 1;
        } else {
            sum += v;
        }
        if i >= window {
            let gone = values[i - window];
            if gone.is_nan() {
                missing -= 1;
            } else {
                sum -= gone;
            }
        }
        out[i] = if i + 1 < window || missing > 0 {
            T::nan()
        } else {
            sum / w
        };
    }
}

/// trailing-window sample standard deviation (`ddof = 1`); NaN policy as in
/// [`rolling_mean_into`], and a window of 1 is all-NaN.
pub fn rolling_std_into<T: AFloat>(values: &[T], window: usize, out: &mut [T]) {
    debug_assert_eq!(values.len(), out.len());
    if window < 2 {
        out.fill(T::nan());
        return;
    }
    let mut sum = T::zero();
    let mut sumsq = T::zero();
    let mut missing = 0usize;
    let w = T::from_usize(window).unwrap();
    let ddof = T::from_usize(window - 1).unwrap();
    for i in 0..values.len() {
        let v = values[i];
        if v.is_nan() {
            missing += 1;
        } else {
            sum += v;
            sumsq += v * v;
        }
        if i >= window {
            let gone = values[i - window];
            if gone.is_nan() {
                missing -= 1;
            } else {
                sum -= gone;
                sumsq -= gone * gone;
            }
        }
        out[i] = if i + 1 < window || missing > 0 {
            T::nan()
        } else {
            // running sums can go slightly negative from cancellation
            let var = (sumsq - sum * sum / w) / ddof;
            var.max(T::zero()).sqrt()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const NAN: f64 = f64::NAN;

    #[test]
    fn nan_reductions_skip_missing() {
        let values = [1.0, NAN, 3.0, 5.0];
        assert_eq!(nancount(&values), 3);
        assert_eq!(nansum(&values), 9.0);
        assert_eq!(nanmean(&values), 3.0);
        assert_eq!(nanmin(&values), 1.0);
        assert_eq!(nanmax(&values), 5.0);
        assert_eq!(nanmedian(&values), 3.0);
        assert!((nanstd(&values) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn all_missing_reduces_to_nan() {
        let values = [NAN, NAN];
        assert!(nanmean(&values).is_nan());
        assert!(nanstd(&values).is_nan());
        assert!(nanmedian(&values).is_nan());
        assert!(nanmin(&values).is_nan());
    }

    #[test]
    fn quantiles_interpolate() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(nanquantile(&values, 0.0), 1.0);
        assert_eq!(nanquantile(&values, 0.25), 1.75);
        assert_eq!(nanquantile(&values, 1.0), 4.0);
    }

    #[test]
    fn corr_is_sign_correct() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0, 8.0];
        assert!((nancorr(&a, &b) - 1.0).abs() < 1e-12);
        let c = [8.0, 6.0, 4.0, 2.0];
        assert!((nancorr(&a, &c) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn corr_ignores_incomplete_pairs() {
        let a = [1.0, NAN, 3.0, 4.0];
        let b = [2.0, 4.0, NAN, 8.0];
        // pairwise-complete observations are (1, 2) and (4, 8)
        assert!((nancorr(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rolling_mean_warmup_and_missing() {
        let values = [1.0, 2.0, 3.0, NAN, 5.0, 7.0];
        let mut out = [0.0; 6];
        rolling_mean_into(&values, 2, &mut out);
        assert!(out[0].is_nan());
        assert_eq!(out[1], 1.5);
        assert_eq!(out[2], 2.5);
        assert!(out[3].is_nan());
        assert!(out[4].is_nan());
        assert_eq!(out[5], 6.0);
    }

    #[test]
    fn rolling_std_matches_direct_computation() {
        let values = [1.0, 2.0, 4.0, 8.0];
        let mut out = [0.0; 4];
        rolling_std_into(&values, 3, &mut out);
        assert!(out[0].is_nan() && out[1].is_nan());
        assert!((out[2] - nanstd(&values[..3])).abs() < 1e-12);
        assert!((out[3] - nanstd(&values[1..])).abs() < 1e-12);
    }

    #[test]
    fn slice_resolution_covers_negative_steps() {
        assert_eq!(resolve_slice(5, None, Some(2), 1).unwrap(), vec![0, 1]);
        assert_eq!(
            resolve_slice(5, None, None, -1).unwrap(),
            vec![4, 3, 2, 1, 0]
        );
        assert_eq!(resolve_slice(5, Some(-2), Some(-4), -1).unwrap(), vec![3, 2]);
        assert_eq!(
            resolve_slice(5, Some(10), None, 1).unwrap(),
            Vec::<usize>::new()
        );
        assert!(resolve_slice(5, None, None, 0).is_err());
    }

    #[test]
    fn concat_lays_rows_out_in_order() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let b = array![[5.0, 6.0]];
        let mut out = vec![0.0; 6];
        fast_concat_2d_axis0(&[a.view(), b.view()], &mut out);
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}

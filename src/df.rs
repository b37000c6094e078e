//! # df
//!
//! labeled data structures for temporal data: [`series::Series`] (1-D) and
//! [`frame::Frame`] (2-D), plus the axis-label types they share.

use core::fmt;
use core::hash::Hash;

use crate::errors::{FrameError, Result};

pub mod frame;
pub mod mask;
pub mod series;
pub mod temporal;

pub use frame::Frame;
pub use mask::Mask;
pub use series::Series;
pub use temporal::{date_range, date_range_between, Frequency, TemporalLabel};

pub const SYMBOL_NBYTES: usize = 32;

/// a fixed-width column/series label (at most [`SYMBOL_NBYTES`] bytes,
/// NUL-padded) so that frame columns live in a flat, `Copy` array.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol([u8; SYMBOL_NBYTES]);

impl Symbol {
    pub fn new(name: &str) -> Result<Self> {
        let bytes = name.as_bytes();
        if bytes.len() > SYMBOL_NBYTES {
            return Err(FrameError::SymbolTooLong {
                nbytes: bytes.len(),
                limit: SYMBOL_NBYTES,
            });
        }
        let mut buf = [0u8; SYMBOL_NBYTES];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(buf))
    }

    pub fn as_str(&self) -> &str {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(SYMBOL_NBYTES);
        core::str::from_utf8(&self.0[..end]).unwrap_or_default()
    }
}

impl TryFrom<&str> for Symbol {
    type Error = FrameError;

    fn try_from(name: &str) -> Result<Self> {
        Self::new(name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.as_str())
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// anything usable as an index label: integers out of the box, calendar types
/// via [`temporal::TemporalLabel`].
pub trait Label: Copy + Ord + Eq + Hash + fmt::Debug + Send + Sync + 'static {}
impl<X: Copy + Ord + Eq + Hash + fmt::Debug + Send + Sync + 'static> Label for X {}

/// resolve an inclusive label range to half-open positions `lo..hi`.
///
/// monotonic indexes resolve every label in `start..=stop`; otherwise both
/// endpoints must be present (first occurrences) and the contiguous span
/// between them is returned.
pub(crate) fn label_bounds<L: Label>(
    index: &ndarray::Array1<L>,
    start: &L,
    stop: &L,
) -> Result<(usize, usize)> {
    let monotonic = index.windows(2).into_iter().all(|w| w[0] <= w[1]);
    if monotonic {
        let lo = index.iter().position(|l| l >= start).unwrap_or(index.len());
        let hi = index
            .iter()
            .rposition(|l| l <= stop)
            .map_or(lo, |i| (i + 1).max(lo));
        Ok((lo, hi))
    } else {
        let lo = index
            .iter()
            .position(|l| l == start)
            .ok_or_else(|| FrameError::KeyNotFound {
                label: format!("{start:?}"),
            })?;
        let hi = index
            .iter()
            .position(|l| l == stop)
            .ok_or_else(|| FrameError::KeyNotFound {
                label: format!("{stop:?}"),
            })?;
        if hi < lo {
            return Ok((lo, lo));
        }
        Ok((lo, hi + 1))
    }
}

/// how gaps introduced by realignment are imputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillPolicy<T> {
    /// keep the gaps as missing values
    Leave,
    /// nearest preceding known value
    Forward,
    /// nearest following known value
    Backward,
    Value(T),
}

/// direction for [`series::Series::fillna_method`] and the frame equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Forward,
    Backward,
}

/// the summary block produced by `describe()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescribeStats<T> {
    pub count: usize,
    pub mean: T,
    pub std: T,
    pub min: T,
    pub q25: T,
    pub q50: T,
    pub q75: T,
    pub max: T,
}

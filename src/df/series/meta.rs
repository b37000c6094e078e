use core::fmt;

use ndarray::Array1;

use super::Series;
use crate::df::{Label, Symbol};
use crate::errors::{FrameError, Result};
use crate::toolkit::array::AFloat;

impl<L: Label, T: AFloat> Series<L, T> {
    pub fn new(index: Array1<L>, values: Array1<T>) -> Result<Self> {
        if index.len() != values.len() {
            return Err(FrameError::ShapeMismatch {
                index_len: index.len(),
                values_len: values.len(),
            });
        }
        Ok(Self {
            index,
            values,
            name: None,
        })
    }

    pub fn from_vecs(index: Vec<L>, values: Vec<T>) -> Result<Self> {
        Self::new(Array1::from_vec(index), Array1::from_vec(values))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn with_name(mut self, name: &str) -> Result<Self> {
        self.name = Some(Symbol::new(name)?);
        Ok(self)
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = Some(Symbol::new(name)?);
        Ok(())
    }

    /// replace the index wholesale; the new one must match the value count.
    pub fn with_index<M: Label>(self, index: Array1<M>) -> Result<Series<M, T>> {
        if index.len() != self.values.len() {
            return Err(FrameError::ShapeMismatch {
                index_len: index.len(),
                values_len: self.values.len(),
            });
        }
        Ok(Series {
            index,
            values: self.values,
            name: self.name,
        })
    }

    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.len());
        Self {
            index: self.index.slice(ndarray::s![..n]).to_owned(),
            values: self.values.slice(ndarray::s![..n]).to_owned(),
            name: self.name,
        }
    }

    pub fn tail(&self, n: usize) -> Self {
        let skip = self.len().saturating_sub(n);
        Self {
            index: self.index.slice(ndarray::s![skip..]).to_owned(),
            values: self.values.slice(ndarray::s![skip..]).to_owned(),
            name: self.name,
        }
    }

    /// whether the index is monotonically non-decreasing.
    pub fn is_monotonic(&self) -> bool {
        self.index.windows(2).into_iter().all(|w| w[0] <= w[1])
    }

    pub(crate) fn derive(&self, index: Array1<L>, values: Array1<T>) -> Self {
        Self {
            index,
            values,
            name: self.name,
        }
    }
}

impl<T: AFloat> Series<i64, T> {
    /// build from bare values with a default `0..n` integer index.
    pub fn from_values(values: Vec<T>) -> Self {
        let index = Array1::from_iter(0..values.len() as i64);
        Self {
            index,
            values: Array1::from_vec(values),
            name: None,
        }
    }
}

const DISPLAY_ROWS: usize = 8;

impl<L: Label, T: AFloat> fmt::Display for Series<L, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name {
            writeln!(f, "{name}:")?;
        }
        let shown = self.len().min(DISPLAY_ROWS);
        for i in 0..shown {
            writeln!(f, "{:?}\t{}", self.index[i], self.values[i])?;
        }
        if self.len() > shown {
            writeln!(f, "... ({} rows)", self.len())?;
        }
        Ok(())
    }
}

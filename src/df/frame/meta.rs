use core::fmt;

use ndarray::{Array1, Array2, Axis};

use super::Frame;
use crate::df::{FillPolicy, Label, Series, Symbol};
use crate::errors::{FrameError, Result};
use crate::toolkit::array::AFloat;

impl<L: Label, T: AFloat> Frame<L, T> {
    pub fn new(index: Array1<L>, columns: Array1<Symbol>, values: Array2<T>) -> Result<Self> {
        if values.nrows() != index.len() || values.ncols() != columns.len() {
            return Err(FrameError::FrameShapeMismatch {
                rows: values.nrows(),
                cols: values.ncols(),
                index_len: index.len(),
                columns_len: columns.len(),
            });
        }
        Ok(Self {
            index,
            columns,
            values,
        })
    }

    /// build from per-column value vectors sharing `index`.
    pub fn from_columns(index: Vec<L>, columns: Vec<(&str, Vec<T>)>) -> Result<Self> {
        let nrows = index.len();
        let ncols = columns.len();
        let mut symbols = Vec::with_capacity(ncols);
        let mut values = Array2::from_elem((nrows, ncols), T::nan());
        for (j, (name, column)) in columns.into_iter().enumerate() {
            let symbol = Symbol::new(name)?;
            if symbols.contains(&symbol) {
                return Err(FrameError::DuplicateColumn {
                    column: name.to_string(),
                });
            }
            if column.len() != nrows {
                return Err(FrameError::ShapeMismatch {
                    index_len: nrows,
                    values_len: column.len(),
                });
            }
            for (i, v) in column.into_iter().enumerate() {
                values[(i, j)] = v;
            }
            symbols.push(symbol);
        }
        Self::new(Array1::from_vec(index), Array1::from_vec(symbols), values)
    }

    /// outer-join a set of named series into a frame (union index, missing
    /// values where a series has no entry).
    pub fn from_series(series: &[Series<L, T>]) -> Result<Self> {
        super::concat::concat_series(series)
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    pub fn col_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|s| s.as_str() == name)
    }

    /// rename every column; the count must match.
    pub fn set_columns(&mut self, names: &[&str]) -> Result<()> {
        if names.len() != self.ncols() {
            return Err(FrameError::LengthMismatch {
                left: self.ncols(),
                right: names.len(),
            });
        }
        let symbols: Result<Vec<Symbol>> = names.iter().map(|n| Symbol::new(n)).collect();
        self.columns = Array1::from_vec(symbols?);
        Ok(())
    }

    /// append a column, realigning the series to the frame's index (labels
    /// the series lacks become missing).
    pub fn insert_col(&mut self, name: &str, series: &Series<L, T>) -> Result<()> {
        let symbol = Symbol::new(name)?;
        if self.col_position(name).is_some() {
            return Err(FrameError::DuplicateColumn {
                column: name.to_string(),
            });
        }
        let frame_index = self.index_vec();
        let aligned = series.reindex(&frame_index, FillPolicy::Leave)?;
        let ncols = self.ncols();
        let mut values = Array2::from_elem((self.nrows(), ncols + 1), T::nan());
        values
            .slice_mut(ndarray::s![.., ..ncols])
            .assign(&self.values);
        values
            .slice_mut(ndarray::s![.., ncols])
            .assign(&aligned.values);
        let mut columns = self.columns.to_vec();
        columns.push(symbol);
        self.columns = Array1::from_vec(columns);
        self.values = values;
        Ok(())
    }

    pub fn drop_col(&self, name: &str) -> Result<Self> {
        let j = self
            .col_position(name)
            .ok_or_else(|| FrameError::ColumnNotFound {
                column: name.to_string(),
            })?;
        let keep: Vec<usize> = (0..self.ncols()).filter(|&k| k != j).collect();
        Ok(Self {
            index: self.index.clone(),
            columns: self.columns.select(Axis(0), &keep),
            values: self.values.select(Axis(1), &keep),
        })
    }

    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.nrows());
        Self {
            index: self.index.slice(ndarray::s![..n]).to_owned(),
            columns: self.columns.clone(),
            values: self.values.slice(ndarray::s![..n, ..]).to_owned(),
        }
    }

    pub fn tail(&self, n: usize) -> Self {
        let skip = self.nrows().saturating_sub(n);
        Self {
            index: self.index.slice(ndarray::s![skip..]).to_owned(),
            columns: self.columns.clone(),
            values: self.values.slice(ndarray::s![skip.., ..]).to_owned(),
        }
    }

    pub fn is_monotonic(&self) -> bool {
        self.index.windows(2).into_iter().all(|w| w[0] <= w[1])
    }

    pub(crate) fn index_vec(&self) -> Vec<L> {
        self.index.to_vec()
    }
}

const DISPLAY_ROWS: usize = 8;

impl<L: Label, T: AFloat> fmt::Display for Frame<L, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index")?;
        for c in self.columns.iter() {
            write!(f, "\t{c}")?;
        }
        writeln!(f)?;
        let shown = self.nrows().min(DISPLAY_ROWS);
        for i in 0..shown {
            write!(f, "{:?}", self.index[i])?;
            for j in 0..self.ncols() {
                write!(f, "\t{}", self.values[(i, j)])?;
            }
            writeln!(f)?;
        }
        if self.nrows() > shown {
            writeln!(f, "... ({} rows)", self.nrows())?;
        }
        Ok(())
    }
}

use itertools::Itertools;
use ndarray::{Array1, Array2};

use super::Frame;
use crate::df::{FillPolicy, Label, Series, Symbol};
use crate::errors::{FrameError, Result};
use crate::toolkit::array::{fast_concat_2d_axis0, AFloat};

fn union_labels<'a, L: Label>(indexes: impl Iterator<Item = &'a Array1<L>>) -> Vec<L> {
    indexes
        .flat_map(|index| index.iter().copied())
        .sorted_unstable()
        .dedup()
        .collect()
}

fn check_unique(columns: &[Symbol]) -> Result<()> {
    for (i, symbol) in columns.iter().enumerate() {
        if columns[..i].contains(symbol) {
            return Err(FrameError::DuplicateColumn {
                column: symbol.to_string(),
            });
        }
    }
    Ok(())
}

/// outer-join named series side by side: the result's index is the sorted
/// union of all series indexes, with missing values where a series has no
/// entry. unnamed series are labeled by their position.
pub fn concat_series<L: Label, T: AFloat>(series: &[Series<L, T>]) -> Result<Frame<L, T>> {
    if series.is_empty() {
        return Err(FrameError::EmptyConcat);
    }
    let columns: Result<Vec<Symbol>> = series
        .iter()
        .enumerate()
        .map(|(j, s)| match s.name {
            Some(name) => Ok(name),
            None => Symbol::new(&j.to_string()),
        })
        .collect();
    let columns = columns?;
    check_unique(&columns)?;

    let union = union_labels(series.iter().map(|s| &s.index));
    let mut values = Array2::from_elem((union.len(), series.len()), T::nan());
    for (j, s) in series.iter().enumerate() {
        let aligned = s.reindex(&union, FillPolicy::Leave)?;
        values
            .slice_mut(ndarray::s![.., j])
            .assign(&aligned.values);
    }
    Frame::new(
        Array1::from_vec(union),
        Array1::from_vec(columns),
        values,
    )
}

/// put frames side by side on the sorted union of their indexes; column
/// names must stay unique across inputs.
pub fn concat_columns<L: Label, T: AFloat>(frames: &[Frame<L, T>]) -> Result<Frame<L, T>> {
    if frames.is_empty() {
        return Err(FrameError::EmptyConcat);
    }
    let columns: Vec<Symbol> = frames
        .iter()
        .flat_map(|f| f.columns.iter().copied())
        .collect();
    check_unique(&columns)?;

    let union = union_labels(frames.iter().map(|f| &f.index));
    let ncols = columns.len();
    let mut values = Array2::from_elem((union.len(), ncols), T::nan());
    let mut offset = 0;
    for frame in frames {
        let aligned = frame.reindex_rows(&union, FillPolicy::Leave)?;
        values
            .slice_mut(ndarray::s![.., offset..offset + frame.ncols()])
            .assign(&aligned.values);
        offset += frame.ncols();
    }
    Frame::new(
        Array1::from_vec(union),
        Array1::from_vec(columns),
        values,
    )
}

/// stack frames top to bottom; every input must carry the identical column
/// sequence. index labels are chained as-is (duplicates allowed), and the
/// bulk value copy runs through the parallel concat kernel.
pub fn concat_rows<L: Label, T: AFloat>(frames: &[Frame<L, T>]) -> Result<Frame<L, T>> {
    let first = frames.first().ok_or(FrameError::EmptyConcat)?;
    if frames
        .iter()
        .any(|f| f.columns.as_slice() != first.columns.as_slice())
    {
        return Err(FrameError::ColumnsMismatch);
    }

    let nrows: usize = frames.iter().map(|f| f.nrows()).sum();
    let ncols = first.ncols();
    let index: Vec<L> = frames
        .iter()
        .flat_map(|f| f.index.iter().copied())
        .collect();

    let views: Vec<_> = frames.iter().map(|f| f.values.view()).collect();
    let mut flat = vec![T::nan(); nrows * ncols];
    fast_concat_2d_axis0(&views, &mut flat);
    let values = Array2::from_shape_vec((nrows, ncols), flat)
        .unwrap_or_else(|_| unreachable!("shape follows from the inputs"));

    Frame::new(Array1::from_vec(index), first.columns.clone(), values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_concat_outer_joins() {
        let evens = Series::from_vecs(vec![0i64, 1, 2], vec![2.0f64, 4.0, 6.0])
            .unwrap()
            .with_name("Evens")
            .unwrap();
        let odds = Series::from_vecs(vec![1i64, 2, 3], vec![3.0, 5.0, 7.0])
            .unwrap()
            .with_name("Odds")
            .unwrap();
        let numbers = concat_series(&[evens, odds]).unwrap();
        assert_eq!(numbers.shape(), (4, 2));
        assert_eq!(numbers.columns[0], "Evens");
        assert!(numbers.values[(3, 0)].is_nan());
        assert!(numbers.values[(0, 1)].is_nan());
        assert_eq!(numbers.values[(1, 0)], 4.0);
        assert_eq!(numbers.values[(1, 1)], 3.0);
    }

    #[test]
    fn unnamed_series_get_positional_columns() {
        let a = Series::from_values(vec![1.0]);
        let b = Series::from_values(vec![2.0]);
        let f = concat_series(&[a, b]).unwrap();
        assert_eq!(f.columns[0], "0");
        assert_eq!(f.columns[1], "1");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let a = Series::from_values(vec![1.0]).with_name("X").unwrap();
        let b = Series::from_values(vec![2.0]).with_name("X").unwrap();
        assert!(matches!(
            concat_series(&[a, b]),
            Err(FrameError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn frame_concat_columns_unions_indexes() {
        let a = Frame::from_columns(vec![0i64, 1], vec![("A", vec![1.0f64, 2.0])]).unwrap();
        let b = Frame::from_columns(vec![1i64, 2], vec![("B", vec![3.0f64, 4.0])]).unwrap();
        let wide = concat_columns(&[a, b]).unwrap();
        assert_eq!(wide.shape(), (3, 2));
        assert!(wide.values[(2, 0)].is_nan());
        assert_eq!(wide.values[(1, 1)], 3.0);
    }

    #[test]
    fn frame_concat_rows_chains_indexes() {
        let a = Frame::from_columns(vec![0i64, 1], vec![("A", vec![1.0, 2.0])]).unwrap();
        let b = Frame::from_columns(vec![2i64], vec![("A", vec![3.0])]).unwrap();
        let tall = concat_rows(&[a.clone(), b]).unwrap();
        assert_eq!(tall.index.to_vec(), vec![0, 1, 2]);
        assert_eq!(
            tall.col("A").unwrap().values.to_vec(),
            vec![1.0, 2.0, 3.0]
        );

        let other = Frame::from_columns(vec![0i64], vec![("B", vec![9.0])]).unwrap();
        assert!(matches!(
            concat_rows(&[a, other]),
            Err(FrameError::ColumnsMismatch)
        ));
        assert!(matches!(
            concat_rows::<i64, f64>(&[]),
            Err(FrameError::EmptyConcat)
        ));
    }
}

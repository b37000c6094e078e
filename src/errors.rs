//! # errors
//!
//! the error surface of the crate.
//!
//! structural misuses (shape mismatches, absent labels, bad windows) are typed
//! variants here; outcomes the data model expresses on its own (e.g. aligning
//! two disjoint indexes) stay silent and simply produce missing values.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("index length {index_len} does not match values length {values_len}")]
    ShapeMismatch { index_len: usize, values_len: usize },
    #[error("values shape ({rows}, {cols}) does not match index/columns ({index_len}, {columns_len})")]
    FrameShapeMismatch {
        rows: usize,
        cols: usize,
        index_len: usize,
        columns_len: usize,
    },
    #[error("label {label} not found in index")]
    KeyNotFound { label: String },
    #[error("position {position} out of bounds for length {len}")]
    PositionOutOfBounds { position: isize, len: usize },
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },
    #[error("column '{column}' already exists")]
    DuplicateColumn { column: String },
    #[error("frames to concatenate carry different column sets")]
    ColumnsMismatch,
    #[error("operand lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("symbol of {nbytes} bytes exceeds the {limit}-byte limit")]
    SymbolTooLong { nbytes: usize, limit: usize },
    #[error("{op} requires a monotonically increasing index")]
    NotMonotonic { op: &'static str },
    #[error("slice step must be non-zero")]
    InvalidStep,
    #[error("rolling window must be positive, got {window}")]
    InvalidWindow { window: usize },
    #[error("nothing to concatenate")]
    EmptyConcat,
    #[error("date range end {end} precedes start {start}")]
    InvalidDateRange { start: String, end: String },
}

pub type Result<T> = core::result::Result<T, FrameError>;

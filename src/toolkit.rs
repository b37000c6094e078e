//! # toolkit
//!
//! shared low-level utilities.

pub mod array;

//! # io
//!
//! the boundary to external market-data collaborators.

pub mod source;

pub use source::{Field, PriceSource, RandomWalkSource};

//! # quantframe
//!
//! labeled series and frames for exploring financial time-series data:
//! construction, positional and label indexing, boolean masking, realignment,
//! missing-data handling, resampling, rolling statistics and index-aligned
//! arithmetic, over NaN-as-missing float values.
//!
//! ```
//! use quantframe::df::{Frequency, Series};
//! use quantframe::df::temporal::date_range;
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
//! let index = date_range(start, 5, Frequency::Daily);
//! let s = Series::from_vecs(index, vec![1.0, 2.0, f64::NAN, 4.0, 5.0]).unwrap();
//!
//! assert_eq!(s.dropna().len(), 4);
//! assert_eq!(s.mean(), 3.0);
//! ```

pub mod df;
pub mod errors;
pub mod io;
pub mod toolkit;

pub use errors::{FrameError, Result};

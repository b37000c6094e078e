//! # io/source
//!
//! a `PriceSource` is an opaque market-data collaborator: handed a security
//! identifier, a date range and a field, it returns a series of trading-day
//! observations (or a frame when asked for several identifiers at once).
//!
//! errors crossing this boundary are whatever the collaborator reports, so
//! the trait speaks [`anyhow::Result`]; everything inside the crate stays on
//! the typed [`FrameError`](crate::errors::FrameError).

use core::fmt;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, warn};
use ndarray::Array1;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::df::frame::concat_series;
use crate::df::temporal::{date_range_between, Frequency};
use crate::df::{Frame, Series};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Open => "open",
            Field::High => "high",
            Field::Low => "low",
            Field::Close => "close",
            Field::Volume => "volume",
        };
        f.write_str(name)
    }
}

/// a blocking market-data fetch seam.
pub trait PriceSource {
    /// one identifier -> a series indexed by trading day, named after the
    /// identifier.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        field: Field,
    ) -> Result<Series<NaiveDate, f64>>;

    /// several identifiers -> one frame, one column per identifier.
    fn fetch_many(
        &self,
        symbols: &[&str],
        start: NaiveDate,
        end: NaiveDate,
        field: Field,
    ) -> Result<Frame<NaiveDate, f64>> {
        let series: Result<Vec<_>> = symbols
            .iter()
            .map(|symbol| self.fetch(symbol, start, end, field))
            .collect();
        Ok(concat_series(&series?)?)
    }
}

/// a deterministic geometric random walk standing in for a market-data
/// vendor; the same seed, symbol and field always produce the same series.
#[derive(Debug, Clone)]
pub struct RandomWalkSource {
    pub seed: u64,
    pub start_price: f64,
    pub daily_vol: f64,
    pub daily_drift: f64,
}

impl Default for RandomWalkSource {
    fn default() -> Self {
        Self {
            seed: 0,
            start_price: 100.0,
            daily_vol: 0.02,
            daily_drift: 0.0005,
        }
    }
}

impl RandomWalkSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    fn rng_for(&self, symbol: &str, field: Field) -> StdRng {
        let mut hasher = DefaultHasher::new();
        symbol.hash(&mut hasher);
        field.hash(&mut hasher);
        StdRng::seed_from_u64(self.seed ^ hasher.finish())
    }
}

impl PriceSource for RandomWalkSource {
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        field: Field,
    ) -> Result<Series<NaiveDate, f64>> {
        let dates = date_range_between(start, end, Frequency::Weekdays)?;
        if dates.is_empty() {
            warn!("no trading days between {start} and {end} for {symbol}");
        }
        let mut rng = self.rng_for(symbol, field);
        let mut price = self.start_price;
        let values: Vec<f64> = dates
            .iter()
            .map(|_| {
                let z: f64 = rng.sample(StandardNormal);
                price *= 1.0 + self.daily_drift + self.daily_vol * z;
                match field {
                    Field::Volume => (1e6 * (1.0 + 0.5 * z.abs())).round(),
                    _ => price,
                }
            })
            .collect();
        debug!("fetched {} rows of {field} for {symbol}", values.len());
        Series::new(Array1::from_vec(dates), Array1::from_vec(values))
            .map_err(anyhow::Error::from)?
            .with_name(symbol)
            .map_err(anyhow::Error::from)
    }
}

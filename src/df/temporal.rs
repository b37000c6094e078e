//! calendar frequencies, date-range generation and resampling.
//!
//! buckets are start-anchored: a label maps to the first calendar day of its
//! period (week -> Monday, month -> the 1st, and so on), and resampled output
//! is indexed by those bucket starts.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use log::debug;
use ndarray::{Array1, Array2};

use super::{Frame, Label, Series};
use crate::errors::{FrameError, Result};
use crate::toolkit::array::{nanmean, nanmedian, AFloat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    /// Monday through Friday only, the trading-day approximation.
    Weekdays,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

/// index labels that live on a calendar and can be bucketed by [`Frequency`].
pub trait TemporalLabel: Label {
    /// the first label of the period containing `self`.
    fn bucket_start(&self, freq: Frequency) -> Self;
    /// the next label when stepping a calendar at `freq`.
    fn step(&self, freq: Frequency) -> Self;
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap()
}

impl TemporalLabel for NaiveDate {
    fn bucket_start(&self, freq: Frequency) -> Self {
        match freq {
            Frequency::Daily | Frequency::Weekdays => *self,
            Frequency::Weekly => {
                *self - Days::new(self.weekday().num_days_from_monday() as u64)
            }
            Frequency::Monthly => month_start(*self),
            Frequency::Quarterly => {
                let quarter_month = (self.month0() / 3) * 3 + 1;
                month_start(*self).with_month(quarter_month).unwrap()
            }
            Frequency::Yearly => month_start(*self).with_month(1).unwrap(),
        }
    }

    fn step(&self, freq: Frequency) -> Self {
        match freq {
            Frequency::Daily => *self + Days::new(1),
            Frequency::Weekdays => {
                let mut next = *self + Days::new(1);
                while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
                    next = next + Days::new(1);
                }
                next
            }
            Frequency::Weekly => *self + Days::new(7),
            Frequency::Monthly => *self + Months::new(1),
            Frequency::Quarterly => *self + Months::new(3),
            Frequency::Yearly => *self + Months::new(12),
        }
    }
}

impl TemporalLabel for NaiveDateTime {
    fn bucket_start(&self, freq: Frequency) -> Self {
        self.date().bucket_start(freq).and_time(NaiveTime::MIN)
    }

    fn step(&self, freq: Frequency) -> Self {
        self.date().step(freq).and_time(self.time())
    }
}

/// `periods` labels starting at `start`, stepped at `freq`.
pub fn date_range(start: NaiveDate, periods: usize, freq: Frequency) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(periods);
    let mut current = match freq {
        // a range of weekdays never starts on a weekend
        Frequency::Weekdays if matches!(start.weekday(), Weekday::Sat | Weekday::Sun) => {
            start.step(Frequency::Weekdays)
        }
        _ => start,
    };
    for _ in 0..periods {
        out.push(current);
        current = current.step(freq);
    }
    out
}

/// every label from `start` through `end` (inclusive) at `freq`.
pub fn date_range_between(
    start: NaiveDate,
    end: NaiveDate,
    freq: Frequency,
) -> Result<Vec<NaiveDate>> {
    if end < start {
        return Err(FrameError::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    let mut out = Vec::new();
    let mut current = match freq {
        Frequency::Weekdays if matches!(start.weekday(), Weekday::Sat | Weekday::Sun) => {
            start.step(Frequency::Weekdays)
        }
        _ => start,
    };
    while current <= end {
        out.push(current);
        current = current.step(freq);
    }
    Ok(out)
}

/// contiguous runs of positions sharing a bucket, in index order.
fn bucket_runs<L: TemporalLabel>(index: &Array1<L>, freq: Frequency) -> Vec<(L, usize, usize)> {
    let mut runs: Vec<(L, usize, usize)> = Vec::new();
    for (i, label) in index.iter().enumerate() {
        let bucket = label.bucket_start(freq);
        match runs.last_mut() {
            Some((current, _, end)) if *current == bucket => *end = i + 1,
            _ => runs.push((bucket, i, i + 1)),
        }
    }
    runs
}

impl<L: TemporalLabel, T: AFloat> Series<L, T> {
    /// group by coarser calendar periods; the index must be monotonic.
    pub fn resample(&self, freq: Frequency) -> Result<Resampler<'_, L, T>> {
        if !self.is_monotonic() {
            return Err(FrameError::NotMonotonic { op: "resample" });
        }
        let runs = bucket_runs(&self.index, freq);
        debug!("resampling {} rows into {} buckets", self.len(), runs.len());
        Ok(Resampler { series: self, runs })
    }
}

/// aggregates one series over its period buckets.
pub struct Resampler<'a, L: TemporalLabel, T: AFloat> {
    series: &'a Series<L, T>,
    runs: Vec<(L, usize, usize)>,
}

impl<'a, L: TemporalLabel, T: AFloat> Resampler<'a, L, T> {
    /// aggregate each period with a caller-supplied reduction.
    pub fn apply(&self, f: impl Fn(&[T]) -> T) -> Series<L, T> {
        let mut index = Vec::with_capacity(self.runs.len());
        let mut values = Vec::with_capacity(self.runs.len());
        let flat = self.series.values.as_slice().unwrap_or(&[]);
        for &(bucket, start, end) in &self.runs {
            index.push(bucket);
            values.push(f(&flat[start..end]));
        }
        Series {
            index: Array1::from_vec(index),
            values: Array1::from_vec(values),
            name: self.series.name,
        }
    }

    pub fn mean(&self) -> Series<L, T> {
        self.apply(nanmean)
    }

    pub fn median(&self) -> Series<L, T> {
        self.apply(nanmedian)
    }

    /// the first value of each period, missing or not.
    pub fn first(&self) -> Series<L, T> {
        self.apply(|w| w.first().copied().unwrap_or_else(T::nan))
    }

    pub fn last(&self) -> Series<L, T> {
        self.apply(|w| w.last().copied().unwrap_or_else(T::nan))
    }
}

impl<L: TemporalLabel, T: AFloat> Frame<L, T> {
    /// group rows by coarser calendar periods; the index must be monotonic.
    pub fn resample(&self, freq: Frequency) -> Result<FrameResampler<'_, L, T>> {
        if !self.is_monotonic() {
            return Err(FrameError::NotMonotonic { op: "resample" });
        }
        let runs = bucket_runs(&self.index, freq);
        debug!(
            "resampling {} rows x {} cols into {} buckets",
            self.nrows(),
            self.ncols(),
            runs.len()
        );
        Ok(FrameResampler { frame: self, runs })
    }
}

/// aggregates every column of a frame over its period buckets.
pub struct FrameResampler<'a, L: TemporalLabel, T: AFloat> {
    frame: &'a Frame<L, T>,
    runs: Vec<(L, usize, usize)>,
}

impl<'a, L: TemporalLabel, T: AFloat> FrameResampler<'a, L, T> {
    pub fn apply(&self, f: impl Fn(&[T]) -> T) -> Frame<L, T> {
        let mut index = Vec::with_capacity(self.runs.len());
        let mut values = Array2::from_elem((self.runs.len(), self.frame.ncols()), T::nan());
        for (r, &(bucket, start, end)) in self.runs.iter().enumerate() {
            index.push(bucket);
            for (j, col) in self.frame.values.columns().into_iter().enumerate() {
                let window: Vec<T> = col.slice(ndarray::s![start..end]).to_vec();
                values[(r, j)] = f(&window);
            }
        }
        Frame {
            index: Array1::from_vec(index),
            columns: self.frame.columns.clone(),
            values,
        }
    }

    pub fn mean(&self) -> Frame<L, T> {
        self.apply(nanmean)
    }

    pub fn median(&self) -> Frame<L, T> {
        self.apply(nanmedian)
    }

    pub fn first(&self) -> Frame<L, T> {
        self.apply(|w| w.first().copied().unwrap_or_else(T::nan))
    }

    pub fn last(&self) -> Frame<L, T> {
        self.apply(|w| w.last().copied().unwrap_or_else(T::nan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn bucket_starts() {
        // 2016-01-07 was a Thursday
        assert_eq!(d(2016, 1, 7).bucket_start(Frequency::Weekly), d(2016, 1, 4));
        assert_eq!(d(2016, 2, 15).bucket_start(Frequency::Monthly), d(2016, 2, 1));
        assert_eq!(d(2016, 5, 15).bucket_start(Frequency::Quarterly), d(2016, 4, 1));
        assert_eq!(d(2016, 5, 15).bucket_start(Frequency::Yearly), d(2016, 1, 1));
    }

    #[test]
    fn daily_range_has_consecutive_days() {
        let dates = date_range(d(2016, 1, 1), 5, Frequency::Daily);
        assert_eq!(dates.len(), 5);
        assert_eq!(dates[4], d(2016, 1, 5));
    }

    #[test]
    fn weekday_range_skips_weekends() {
        // 2016-01-01 was a Friday
        let dates = date_range(d(2016, 1, 1), 3, Frequency::Weekdays);
        assert_eq!(dates, vec![d(2016, 1, 1), d(2016, 1, 4), d(2016, 1, 5)]);
        // starting on a Saturday snaps forward to Monday
        let from_sat = date_range(d(2016, 1, 2), 1, Frequency::Weekdays);
        assert_eq!(from_sat, vec![d(2016, 1, 4)]);
    }

    #[test]
    fn inclusive_range_between() {
        let dates = date_range_between(d(2016, 1, 1), d(2016, 1, 3), Frequency::Daily).unwrap();
        assert_eq!(dates.len(), 3);
        assert!(date_range_between(d(2016, 1, 3), d(2016, 1, 1), Frequency::Daily).is_err());
    }

    #[test]
    fn monthly_resample_with_mean_median_first() {
        let index = vec![d(2016, 1, 29), d(2016, 2, 1), d(2016, 2, 2), d(2016, 3, 1)];
        let s = Series::from_vecs(index, vec![1.0, 2.0, 4.0, 8.0]).unwrap();
        let resampled = s.resample(Frequency::Monthly).unwrap();

        let mean = resampled.mean();
        assert_eq!(mean.index.to_vec(), vec![d(2016, 1, 1), d(2016, 2, 1), d(2016, 3, 1)]);
        assert_eq!(mean.values.to_vec(), vec![1.0, 3.0, 8.0]);

        assert_eq!(resampled.median().values.to_vec(), vec![1.0, 3.0, 8.0]);
        assert_eq!(resampled.first().values.to_vec(), vec![1.0, 2.0, 8.0]);
        assert_eq!(resampled.last().values[1], 4.0);
    }

    #[test]
    fn resample_requires_monotonic_index() {
        let s = Series::from_vecs(vec![d(2016, 2, 1), d(2016, 1, 1)], vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            s.resample(Frequency::Monthly),
            Err(FrameError::NotMonotonic { .. })
        ));
    }

    #[test]
    fn frame_resample_applies_per_column() {
        let index = vec![d(2016, 1, 1), d(2016, 1, 4), d(2016, 2, 1)];
        let f = Frame::from_columns(
            index,
            vec![("A", vec![1.0, 3.0, 5.0]), ("B", vec![2.0, 4.0, 6.0])],
        )
        .unwrap();
        let monthly = f.resample(Frequency::Monthly).unwrap().mean();
        assert_eq!(monthly.nrows(), 2);
        assert_eq!(monthly.values[(0, 0)], 2.0);
        assert_eq!(monthly.values[(0, 1)], 3.0);
        assert_eq!(monthly.values[(1, 0)], 5.0);
    }

    #[test]
    fn datetime_labels_bucket_to_midnight() {
        let dt = d(2016, 1, 7).and_hms_opt(15, 30, 0).unwrap();
        let bucket = dt.bucket_start(Frequency::Monthly);
        assert_eq!(bucket, d(2016, 1, 1).and_hms_opt(0, 0, 0).unwrap());
    }
}

use ndarray::Array1;

use super::Series;
use crate::df::{Fill, FillPolicy, Label};
use crate::errors::{FrameError, Result};
use crate::toolkit::array::AFloat;

/// forward/backward propagation of the nearest known value over a buffer.
pub(crate) fn fill_in_place<T: AFloat>(values: &mut [T], method: Fill) {
    match method {
        Fill::Forward => {
            let mut last = T::nan();
            for v in values.iter_mut() {
                if v.is_nan() {
                    *v = last;
                } else {
                    last = *v;
                }
            }
        }
        Fill::Backward => {
            let mut next = T::nan();
            for v in values.iter_mut().rev() {
                if v.is_nan() {
                    *v = next;
                } else {
                    next = *v;
                }
            }
        }
    }
}

impl<L: Label, T: AFloat> Series<L, T> {
    /// replace every missing value with `value`.
    pub fn fillna(&self, value: T) -> Self {
        let values = self.values.mapv(|v| if v.is_nan() { value } else { v });
        self.derive(self.index.clone(), values)
    }

    /// impute missing values from the nearest preceding (forward) or
    /// following (backward) known value; leading/trailing gaps stay missing.
    pub fn fillna_method(&self, method: Fill) -> Self {
        let mut values = self.values.to_vec();
        fill_in_place(&mut values, method);
        self.derive(self.index.clone(), Array1::from_vec(values))
    }

    /// drop the missing entries. applying this twice changes nothing.
    pub fn dropna(&self) -> Self {
        self.filter(&self.notnull())
            .unwrap_or_else(|_| unreachable!("mask always matches own length"))
    }

    /// realign to `new_index`: labels already present keep their value,
    /// freshly introduced labels are missing and then imputed per `policy`.
    ///
    /// `Forward`/`Backward` impute from the nearest original label at or
    /// before (resp. after) each new label and require a monotonic source
    /// index.
    pub fn reindex(&self, new_index: &[L], policy: FillPolicy<T>) -> Result<Self> {
        let method = match policy {
            FillPolicy::Forward => Some(Fill::Forward),
            FillPolicy::Backward => Some(Fill::Backward),
            _ => None,
        };
        if method.is_some() && !self.is_monotonic() {
            return Err(FrameError::NotMonotonic { op: "reindex" });
        }

        let mut values = Vec::with_capacity(new_index.len());
        let mut introduced = Vec::new();
        for (k, label) in new_index.iter().enumerate() {
            let v = match method {
                // exact hit first; otherwise the nearest original neighbor
                None => {
                    let hit = self.position(label);
                    if hit.is_none() {
                        introduced.push(k);
                    }
                    hit.map(|i| self.values[i])
                }
                Some(Fill::Forward) => self
                    .index
                    .iter()
                    .rposition(|l| l <= label)
                    .map(|i| self.values[i]),
                Some(Fill::Backward) => self
                    .index
                    .iter()
                    .position(|l| l >= label)
                    .map(|i| self.values[i]),
            };
            values.push(v.unwrap_or_else(T::nan));
        }
        // the fill value only covers labels the reindex introduced; a NaN
        // carried over from a present label stays missing
        if let FillPolicy::Value(fill) = policy {
            for &k in &introduced {
                values[k] = fill;
            }
        }
        Ok(self.derive(Array1::from_vec(new_index.to_vec()), Array1::from_vec(values)))
    }
}

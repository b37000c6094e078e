//! boolean selection vectors, combinable with `&`, `|` and `!`.

use core::ops::{BitAnd, BitOr, Not};

/// an element-wise predicate result, used to filter series/frames by row.
///
/// combining two masks of different lengths is a programming error and
/// panics, mirroring how mismatched predicate shapes are rejected upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask(Vec<bool>);

impl Mask {
    pub fn from_vec(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// positions where the mask holds.
    pub fn positions(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
            .collect()
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|&b| b)
    }

    pub fn all(&self) -> bool {
        self.0.iter().all(|&b| b)
    }
}

impl FromIterator<bool> for Mask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl BitAnd for &Mask {
    type Output = Mask;

    fn bitand(self, rhs: &Mask) -> Mask {
        assert_eq!(self.len(), rhs.len(), "mask lengths differ");
        self.0.iter().zip(&rhs.0).map(|(&a, &b)| a && b).collect()
    }
}

impl BitOr for &Mask {
    type Output = Mask;

    fn bitor(self, rhs: &Mask) -> Mask {
        assert_eq!(self.len(), rhs.len(), "mask lengths differ");
        self.0.iter().zip(&rhs.0).map(|(&a, &b)| a || b).collect()
    }
}

impl Not for &Mask {
    type Output = Mask;

    fn not(self) -> Mask {
        self.0.iter().map(|&a| !a).collect()
    }
}

impl BitAnd for Mask {
    type Output = Mask;

    fn bitand(self, rhs: Mask) -> Mask {
        &self & &rhs
    }
}

impl BitOr for Mask {
    type Output = Mask;

    fn bitor(self, rhs: Mask) -> Mask {
        &self | &rhs
    }
}

impl Not for Mask {
    type Output = Mask;

    fn not(self) -> Mask {
        !&self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_combinations() {
        let a = Mask::from_vec(vec![true, true, false, false]);
        let b = Mask::from_vec(vec![true, false, true, false]);
        assert_eq!((&a & &b).as_slice(), &[true, false, false, false]);
        assert_eq!((&a | &b).as_slice(), &[true, true, true, false]);
        assert_eq!((!&a).as_slice(), &[false, false, true, true]);
        assert_eq!(a.positions(), vec![0, 1]);
    }
}

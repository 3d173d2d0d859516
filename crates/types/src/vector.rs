//! Fixed-length resource count vectors

use banker_errors::PoolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Per-kind resource counts.
///
/// Every vector in a pool has the same length, the number of resource
/// kinds. Component-wise operations assume equal lengths; callers validate
/// with [`ResourceVector::ensure_kinds`] at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVector(Vec<u32>);

impl ResourceVector {
    #[must_use]
    pub fn new(counts: Vec<u32>) -> Self {
        Self(counts)
    }

    /// A vector of `kinds` zeros
    #[must_use]
    pub fn zeros(kinds: usize) -> Self {
        Self(vec![0; kinds])
    }

    /// Number of resource kinds this vector covers
    #[must_use]
    pub fn kinds(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u32> {
        self.0
    }

    /// Fail with `DimensionMismatch` unless this vector has `kinds` entries.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::DimensionMismatch`] naming `context`.
    pub fn ensure_kinds(&self, kinds: usize, context: &str) -> Result<(), PoolError> {
        if self.kinds() == kinds {
            Ok(())
        } else {
            Err(PoolError::dimension(context, kinds, self.kinds()))
        }
    }

    /// `self[i] <= other[i]` for every kind
    #[must_use]
    pub fn fits_within(&self, other: &Self) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| a <= b)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// Component-wise sum, `None` on overflow.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| a.checked_add(*b))
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    /// Component-wise difference, `None` if any kind would go negative.
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| a.checked_sub(*b))
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    /// In-place component-wise sum that clamps at `u32::MAX`.
    pub fn saturating_add_assign(&mut self, other: &Self) {
        for (a, b) in self.0.iter_mut().zip(&other.0) {
            *a = a.saturating_add(*b);
        }
    }

    /// Sum across all kinds
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&c| u64::from(c)).sum()
    }

    /// Index of the first kind where `self` exceeds `other`
    #[must_use]
    pub fn first_excess_over(&self, other: &Self) -> Option<usize> {
        self.0.iter().zip(&other.0).position(|(a, b)| a > b)
    }
}

impl From<Vec<u32>> for ResourceVector {
    fn from(counts: Vec<u32>) -> Self {
        Self(counts)
    }
}

impl<const N: usize> From<[u32; N]> for ResourceVector {
    fn from(counts: [u32; N]) -> Self {
        Self(counts.to_vec())
    }
}

impl From<ResourceVector> for Vec<u32> {
    fn from(vector: ResourceVector) -> Self {
        vector.0
    }
}

impl FromIterator<u32> for ResourceVector {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Index<usize> for ResourceVector {
    type Output = u32;

    fn index(&self, kind: usize) -> &Self::Output {
        &self.0[kind]
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, count) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{count}")?;
        }
        write!(f, "]")
    }
}

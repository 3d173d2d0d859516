//! Per-process claim bookkeeping

use crate::ResourceVector;
use banker_errors::PoolError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a client process: its position in the pool manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub usize);

impl ProcessId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ProcessId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Declared maximum and initial holdings of a process, as read from a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessClaim {
    pub max: ResourceVector,
    #[serde(default)]
    pub allocated: ResourceVector,
}

impl ProcessClaim {
    pub fn new(max: impl Into<ResourceVector>, allocated: impl Into<ResourceVector>) -> Self {
        Self {
            max: max.into(),
            allocated: allocated.into(),
        }
    }
}

/// Bookkeeping for one process.
///
/// `need` is kept alongside `allocated` so that `allocated + need == max`
/// holds component-wise after every completed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: ProcessId,
    pub max: ResourceVector,
    pub allocated: ResourceVector,
    pub need: ResourceVector,
}

impl ProcessRecord {
    /// Build a record, deriving `need` from `max - allocated`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::DimensionMismatch`] if the vectors are not
    /// `kinds` long, or [`PoolError::InvalidManifest`] if the process
    /// already holds more than its maximum.
    pub fn new(id: ProcessId, claim: ProcessClaim, kinds: usize) -> Result<Self, PoolError> {
        let ProcessClaim { max, allocated } = claim;
        max.ensure_kinds(kinds, &format!("max claim of {id}"))?;

        // An omitted allocation means the process starts empty.
        let allocated = if allocated.kinds() == 0 {
            ResourceVector::zeros(kinds)
        } else {
            allocated
        };
        allocated.ensure_kinds(kinds, &format!("allocation of {id}"))?;

        let need = max
            .checked_sub(&allocated)
            .ok_or_else(|| PoolError::InvalidManifest {
                reason: format!("{id} holds {allocated} which exceeds its maximum {max}"),
            })?;

        Ok(Self {
            id,
            max,
            allocated,
            need,
        })
    }

    /// Move `request` from need into allocated. Leaves the record untouched
    /// and returns `false` if the request exceeds the remaining need.
    pub fn acquire(&mut self, request: &ResourceVector) -> bool {
        let (Some(need), Some(allocated)) = (
            self.need.checked_sub(request),
            self.allocated.checked_add(request),
        ) else {
            return false;
        };
        self.need = need;
        self.allocated = allocated;
        true
    }

    /// Move `release` from allocated back into need. Leaves the record
    /// untouched and returns `false` if the process holds less than that.
    pub fn relinquish(&mut self, release: &ResourceVector) -> bool {
        let (Some(allocated), Some(need)) = (
            self.allocated.checked_sub(release),
            self.need.checked_add(release),
        ) else {
            return false;
        };
        self.allocated = allocated;
        self.need = need;
        true
    }

    /// Whether `allocated + need == max` and `allocated <= max` hold.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.allocated.fits_within(&self.max)
            && self.allocated.checked_add(&self.need).as_ref() == Some(&self.max)
    }
}

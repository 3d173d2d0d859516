//! Point-in-time views of a pool and allocation outcomes

use crate::{ProcessId, ProcessRecord, ResourceVector};
use serde::{Deserialize, Serialize};

/// A consistent copy of the pool taken under its lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub total: ResourceVector,
    pub available: ResourceVector,
    pub processes: Vec<ProcessRecord>,
}

impl PoolSnapshot {
    /// Number of resource kinds
    #[must_use]
    pub fn kinds(&self) -> usize {
        self.total.kinds()
    }

    /// Sum of every process's allocation, per kind, clamped at `u32::MAX`
    #[must_use]
    pub fn allocated_total(&self) -> ResourceVector {
        let mut sum = ResourceVector::zeros(self.kinds());
        for process in &self.processes {
            sum.saturating_add_assign(&process.allocated);
        }
        sum
    }

    /// Whether `available + Σ allocated == total` for every kind
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.processes
            .iter()
            .try_fold(self.available.clone(), |sum, process| {
                sum.checked_add(&process.allocated)
            })
            .as_ref()
            == Some(&self.total)
    }

    #[must_use]
    pub fn process(&self, id: ProcessId) -> Option<&ProcessRecord> {
        self.processes.get(id.index())
    }
}

/// A granted request, with one completion ordering that proves the new
/// state safe. The ordering is not unique; display it, don't rely on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub process: ProcessId,
    pub granted: ResourceVector,
    pub safe_sequence: Vec<ProcessId>,
}

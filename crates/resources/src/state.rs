//! The pool's shared mutable state
//!
//! Everything in here is only ever reached through the single mutex owned
//! by [`crate::ResourcePool`].

use crate::safety::{is_safe, SafetyReport};
use banker_errors::{AllocationError, PoolError};
use banker_types::{PoolSnapshot, ProcessClaim, ProcessId, ProcessRecord, ResourceVector};

#[derive(Debug, Clone)]
pub(crate) struct PoolState {
    pub(crate) total: ResourceVector,
    pub(crate) available: ResourceVector,
    pub(crate) processes: Vec<ProcessRecord>,
}

impl PoolState {
    /// Build the initial state; `available` is what the manifest's
    /// allocations leave free of `total`.
    pub(crate) fn new(total: ResourceVector, claims: Vec<ProcessClaim>) -> Result<Self, PoolError> {
        let kinds = total.kinds();
        if kinds == 0 {
            return Err(PoolError::InvalidManifest {
                reason: "a pool needs at least one resource kind".to_string(),
            });
        }

        let processes = claims
            .into_iter()
            .enumerate()
            .map(|(index, claim)| ProcessRecord::new(ProcessId(index), claim, kinds))
            .collect::<Result<Vec<_>, _>>()?;

        let mut allocated = ResourceVector::zeros(kinds);
        for process in &processes {
            allocated = allocated
                .checked_add(&process.allocated)
                .ok_or_else(|| PoolError::InvalidManifest {
                    reason: "initial allocations overflow".to_string(),
                })?;
        }
        let available = total
            .checked_sub(&allocated)
            .ok_or_else(|| PoolError::InvalidManifest {
                reason: format!("initial allocations {allocated} exceed total {total}"),
            })?;

        Ok(Self {
            total,
            available,
            processes,
        })
    }

    pub(crate) fn kinds(&self) -> usize {
        self.total.kinds()
    }

    pub(crate) fn position(&self, process: ProcessId) -> Result<usize, AllocationError> {
        if process.index() < self.processes.len() {
            Ok(process.index())
        } else {
            Err(AllocationError::UnknownProcess {
                process: process.index(),
                known: self.processes.len(),
            })
        }
    }

    pub(crate) fn safety(&self) -> SafetyReport {
        is_safe(&self.available, &self.processes)
    }

    pub(crate) fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            total: self.total.clone(),
            available: self.available.clone(),
            processes: self.processes.clone(),
        }
    }

    /// Verify the bookkeeping invariants, reporting the first violation.
    pub(crate) fn check_invariants(&self) -> Result<(), PoolError> {
        for process in &self.processes {
            let held = process.allocated.total();
            let claimed = process.max.total();
            if held > claimed {
                return Err(violation(
                    process.id,
                    format!(
                        "{} holds {held} units in total, exceeding its maximum of {claimed}",
                        process.id
                    ),
                ));
            }
            if let Some(kind) = process.allocated.first_excess_over(&process.max) {
                return Err(violation(
                    process.id,
                    format!(
                        "{} holds {} of kind {kind}, exceeding its maximum of {} (allocated {}, max {})",
                        process.id,
                        process.allocated[kind],
                        process.max[kind],
                        process.allocated,
                        process.max
                    ),
                ));
            }
            if !process.is_consistent() {
                return Err(violation(
                    process.id,
                    format!(
                        "{} allocated {} plus need {} does not equal max {}",
                        process.id, process.allocated, process.need, process.max
                    ),
                ));
            }
        }

        if let Some(kind) = self.available.first_excess_over(&self.total) {
            return Err(PoolError::InvariantViolation {
                process: None,
                detail: format!(
                    "available {} exceeds total {} for kind {kind}",
                    self.available[kind], self.total[kind]
                ),
            });
        }

        let accounted = self
            .processes
            .iter()
            .try_fold(self.available.clone(), |sum, process| {
                sum.checked_add(&process.allocated)
            })
            .ok_or_else(|| PoolError::InvariantViolation {
                process: None,
                detail: format!(
                    "available plus allocations overflows, expected total {}",
                    self.total
                ),
            })?;
        if accounted != self.total {
            return Err(PoolError::InvariantViolation {
                process: None,
                detail: format!(
                    "available plus allocations is {accounted}, expected total {}",
                    self.total
                ),
            });
        }

        Ok(())
    }
}

fn violation(process: ProcessId, detail: String) -> PoolError {
    PoolError::InvariantViolation {
        process: Some(process.index()),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> PoolState {
        PoolState::new(
            [10, 5, 7].into(),
            vec![
                ProcessClaim::new([7, 5, 3], [0, 1, 0]),
                ProcessClaim::new([3, 2, 2], [2, 0, 0]),
                ProcessClaim::new([9, 0, 2], [3, 0, 2]),
                ProcessClaim::new([2, 2, 2], [2, 1, 1]),
                ProcessClaim::new([4, 3, 3], [0, 0, 2]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_initial_available() {
        let state = classic();
        assert_eq!(state.available, ResourceVector::from([3, 3, 2]));
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_overcommitted_manifest_rejected() {
        let err = PoolState::new(
            [2, 2].into(),
            vec![
                ProcessClaim::new([2, 2], [2, 0]),
                ProcessClaim::new([2, 2], [1, 0]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, PoolError::InvalidManifest { .. }));
    }

    #[test]
    fn test_zero_kinds_rejected() {
        let err = PoolState::new(ResourceVector::default(), Vec::new()).unwrap_err();
        assert!(matches!(err, PoolError::InvalidManifest { .. }));
    }

    #[test]
    fn test_per_kind_excess_detected() {
        let mut state = classic();
        // Total stays under the max sum, one kind does not.
        state.processes[3].allocated = [3, 0, 0].into();
        state.available = [2, 4, 3].into();
        let err = state.check_invariants().unwrap_err();
        assert!(matches!(
            err,
            PoolError::InvariantViolation { process: Some(3), .. }
        ));
    }

    #[test]
    fn test_total_excess_detected() {
        let mut state = classic();
        state.processes[1].allocated = [4, 2, 2].into();
        let err = state.check_invariants().unwrap_err();
        let PoolError::InvariantViolation { process, detail } = err else {
            panic!("expected an invariant violation");
        };
        assert_eq!(process, Some(1));
        assert!(detail.contains("exceeding its maximum of 7"));
    }

    #[test]
    fn test_overflowing_conservation_sum_detected() {
        let mut state = PoolState::new(
            [u32::MAX].into(),
            vec![ProcessClaim::new([u32::MAX], [0]), ProcessClaim::new([10], [0])],
        )
        .unwrap();
        // Each record stays consistent and available stays within total;
        // only the sum exceeds u32::MAX.
        state.processes[0].allocated = [u32::MAX - 5].into();
        state.processes[0].need = [5].into();
        state.processes[1].allocated = [10].into();
        state.processes[1].need = [0].into();
        let err = state.check_invariants().unwrap_err();
        let PoolError::InvariantViolation { process, detail } = err else {
            panic!("expected an invariant violation");
        };
        assert_eq!(process, None);
        assert!(detail.contains("overflows"));
    }

    #[test]
    fn test_conservation_break_detected() {
        let mut state = classic();
        state.available = [3, 3, 1].into();
        let err = state.check_invariants().unwrap_err();
        assert!(matches!(
            err,
            PoolError::InvariantViolation { process: None, .. }
        ));
    }
}

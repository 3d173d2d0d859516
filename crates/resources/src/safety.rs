//! Safety verification (Banker's algorithm)
//!
//! A state is safe when some ordering exists in which every process can
//! obtain its remaining need from what is free, run to completion, and hand
//! back everything it holds.

use banker_types::{ProcessId, ProcessRecord, ResourceVector};
use serde::{Deserialize, Serialize};

/// Outcome of a safety check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyReport {
    /// Whether every process could finish
    pub safe: bool,
    /// Completion order found by the scan. When `safe` is false this is
    /// the prefix that could still finish.
    pub sequence: Vec<ProcessId>,
    /// Processes that could not finish, in record order
    pub blocked: Vec<ProcessId>,
}

/// Decide whether `processes` can all complete starting from `available`.
///
/// Scans repeat over unfinished processes in record order; each process
/// whose need fits in the working vector is marked finished and its
/// allocation returned to the working vector. Scanning stops once a full
/// pass finishes nobody. Worst case O(K·N²).
///
/// When several processes fit during one pass they are taken in record
/// order. That choice changes only the reported sequence, never `safe`, so
/// the sequence is one witness among possibly many.
///
/// Never mutates its inputs.
#[must_use]
pub fn is_safe(available: &ResourceVector, processes: &[ProcessRecord]) -> SafetyReport {
    let mut work = available.clone();
    let mut finished = vec![false; processes.len()];
    let mut sequence = Vec::with_capacity(processes.len());

    loop {
        let mut progressed = false;
        for (index, process) in processes.iter().enumerate() {
            if finished[index] || !process.need.fits_within(&work) {
                continue;
            }
            work.saturating_add_assign(&process.allocated);
            finished[index] = true;
            sequence.push(process.id);
            progressed = true;
        }
        if !progressed {
            break;
        }
    }

    let blocked: Vec<ProcessId> = processes
        .iter()
        .zip(&finished)
        .filter(|(_, done)| !**done)
        .map(|(process, _)| process.id)
        .collect();

    SafetyReport {
        safe: blocked.is_empty(),
        sequence,
        blocked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banker_types::ProcessClaim;
    use proptest::prelude::*;

    fn records(claims: &[([u32; 3], [u32; 3])]) -> Vec<ProcessRecord> {
        claims
            .iter()
            .enumerate()
            .map(|(i, (max, allocated))| {
                ProcessRecord::new(ProcessId(i), ProcessClaim::new(*max, *allocated), 3).unwrap()
            })
            .collect()
    }

    fn classic() -> Vec<ProcessRecord> {
        records(&[
            ([7, 5, 3], [0, 1, 0]),
            ([3, 2, 2], [2, 0, 0]),
            ([9, 0, 2], [3, 0, 2]),
            ([2, 2, 2], [2, 1, 1]),
            ([4, 3, 3], [0, 0, 2]),
        ])
    }

    fn ids(raw: &[usize]) -> Vec<ProcessId> {
        raw.iter().copied().map(ProcessId).collect()
    }

    #[test]
    fn test_classic_state_is_safe() {
        let report = is_safe(&[3, 3, 2].into(), &classic());
        assert!(report.safe);
        assert!(report.blocked.is_empty());
        assert_eq!(report.sequence, ids(&[1, 3, 4, 0, 2]));
    }

    #[test]
    fn test_unsafe_state_reports_prefix_and_blocked() {
        let processes = records(&[
            ([7, 5, 3], [0, 3, 0]),
            ([3, 2, 2], [3, 0, 2]),
            ([9, 0, 2], [3, 0, 2]),
            ([2, 2, 2], [2, 1, 1]),
            ([4, 3, 3], [0, 0, 2]),
        ]);
        let report = is_safe(&[2, 1, 0].into(), &processes);
        assert!(!report.safe);
        assert!(report.sequence.is_empty());
        assert_eq!(report.blocked, ids(&[0, 1, 2, 3, 4]));
    }

    #[test]
    fn test_partial_prefix() {
        // P1 can finish, P0 never can.
        let processes = records(&[([5, 0, 0], [1, 0, 0]), ([1, 1, 1], [1, 0, 0])]);
        let report = is_safe(&[0, 1, 1].into(), &processes);
        assert!(!report.safe);
        assert_eq!(report.sequence, ids(&[1]));
        assert_eq!(report.blocked, ids(&[0]));
    }

    #[test]
    fn test_empty_process_table_is_safe() {
        let report = is_safe(&[0, 0, 0].into(), &[]);
        assert!(report.safe);
        assert!(report.sequence.is_empty());
    }

    #[test]
    fn test_inputs_untouched() {
        let processes = classic();
        let available = ResourceVector::from([3, 3, 2]);
        let before = (available.clone(), processes.clone());
        let _ = is_safe(&available, &processes);
        assert_eq!((available, processes), before);
    }

    fn arb_state() -> impl Strategy<Value = (ResourceVector, Vec<ProcessRecord>)> {
        (1usize..4, 1usize..6).prop_flat_map(|(kinds, count)| {
            let claim = proptest::collection::vec((0u32..6, 0u32..6), kinds).prop_map(|pairs| {
                let max: Vec<u32> = pairs.iter().map(|(m, _)| *m).collect();
                let allocated: Vec<u32> = pairs.iter().map(|(m, a)| (*a).min(*m)).collect();
                ProcessClaim::new(max, allocated)
            });
            (
                proptest::collection::vec(0u32..6, kinds),
                proptest::collection::vec(claim, count),
            )
                .prop_map(move |(available, claims)| {
                    let processes = claims
                        .into_iter()
                        .enumerate()
                        .map(|(i, claim)| {
                            ProcessRecord::new(ProcessId(i), claim, kinds).unwrap()
                        })
                        .collect();
                    (ResourceVector::new(available), processes)
                })
        })
    }

    proptest! {
        #[test]
        fn prop_check_is_idempotent((available, processes) in arb_state()) {
            let first = is_safe(&available, &processes);
            let second = is_safe(&available, &processes);
            prop_assert_eq!(first.safe, second.safe);
        }

        #[test]
        fn prop_sequence_and_blocked_partition_processes((available, processes) in arb_state()) {
            let report = is_safe(&available, &processes);
            let mut seen: Vec<usize> = report
                .sequence
                .iter()
                .chain(&report.blocked)
                .map(|id| id.index())
                .collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..processes.len()).collect::<Vec<_>>());
        }

        #[test]
        fn prop_release_never_makes_safe_state_unsafe(
            (available, processes) in arb_state(),
            pick in any::<proptest::sample::Index>(),
            fraction in 0u32..=4,
        ) {
            let before = is_safe(&available, &processes);
            prop_assume!(before.safe);

            let target = pick.index(processes.len());
            let release: ResourceVector = processes[target]
                .allocated
                .iter()
                .map(|held| held * fraction / 4)
                .collect();

            let mut after_processes = processes.clone();
            prop_assert!(after_processes[target].relinquish(&release));
            let after_available = available.checked_add(&release).unwrap();

            prop_assert!(is_safe(&after_available, &after_processes).safe);
        }
    }
}

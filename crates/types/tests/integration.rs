//! Integration tests for types

#[cfg(test)]
mod tests {
    use banker_types::*;

    fn record(id: usize, max: [u32; 3], allocated: [u32; 3]) -> ProcessRecord {
        ProcessRecord::new(ProcessId(id), ProcessClaim::new(max, allocated), 3).unwrap()
    }

    #[test]
    fn test_snapshot_conservation() {
        let snapshot = PoolSnapshot {
            total: [10, 5, 7].into(),
            available: [3, 3, 2].into(),
            processes: vec![
                record(0, [7, 5, 3], [0, 1, 0]),
                record(1, [3, 2, 2], [2, 0, 0]),
                record(2, [9, 0, 2], [3, 0, 2]),
                record(3, [2, 2, 2], [2, 1, 1]),
                record(4, [4, 3, 3], [0, 0, 2]),
            ],
        };
        assert_eq!(snapshot.allocated_total(), ResourceVector::from([7, 2, 5]));
        assert!(snapshot.is_conserved());
        assert_eq!(
            snapshot.process(ProcessId(3)).map(|p| p.need.clone()),
            Some(ResourceVector::from([0, 1, 1]))
        );

        let mut leaked = snapshot.clone();
        leaked.available = [3, 3, 3].into();
        assert!(!leaked.is_conserved());
    }

    #[test]
    fn test_overflowing_allocations_not_conserved() {
        let snapshot = PoolSnapshot {
            total: [u32::MAX, 1, 1].into(),
            available: [0, 0, 0].into(),
            processes: vec![
                record(0, [u32::MAX, 1, 1], [u32::MAX - 5, 1, 1]),
                record(1, [10, 0, 0], [10, 0, 0]),
            ],
        };
        assert!(!snapshot.is_conserved());
    }

    #[test]
    fn test_vector_serializes_as_plain_array() {
        let vector = ResourceVector::from([1, 0, 2]);
        let json = serde_json::to_string(&vector).unwrap();
        assert_eq!(json, "[1,0,2]");
    }

    #[test]
    fn test_claim_deserializes_without_allocation() {
        let claim: ProcessClaim = serde_json::from_str(r#"{"max":[4,3,3]}"#).unwrap();
        assert_eq!(claim.max, ResourceVector::from([4, 3, 3]));
        assert_eq!(claim.allocated.kinds(), 0);

        let record = ProcessRecord::new(ProcessId(4), claim, 3).unwrap();
        assert_eq!(record.need, ResourceVector::from([4, 3, 3]));
    }

    #[test]
    fn test_process_id_display() {
        assert_eq!(ProcessId(2).to_string(), "P2");
    }
}

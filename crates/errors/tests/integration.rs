//! Integration tests for error types

#[cfg(test)]
mod tests {
    use banker_errors::*;

    #[test]
    fn test_error_conversion() {
        let alloc_err = AllocationError::UnknownProcess {
            process: 9,
            known: 5,
        };
        let err: Error = alloc_err.into();
        assert!(matches!(err, Error::Allocation(_)));
        assert_eq!(err.as_allocation().map(AllocationError::process), Some(9));
    }

    #[test]
    fn test_error_display() {
        let err = PoolError::dimension("request", 3, 2);
        assert_eq!(
            err.to_string(),
            "dimension mismatch in request: expected 3 resource kinds, got 2"
        );
    }

    #[test]
    fn test_fatal_classification() {
        let fatal: Error = PoolError::InvariantViolation {
            process: Some(1),
            detail: "allocated [4] exceeds max [3]".into(),
        }
        .into();
        assert!(fatal.is_fatal());

        let denial: Error = AllocationError::InsufficientResources {
            process: 0,
            requested: vec![1, 0, 2],
            available: vec![2, 3, 0],
        }
        .into();
        assert!(!denial.is_fatal());

        let manifest: Error = PoolError::InvalidManifest {
            reason: "empty".into(),
        }
        .into();
        assert!(!manifest.is_fatal());
    }

    #[test]
    fn test_retryable_denials() {
        let unsafe_state: Error = AllocationError::UnsafeState {
            process: 0,
            requested: vec![0, 2, 0],
            safe_prefix: vec![3],
            blocked: vec![0, 1, 2, 4],
        }
        .into();
        assert!(unsafe_state.is_retryable());
        assert_eq!(unsafe_state.user_code(), Some("allocation.unsafe_state"));

        let exceeds: Error = AllocationError::ExceedsClaim {
            process: 1,
            requested: vec![5, 0, 0],
            need: vec![1, 2, 2],
        }
        .into();
        assert!(!exceeds.is_retryable());
        assert!(exceeds.user_hint().is_some());
    }

    #[test]
    fn test_error_clone() {
        let err = AllocationError::InvalidRelease {
            process: 3,
            released: vec![3, 0, 0],
            allocated: vec![2, 1, 1],
        };
        let cloned = err.clone();
        assert_eq!(err, cloned);
        assert_eq!(err.to_string(), cloned.to_string());
    }
}

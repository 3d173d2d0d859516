//! Integration tests for events

#[cfg(test)]
mod tests {
    use banker_errors::AllocationError;
    use banker_events::*;
    use banker_types::{Grant, ProcessId, ResourceVector};

    #[tokio::test]
    async fn test_event_sender_emit() {
        let (tx, mut rx) = channel();

        tx.emit_warning("test warning");

        let message = rx.recv().await.unwrap();
        assert!(matches!(
            message.event,
            AppEvent::General(GeneralEvent::Warning { .. })
        ));
        assert_eq!(message.meta.level, EventLevel::Warn);
        assert_eq!(message.meta.source, EventSource::GENERAL);
        assert_eq!(message.meta.correlation_id, None);
    }

    struct Tagged {
        tx: EventSender,
    }

    impl EventEmitter for Tagged {
        fn event_sender(&self) -> Option<&EventSender> {
            Some(&self.tx)
        }

        fn correlation_id(&self) -> Option<&str> {
            Some("step-7")
        }
    }

    #[tokio::test]
    async fn test_emitter_correlation_id_stamped() {
        let (tx, mut rx) = channel();
        let tagged = Tagged { tx };

        tagged.emit_error_with_details("grow failed", "capacity overflow");

        let message = rx.recv().await.unwrap();
        assert_eq!(message.meta.correlation_id.as_deref(), Some("step-7"));
        assert_eq!(message.meta.level, EventLevel::Error);
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_warning("ignored");
    }

    #[tokio::test]
    async fn test_denial_carries_reason_and_failure() {
        let (tx, mut rx) = channel();
        let request = ResourceVector::from([1, 0, 2]);
        let error = AllocationError::InsufficientResources {
            process: 0,
            requested: vec![1, 0, 2],
            available: vec![2, 3, 0],
        };

        tx.emit_denied(ProcessId(0), &request, &error);

        let message = rx.recv().await.unwrap();
        assert_eq!(message.meta.source, EventSource::ALLOCATION);
        match message.event {
            AppEvent::Allocation(AllocationEvent::Denied {
                reason, failure, ..
            }) => {
                assert_eq!(reason, DenialReason::InsufficientResources);
                assert!(failure.retryable);
                assert_eq!(
                    failure.code.as_deref(),
                    Some("allocation.insufficient_resources")
                );
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_granted_event_payload() {
        let (tx, mut rx) = channel();
        let grant = Grant {
            process: ProcessId(1),
            granted: [1, 0, 2].into(),
            safe_sequence: vec![ProcessId(1), ProcessId(3), ProcessId(4)],
        };

        tx.emit_granted(&grant, &[2, 3, 0].into());

        let message = rx.recv().await.unwrap();
        assert_eq!(message.meta.level, EventLevel::Info);
        let AppEvent::Allocation(AllocationEvent::Granted {
            available,
            safe_sequence,
            ..
        }) = message.event
        else {
            panic!("expected a granted event");
        };
        assert_eq!(available, ResourceVector::from([2, 3, 0]));
        assert_eq!(safe_sequence.len(), 3);
    }

    #[test]
    fn test_violation_is_error_level() {
        let event = AppEvent::Monitor(MonitorEvent::ViolationDetected {
            process: Some(ProcessId(2)),
            detail: "allocated exceeds max".into(),
            checks_passed: 4,
        });
        assert_eq!(event.log_level(), tracing::Level::ERROR);
        assert_eq!(event.log_target(), "banker::events::monitor");
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = AppEvent::Pool(PoolEvent::Grown {
            additional: [1, 0, 1].into(),
            total: [11, 5, 8].into(),
            available: [4, 3, 3].into(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "pool");
        assert_eq!(json["event"]["type"], "grown");
        assert_eq!(json["event"]["total"], serde_json::json!([11, 5, 8]));
    }
}

//! Structured logging integration for events
//!
//! Converts domain events drained from the event channel into tracing
//! records with structured fields.

use banker_events::{
    AllocationEvent, AppEvent, EventMessage, GeneralEvent, MonitorEvent, PoolEvent,
};
use banker_types::ProcessId;
use tracing::{debug, error, info, warn};

/// Log an `EventMessage` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let event = &message.event;
    let meta = &message.meta;

    match event {
        AppEvent::Allocation(allocation_event) => match allocation_event {
            AllocationEvent::Granted {
                process,
                request,
                available,
                safe_sequence,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    process = %process,
                    request = %request,
                    available = %available,
                    safe_sequence = %fmt_sequence(safe_sequence),
                    "Request granted"
                );
            }
            AllocationEvent::Denied {
                process,
                request,
                reason,
                failure,
            } => {
                if failure.retryable {
                    info!(
                        source = meta.source.as_str(),
                        event_id = %meta.event_id,
                        correlation = ?meta.correlation_id,
                        process = %process,
                        request = %request,
                        reason = reason.as_str(),
                        code = ?failure.code,
                        message = %failure.message,
                        "Request denied"
                    );
                } else {
                    warn!(
                        source = meta.source.as_str(),
                        event_id = %meta.event_id,
                        correlation = ?meta.correlation_id,
                        process = %process,
                        request = %request,
                        reason = reason.as_str(),
                        code = ?failure.code,
                        message = %failure.message,
                        hint = ?failure.hint,
                        "Request denied"
                    );
                }
            }
            AllocationEvent::Released {
                process,
                release,
                available,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    process = %process,
                    release = %release,
                    available = %available,
                    "Resources released"
                );
            }
            AllocationEvent::ReleaseRejected {
                process,
                release,
                failure,
            } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    process = %process,
                    release = %release,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Release rejected"
                );
            }
        },

        AppEvent::Pool(pool_event) => match pool_event {
            PoolEvent::Initialized {
                total,
                available,
                processes,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    total = %total,
                    available = %available,
                    processes,
                    "Pool initialized"
                );
            }
            PoolEvent::Grown {
                additional,
                total,
                available,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    additional = %additional,
                    total = %total,
                    available = %available,
                    "Pool grown"
                );
            }
            PoolEvent::GrowerStarted {
                increment,
                interval_ms,
            } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    increment = %increment,
                    interval_ms,
                    "Grower started"
                );
            }
            PoolEvent::GrowerStopped { rounds } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    rounds,
                    "Grower stopped"
                );
            }
        },

        AppEvent::Monitor(monitor_event) => match monitor_event {
            MonitorEvent::Started { interval_ms } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    interval_ms,
                    "Invariant monitor started"
                );
            }
            MonitorEvent::ViolationDetected {
                process,
                detail,
                checks_passed,
            } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    process = ?process.map(|p| p.to_string()),
                    detail = %detail,
                    checks_passed,
                    "Invariant violation detected"
                );
            }
            MonitorEvent::Stopped { checks_passed } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    checks_passed,
                    "Invariant monitor stopped"
                );
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::OperationFailed { operation, failure } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Operation failed"
                );
            }
            GeneralEvent::Warning { message } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    message = %message,
                    "Warning"
                );
            }
            GeneralEvent::Error { message, details } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    message = %message,
                    details = ?details,
                    "Error"
                );
            }
        },
    }
}

/// Render a completion order as `P1 -> P3 -> P4`
pub fn fmt_sequence(sequence: &[ProcessId]) -> String {
    sequence
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

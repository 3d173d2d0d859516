#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in banker
//!
//! Library crates never print or log directly. They emit domain events
//! through the [`EventEmitter`] trait onto an unbounded channel, and the
//! binary decides how to render them (structured tracing, JSON, ...).
//!
//! ## Architecture
//!
//! - **Domain events**: grouped by functional area (Allocation, Pool, Monitor)
//! - **Unified `EventEmitter` trait**: one API for every emission site
//! - **Metadata envelope**: every event travels with an [`EventMeta`]

pub mod meta;
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{
    AllocationEvent, AppEvent, DenialReason, FailureContext, GeneralEvent, MonitorEvent,
    PoolEvent,
};

use banker_errors::AllocationError;
use banker_types::{Grant, ProcessId, ResourceVector};
use tokio::sync::mpsc::UnboundedSender;

/// An event together with its metadata envelope
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    /// Wrap an event with metadata derived from its domain and level
    #[must_use]
    pub fn from_event(event: AppEvent) -> Self {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        Self { meta, event }
    }
}

/// Type alias for the event sender
pub type EventSender = UnboundedSender<EventMessage>;

/// Type alias for the event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<EventMessage>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout banker
///
/// Works the same whether you hold a raw `EventSender` or a struct that
/// optionally contains one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Correlation id stamped on every event this emitter sends
    fn correlation_id(&self) -> Option<&str> {
        None
    }

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            let mut message = EventMessage::from_event(event);
            if let Some(id) = self.correlation_id() {
                message.meta = message.meta.with_correlation_id(id);
            }
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(message);
        }
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    /// Emit an error event with details
    fn emit_error_with_details(&self, message: impl Into<String>, details: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::error_with_details(
            message, details,
        )));
    }

    /// Emit a granted request
    fn emit_granted(&self, grant: &Grant, available: &ResourceVector) {
        self.emit(AppEvent::Allocation(AllocationEvent::Granted {
            process: grant.process,
            request: grant.granted.clone(),
            available: available.clone(),
            safe_sequence: grant.safe_sequence.clone(),
        }));
    }

    /// Emit a denied request. Errors that are not denials are reported as
    /// generic operation failures.
    fn emit_denied(&self, process: ProcessId, request: &ResourceVector, error: &AllocationError) {
        let failure = FailureContext::from_error(error);
        match DenialReason::from_error(error) {
            Some(reason) => self.emit(AppEvent::Allocation(AllocationEvent::Denied {
                process,
                request: request.clone(),
                reason,
                failure,
            })),
            None => self.emit(AppEvent::General(GeneralEvent::OperationFailed {
                operation: format!("request by {process}"),
                failure,
            })),
        }
    }

    /// Emit a completed release
    fn emit_released(
        &self,
        process: ProcessId,
        release: &ResourceVector,
        available: &ResourceVector,
    ) {
        self.emit(AppEvent::Allocation(AllocationEvent::Released {
            process,
            release: release.clone(),
            available: available.clone(),
        }));
    }

    /// Emit a rejected release
    fn emit_release_rejected(
        &self,
        process: ProcessId,
        release: &ResourceVector,
        error: &AllocationError,
    ) {
        self.emit(AppEvent::Allocation(AllocationEvent::ReleaseRejected {
            process,
            release: release.clone(),
            failure: FailureContext::from_error(error),
        }));
    }

    /// Emit a capacity increase
    fn emit_grown(
        &self,
        additional: &ResourceVector,
        total: &ResourceVector,
        available: &ResourceVector,
    ) {
        self.emit(AppEvent::Pool(PoolEvent::Grown {
            additional: additional.clone(),
            total: total.clone(),
            available: available.clone(),
        }));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}

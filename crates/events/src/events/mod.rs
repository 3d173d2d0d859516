use serde::{Deserialize, Serialize};

use crate::EventSource;
use banker_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod allocation;
pub mod general;
pub mod monitor;
pub mod pool;

pub use allocation::*;
pub use general::*;
pub use monitor::*;
pub use pool::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// Request and release outcomes
    Allocation(AllocationEvent),

    /// Pool initialisation and growth
    Pool(PoolEvent),

    /// Invariant monitor lifecycle and violations
    Monitor(MonitorEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Allocation(_) => EventSource::ALLOCATION,
            Self::Pool(_) => EventSource::POOL,
            Self::Monitor(_) => EventSource::MONITOR,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::Error { .. } | GeneralEvent::OperationFailed { .. })
            | Self::Monitor(MonitorEvent::ViolationDetected { .. }) => Level::ERROR,

            Self::General(GeneralEvent::Warning { .. })
            | Self::Allocation(AllocationEvent::ReleaseRejected { .. }) => Level::WARN,

            Self::Allocation(AllocationEvent::Denied { failure, .. }) => {
                if failure.retryable {
                    Level::INFO
                } else {
                    Level::WARN
                }
            }

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "banker::events::general",
            Self::Allocation(_) => "banker::events::allocation",
            Self::Pool(_) => "banker::events::pool",
            Self::Monitor(_) => "banker::events::monitor",
        }
    }
}

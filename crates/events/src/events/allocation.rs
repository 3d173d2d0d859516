use banker_errors::AllocationError;
use banker_types::{ProcessId, ResourceVector};
use serde::{Deserialize, Serialize};

/// Reason a request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    ExceedsClaim,
    InsufficientResources,
    UnsafeState,
    UnknownProcess,
}

impl DenialReason {
    /// The denial an allocation error stands for. `InvalidRelease` is not a
    /// request denial and maps to `None`.
    #[must_use]
    pub fn from_error(error: &AllocationError) -> Option<Self> {
        match error {
            AllocationError::ExceedsClaim { .. } => Some(Self::ExceedsClaim),
            AllocationError::InsufficientResources { .. } => Some(Self::InsufficientResources),
            AllocationError::UnsafeState { .. } => Some(Self::UnsafeState),
            AllocationError::UnknownProcess { .. } => Some(Self::UnknownProcess),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExceedsClaim => "exceeds_claim",
            Self::InsufficientResources => "insufficient_resources",
            Self::UnsafeState => "unsafe_state",
            Self::UnknownProcess => "unknown_process",
        }
    }
}

/// Outcomes of request and release operations on the pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AllocationEvent {
    /// A request was committed.
    Granted {
        process: ProcessId,
        request: ResourceVector,
        available: ResourceVector,
        safe_sequence: Vec<ProcessId>,
    },

    /// A request was refused; the pool is unchanged.
    Denied {
        process: ProcessId,
        request: ResourceVector,
        reason: DenialReason,
        failure: super::FailureContext,
    },

    /// Resources were returned to the pool.
    Released {
        process: ProcessId,
        release: ResourceVector,
        available: ResourceVector,
    },

    /// A release was refused; the pool is unchanged.
    ReleaseRejected {
        process: ProcessId,
        release: ResourceVector,
        failure: super::FailureContext,
    },
}

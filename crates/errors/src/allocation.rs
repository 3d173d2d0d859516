//! Client-facing allocation error types
//!
//! Every variant here is a recoverable outcome: the pool is left exactly as
//! it was before the attempt, and the caller decides whether to retry.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum AllocationError {
    /// The request asks for more than the process may still claim.
    #[error("process {process} requested {requested:?} which exceeds its remaining need {need:?}")]
    ExceedsClaim {
        process: usize,
        requested: Vec<u32>,
        need: Vec<u32>,
    },

    /// The pool does not currently hold enough free units.
    #[error("process {process} requested {requested:?} but only {available:?} is available")]
    InsufficientResources {
        process: usize,
        requested: Vec<u32>,
        available: Vec<u32>,
    },

    /// Granting the request would leave no completion ordering.
    #[error("granting {requested:?} to process {process} would leave the pool unsafe (blocked: {blocked:?})")]
    UnsafeState {
        process: usize,
        requested: Vec<u32>,
        /// Processes that could still finish in the hypothetical state.
        safe_prefix: Vec<usize>,
        /// Processes that could not finish in the hypothetical state.
        blocked: Vec<usize>,
    },

    /// The process tried to give back more than it holds.
    #[error("process {process} cannot release {released:?} while holding {allocated:?}")]
    InvalidRelease {
        process: usize,
        released: Vec<u32>,
        allocated: Vec<u32>,
    },

    #[error("unknown process {process} (pool tracks {known} processes)")]
    UnknownProcess { process: usize, known: usize },
}

impl AllocationError {
    /// Process the error refers to.
    #[must_use]
    pub fn process(&self) -> usize {
        match self {
            Self::ExceedsClaim { process, .. }
            | Self::InsufficientResources { process, .. }
            | Self::UnsafeState { process, .. }
            | Self::InvalidRelease { process, .. }
            | Self::UnknownProcess { process, .. } => *process,
        }
    }
}

impl UserFacingError for AllocationError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ExceedsClaim { .. } => {
                Some("Request no more than the declared maximum minus current holdings.")
            }
            Self::InsufficientResources { .. } => {
                Some("Retry after other processes release resources or the pool grows.")
            }
            Self::UnsafeState { .. } => {
                Some("Retry after other processes release resources or request less.")
            }
            Self::InvalidRelease { .. } => Some("Release no more than the process currently holds."),
            Self::UnknownProcess { .. } => Some("Use a process id declared in the pool manifest."),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientResources { .. } | Self::UnsafeState { .. }
        )
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ExceedsClaim { .. } => "allocation.exceeds_claim",
            Self::InsufficientResources { .. } => "allocation.insufficient_resources",
            Self::UnsafeState { .. } => "allocation.unsafe_state",
            Self::InvalidRelease { .. } => "allocation.invalid_release",
            Self::UnknownProcess { .. } => "allocation.unknown_process",
        };
        Some(code)
    }
}

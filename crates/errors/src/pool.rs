//! Pool bookkeeping error types
//!
//! These indicate programming errors or internal corruption rather than
//! normal runtime conditions.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum PoolError {
    /// A vector's length differs from the pool's number of resource kinds.
    #[error("dimension mismatch in {context}: expected {expected} resource kinds, got {actual}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Bookkeeping no longer satisfies a pool invariant.
    #[error("invariant violation: {detail}")]
    InvariantViolation {
        process: Option<usize>,
        detail: String,
    },

    #[error("invalid pool manifest: {reason}")]
    InvalidManifest { reason: String },

    /// Growing the pool would overflow a counter.
    #[error("capacity overflow for resource kind {kind}")]
    CapacityOverflow { kind: usize },
}

impl PoolError {
    /// Shorthand for a mismatch between the pool's kind count and a vector.
    pub fn dimension(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Whether the error points to a bug instead of bad input.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. } | Self::InvariantViolation { .. }
        )
    }
}

impl UserFacingError for PoolError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvariantViolation { .. } => {
                Some("Pool bookkeeping is corrupted. Please report this issue.")
            }
            Self::InvalidManifest { .. } => {
                Some("Check that every allocation fits its maximum and the pool total.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::DimensionMismatch { .. } => "pool.dimension_mismatch",
            Self::InvariantViolation { .. } => "pool.invariant_violation",
            Self::InvalidManifest { .. } => "pool.invalid_manifest",
            Self::CapacityOverflow { .. } => "pool.capacity_overflow",
        };
        Some(code)
    }
}

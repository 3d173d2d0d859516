#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the banker resource allocator
//!
//! This crate provides fine-grained error types organized by domain.
//! Client-facing denials live in [`AllocationError`], bookkeeping and
//! programming errors in [`PoolError`], and configuration problems in
//! [`ConfigError`].

use std::borrow::Cow;

use thiserror::Error;

pub mod allocation;
pub mod config;
pub mod pool;

pub use allocation::AllocationError;
pub use config::ConfigError;
pub use pool::PoolError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("allocation error: {0}")]
    Allocation(#[from] AllocationError),

    #[error("pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error signals a bug or corruption that must not be
    /// silently tolerated.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Pool(err) => err.is_fatal(),
            Error::Internal(_) => true,
            Error::Allocation(_) | Error::Config(_) => false,
        }
    }

    /// The allocation denial, if this error is one.
    #[must_use]
    pub fn as_allocation(&self) -> Option<&AllocationError> {
        match self {
            Error::Allocation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(format!("I/O error: {err}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {err}"))
    }
}

/// Result type alias for banker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for analytics / structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Allocation(err) => err.user_message(),
            Error::Pool(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
            Error::Internal(_) => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Allocation(err) => err.user_hint(),
            Error::Pool(err) => err.user_hint(),
            Error::Config(_) => Some("Check your banker configuration file."),
            Error::Internal(_) => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Allocation(err) => err.is_retryable(),
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Allocation(err) => err.user_code(),
            Error::Pool(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
            Error::Internal(_) => Some("error.internal"),
        }
    }
}

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the banker resource allocator
//!
//! This crate provides the data model shared by the pool, its monitor and
//! its callers: resource vectors, per-process records, and snapshots.

pub mod process;
pub mod snapshot;
pub mod vector;

// Re-export commonly used types
pub use process::{ProcessClaim, ProcessId, ProcessRecord};
pub use snapshot::{Grant, PoolSnapshot};
pub use vector::ResourceVector;

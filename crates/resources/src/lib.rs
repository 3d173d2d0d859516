#![deny(clippy::pedantic, unsafe_code)]

//! Deadlock-avoiding resource allocation for banker
//!
//! A [`ResourcePool`] owns a fixed number of resource kinds and a table of
//! processes with declared maximum claims. Every request is granted only if
//! the pool stays in a safe state afterwards, meaning some order exists in
//! which every process can still obtain its full claim and finish.
//!
//! Background helpers poll the pool through the same lock: the
//! [`InvariantMonitor`] verifies bookkeeping and the [`PoolGrower`] adds
//! capacity on a schedule.

mod grower;
mod monitor;
mod pool;
mod safety;
mod state;
mod task;
mod tentative;

pub use grower::{GrowerHandle, PoolGrower};
pub use monitor::{InvariantMonitor, MonitorHandle, MonitorReport};
pub use pool::ResourcePool;
pub use safety::{is_safe, SafetyReport};
pub use task::BackgroundTask;

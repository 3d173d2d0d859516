use banker_types::ResourceVector;
use serde::{Deserialize, Serialize};

/// Lifecycle of the pool itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PoolEvent {
    /// Pool initialised from a manifest.
    Initialized {
        total: ResourceVector,
        available: ResourceVector,
        processes: usize,
    },

    /// Capacity was added.
    Grown {
        additional: ResourceVector,
        total: ResourceVector,
        available: ResourceVector,
    },

    /// Background growth task started.
    GrowerStarted {
        increment: ResourceVector,
        interval_ms: u64,
    },

    /// Background growth task stopped.
    GrowerStopped { rounds: u64 },
}

use banker_types::ProcessId;
use serde::{Deserialize, Serialize};

/// Background invariant monitor events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonitorEvent {
    /// Monitor task started polling.
    Started { interval_ms: u64 },

    /// Bookkeeping no longer satisfies a pool invariant.
    ViolationDetected {
        #[serde(skip_serializing_if = "Option::is_none")]
        process: Option<ProcessId>,
        detail: String,
        checks_passed: u64,
    },

    /// Monitor task stopped without finding a violation.
    Stopped { checks_passed: u64 },
}

//! Background invariant monitor
//!
//! Polls the pool on a fixed cadence and checks its bookkeeping under the
//! pool lock. A violation means some mutation escaped the lock discipline;
//! it is reported and ends the monitor, it is never repaired.

use crate::pool::ResourcePool;
use crate::task::BackgroundTask;
use banker_config::MonitorConfig;
use banker_errors::{ConfigError, Error, PoolError};
use banker_events::{AppEvent, EventEmitter, MonitorEvent};
use banker_types::ProcessId;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Summary of a monitor run that ended without a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorReport {
    pub checks_passed: u64,
}

pub type MonitorHandle = BackgroundTask<MonitorReport>;

#[derive(Debug, Clone)]
pub struct InvariantMonitor {
    pool: ResourcePool,
    interval: Duration,
}

impl InvariantMonitor {
    #[must_use]
    pub fn new(pool: ResourcePool, interval: Duration) -> Self {
        Self { pool, interval }
    }

    #[must_use]
    pub fn from_config(pool: ResourcePool, config: &MonitorConfig) -> Self {
        Self::new(pool, config.interval())
    }

    /// Start polling on the current tokio runtime.
    ///
    /// The returned handle yields [`MonitorReport`] when stopped, or the
    /// [`PoolError::InvariantViolation`] that ended the run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the interval is zero.
    pub fn spawn(self) -> Result<MonitorHandle, Error> {
        if self.interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "monitor.interval_ms".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        Ok(BackgroundTask::spawn(move |shutdown| self.run(shutdown)))
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<MonitorReport, Error> {
        let interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX);
        self.pool
            .emit(AppEvent::Monitor(MonitorEvent::Started { interval_ms }));

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut checks_passed = 0u64;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = self.pool.check_invariants().await {
                        self.report_violation(&err, checks_passed);
                        return Err(err);
                    }
                    checks_passed += 1;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        self.pool
            .emit(AppEvent::Monitor(MonitorEvent::Stopped { checks_passed }));
        Ok(MonitorReport { checks_passed })
    }

    fn report_violation(&self, err: &Error, checks_passed: u64) {
        let (process, detail) = match err {
            Error::Pool(PoolError::InvariantViolation { process, detail }) => {
                (process.map(ProcessId), detail.clone())
            }
            other => (None, other.to_string()),
        };

        tracing::error!(
            process = ?process,
            checks_passed,
            detail = %detail,
            "pool invariant violated"
        );
        self.pool
            .emit(AppEvent::Monitor(MonitorEvent::ViolationDetected {
                process,
                detail,
                checks_passed,
            }));
    }
}

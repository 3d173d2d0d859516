//! Periodic pool growth
//!
//! Adds a fixed increment to the pool's capacity on every tick, through
//! the same locked path as [`ResourcePool::grow`].

use crate::pool::ResourcePool;
use crate::task::BackgroundTask;
use banker_config::GrowthConfig;
use banker_errors::{ConfigError, Error};
use banker_events::{AppEvent, EventEmitter, PoolEvent};
use banker_types::ResourceVector;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Handle to a running grower; yields the number of completed rounds.
pub type GrowerHandle = BackgroundTask<u64>;

#[derive(Debug, Clone)]
pub struct PoolGrower {
    pool: ResourcePool,
    increment: ResourceVector,
    interval: Duration,
}

impl PoolGrower {
    #[must_use]
    pub fn new(pool: ResourcePool, increment: ResourceVector, interval: Duration) -> Self {
        Self {
            pool,
            increment,
            interval,
        }
    }

    #[must_use]
    pub fn from_config(pool: ResourcePool, config: &GrowthConfig) -> Self {
        Self::new(pool, config.increment.clone(), config.interval())
    }

    /// Start growing on the current tokio runtime.
    ///
    /// The first increment lands one full interval after the call.
    ///
    /// # Errors
    ///
    /// Returns [`banker_errors::PoolError::DimensionMismatch`] if the
    /// increment does not have one entry per resource kind, or
    /// [`ConfigError::InvalidValue`] if the interval is zero.
    pub fn spawn(self) -> Result<GrowerHandle, Error> {
        if self.interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "growth.interval_ms".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        self.increment.ensure_kinds(self.pool.kinds(), "growth increment")?;
        Ok(BackgroundTask::spawn(move |shutdown| self.run(shutdown)))
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<u64, Error> {
        let interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX);
        self.pool.emit(AppEvent::Pool(PoolEvent::GrowerStarted {
            increment: self.increment.clone(),
            interval_ms,
        }));

        let start = tokio::time::Instant::now() + self.interval;
        let mut ticker = tokio::time::interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut rounds = 0u64;

        let outcome = loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = self.pool.grow(&self.increment).await {
                        self.pool.emit_warning(format!(
                            "pool growth stopped after {rounds} rounds: {err}"
                        ));
                        break Err(err);
                    }
                    rounds += 1;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break Ok(rounds);
                    }
                }
            }
        };

        self.pool
            .emit(AppEvent::Pool(PoolEvent::GrowerStopped { rounds }));
        outcome
    }
}

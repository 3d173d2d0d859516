//! Shared resource pool and allocation coordination
//!
//! All mutable state lives in one [`PoolState`] behind one mutex. Requests,
//! releases and growth each run as a single critical section on that lock,
//! so no operation can observe another's partial update. The lock is never
//! held while events are sent.
//!
//! Requests that contend for the lock are served in acquisition order,
//! which need not match the order callers submitted them. Callers that
//! need a fixed order must serialise their submissions.

use crate::safety::SafetyReport;
use crate::state::PoolState;
use crate::tentative::Tentative;
use banker_config::PoolManifest;
use banker_errors::{AllocationError, Error, PoolError};
use banker_events::{AppEvent, EventEmitter, EventSender, PoolEvent};
use banker_types::{Grant, PoolSnapshot, ProcessClaim, ProcessId, ResourceVector};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handle to a pool. Clones share the same state and lock.
#[derive(Debug, Clone)]
pub struct ResourcePool {
    state: Arc<Mutex<PoolState>>,
    kinds: usize,
    tx: Option<EventSender>,
    correlation: Option<Arc<str>>,
}

impl EventEmitter for ResourcePool {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }

    fn correlation_id(&self) -> Option<&str> {
        self.correlation.as_deref()
    }
}

impl ResourcePool {
    /// Create a pool with `total` capacity and the given processes, whose
    /// ids are their positions in `processes`.
    ///
    /// # Errors
    ///
    /// Returns an error if any vector's length differs from `total`'s, if a
    /// process holds more than its maximum, or if initial allocations do
    /// not fit in `total`.
    pub fn new(total: ResourceVector, processes: Vec<ProcessClaim>) -> Result<Self, Error> {
        let state = PoolState::new(total, processes)?;
        Ok(Self {
            kinds: state.kinds(),
            state: Arc::new(Mutex::new(state)),
            tx: None,
            correlation: None,
        })
    }

    /// Create a pool from a manifest
    ///
    /// # Errors
    ///
    /// See [`ResourcePool::new`].
    pub fn from_manifest(manifest: &PoolManifest) -> Result<Self, Error> {
        Self::new(manifest.total.clone(), manifest.processes.clone())
    }

    /// Attach an event sender; the pool announces its initial layout on it.
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        if let Ok(state) = self.state.try_lock() {
            let event = AppEvent::Pool(PoolEvent::Initialized {
                total: state.total.clone(),
                available: state.available.clone(),
                processes: state.processes.len(),
            });
            drop(state);
            self.emit(event);
        }
        self
    }

    /// Tag every event sent through this handle with `id`. Other clones
    /// keep their own correlation id.
    #[must_use]
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation = Some(Arc::from(id.into()));
        self
    }

    /// Number of resource kinds
    #[must_use]
    pub fn kinds(&self) -> usize {
        self.kinds
    }

    /// Request resources on behalf of `process`.
    ///
    /// Under the pool lock: reject requests beyond the process's remaining
    /// need, then requests beyond what is free; otherwise apply the request
    /// tentatively, run the safety check, and commit if safe or roll back
    /// exactly if not.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::UnknownProcess`] for an id outside the table
    /// - [`PoolError::DimensionMismatch`] for a wrongly sized vector
    /// - [`AllocationError::ExceedsClaim`] if `request > need` for any kind
    /// - [`AllocationError::InsufficientResources`] if `request > available`
    /// - [`AllocationError::UnsafeState`] if granting leaves no safe sequence
    pub async fn request(
        &self,
        process: ProcessId,
        request: &ResourceVector,
    ) -> Result<Grant, Error> {
        let outcome = {
            let mut state = self.state.lock().await;
            self.evaluate_request(&mut state, process, request)
        };

        match &outcome {
            Ok((grant, available)) => self.emit_granted(grant, available),
            Err(Error::Allocation(err)) => self.emit_denied(process, request, err),
            Err(err) => self.emit_error_with_details(
                format!("request by {process} failed"),
                err.to_string(),
            ),
        }
        outcome.map(|(grant, _)| grant)
    }

    fn evaluate_request(
        &self,
        state: &mut PoolState,
        process: ProcessId,
        request: &ResourceVector,
    ) -> Result<(Grant, ResourceVector), Error> {
        let index = state.position(process)?;
        request.ensure_kinds(self.kinds, "request")?;

        let tentative = Tentative::apply(state, index, request)?;
        let report = tentative.state().safety();
        if !report.safe {
            // Dropping `tentative` restores the prior state.
            return Err(AllocationError::UnsafeState {
                process: index,
                requested: request.as_slice().to_vec(),
                safe_prefix: report.sequence.iter().map(|id| id.index()).collect(),
                blocked: report.blocked.iter().map(|id| id.index()).collect(),
            }
            .into());
        }
        let available = tentative.state().available.clone();
        tentative.commit();

        Ok((
            Grant {
                process,
                granted: request.clone(),
                safe_sequence: report.sequence,
            },
            available,
        ))
    }

    /// Return resources held by `process` to the pool.
    ///
    /// Needs no safety check: giving resources back cannot make a safe
    /// state unsafe.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::UnknownProcess`] for an id outside the table
    /// - [`PoolError::DimensionMismatch`] for a wrongly sized vector
    /// - [`AllocationError::InvalidRelease`] if `release > allocated` for
    ///   any kind; nothing changes in that case
    pub async fn release(&self, process: ProcessId, release: &ResourceVector) -> Result<(), Error> {
        let outcome = {
            let mut state = self.state.lock().await;
            self.apply_release(&mut state, process, release)
        };

        match &outcome {
            Ok(available) => self.emit_released(process, release, available),
            Err(Error::Allocation(err)) => self.emit_release_rejected(process, release, err),
            Err(err) => self.emit_error_with_details(
                format!("release by {process} failed"),
                err.to_string(),
            ),
        }
        outcome.map(|_| ())
    }

    fn apply_release(
        &self,
        state: &mut PoolState,
        process: ProcessId,
        release: &ResourceVector,
    ) -> Result<ResourceVector, Error> {
        let index = state.position(process)?;
        release.ensure_kinds(self.kinds, "release")?;

        let invalid = || AllocationError::InvalidRelease {
            process: index,
            released: release.as_slice().to_vec(),
            allocated: state.processes[index].allocated.as_slice().to_vec(),
        };

        let available = state.available.checked_add(release).ok_or_else(invalid)?;
        let mut record = state.processes[index].clone();
        if !record.relinquish(release) {
            return Err(invalid().into());
        }

        state.processes[index] = record;
        state.available = available;
        Ok(state.available.clone())
    }

    /// Add capacity: `additional` goes into both `total` and `available`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::DimensionMismatch`] for a wrongly sized vector
    /// and [`PoolError::CapacityOverflow`] if a counter would overflow; the
    /// pool is unchanged in both cases.
    pub async fn grow(&self, additional: &ResourceVector) -> Result<(), Error> {
        additional.ensure_kinds(self.kinds, "growth")?;

        let (total, available) = {
            let mut state = self.state.lock().await;
            let total = grown(&state.total, additional)?;
            let available = grown(&state.available, additional)?;
            state.total = total;
            state.available = available;
            (state.total.clone(), state.available.clone())
        };

        self.emit_grown(additional, &total, &available);
        Ok(())
    }

    /// A consistent copy of the whole pool
    pub async fn snapshot(&self) -> PoolSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Run the safety check against the current state
    pub async fn safety(&self) -> SafetyReport {
        self.state.lock().await.safety()
    }

    /// Verify bookkeeping invariants under the lock
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvariantViolation`] naming the offending
    /// process (if any) with observed and expected values.
    pub async fn check_invariants(&self) -> Result<(), Error> {
        self.state
            .lock()
            .await
            .check_invariants()
            .map_err(Into::into)
    }

    /// Mutate the state directly, bypassing every check.
    #[cfg(test)]
    pub(crate) async fn corrupt(&self, f: impl FnOnce(&mut PoolState)) {
        f(&mut *self.state.lock().await);
    }
}

fn grown(current: &ResourceVector, additional: &ResourceVector) -> Result<ResourceVector, PoolError> {
    current.checked_add(additional).ok_or_else(|| {
        let kind = current
            .iter()
            .zip(additional.iter())
            .position(|(c, a)| c.checked_add(a).is_none())
            .unwrap_or_default();
        PoolError::CapacityOverflow { kind }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> ResourcePool {
        ResourcePool::from_manifest(&PoolManifest::classic()).unwrap()
    }

    #[tokio::test]
    async fn test_request_emits_granted_after_commit() {
        let (tx, mut rx) = banker_events::channel();
        let pool = classic().with_event_sender(tx);

        let init = rx.recv().await.unwrap();
        assert!(matches!(
            init.event,
            AppEvent::Pool(PoolEvent::Initialized { processes: 5, .. })
        ));

        pool.request(ProcessId(1), &[1, 0, 2].into()).await.unwrap();
        let message = rx.recv().await.unwrap();
        assert!(matches!(
            message.event,
            AppEvent::Allocation(banker_events::AllocationEvent::Granted { .. })
        ));
    }

    #[tokio::test]
    async fn test_correlation_id_tags_only_its_handle() {
        let (tx, mut rx) = banker_events::channel();
        let pool = classic().with_event_sender(tx);
        let init = rx.recv().await.unwrap();
        assert_eq!(init.meta.correlation_id, None);

        let step = pool.clone().with_correlation_id("step-3");
        step.request(ProcessId(1), &[1, 0, 2].into()).await.unwrap();
        let tagged = rx.recv().await.unwrap();
        assert_eq!(tagged.meta.correlation_id.as_deref(), Some("step-3"));

        pool.release(ProcessId(1), &[1, 0, 0].into()).await.unwrap();
        let untagged = rx.recv().await.unwrap();
        assert!(matches!(
            untagged.event,
            AppEvent::Allocation(banker_events::AllocationEvent::Released { .. })
        ));
        assert_eq!(untagged.meta.correlation_id, None);
    }

    #[tokio::test]
    async fn test_grow_overflow_leaves_pool_unchanged() {
        let pool = classic();
        let before = pool.snapshot().await;
        let err = pool
            .grow(&[0, u32::MAX, 0].into())
            .await
            .unwrap_err();
        assert_eq!(err, Error::Pool(PoolError::CapacityOverflow { kind: 1 }));
        assert_eq!(pool.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_release_dimension_mismatch_is_fatal() {
        let pool = classic();
        let err = pool.release(ProcessId(0), &[0, 1].into()).await.unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            Error::Pool(PoolError::DimensionMismatch { expected: 3, actual: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_corruption_visible_to_check() {
        let pool = classic();
        pool.corrupt(|state| state.processes[0].allocated = [8, 1, 0].into())
            .await;
        let err = pool.check_invariants().await.unwrap_err();
        assert!(err.is_fatal());
    }
}

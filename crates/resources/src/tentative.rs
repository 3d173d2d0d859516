//! Speculative allocation with exact rollback

use crate::state::PoolState;
use banker_errors::AllocationError;
use banker_types::{ProcessRecord, ResourceVector};

/// A request applied to the pool but not yet committed.
///
/// Holding a `Tentative` means holding `&mut PoolState`, which is only
/// reachable through the pool lock, so nothing else can observe the
/// speculative state. Dropping it without [`Tentative::commit`] restores
/// `available`, `allocated` and `need` to exactly their prior values.
pub(crate) struct Tentative<'a> {
    state: &'a mut PoolState,
    index: usize,
    prior_available: ResourceVector,
    prior_record: ProcessRecord,
    committed: bool,
}

impl<'a> Tentative<'a> {
    /// Check the request against the process's remaining need, then against
    /// what is free, and apply it.
    ///
    /// The need check comes first: asking beyond the declared claim is a
    /// contract violation regardless of what the pool holds.
    pub(crate) fn apply(
        state: &'a mut PoolState,
        index: usize,
        request: &ResourceVector,
    ) -> Result<Self, AllocationError> {
        let record = &state.processes[index];
        if !request.fits_within(&record.need) {
            return Err(AllocationError::ExceedsClaim {
                process: index,
                requested: request.as_slice().to_vec(),
                need: record.need.as_slice().to_vec(),
            });
        }

        let Some(available) = state.available.checked_sub(request) else {
            return Err(AllocationError::InsufficientResources {
                process: index,
                requested: request.as_slice().to_vec(),
                available: state.available.as_slice().to_vec(),
            });
        };

        let prior_record = record.clone();
        let mut updated = prior_record.clone();
        if !updated.acquire(request) {
            return Err(AllocationError::ExceedsClaim {
                process: index,
                requested: request.as_slice().to_vec(),
                need: prior_record.need.as_slice().to_vec(),
            });
        }

        let prior_available = std::mem::replace(&mut state.available, available);
        state.processes[index] = updated;

        Ok(Self {
            state,
            index,
            prior_available,
            prior_record,
            committed: false,
        })
    }

    /// The pool as it would look if the request were granted
    pub(crate) fn state(&self) -> &PoolState {
        self.state
    }

    /// Keep the speculative state
    pub(crate) fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Tentative<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        std::mem::swap(&mut self.state.available, &mut self.prior_available);
        std::mem::swap(&mut self.state.processes[self.index], &mut self.prior_record);
    }
}

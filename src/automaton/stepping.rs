//! Data-parallel generation update.
//!
//! Every cell of `current` is a pure function of the `previous` snapshot, so
//! cells may be written in any order and from any worker without locking.

use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPool;

use super::buffers::GridBuffers;
use super::grid::Dimensions;
use super::rule::NeighborRule;
use crate::jobs::{JobHandle, JobSlot};

/// Minimum cells per rayon task when splitting a generation.
const MIN_CELLS_PER_TASK: usize = 64;

/// Compute one generation of `current` from `previous`.
///
/// Any non-zero state in `previous` is alive; `current` receives `0`/`1`.
pub fn apply_generation(dims: &Dimensions, rule: &NeighborRule, previous: &[u8], current: &mut [u8]) {
    debug_assert_eq!(previous.len(), dims.cell_count());
    debug_assert_eq!(current.len(), dims.cell_count());

    current
        .par_iter_mut()
        .with_min_len(MIN_CELLS_PER_TASK)
        .enumerate()
        .for_each(|(index, cell)| *cell = rule.evaluate(dims, previous, index));
}

/// Schedules [`apply_generation`] on the worker pool, one generation at a time.
pub struct UpdateKernel {
    pool: Arc<ThreadPool>,
    slot: JobSlot<Vec<u8>>,
}

impl UpdateKernel {
    pub fn new(pool: Arc<ThreadPool>) -> Self {
        UpdateKernel {
            pool,
            slot: JobSlot::new("update kernel"),
        }
    }

    /// True while a generation is being computed.
    pub fn is_scheduled(&self) -> bool {
        self.slot.is_scheduled()
    }

    /// Start computing the next generation into `buffers.current` from the
    /// current `buffers.previous` snapshot. Returns immediately.
    ///
    /// # Panics
    /// If a previous schedule has not been completed.
    pub fn schedule(&mut self, buffers: &mut GridBuffers, rule: NeighborRule) {
        assert!(
            !self.slot.is_scheduled(),
            "update kernel scheduled while a previous schedule is still outstanding"
        );
        let dims = *buffers.dims();
        let previous = buffers.snapshot();
        let mut current = buffers.lend_current();

        let handle = JobHandle::spawn(&self.pool, move || {
            apply_generation(&dims, &rule, &previous, &mut current);
            current
        });
        self.slot.schedule(handle);
    }

    /// Block until the outstanding generation is written and give `current`
    /// back to `buffers`. Returns false if nothing was scheduled.
    pub fn complete(&mut self, buffers: &mut GridBuffers) -> bool {
        match self.slot.complete() {
            Some(current) => {
                buffers.return_current(current);
                true
            }
            None => false,
        }
    }
}

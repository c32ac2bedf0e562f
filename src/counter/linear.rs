//! Flat partitioned sum.

use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPool;

use super::{AliveCounter, CounterKind};
use crate::jobs::{JobHandle, JobSlot};

/// Splits the grid into `ceil(cell_count / chunk)` disjoint ranges, sums each
/// range on its own worker into one slot, and adds the slots on completion.
pub struct LinearCounter {
    pool: Arc<ThreadPool>,
    cell_count: usize,
    chunk: usize,
    /// Per-partition sums; lent to the job while a count is in flight.
    sums: Option<Vec<usize>>,
    slot: JobSlot<Vec<usize>>,
}

impl LinearCounter {
    pub fn new(cell_count: usize, chunk: usize, pool: Arc<ThreadPool>) -> Self {
        assert!(chunk > 0, "reduction chunk must be >= 1");
        let partitions = cell_count.div_ceil(chunk).max(1);
        LinearCounter {
            pool,
            cell_count,
            chunk,
            sums: Some(vec![0; partitions]),
            slot: JobSlot::new("linear alive counter"),
        }
    }

    pub fn partitions(&self) -> usize {
        self.cell_count.div_ceil(self.chunk).max(1)
    }
}

impl AliveCounter for LinearCounter {
    fn kind(&self) -> CounterKind {
        CounterKind::Linear
    }

    fn is_scheduled(&self) -> bool {
        self.slot.is_scheduled()
    }

    fn schedule(&mut self, snapshot: Arc<[u8]>) {
        assert!(
            !self.slot.is_scheduled(),
            "linear alive counter scheduled while a previous count is still outstanding"
        );
        assert_eq!(
            snapshot.len(),
            self.cell_count,
            "snapshot size does not match the counter"
        );
        let chunk = self.chunk;
        let mut sums = self
            .sums
            .take()
            .expect("partition sums are owned by the counter when idle");

        let handle = JobHandle::spawn(&self.pool, move || {
            sums.par_iter_mut()
                .zip(snapshot.par_chunks(chunk))
                .for_each(|(sum, range)| *sum = range.iter().map(|&c| c as usize).sum());
            sums
        });
        self.slot.schedule(handle);
    }

    fn complete(&mut self) -> Option<usize> {
        let sums = self.slot.complete()?;
        let total = sums.iter().sum();
        self.sums = Some(sums);
        Some(total)
    }
}

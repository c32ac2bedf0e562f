//! Tree reduction with a deferred root merge.

use std::sync::Arc;

use rayon::ThreadPool;

use super::tree::{sum_into, Merge, ReductionTree};
use super::{AliveCounter, CounterKind};
use crate::jobs::{JobHandle, JobSlot};

type MergeBuffers = (Vec<u32>, Vec<u32>, Vec<u32>);

/// Same tree and level barriers as [`super::BinaryTreeCounter`], except that
/// the final root merge is spawned instead of waited on. `schedule` returns
/// while that merge is still running; `complete` waits for it.
pub struct ParallelBinaryTreeCounter {
    pool: Arc<ThreadPool>,
    tree: ReductionTree,
    /// Set while a count with a single-leaf tree is pending (no root merge).
    pending_without_merge: bool,
    root_merge: JobSlot<MergeBuffers>,
}

impl ParallelBinaryTreeCounter {
    pub fn new(cell_count: usize, chunk: usize, pool: Arc<ThreadPool>) -> Self {
        ParallelBinaryTreeCounter {
            pool,
            tree: ReductionTree::new(cell_count, chunk),
            pending_without_merge: false,
            root_merge: JobSlot::new("parallel binary tree root merge"),
        }
    }

    pub fn tree(&self) -> &ReductionTree {
        &self.tree
    }

    fn root_merge(&self) -> Option<Merge> {
        self.tree.root_merge()
    }
}

impl AliveCounter for ParallelBinaryTreeCounter {
    fn kind(&self) -> CounterKind {
        CounterKind::ParallelBinaryTree
    }

    fn is_scheduled(&self) -> bool {
        self.pending_without_merge || self.root_merge.is_scheduled()
    }

    fn schedule(&mut self, snapshot: Arc<[u8]>) {
        assert!(
            !self.is_scheduled(),
            "parallel binary tree alive counter scheduled while a previous count is still outstanding"
        );
        let tree = &mut self.tree;
        self.pool.install(|| {
            tree.load_leaves(&snapshot);
            // Every level but the root's.
            tree.merge_levels(tree.depth().saturating_sub(1));
        });

        match self.root_merge() {
            Some(merge) => {
                let (left, right, mut parent) = self.tree.take_merge_buffers(merge);
                let handle = JobHandle::spawn(&self.pool, move || {
                    sum_into(&mut parent, &left, &right);
                    (left, right, parent)
                });
                self.root_merge.schedule(handle);
            }
            None => self.pending_without_merge = true,
        }
    }

    fn complete(&mut self) -> Option<usize> {
        if let Some(buffers) = self.root_merge.complete() {
            let merge = self
                .root_merge()
                .expect("root merge job exists only for trees with a root merge");
            self.tree.restore_merge_buffers(merge, buffers);
            return Some(self.tree.root_total());
        }
        if self.pending_without_merge {
            self.pending_without_merge = false;
            return Some(self.tree.root_total());
        }
        None
    }
}

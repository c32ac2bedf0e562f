//! Level-synchronous tree reduction.

use std::sync::Arc;

use rayon::ThreadPool;

use super::tree::ReductionTree;
use super::{AliveCounter, CounterKind};

/// Loads the grid into the tree's leaves and merges it level by level inside
/// `schedule`, waiting for each level before starting the next. The merge
/// order is fixed by the tree, so `complete` only adds up the root.
pub struct BinaryTreeCounter {
    pool: Arc<ThreadPool>,
    tree: ReductionTree,
    pending: bool,
}

impl BinaryTreeCounter {
    pub fn new(cell_count: usize, chunk: usize, pool: Arc<ThreadPool>) -> Self {
        BinaryTreeCounter {
            pool,
            tree: ReductionTree::new(cell_count, chunk),
            pending: false,
        }
    }

    pub fn tree(&self) -> &ReductionTree {
        &self.tree
    }
}

impl AliveCounter for BinaryTreeCounter {
    fn kind(&self) -> CounterKind {
        CounterKind::BinaryTree
    }

    fn is_scheduled(&self) -> bool {
        self.pending
    }

    fn schedule(&mut self, snapshot: Arc<[u8]>) {
        assert!(
            !self.pending,
            "binary tree alive counter scheduled while a previous count is still outstanding"
        );
        let tree = &mut self.tree;
        self.pool.install(|| {
            tree.load_leaves(&snapshot);
            tree.merge_levels(tree.depth());
        });
        self.pending = true;
    }

    fn complete(&mut self) -> Option<usize> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        Some(self.tree.root_total())
    }
}

//! Alive-cell counting by parallel reduction.
//!
//! All strategies share the same contract: [`AliveCounter::schedule`] starts a
//! count over an immutable snapshot and [`AliveCounter::complete`] blocks until
//! the exact number of alive cells is known. Only one count may be in flight
//! per counter.
//!
//! | strategy | `schedule` | `complete` |
//! |---|---|---|
//! | [`LinearCounter`] | spawns one sum per partition, returns at once | waits, adds partition sums |
//! | [`BinaryTreeCounter`] | loads leaves, merges every level with a barrier | adds the root buffer |
//! | [`ParallelBinaryTreeCounter`] | as above, but spawns the root merge | waits for the root merge, adds the root buffer |

pub mod binary_tree;
pub mod linear;
pub mod parallel_tree;
pub mod tree;

use std::fmt;
use std::sync::Arc;

use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

pub use binary_tree::BinaryTreeCounter;
pub use linear::LinearCounter;
pub use parallel_tree::ParallelBinaryTreeCounter;
pub use tree::ReductionTree;

pub trait AliveCounter: Send {
    fn kind(&self) -> CounterKind;

    /// True between `schedule` and `complete`.
    fn is_scheduled(&self) -> bool;

    /// Begin counting the alive cells of `snapshot`.
    ///
    /// # Panics
    /// If a previous count has not been completed, or if `snapshot` does not
    /// match the grid size the counter was built for.
    fn schedule(&mut self, snapshot: Arc<[u8]>);

    /// Block until the scheduled count finishes. `None` when nothing was
    /// scheduled.
    fn complete(&mut self) -> Option<usize>;

    /// Schedule and complete in one call.
    fn count(&mut self, snapshot: Arc<[u8]>) -> usize {
        self.schedule(snapshot);
        self.complete()
            .expect("a count scheduled just now must complete with a value")
    }
}

/// Counting strategy, selected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    #[default]
    Linear,
    BinaryTree,
    ParallelBinaryTree,
}

impl CounterKind {
    pub const ALL: [CounterKind; 3] = [
        CounterKind::Linear,
        CounterKind::BinaryTree,
        CounterKind::ParallelBinaryTree,
    ];

    /// Build a counter of this kind for a grid of `cell_count` cells split
    /// into partitions of `chunk` cells.
    pub fn build(
        self,
        cell_count: usize,
        chunk: usize,
        pool: Arc<ThreadPool>,
    ) -> Box<dyn AliveCounter> {
        match self {
            CounterKind::Linear => Box::new(LinearCounter::new(cell_count, chunk, pool)),
            CounterKind::BinaryTree => Box::new(BinaryTreeCounter::new(cell_count, chunk, pool)),
            CounterKind::ParallelBinaryTree => {
                Box::new(ParallelBinaryTreeCounter::new(cell_count, chunk, pool))
            }
        }
    }
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CounterKind::Linear => "linear",
            CounterKind::BinaryTree => "binary tree",
            CounterKind::ParallelBinaryTree => "parallel binary tree",
        };
        f.write_str(name)
    }
}

//! Reduction tree shared by the binary-tree counters.
//!
//! The tree is built once by draining a FIFO queue: the first two nodes are
//! merged under a new parent which goes to the back of the queue, until one
//! node remains. With an odd number of nodes waiting, the last one is carried
//! into the next round unmerged, so the shape is a greedy queue merge and not a
//! perfect binary tree.
//!
//! Every node owns a `chunk`-sized buffer. Leaves hold one slice of the grid
//! (the last leaf is zero padded); an internal node holds the element-wise sum
//! of its children. The sum of the root's elements is the alive count.

use std::collections::VecDeque;
use std::mem;

use rayon::prelude::*;
use tracing::trace;

/// Minimum elements per rayon task for copies and element-wise sums.
const MIN_ELEMENTS_PER_TASK: usize = 256;

/// One element-wise sum: `nodes[parent] = nodes[left] + nodes[right]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    pub left: usize,
    pub right: usize,
    pub parent: usize,
}

pub struct ReductionTree {
    chunk: usize,
    cell_count: usize,
    leaf_count: usize,
    nodes: Vec<Vec<u32>>,
    /// Merges grouped by level. A merge's level is one more than the deeper
    /// of its children; leaves are level 0. All merges of one level only
    /// read buffers written by earlier levels.
    levels: Vec<Vec<Merge>>,
    root: usize,
}

impl ReductionTree {
    /// Build the tree for `cell_count` cells split into `chunk`-sized leaves.
    ///
    /// Callers validate `chunk >= 1` and `cell_count >= 1`. A chunk larger
    /// than the grid is clamped to `cell_count`, so [`ReductionTree::chunk`]
    /// may be smaller than the requested value.
    pub fn new(cell_count: usize, chunk: usize) -> Self {
        assert!(chunk > 0, "reduction chunk must be >= 1");
        let chunk = chunk.min(cell_count.max(1));
        let leaf_count = cell_count.div_ceil(chunk).max(1);

        let mut nodes: Vec<Vec<u32>> = (0..leaf_count).map(|_| vec![0; chunk]).collect();
        let mut node_levels = vec![0usize; leaf_count];
        let mut merges = Vec::with_capacity(leaf_count.saturating_sub(1));

        let mut queue: VecDeque<usize> = (0..leaf_count).collect();
        while queue.len() > 1 {
            let (Some(left), Some(right)) = (queue.pop_front(), queue.pop_front()) else {
                unreachable!("queue holds at least two nodes");
            };
            let parent = nodes.len();
            nodes.push(vec![0; chunk]);
            node_levels.push(node_levels[left].max(node_levels[right]) + 1);
            merges.push(Merge {
                left,
                right,
                parent,
            });
            queue.push_back(parent);
        }
        let root = queue.pop_front().unwrap_or(0);

        let depth = node_levels[root];
        let mut levels = vec![Vec::new(); depth];
        for merge in merges {
            levels[node_levels[merge.parent] - 1].push(merge);
        }

        ReductionTree {
            chunk,
            cell_count,
            leaf_count,
            nodes,
            levels,
            root,
        }
    }

    pub fn chunk(&self) -> usize {
        self.chunk
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Leaves plus internal nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of barrier-separated merge levels.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn level(&self, level: usize) -> &[Merge] {
        &self.levels[level]
    }

    /// Copy the grid into the leaf buffers, zero padding the last leaf.
    pub fn load_leaves(&mut self, cells: &[u8]) {
        assert_eq!(
            cells.len(),
            self.cell_count,
            "reduction tree built for a different grid size"
        );
        let chunk = self.chunk;
        let leaf_count = self.leaf_count;
        self.nodes[..leaf_count]
            .par_iter_mut()
            .enumerate()
            .for_each(|(leaf, values)| {
                let start = (leaf * chunk).min(cells.len());
                let end = (start + chunk).min(cells.len());
                let slice = &cells[start..end];
                for (value, &cell) in values.iter_mut().zip(slice) {
                    *value = u32::from(cell);
                }
                values[slice.len()..].fill(0);
            });
    }

    /// Run every merge of one level in parallel and return once all are done.
    pub fn merge_level(&mut self, level: usize) {
        let merges = &self.levels[level];
        trace!(level, merges = merges.len(), "merging reduction level");

        let mut outputs: Vec<Vec<u32>> = merges
            .iter()
            .map(|merge| mem::take(&mut self.nodes[merge.parent]))
            .collect();
        let nodes = &self.nodes;
        outputs
            .par_iter_mut()
            .zip(merges.par_iter())
            .for_each(|(output, merge)| {
                sum_into(output, &nodes[merge.left], &nodes[merge.right]);
            });
        for (merge, output) in merges.iter().zip(outputs) {
            self.nodes[merge.parent] = output;
        }
    }

    /// Merge levels `0..levels` in order, with a barrier after each level.
    pub fn merge_levels(&mut self, levels: usize) {
        for level in 0..levels.min(self.depth()) {
            self.merge_level(level);
        }
    }

    /// Move the buffers of one merge out of the tree so the merge can run as
    /// a standalone job. Returned as `(left, right, parent)`.
    pub fn take_merge_buffers(&mut self, merge: Merge) -> (Vec<u32>, Vec<u32>, Vec<u32>) {
        (
            mem::take(&mut self.nodes[merge.left]),
            mem::take(&mut self.nodes[merge.right]),
            mem::take(&mut self.nodes[merge.parent]),
        )
    }

    /// Put buffers taken by [`ReductionTree::take_merge_buffers`] back.
    pub fn restore_merge_buffers(&mut self, merge: Merge, buffers: (Vec<u32>, Vec<u32>, Vec<u32>)) {
        let (left, right, parent) = buffers;
        self.nodes[merge.left] = left;
        self.nodes[merge.right] = right;
        self.nodes[merge.parent] = parent;
    }

    /// The final merge, if the tree has more than one leaf.
    pub fn root_merge(&self) -> Option<Merge> {
        self.levels.last().and_then(|level| level.first().copied())
    }

    /// Sum of the root buffer's elements.
    pub fn root_total(&self) -> usize {
        let root = &self.nodes[self.root];
        debug_assert_eq!(root.len(), self.chunk, "root buffer is checked out");
        root.iter().map(|&v| v as usize).sum()
    }
}

/// `output[i] = left[i] + right[i]` for every element.
pub fn sum_into(output: &mut [u32], left: &[u32], right: &[u32]) {
    output
        .par_iter_mut()
        .with_min_len(MIN_ELEMENTS_PER_TASK)
        .zip(left.par_iter().zip(right.par_iter()))
        .for_each(|(out, (&l, &r))| *out = l + r);
}

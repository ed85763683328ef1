//! Histogram-based regression tree growth.
//!
//! Nodes are expanded best-first: the open leaf whose best split has the
//! largest gain is split next. Without a leaf limit this yields the same
//! tree as level-by-level growth. The node array is append-only, so child
//! indices are always greater than their parent's.

use automl_api::TreeParams;
use automl_spi::{RegressionTree, TreeNode};

use crate::binning::BinnedMatrix;

/// Splits must reduce squared error by more than this.
const MIN_SPLIT_GAIN: f64 = 1e-12;

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    bin: usize,
    gain: f64,
}

#[derive(Debug)]
struct OpenLeaf {
    node: usize,
    start: usize,
    end: usize,
    depth: usize,
    split: SplitCandidate,
}

/// Grows regression trees over a binned feature matrix.
#[derive(Debug, Clone, Copy)]
pub struct TreeGrower<'a> {
    bins: &'a BinnedMatrix,
    params: TreeParams,
}

impl<'a> TreeGrower<'a> {
    pub fn new(bins: &'a BinnedMatrix, params: TreeParams) -> Self {
        Self { bins, params }
    }

    /// Fit a tree to `targets` using the rows listed in `rows`.
    ///
    /// `targets` is indexed by matrix row. `rows` may repeat an index
    /// (bootstrap samples) and is reordered in place.
    pub fn grow(&self, rows: &mut [u32], targets: &[f64]) -> RegressionTree {
        let mut nodes = vec![TreeNode::Leaf {
            value: leaf_value(rows, targets),
        }];
        if rows.is_empty() {
            return RegressionTree::new(nodes);
        }

        let mut open: Vec<OpenLeaf> = Vec::new();
        if let Some(split) = self.best_split(rows, targets, 0) {
            open.push(OpenLeaf {
                node: 0,
                start: 0,
                end: rows.len(),
                depth: 0,
                split,
            });
        }

        let mut n_leaves = 1usize;
        while !open.is_empty() {
            if matches!(self.params.max_leaves, Some(limit) if n_leaves >= limit) {
                break;
            }

            let pick = best_open_leaf(&open);
            let leaf = open.remove(pick);
            let SplitCandidate { feature, bin, .. } = leaf.split;

            let column = self.bins.column(feature);
            let segment = &mut rows[leaf.start..leaf.end];
            let n_left = partition(segment, |r| (column[r as usize] as usize) <= bin);
            let mid = leaf.start + n_left;

            let left = nodes.len();
            let right = left + 1;
            nodes.push(TreeNode::Leaf {
                value: leaf_value(&rows[leaf.start..mid], targets),
            });
            nodes.push(TreeNode::Leaf {
                value: leaf_value(&rows[mid..leaf.end], targets),
            });
            nodes[leaf.node] = TreeNode::Split {
                feature: feature as u32,
                threshold: self.bins.mapper(feature).threshold(bin),
                left: left as u32,
                right: right as u32,
            };
            n_leaves += 1;

            let depth = leaf.depth + 1;
            for (node, start, end) in [(left, leaf.start, mid), (right, mid, leaf.end)] {
                if let Some(split) = self.best_split(&rows[start..end], targets, depth) {
                    open.push(OpenLeaf {
                        node,
                        start,
                        end,
                        depth,
                        split,
                    });
                }
            }
        }

        RegressionTree::new(nodes)
    }

    /// Best split of a node, or `None` when it must stay a leaf.
    fn best_split(&self, rows: &[u32], targets: &[f64], depth: usize) -> Option<SplitCandidate> {
        let n = rows.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        if matches!(self.params.max_depth, Some(max) if depth >= max)
            || n < self.params.min_samples_split
            || n < 2 * min_leaf
        {
            return None;
        }

        let mut best: Option<SplitCandidate> = None;
        let mut best_gain = MIN_SPLIT_GAIN;
        let mut sums = [0.0f64; 256];
        let mut counts = [0usize; 256];

        for feature in 0..self.bins.n_features() {
            let n_bins = self.bins.mapper(feature).n_bins();
            if n_bins < 2 {
                continue;
            }

            let column = self.bins.column(feature);
            sums[..n_bins].iter_mut().for_each(|s| *s = 0.0);
            counts[..n_bins].iter_mut().for_each(|c| *c = 0);
            let mut total = 0.0;
            for &r in rows {
                let b = column[r as usize] as usize;
                let y = targets[r as usize];
                sums[b] += y;
                counts[b] += 1;
                total += y;
            }

            let mut left_sum = 0.0;
            let mut left_count = 0usize;
            for bin in 0..n_bins - 1 {
                left_sum += sums[bin];
                left_count += counts[bin];
                let right_count = n - left_count;
                if left_count < min_leaf {
                    continue;
                }
                if right_count < min_leaf {
                    break;
                }
                if counts[bin] == 0 {
                    continue;
                }

                let left_mean = left_sum / left_count as f64;
                let right_mean = (total - left_sum) / right_count as f64;
                let diff = left_mean - right_mean;
                let gain = (left_count as f64 * right_count as f64 / n as f64) * diff * diff;
                if gain > best_gain {
                    best_gain = gain;
                    best = Some(SplitCandidate { feature, bin, gain });
                }
            }
        }

        best
    }
}

/// Highest gain wins; ties go to the lowest node index.
fn best_open_leaf(open: &[OpenLeaf]) -> usize {
    let mut pick = 0;
    for (i, leaf) in open.iter().enumerate().skip(1) {
        let current = &open[pick];
        if leaf.split.gain > current.split.gain
            || (leaf.split.gain == current.split.gain && leaf.node < current.node)
        {
            pick = i;
        }
    }
    pick
}

/// Move rows matching `goes_left` to the front; returns how many matched.
fn partition(rows: &mut [u32], goes_left: impl Fn(u32) -> bool) -> usize {
    let mut n_left = 0;
    for i in 0..rows.len() {
        if goes_left(rows[i]) {
            rows.swap(i, n_left);
            n_left += 1;
        }
    }
    n_left
}

fn leaf_value(rows: &[u32], targets: &[f64]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    rows.iter().map(|&r| targets[r as usize]).sum::<f64>() / rows.len() as f64
}

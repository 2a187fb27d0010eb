//! Regression trees.
//!
//! # Node Format
//!
//! ```json
//! { "n_nodes": 3, "nodes": [
//!   { "feature": 4, "threshold": 812.5, "left": 1, "right": 2, "value": null },
//!   { "feature": -1, "threshold": 0.0, "left": -1, "right": -1, "value": 790.1 },
//!   { "feature": -1, "threshold": 0.0, "left": -1, "right": -1, "value": 841.7 }
//! ]}
//! ```
//!
//! # Traversal
//!
//! - Start at node 0 (root)
//! - If `feature == -1`, return the leaf `value`
//! - Else go `left` when `features[node.feature] <= threshold` or is `NaN`,
//!   otherwise go `right`
//!
//! # Growth
//!
//! Trees are grown breadth-first with exact variance-reduction splits.
//! Every feature is presorted once per forest; each level then sweeps the
//! presorted orders once, accumulating per-node statistics. Rows carry an
//! integer weight so bootstrap resamples need no copying.

use serde::{Deserialize, Serialize};

/// Minimum mean squared-error reduction per unit weight for a split.
const MIN_GAIN_PER_WEIGHT: f64 = 1e-10;
/// Marks a row that no longer reaches an open node.
const CLOSED: usize = usize::MAX;

/// A single node; leaves have `feature == -1` and a `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub feature: i32,
    pub threshold: f64,
    pub left: i32,
    pub right: i32,
    pub value: Option<f64>,
}

impl TreeNode {
    fn leaf(value: f64) -> Self {
        Self {
            feature: -1,
            threshold: 0.0,
            left: -1,
            right: -1,
            value: Some(value),
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.feature == -1
    }
}

/// A fitted regression tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

/// Serialized tree.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TreeJson {
    pub n_nodes: usize,
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Build from stored nodes, checking every index.
    ///
    /// Children must come after their parent so traversal always terminates.
    pub fn from_nodes(nodes: Vec<TreeNode>, n_features: usize) -> Result<Self, String> {
        if nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        let n_nodes = nodes.len();
        for (i, node) in nodes.iter().enumerate() {
            if node.is_leaf() {
                match node.value {
                    Some(v) if v.is_finite() => {}
                    Some(v) => return Err(format!("leaf node {i} has non-finite value {v}")),
                    None => return Err(format!("leaf node {i} missing value")),
                }
                continue;
            }
            if node.feature < 0 || node.feature as usize >= n_features {
                return Err(format!("node {i} has invalid feature index {}", node.feature));
            }
            for (side, child) in [("left", node.left), ("right", node.right)] {
                if child <= i as i32 || child as usize >= n_nodes {
                    return Err(format!("node {i} has invalid {side} child {child}"));
                }
            }
        }
        Ok(Self { nodes })
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub(crate) fn to_json(&self) -> TreeJson {
        TreeJson {
            n_nodes: self.nodes.len(),
            nodes: self.nodes.clone(),
        }
    }

    /// Leaf value reached by `features`.
    #[inline]
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            if node.is_leaf() {
                return node.value.unwrap_or(0.0);
            }
            let v = features
                .get(node.feature as usize)
                .copied()
                .unwrap_or(f64::NAN);
            idx = if v.is_nan() || v <= node.threshold {
                node.left as usize
            } else {
                node.right as usize
            };
        }
    }
}

// =============================================================================
// Growth
// =============================================================================

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Levels below the root; 0 gives a single leaf.
    pub max_depth: usize,
    /// Nodes with less total weight stay leaves.
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 5,
            min_samples_split: 2,
        }
    }
}

/// Training rows with every feature presorted ascending.
pub(crate) struct Presorted<'a, R> {
    x: &'a [R],
    y: &'a [f64],
    order: Vec<Vec<usize>>,
}

impl<'a, R: AsRef<[f64]>> Presorted<'a, R> {
    pub(crate) fn new(x: &'a [R], y: &'a [f64], n_features: usize) -> Self {
        let order = (0..n_features)
            .map(|f| {
                let mut idx: Vec<usize> = (0..x.len()).collect();
                idx.sort_by(|&a, &b| x[a].as_ref()[f].total_cmp(&x[b].as_ref()[f]));
                idx
            })
            .collect();
        Self { x, y, order }
    }

    #[inline]
    fn value(&self, row: usize, feature: usize) -> f64 {
        self.x[row].as_ref()[feature]
    }
}

/// Weighted statistics of an open node.
#[derive(Debug, Clone, Copy)]
struct Open {
    node: usize,
    weight: f64,
    sum: f64,
}

impl Open {
    fn score(&self) -> f64 {
        self.sum * self.sum / self.weight
    }
}

#[derive(Debug, Clone, Copy)]
struct Split {
    gain: f64,
    feature: usize,
    threshold: f64,
    left_weight: f64,
    left_sum: f64,
}

impl RegressionTree {
    /// Grow a tree on `data` where row `i` counts `weights[i]` times.
    pub(crate) fn grow<R: AsRef<[f64]>>(
        data: &Presorted<'_, R>,
        weights: &[u32],
        params: &TreeParams,
    ) -> Self {
        let n_features = data.order.len();
        let mut slot: Vec<usize> = weights
            .iter()
            .map(|&w| if w > 0 { 0 } else { CLOSED })
            .collect();

        let (weight, sum) = weights
            .iter()
            .zip(data.y)
            .fold((0.0, 0.0), |(w, s), (&wi, &yi)| {
                (w + wi as f64, s + wi as f64 * yi)
            });
        if weight == 0.0 {
            return Self {
                nodes: vec![TreeNode::leaf(0.0)],
            };
        }

        let mut nodes = vec![TreeNode::leaf(sum / weight)];
        let mut open = vec![Open {
            node: 0,
            weight,
            sum,
        }];

        for _depth in 0..params.max_depth {
            if open.is_empty() {
                break;
            }

            // ── Find the best split per open node ──
            let mut best: Vec<Option<Split>> = vec![None; open.len()];
            let mut left_weight = vec![0.0; open.len()];
            let mut left_sum = vec![0.0; open.len()];
            let mut last_value = vec![f64::NAN; open.len()];

            for feature in 0..n_features {
                left_weight.fill(0.0);
                left_sum.fill(0.0);
                last_value.fill(f64::NAN);

                for &row in &data.order[feature] {
                    let k = slot[row];
                    if k == CLOSED {
                        continue;
                    }
                    let v = data.value(row, feature);
                    let parent = &open[k];

                    if left_weight[k] > 0.0 && v > last_value[k] {
                        let rw = parent.weight - left_weight[k];
                        let rs = parent.sum - left_sum[k];
                        let gain = left_sum[k] * left_sum[k] / left_weight[k] + rs * rs / rw
                            - parent.score();
                        if gain > best[k].map_or(0.0, |b| b.gain) {
                            best[k] = Some(Split {
                                gain,
                                feature,
                                threshold: midpoint(last_value[k], v),
                                left_weight: left_weight[k],
                                left_sum: left_sum[k],
                            });
                        }
                    }

                    let w = weights[row] as f64;
                    left_weight[k] += w;
                    left_sum[k] += w * data.y[row];
                    last_value[k] = v;
                }
            }

            // ── Apply splits and open the children ──
            let mut next = Vec::new();
            let mut routes: Vec<Option<(usize, f64, usize)>> = vec![None; open.len()];
            for (k, parent) in open.iter().enumerate() {
                let Some(split) = best[k] else { continue };
                if (parent.weight as usize) < params.min_samples_split
                    || split.gain <= MIN_GAIN_PER_WEIGHT * parent.weight
                {
                    continue;
                }

                let left = nodes.len();
                let right_weight = parent.weight - split.left_weight;
                let right_sum = parent.sum - split.left_sum;
                nodes.push(TreeNode::leaf(split.left_sum / split.left_weight));
                nodes.push(TreeNode::leaf(right_sum / right_weight));
                nodes[parent.node] = TreeNode {
                    feature: split.feature as i32,
                    threshold: split.threshold,
                    left: left as i32,
                    right: left as i32 + 1,
                    value: None,
                };

                routes[k] = Some((split.feature, split.threshold, next.len()));
                next.push(Open {
                    node: left,
                    weight: split.left_weight,
                    sum: split.left_sum,
                });
                next.push(Open {
                    node: left + 1,
                    weight: right_weight,
                    sum: right_sum,
                });
            }

            for (row, k) in slot.iter_mut().enumerate() {
                if *k == CLOSED {
                    continue;
                }
                *k = match routes[*k] {
                    Some((feature, threshold, left)) => {
                        if data.value(row, feature) <= threshold {
                            left
                        } else {
                            left + 1
                        }
                    }
                    None => CLOSED,
                };
            }
            open = next;
        }

        Self { nodes }
    }
}

/// Threshold strictly below `hi` and at least `lo`.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo / 2.0 + hi / 2.0;
    if mid < hi { mid } else { lo }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grow(x: &[[f64; 2]], y: &[f64], max_depth: usize) -> RegressionTree {
        let data = Presorted::new(x, y, 2);
        let weights = vec![1; x.len()];
        let params = TreeParams {
            max_depth,
            ..Default::default()
        };
        RegressionTree::grow(&data, &weights, &params)
    }

    #[test]
    fn test_step_function_single_split() {
        let x: Vec<[f64; 2]> = (0..10).map(|i| [i as f64, 0.0]).collect();
        let y: Vec<f64> = (0..10).map(|i| if i < 5 { 0.0 } else { 10.0 }).collect();
        let tree = grow(&x, &y, 3);

        let root = &tree.nodes()[0];
        assert_eq!(root.feature, 0);
        assert!((root.threshold - 4.5).abs() < 1e-12);
        // Both children are pure, so nothing below them splits.
        assert_eq!(tree.nodes().len(), 3);
        assert_eq!(tree.predict(&[2.0, 0.0]), 0.0);
        assert_eq!(tree.predict(&[7.0, 0.0]), 10.0);
        assert_eq!(tree.predict(&[f64::NAN, 0.0]), 0.0);
    }

    #[test]
    fn test_depth_limit() {
        let x: Vec<[f64; 2]> = (0..32).map(|i| [i as f64, (i % 3) as f64]).collect();
        let y: Vec<f64> = (0..32).map(|i| (i * i) as f64).collect();
        assert_eq!(grow(&x, &y, 0).nodes().len(), 1);
        let tree = grow(&x, &y, 2);
        assert!(tree.n_leaves() <= 4);
        assert!(tree.n_leaves() >= 2);
    }

    #[test]
    fn test_root_leaf_is_weighted_mean() {
        let x = [[0.0, 0.0], [1.0, 0.0]];
        let y = [2.0, 8.0];
        let data = Presorted::new(&x, &y, 2);
        let params = TreeParams {
            max_depth: 0,
            ..Default::default()
        };
        let tree = RegressionTree::grow(&data, &[3, 1], &params);
        assert!((tree.predict(&[0.0, 0.0]) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_weight_rows_are_ignored() {
        let x = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
        let y = [1.0, 100.0, 1.0];
        let data = Presorted::new(&x, &y, 2);
        let tree = RegressionTree::grow(&data, &[1, 0, 1], &TreeParams::default());
        assert_eq!(tree.nodes().len(), 1);
        assert_eq!(tree.predict(&[1.0, 0.0]), 1.0);
    }

    #[test]
    fn test_from_nodes_validation() {
        let ok = vec![
            TreeNode {
                feature: 0,
                threshold: 1.0,
                left: 1,
                right: 2,
                value: None,
            },
            TreeNode::leaf(1.0),
            TreeNode::leaf(2.0),
        ];
        let tree = RegressionTree::from_nodes(ok.clone(), 1).unwrap();
        assert_eq!(tree.predict(&[5.0]), 2.0);

        assert!(RegressionTree::from_nodes(ok.clone(), 0).unwrap_err().contains("feature"));

        let mut cyclic = ok.clone();
        cyclic[0].left = 0;
        assert!(RegressionTree::from_nodes(cyclic, 1).unwrap_err().contains("left child"));

        let mut missing = ok;
        missing[2].value = None;
        assert!(RegressionTree::from_nodes(missing, 1).unwrap_err().contains("missing value"));

        assert!(RegressionTree::from_nodes(Vec::new(), 1).is_err());
    }

    #[test]
    fn test_midpoint_never_reaches_upper() {
        assert_eq!(midpoint(1.0, 3.0), 2.0);
        let lo = 1.0_f64;
        let hi = f64::from_bits(lo.to_bits() + 1);
        assert!(midpoint(lo, hi) < hi);
    }
}

//! Proximity queries over a [`KdTree`].
//!
//! All queries measure squared Euclidean distance and prune a subtree when
//! the query's gap to the splitting hyperplane already exceeds the current
//! search radius. Traversal uses an explicit stack, so degenerate (chain
//! shaped) trees cannot overflow the call stack.

use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use super::{KdTree, NodeId};
use crate::distance::squared_euclidean;

impl<T> KdTree<T> {
    /// Nearest node to `query` and its squared distance.
    ///
    /// Returns `None` only for an empty tree. Among equidistant nodes the
    /// first one reached wins.
    pub fn nearest(&self, query: &[f64]) -> Option<(NodeId, f64)> {
        let mut best: Option<(NodeId, f64)> = None;
        self.walk_pruned(query, |id, dist| {
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((id, dist));
            }
            best.map_or(f64::INFINITY, |(_, d)| d)
        });
        best
    }

    /// Up to `k` nearest nodes, ascending by squared distance.
    pub fn k_nearest(&self, query: &[f64], k: usize) -> Vec<(NodeId, f64)> {
        if k == 0 {
            return Vec::new();
        }

        // Max-heap: the worst of the current k sits on top.
        let mut heap: BinaryHeap<(OrderedFloat<f64>, NodeId)> = BinaryHeap::with_capacity(k + 1);
        self.walk_pruned(query, |id, dist| {
            if heap.len() < k {
                heap.push((OrderedFloat(dist), id));
            } else if heap.peek().is_some_and(|(worst, _)| dist < worst.0) {
                heap.pop();
                heap.push((OrderedFloat(dist), id));
            }

            if heap.len() < k {
                f64::INFINITY
            } else {
                heap.peek().map_or(f64::INFINITY, |(worst, _)| worst.0)
            }
        });

        heap.into_sorted_vec()
            .into_iter()
            .map(|(d, id)| (id, d.0))
            .collect()
    }

    /// All nodes within Euclidean distance `radius` of `query` (inclusive).
    ///
    /// Distances in the result are squared, ascending.
    pub fn within_radius(&self, query: &[f64], radius: f64) -> Vec<(NodeId, f64)> {
        if radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }

        let limit = radius * radius;
        let mut found = Vec::new();
        self.walk_pruned(query, |id, dist| {
            if dist <= limit {
                found.push((id, dist));
            }
            limit
        });

        found.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        found
    }

    /// Depth-first walk, nearer side first.
    ///
    /// `visit` receives each reached node with its squared distance and
    /// returns the squared radius beyond which subtrees may be skipped.
    fn walk_pruned<F>(&self, query: &[f64], mut visit: F)
    where
        F: FnMut(NodeId, f64) -> f64,
    {
        let Some(root) = self.root() else {
            return;
        };

        let mut limit = f64::INFINITY;
        // (node, lower bound on squared distance to anything in its subtree)
        let mut stack: Vec<(NodeId, f64)> = vec![(root, 0.0)];

        while let Some((id, bound)) = stack.pop() {
            if bound > limit {
                continue;
            }

            let node = &self.nodes[id.0];
            limit = visit(id, squared_euclidean(&node.data, query));

            let d = node.discriminator;
            let Some(diff) = query.get(d).zip(node.value_at(d)).map(|(q, v)| q - v) else {
                for child in node.children() {
                    stack.push((child, bound));
                }
                continue;
            };

            let (near, far) = if diff < 0.0 {
                (node.left, node.right)
            } else {
                (node.right, node.left)
            };
            if let Some(far) = far {
                stack.push((far, bound.max(diff * diff)));
            }
            if let Some(near) = near {
                stack.push((near, bound));
            }
        }
    }
}

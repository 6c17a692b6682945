//! K-d tree implementation.
//!
//! Binary space-partitioning tree over points of arbitrary dimension.
//!
//! **Technical Name**: K-d tree (k-dimensional tree)
//!
//! Algorithm:
//! - Each node splits space with an axis-aligned hyperplane through its own point
//! - The split axis (discriminator) cycles with depth: `(parent + 1) mod dim`
//! - Points whose coordinate is less than the node's go left, everything else
//!   (ties included) goes right
//! - No presorting: shape depends on insertion order
//!
//! Storage is an arena: the tree owns every node in a `Vec`, and links
//! (`left`, `right`, `parent`) are [`NodeId`] indices into it. Dropping the
//! tree drops all nodes; there is no per-node removal.
//!
//! **Relationships**:
//! - Exact for low dimensions (d < 20); see `search` for nearest-neighbor and
//!   range queries
//! - Degrades towards a linear scan as dimension grows
//!
//! # References
//!
//! - Bentley (1975): "Multidimensional binary search trees used for associative searching"
//! - Friedman, Bentley, Finkel (1977): "An algorithm for finding best matches in logarithmic expected time"

mod node;
mod search;

pub use node::{KdNode, NodeId};

/// K-d tree index with a payload of type `T` per point.
///
/// All inserted points are expected to share one dimensionality. Mixing
/// lengths is not rejected, but comparisons along a missing coordinate are
/// treated as "not less than" and queries may miss nodes.
#[derive(Debug, Clone)]
pub struct KdTree<T> {
    nodes: Vec<KdNode<T>>,
}

impl<T> Default for KdTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> KdTree<T> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Create an empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Build a tree by inserting points in iteration order.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (Vec<f64>, T)>,
    {
        let points = points.into_iter();
        let mut tree = Self::with_capacity(points.size_hint().0);
        for (point, payload) in points {
            tree.insert(point, payload);
        }
        tree
    }

    /// Insert a point and return the new node's handle.
    ///
    /// Descends from the root comparing along each node's discriminator and
    /// attaches a leaf at the first empty slot.
    pub fn insert(&mut self, point: Vec<f64>, payload: T) -> NodeId {
        let id = NodeId(self.nodes.len());

        let Some(mut current) = self.root() else {
            self.nodes.push(KdNode::new(point, payload, None, 0));
            return id;
        };

        loop {
            let node = &self.nodes[current.0];
            let go_left = *node > *point.as_slice();
            let next = if go_left { node.left } else { node.right };

            match next {
                Some(child) => current = child,
                None => {
                    let discriminator = (node.discriminator + 1)
                        .checked_rem(point.len())
                        .unwrap_or(0);
                    self.nodes
                        .push(KdNode::new(point, payload, Some(current), discriminator));

                    let parent = &mut self.nodes[current.0];
                    if go_left {
                        parent.left = Some(id);
                    } else {
                        parent.right = Some(id);
                    }
                    return id;
                }
            }
        }
    }

    /// Root node, `None` for an empty tree.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId(0))
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&KdNode<T>> {
        self.nodes.get(id.0)
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut KdNode<T>> {
        self.nodes.get_mut(id.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dimensionality of the root point, `0` for an empty tree.
    pub fn dimension(&self) -> usize {
        self.nodes.first().map_or(0, KdNode::dimension)
    }

    /// Find the first node whose coordinates equal `point` exactly.
    ///
    /// Follows the insertion path, so among duplicates the earliest inserted
    /// one is returned.
    pub fn find_node(&self, point: &[f64]) -> Option<NodeId> {
        self.find_node_by(point, |_| true)
    }

    /// Find the node with coordinates equal to `point` and a matching payload.
    pub fn find_node_with_payload(&self, point: &[f64], payload: &T) -> Option<NodeId>
    where
        T: PartialEq,
    {
        self.find_node_by(point, |node| node.payload == *payload)
    }

    fn find_node_by<F>(&self, point: &[f64], accept: F) -> Option<NodeId>
    where
        F: Fn(&KdNode<T>) -> bool,
    {
        let mut current = self.root();
        while let Some(id) = current {
            let node = &self.nodes[id.0];
            if node.data == point && accept(node) {
                return Some(id);
            }
            current = if *node > *point { node.left } else { node.right };
        }
        None
    }

    /// Pre-order walk over the whole tree.
    pub fn iter(&self) -> PreOrder<'_, T> {
        PreOrder {
            tree: self,
            stack: self.root().into_iter().collect(),
        }
    }

    /// Pre-order walk over the subtree rooted at `id` (empty if `id` is unknown).
    pub fn subtree(&self, id: NodeId) -> PreOrder<'_, T> {
        let stack = if id.0 < self.nodes.len() {
            vec![id]
        } else {
            Vec::new()
        };
        PreOrder { tree: self, stack }
    }

    /// Number of levels from the root to the deepest leaf.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root().map(|r| (r, 1)).into_iter().collect();
        while let Some((id, level)) = stack.pop() {
            deepest = deepest.max(level);
            for child in self.nodes[id.0].children() {
                stack.push((child, level + 1));
            }
        }
        deepest
    }
}

/// Pre-order iterator over `(NodeId, &KdNode)`, left subtree before right.
pub struct PreOrder<'a, T> {
    tree: &'a KdTree<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> Iterator for PreOrder<'a, T> {
    type Item = (NodeId, &'a KdNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let tree = self.tree;
        let node = &tree.nodes[id.0];
        if let Some(right) = node.right {
            self.stack.push(right);
        }
        if let Some(left) = node.left {
            self.stack.push(left);
        }
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> KdTree<usize> {
        let points = vec![
            vec![5.0, 5.0],
            vec![2.0, 7.0],
            vec![8.0, 1.0],
            vec![2.0, 3.0],
            vec![9.0, 9.0],
            vec![5.0, 0.0],
        ];
        KdTree::from_points(points.into_iter().enumerate().map(|(i, p)| (p, i)))
    }

    #[test]
    fn empty_tree_has_no_root() {
        let tree: KdTree<()> = KdTree::new();
        assert!(tree.root().is_none());
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.find_node(&[1.0, 2.0]), None);
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn first_insert_becomes_root_with_discriminator_zero() {
        let mut tree = KdTree::new();
        let id = tree.insert(vec![3.0, 4.0, 5.0], "a");
        assert_eq!(tree.root(), Some(id));

        let root = tree.node(id).unwrap();
        assert_eq!(root.discriminator(), 0);
        assert_eq!(root.parent(), None);
        assert_eq!(root.dimension(), 3);
        assert_eq!(*root.payload(), "a");
    }

    #[test]
    fn insertion_links_and_rotates_discriminator() {
        let tree = sample_tree();
        let root = tree.node(NodeId(0)).unwrap();
        // (2,7) is left of root on x; (8,1) is right.
        assert_eq!(root.left(), Some(NodeId(1)));
        assert_eq!(root.right(), Some(NodeId(2)));

        let n1 = tree.node(NodeId(1)).unwrap();
        assert_eq!(n1.discriminator(), 1);
        assert_eq!(n1.parent(), Some(NodeId(0)));
        // (2,3) goes left of root, then left of (2,7) on y.
        assert_eq!(n1.left(), Some(NodeId(3)));
        assert_eq!(tree.node(NodeId(3)).unwrap().discriminator(), 0);

        // (5,0) ties with the root on x and is routed right, then left of (8,1) on y.
        let n2 = tree.node(NodeId(2)).unwrap();
        assert_eq!(n2.left(), Some(NodeId(5)));
        assert_eq!(n2.right(), Some(NodeId(4)));
    }

    #[test]
    fn find_node_returns_earliest_duplicate() {
        let mut tree = sample_tree();
        let dup = tree.insert(vec![2.0, 3.0], 42);

        assert_eq!(tree.find_node(&[2.0, 3.0]), Some(NodeId(3)));
        assert_eq!(tree.find_node_with_payload(&[2.0, 3.0], &42), Some(dup));
        assert_eq!(tree.find_node(&[2.0, 3.5]), None);
    }

    #[test]
    fn preorder_visits_left_before_right() {
        let tree = sample_tree();
        let order: Vec<usize> = tree.iter().map(|(id, _)| id.index()).collect();
        assert_eq!(order, vec![0, 1, 3, 2, 5, 4]);

        let sub: Vec<usize> = tree.subtree(NodeId(2)).map(|(_, n)| *n.payload()).collect();
        assert_eq!(sub, vec![2, 5, 4]);
        assert_eq!(tree.subtree(NodeId(99)).count(), 0);
    }

    #[test]
    fn depth_counts_levels() {
        let tree = sample_tree();
        assert_eq!(tree.depth(), 3);

        let mut chain = KdTree::new();
        for i in 0..10 {
            chain.insert(vec![i as f64], ());
        }
        assert_eq!(chain.depth(), 10);
    }

    #[test]
    fn node_mut_exposes_payload() {
        let mut tree = sample_tree();
        *tree.node_mut(NodeId(4)).unwrap().payload_mut() = 100;
        assert_eq!(*tree.node(NodeId(4)).unwrap().payload(), 100);
    }
}

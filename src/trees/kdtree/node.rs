//! K-d tree node and the discriminator comparisons used during descent.

use std::cmp::Ordering;

use smallvec::SmallVec;

/// Handle to a node stored in a [`KdTree`](super::KdTree) arena.
///
/// Handles stay valid for the lifetime of the tree; nodes are never removed
/// individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Handle for the node inserted `index`-th (zero-based).
    #[inline]
    pub fn from_index(index: usize) -> Self {
        NodeId(index)
    }

    /// Position of the node in insertion order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single point stored in the tree.
///
/// `left` and `right` are the node's exclusive children. `parent` is a plain
/// back-reference into the same arena and plays no part in ownership.
#[derive(Debug, Clone)]
pub struct KdNode<T> {
    pub(crate) data: Vec<f64>,
    pub(crate) payload: T,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) discriminator: usize,
}

impl<T> KdNode<T> {
    pub(crate) fn new(
        data: Vec<f64>,
        payload: T,
        parent: Option<NodeId>,
        discriminator: usize,
    ) -> Self {
        Self {
            data,
            payload,
            left: None,
            right: None,
            parent,
            discriminator,
        }
    }

    /// Coordinates of the node.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable coordinates.
    ///
    /// Changing the coordinate at any ancestor's discriminator can break the
    /// partition invariant; keeping it intact is up to the caller.
    #[inline]
    pub fn data_mut(&mut self) -> &mut Vec<f64> {
        &mut self.data
    }

    #[inline]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    #[inline]
    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    /// Coordinate along this node's own discriminator, `None` for an empty
    /// point.
    #[inline]
    pub fn value(&self) -> Option<f64> {
        self.value_at(self.discriminator)
    }

    /// Coordinate along dimension `d`, if the node has one.
    #[inline]
    pub fn value_at(&self, d: usize) -> Option<f64> {
        self.data.get(d).copied()
    }

    #[inline]
    pub fn discriminator(&self) -> usize {
        self.discriminator
    }

    /// Number of coordinates.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    #[inline]
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Immediate children, left first, empty slots omitted.
    pub fn children(&self) -> SmallVec<[NodeId; 2]> {
        self.left.into_iter().chain(self.right).collect()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Point's coordinate along this node's discriminator.
    #[inline]
    fn key(&self, point: &[f64]) -> Option<f64> {
        point.get(self.discriminator).copied()
    }
}

// Node/point comparisons look only at the node's discriminator dimension.
// They drive descent and are not an ordering over whole points.

impl<T> PartialEq<[f64]> for KdNode<T> {
    fn eq(&self, point: &[f64]) -> bool {
        self.partial_cmp(point) == Some(Ordering::Equal)
    }
}

impl<T> PartialOrd<[f64]> for KdNode<T> {
    fn partial_cmp(&self, point: &[f64]) -> Option<Ordering> {
        let own = self.data.get(self.discriminator)?;
        own.partial_cmp(&self.key(point)?)
    }
}

impl<T> PartialEq<KdNode<T>> for [f64] {
    fn eq(&self, node: &KdNode<T>) -> bool {
        node == self
    }
}

impl<T> PartialOrd<KdNode<T>> for [f64] {
    fn partial_cmp(&self, node: &KdNode<T>) -> Option<Ordering> {
        node.partial_cmp(self).map(Ordering::reverse)
    }
}

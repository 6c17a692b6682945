//! Tree-based spatial indexes.

pub mod kdtree;

pub use kdtree::{KdNode, KdTree, NodeId, PreOrder};

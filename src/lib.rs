//! medoids: K-d tree spatial index and K-Medoids (PAM) clustering.
//!
//! Two independent building blocks for unsupervised cluster analysis:
//!
//! - `trees/`: K-d tree with insertion, exact lookup, nearest-neighbor,
//!   k-nearest and radius queries over points of any dimension
//! - `partitioning/`: K-Medoids (PAM) over raw points or a precomputed
//!   distance matrix, plus seeded medoid initialisation
//!
//! # Quick Start
//!
//! ```rust
//! use medoids::partitioning::{DataType, KMedoids};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![8.0, 8.0],
//!     vec![8.0, 9.0],
//! ];
//!
//! let result = KMedoids::with_medoids(vec![0, 2])
//!     .unwrap()
//!     .fit(&data, DataType::Points)
//!     .unwrap();
//! assert_eq!(result.labels, vec![0, 0, 1, 1]);
//! ```
//!
//! # Critical Nuances
//!
//! ## PAM is a local search
//!
//! A swap is accepted only when it lowers the total deviation by more than
//! floating-point rounding, so the run cannot cycle between equal-cost
//! medoid sets and always terminates, but only at a local optimum. Start from spread-out medoids
//! (see `partitioning::kmedoids::init`) when the initial set is not given.
//!
//! ## Cost grows quadratically
//!
//! One swap pass evaluates `k (n - k)` candidate swaps, each touching all `n`
//! points. Past a few thousand points, precompute a distance matrix or
//! subsample.
//!
//! ## K-d trees and dimension
//!
//! Pruning relies on the gap to axis-aligned split planes. Past roughly 20
//! dimensions almost nothing is pruned and queries approach a linear scan.
//!
//! # Threading
//!
//! Nothing here spawns threads or locks. `KMedoids::process` borrows its
//! inputs for the duration of one call only, so an optimizer can be shared
//! read-only across threads; a `KdTree` being mutated needs external
//! synchronization.

pub mod distance;
pub mod error;

#[cfg(feature = "kdtree")]
pub mod trees;

#[cfg(feature = "kmedoids")]
pub mod partitioning;

// Re-exports
pub use distance::DistanceMetric;
pub use error::{ClusterError, Result};

#[cfg(feature = "kdtree")]
pub use trees::{KdNode, KdTree, NodeId};

#[cfg(feature = "kmedoids")]
pub use partitioning::{DataType, KMedoids, KMedoidsParams, KMedoidsResult, StopReason};

//! Error types for medoids.

use thiserror::Error;

/// Errors that can occur while configuring or running a clustering pass.
///
/// Tree queries never return these: "not found" is modeled with `Option`
/// or an empty result instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    /// Initial medoid set is empty.
    #[error("initial medoid set is empty")]
    EmptyMedoids,

    /// A medoid index appears more than once.
    #[error("medoid index {index} appears more than once")]
    DuplicateMedoid { index: usize },

    /// A medoid index does not address a point of the dataset.
    #[error("medoid index {index} is out of range for dataset of {len} points")]
    MedoidOutOfRange { index: usize, len: usize },

    /// More medoids than points.
    #[error("{k} medoids requested for dataset of {len} points")]
    TooManyMedoids { k: usize, len: usize },

    /// Dataset has no points.
    #[error("dataset is empty")]
    EmptyDataset,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A point's length differs from the first point's length.
    #[error("dimension mismatch: point {index} has {found} coordinates, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// A distance-matrix row is not `n` entries long.
    #[error("distance matrix row {row} has {found} entries, expected {expected}")]
    DistanceMatrixShape {
        row: usize,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, ClusterError>;

//! Partition-based clustering.

pub mod kmedoids;

pub use kmedoids::{DataType, KMedoids, KMedoidsParams, KMedoidsResult, StopReason};

//! Clustering output.

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No medoid/non-medoid swap lowered the total deviation.
    NoImprovingSwap,
    /// The largest per-cluster deviation change fell to the tolerance.
    Converged,
    /// The iteration limit was reached first. Not an error.
    MaxIterations,
}

/// Result of a K-Medoids run.
///
/// The caller owns this value and passes it to
/// [`KMedoids::process`](super::KMedoids::process), which overwrites every
/// field on success and leaves it untouched on error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KMedoidsResult {
    /// Cluster of each point; cluster `i` is represented by `medoids[i]`.
    pub labels: Vec<usize>,
    /// Dataset index of each cluster's medoid.
    pub medoids: Vec<usize>,
    /// Distance from each point to its medoid.
    pub distances: Vec<f64>,
    /// Swap iterations performed.
    pub iterations: usize,
    /// Last largest per-cluster deviation change; `0.0` when the run ended
    /// because no swap improved.
    pub delta: f64,
    /// Sum of point-to-medoid distances.
    pub total_deviation: f64,
    /// `None` until a run has completed.
    pub stop_reason: Option<StopReason>,
}

impl KMedoidsResult {
    #[inline]
    pub fn n_clusters(&self) -> usize {
        self.medoids.len()
    }

    /// Point indices of each cluster, in ascending order.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let mut clusters = vec![Vec::new(); self.medoids.len()];
        for (point, &label) in self.labels.iter().enumerate() {
            clusters[label].push(point);
        }
        clusters
    }
}

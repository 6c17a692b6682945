//! K-Medoids clustering (PAM).
//!
//! **Technical Name**: Partitioning Around Medoids
//!
//! Algorithm:
//! - Assign every point to its nearest medoid, remembering the nearest and
//!   second-nearest medoid distance per point
//! - Evaluate every (medoid, non-medoid) swap; apply the one that lowers the
//!   total deviation the most
//! - Repeat until no swap helps, the largest per-cluster deviation change
//!   drops to the tolerance, or the iteration limit is hit
//!
//! Each swap pass costs `O(k (n - k) n)` distance evaluations. PAM is a local
//! search: the result depends on the initial medoids and is not guaranteed to
//! be globally optimal. Ties (equal distances, equal swap costs) go to the
//! lowest index, so runs are deterministic.
//!
//! **Relationships**:
//! - Medoids are actual data points, unlike k-means centroids, so any
//!   dissimilarity works, including a precomputed distance matrix
//! - Seeding helpers live in [`init`]
//!
//! # References
//!
//! - Kaufman & Rousseeuw (1990): "Partitioning Around Medoids (Program PAM)"

mod calculator;
pub mod init;
mod result;
mod state;

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::distance::DistanceMetric;
use crate::error::{ClusterError, Result};
use calculator::DistanceCalculator;
use state::AssignmentState;

pub use calculator::DataType;
pub use result::{KMedoidsResult, StopReason};

/// Returned by the swap search when no swap lowers the total deviation.
const NOTHING_TO_SWAP: f64 = 0.0;

/// Per-point relative rounding allowed in a swap cost.
///
/// A swap is accepted only if its cost is below
/// `-(n * SWAP_COST_ROUNDING * total deviation)`. Anything closer to zero is
/// summation noise between equal-cost medoid sets, and accepting it would let
/// the run cycle between them until `itermax`.
const SWAP_COST_ROUNDING: f64 = 8.0 * f64::EPSILON;

/// K-Medoids parameters.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KMedoidsParams {
    /// Stop once the largest per-cluster deviation change is at most this.
    pub tolerance: f64,

    /// Maximum swap iterations.
    pub itermax: usize,

    /// Metric for `DataType::Points` input.
    pub metric: DistanceMetric,
}

impl Default for KMedoidsParams {
    fn default() -> Self {
        Self {
            tolerance: 0.0001,
            itermax: 100,
            metric: DistanceMetric::SquaredEuclidean,
        }
    }
}

impl KMedoidsParams {
    /// Check values that do not depend on the dataset.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ClusterError::InvalidParameter(format!(
                "tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        if self.itermax == 0 {
            return Err(ClusterError::InvalidParameter(
                "itermax must be greater than 0".to_string(),
            ));
        }
        self.metric.validate()
    }
}

/// The best swap found in one pass.
#[derive(Debug, Clone, Copy)]
struct Swap {
    cluster: usize,
    candidate: usize,
    cost: f64,
}

/// K-Medoids clustering engine.
///
/// Holds configuration only; every [`process`](Self::process) call is an
/// independent run, so one instance can be reused for many datasets.
#[derive(Clone, Debug)]
pub struct KMedoids {
    initial_medoids: Vec<usize>,
    params: KMedoidsParams,
}

impl KMedoids {
    /// Create a new optimizer starting from `initial_medoids`.
    ///
    /// Fails if the medoid set is empty or repeats an index, or if the
    /// parameters are invalid. Range checks against the dataset happen in
    /// [`process`](Self::process).
    pub fn new(initial_medoids: Vec<usize>, params: KMedoidsParams) -> Result<Self> {
        check_medoid_set(&initial_medoids)?;
        params.validate()?;
        Ok(Self {
            initial_medoids,
            params,
        })
    }

    /// Create an optimizer with default parameters.
    pub fn with_medoids(initial_medoids: Vec<usize>) -> Result<Self> {
        Self::new(initial_medoids, KMedoidsParams::default())
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.params.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_itermax(mut self, itermax: usize) -> Self {
        self.params.itermax = itermax;
        self
    }

    #[must_use]
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.params.metric = metric;
        self
    }

    pub fn initial_medoids(&self) -> &[usize] {
        &self.initial_medoids
    }

    pub fn params(&self) -> &KMedoidsParams {
        &self.params
    }

    /// Cluster `data` and return a fresh result.
    pub fn fit(&self, data: &[Vec<f64>], data_type: DataType) -> Result<KMedoidsResult> {
        let mut result = KMedoidsResult::default();
        self.process(data, data_type, &mut result)?;
        Ok(result)
    }

    /// Cluster `data` into the caller's `result`.
    ///
    /// With `DataType::Points` each row is a point and distances come from
    /// the configured metric. With `DataType::DistanceMatrix` row `i` holds
    /// the distances from point `i` to every point.
    ///
    /// All validation happens before the first iteration. On error `result`
    /// is left as it was.
    pub fn process(
        &self,
        data: &[Vec<f64>],
        data_type: DataType,
        result: &mut KMedoidsResult,
    ) -> Result<()> {
        self.params.validate()?;
        check_medoid_set(&self.initial_medoids)?;
        check_medoid_range(&self.initial_medoids, data.len())?;
        let calc = DistanceCalculator::new(data, data_type, &self.params.metric)?;

        let n = calc.len();
        let tolerance = self.params.tolerance;
        let itermax = self.params.itermax;
        debug!(
            n,
            k = self.initial_medoids.len(),
            ?data_type,
            tolerance,
            itermax,
            "kmedoids run started"
        );

        let mut medoids = self.initial_medoids.clone();
        let mut state = AssignmentState::new(n, medoids.len());
        let mut delta = state.assign(&medoids, &calc);
        let mut iterations = 0;

        let stop_reason = loop {
            if delta <= tolerance {
                break StopReason::Converged;
            }
            if iterations >= itermax {
                break StopReason::MaxIterations;
            }
            iterations += 1;

            let Some(swap) = best_swap(&medoids, &state, &calc) else {
                delta = NOTHING_TO_SWAP;
                break StopReason::NoImprovingSwap;
            };

            trace!(
                iteration = iterations,
                cluster = swap.cluster,
                from = medoids[swap.cluster],
                to = swap.candidate,
                cost = swap.cost,
                "swapping medoid"
            );
            medoids[swap.cluster] = swap.candidate;
            delta = state.assign(&medoids, &calc);
            trace!(
                iteration = iterations,
                delta,
                total_deviation = state.total_deviation(),
                "clusters reassigned"
            );
        };

        let total_deviation = state.total_deviation();
        debug!(
            ?stop_reason,
            iterations,
            delta,
            total_deviation,
            "kmedoids run finished"
        );

        let (labels, distances) = state.into_parts();
        *result = KMedoidsResult {
            labels,
            medoids,
            distances,
            iterations,
            delta,
            total_deviation,
            stop_reason: Some(stop_reason),
        };
        Ok(())
    }
}

/// Cheapest swap over all (cluster, non-medoid) pairs, if it lowers the total
/// deviation by more than rounding noise.
///
/// Pairs are scanned cluster-major, candidate-minor; the first strictly
/// cheaper pair wins ties.
fn best_swap(
    medoids: &[usize],
    state: &AssignmentState,
    calc: &DistanceCalculator<'_>,
) -> Option<Swap> {
    let mut best: Option<Swap> = None;

    for cluster in 0..medoids.len() {
        for candidate in 0..calc.len() {
            if state.is_medoid(candidate) {
                continue;
            }
            let cost = state.swap_cost(candidate, cluster, calc);
            if best.map_or(true, |b| cost < b.cost) {
                best = Some(Swap {
                    cluster,
                    candidate,
                    cost,
                });
            }
        }
    }

    let noise = calc.len() as f64 * SWAP_COST_ROUNDING * state.total_deviation();
    best.filter(|swap| swap.cost < NOTHING_TO_SWAP - noise)
}

fn check_medoid_set(medoids: &[usize]) -> Result<()> {
    if medoids.is_empty() {
        return Err(ClusterError::EmptyMedoids);
    }
    let mut seen = HashSet::with_capacity(medoids.len());
    for &index in medoids {
        if !seen.insert(index) {
            return Err(ClusterError::DuplicateMedoid { index });
        }
    }
    Ok(())
}

fn check_medoid_range(medoids: &[usize], len: usize) -> Result<()> {
    if len == 0 {
        return Err(ClusterError::EmptyDataset);
    }
    if medoids.len() > len {
        return Err(ClusterError::TooManyMedoids {
            k: medoids.len(),
            len,
        });
    }
    if let Some(&index) = medoids.iter().find(|&&m| m >= len) {
        return Err(ClusterError::MedoidOutOfRange { index, len });
    }
    Ok(())
}

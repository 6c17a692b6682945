//! Per-run cluster assignment state.
//!
//! Besides the label of every point, the state keeps the distance to the
//! nearest and second-nearest medoid. With both at hand, the cost of
//! replacing one medoid can be evaluated per point in constant time: a point
//! of the replaced cluster either moves to the candidate or falls back to its
//! second-nearest medoid.

use super::calculator::DistanceCalculator;

/// Mutable working data for one clustering run.
///
/// Invariant after [`assign`](Self::assign): every medoid is labeled with
/// its own cluster at distance `0`.
#[derive(Debug, Clone, Default)]
pub(crate) struct AssignmentState {
    labels: Vec<usize>,
    nearest: Vec<f64>,
    second_nearest: Vec<f64>,
    /// Sum of `nearest` over each cluster's members.
    deviation: Vec<f64>,
    /// Cluster a point is the medoid of, if any.
    medoid_cluster: Vec<Option<usize>>,
}

impl AssignmentState {
    pub(crate) fn new(num_points: usize, num_clusters: usize) -> Self {
        Self {
            labels: vec![0; num_points],
            nearest: vec![f64::INFINITY; num_points],
            second_nearest: vec![f64::INFINITY; num_points],
            deviation: vec![f64::INFINITY; num_clusters],
            medoid_cluster: vec![None; num_points],
        }
    }

    /// Assign every point to its nearest medoid.
    ///
    /// Returns the largest change of any single cluster's deviation since
    /// the previous assignment (`+inf` on the first call).
    pub(crate) fn assign(&mut self, medoids: &[usize], calc: &DistanceCalculator<'_>) -> f64 {
        self.medoid_cluster.fill(None);
        for (cluster, &m) in medoids.iter().enumerate() {
            self.medoid_cluster[m] = Some(cluster);
        }

        let mut deviation = vec![0.0; medoids.len()];

        for point in 0..self.labels.len() {
            let own = self.medoid_cluster[point];
            let (mut label, mut first) = match own {
                Some(cluster) => (cluster, 0.0),
                None => (0, f64::INFINITY),
            };
            let mut second = f64::INFINITY;

            for (cluster, &m) in medoids.iter().enumerate() {
                if own == Some(cluster) {
                    continue;
                }
                let d = calc.distance(point, m);
                if own.is_none() && d < first {
                    second = first;
                    first = d;
                    label = cluster;
                } else if d < second {
                    second = d;
                }
            }

            self.labels[point] = label;
            self.nearest[point] = first;
            self.second_nearest[point] = second;
            deviation[label] += first;
        }

        let delta = deviation
            .iter()
            .zip(&self.deviation)
            .map(|(new, old)| (new - old).abs())
            .fold(0.0, f64::max);
        self.deviation = deviation;
        delta
    }

    /// Net change of total deviation if `candidate` replaced the medoid of
    /// `cluster`. Negative means improvement.
    pub(crate) fn swap_cost(
        &self,
        candidate: usize,
        cluster: usize,
        calc: &DistanceCalculator<'_>,
    ) -> f64 {
        let mut cost = 0.0;
        for point in 0..self.labels.len() {
            if point == candidate {
                continue;
            }
            let d = calc.distance(point, candidate);
            if self.labels[point] == cluster {
                cost += d.min(self.second_nearest[point]) - self.nearest[point];
            } else if d < self.nearest[point] {
                cost += d - self.nearest[point];
            }
        }
        // The candidate itself stops paying its current distance.
        cost - self.nearest[candidate]
    }

    #[inline]
    pub(crate) fn is_medoid(&self, point: usize) -> bool {
        self.medoid_cluster[point].is_some()
    }

    #[cfg(test)]
    pub(crate) fn labels(&self) -> &[usize] {
        &self.labels
    }

    #[cfg(test)]
    pub(crate) fn nearest(&self) -> &[f64] {
        &self.nearest
    }

    #[cfg(test)]
    pub(crate) fn second_nearest(&self) -> &[f64] {
        &self.second_nearest
    }

    pub(crate) fn total_deviation(&self) -> f64 {
        self.deviation.iter().sum()
    }

    /// Labels and nearest-medoid distances, consuming the state.
    pub(crate) fn into_parts(self) -> (Vec<usize>, Vec<f64>) {
        (self.labels, self.nearest)
    }
}

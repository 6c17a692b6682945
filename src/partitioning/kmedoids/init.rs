//! Initial medoid selection.
//!
//! PAM only refines; where it ends up depends on where it starts. Both
//! helpers are seeded, so the same inputs always produce the same medoids.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::calculator::{DataType, DistanceCalculator};
use crate::distance::DistanceMetric;
use crate::error::{ClusterError, Result};

/// `k` distinct indices drawn uniformly from `0..n`.
pub fn random_medoids(n: usize, k: usize, seed: u64) -> Result<Vec<usize>> {
    check_k(n, k)?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(rand::seq::index::sample(&mut rng, n, k).into_vec())
}

/// k-means++ style seeding restricted to data points.
///
/// The first medoid is uniform; each next one is drawn with probability
/// proportional to its distance from the closest medoid chosen so far.
/// Points already chosen are never drawn again.
pub fn medoids_plus_plus(
    data: &[Vec<f64>],
    k: usize,
    metric: &DistanceMetric,
    seed: u64,
) -> Result<Vec<usize>> {
    metric.validate()?;
    let calc = DistanceCalculator::new(data, DataType::Points, metric)?;
    let n = calc.len();
    check_k(n, k)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut chosen = vec![false; n];
    let mut medoids = Vec::with_capacity(k);

    let first = rng.random_range(0..n);
    chosen[first] = true;
    medoids.push(first);

    // Distance from each point to its closest chosen medoid.
    let mut closest: Vec<f64> = (0..n).map(|i| calc.distance(i, first)).collect();

    while medoids.len() < k {
        let weight = |i: usize| if chosen[i] { 0.0 } else { closest[i] };
        let total: f64 = (0..n).map(weight).sum();

        let next = if total > 0.0 && total.is_finite() {
            let threshold = rng.random::<f64>() * total;
            let mut cumulative = 0.0;
            let mut pick = None;
            for i in 0..n {
                let w = weight(i);
                if w <= 0.0 {
                    continue;
                }
                cumulative += w;
                pick = Some(i);
                if cumulative >= threshold {
                    break;
                }
            }
            pick
        } else {
            // Every remaining point coincides with a medoid.
            None
        };
        let next = match next {
            Some(i) => i,
            None => (0..n)
                .find(|&i| !chosen[i])
                .ok_or(ClusterError::TooManyMedoids { k, len: n })?,
        };

        chosen[next] = true;
        medoids.push(next);
        for (i, c) in closest.iter_mut().enumerate() {
            *c = c.min(calc.distance(i, next));
        }
    }

    Ok(medoids)
}

fn check_k(n: usize, k: usize) -> Result<()> {
    if k == 0 {
        return Err(ClusterError::InvalidParameter(
            "number of medoids must be greater than 0".to_string(),
        ));
    }
    if n == 0 {
        return Err(ClusterError::EmptyDataset);
    }
    if k > n {
        return Err(ClusterError::TooManyMedoids { k, len: n });
    }
    Ok(())
}

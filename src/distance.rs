//! Distance metrics for dense points.
//!
//! Every clustering component in this crate measures dissimilarity through a
//! [`DistanceMetric`]. The only contract a metric has to honor is the one the
//! optimizer relies on: given two points of equal length, return a
//! non-negative real.
//!
//! ## Important nuance
//!
//! K-Medoids defaults to [`DistanceMetric::SquaredEuclidean`], not plain
//! Euclidean. Squared distances weight outliers more heavily, so the same
//! dataset can settle on different medoids under the two metrics.
//!
//! The free functions here do not check lengths. Callers that accept
//! user-provided points validate dimensionality once up front (see
//! `partitioning::kmedoids`), rather than per distance evaluation.

use std::fmt;
use std::sync::Arc;

use crate::error::{ClusterError, Result};

/// User-supplied distance function.
pub type MetricFn = Arc<dyn Fn(&[f64], &[f64]) -> f64 + Send + Sync>;

/// Distance metric for dense points.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DistanceMetric {
    /// Euclidean (L2) distance.
    Euclidean,
    /// Squared Euclidean distance.
    #[default]
    SquaredEuclidean,
    /// Manhattan (L1) distance.
    Manhattan,
    /// Chebyshev (L-infinity) distance.
    Chebyshev,
    /// Minkowski distance of the given order `p > 0`.
    Minkowski(f64),
    /// Canberra distance $\sum |a_i - b_i| / (|a_i| + |b_i|)$.
    Canberra,
    /// Chi-square distance $\sum (a_i - b_i)^2 / (|a_i| + |b_i|)$.
    ChiSquare,
    /// Caller-provided function. Not serializable.
    #[cfg_attr(feature = "serde", serde(skip))]
    Custom(MetricFn),
}

impl DistanceMetric {
    /// Wrap a closure as a metric.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[f64], &[f64]) -> f64 + Send + Sync + 'static,
    {
        DistanceMetric::Custom(Arc::new(f))
    }

    /// Compute distance between two points.
    #[inline]
    #[must_use]
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            DistanceMetric::Euclidean => euclidean(a, b),
            DistanceMetric::SquaredEuclidean => squared_euclidean(a, b),
            DistanceMetric::Manhattan => manhattan(a, b),
            DistanceMetric::Chebyshev => chebyshev(a, b),
            DistanceMetric::Minkowski(p) => minkowski(a, b, *p),
            DistanceMetric::Canberra => canberra(a, b),
            DistanceMetric::ChiSquare => chi_square(a, b),
            DistanceMetric::Custom(f) => f(a, b),
        }
    }

    /// Check metric parameters.
    pub fn validate(&self) -> Result<()> {
        if let DistanceMetric::Minkowski(p) = self {
            if !p.is_finite() || *p <= 0.0 {
                return Err(ClusterError::InvalidParameter(format!(
                    "Minkowski order must be finite and positive, got {p}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::Euclidean => write!(f, "Euclidean"),
            DistanceMetric::SquaredEuclidean => write!(f, "SquaredEuclidean"),
            DistanceMetric::Manhattan => write!(f, "Manhattan"),
            DistanceMetric::Chebyshev => write!(f, "Chebyshev"),
            DistanceMetric::Minkowski(p) => f.debug_tuple("Minkowski").field(p).finish(),
            DistanceMetric::Canberra => write!(f, "Canberra"),
            DistanceMetric::ChiSquare => write!(f, "ChiSquare"),
            DistanceMetric::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Squared Euclidean distance.
#[inline]
#[must_use]
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean (L2) distance.
#[inline]
#[must_use]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// Manhattan (L1) distance.
#[inline]
#[must_use]
pub fn manhattan(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// Chebyshev (L-infinity) distance.
#[inline]
#[must_use]
pub fn chebyshev(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Minkowski distance of order `p`.
#[inline]
#[must_use]
pub fn minkowski(a: &[f64], b: &[f64], p: f64) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs().powf(p))
        .sum::<f64>()
        .powf(1.0 / p)
}

/// Canberra distance. Coordinates where both values are zero contribute nothing.
#[inline]
#[must_use]
pub fn canberra(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let denom = x.abs() + y.abs();
            if denom == 0.0 {
                0.0
            } else {
                (x - y).abs() / denom
            }
        })
        .sum()
}

/// Chi-square distance. Coordinates where both values are zero contribute nothing.
#[inline]
#[must_use]
pub fn chi_square(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let denom = x.abs() + y.abs();
            if denom == 0.0 {
                0.0
            } else {
                (x - y).powi(2) / denom
            }
        })
        .sum()
}

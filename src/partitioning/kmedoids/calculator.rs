//! Index-addressed distance lookup used by the optimizer.

use crate::distance::DistanceMetric;
use crate::error::{ClusterError, Result};

/// How the rows passed to `process` should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DataType {
    /// Rows are points; distances come from the configured metric.
    #[default]
    Points,
    /// Row `i` holds the distances from point `i` to every point.
    /// The metric is ignored.
    DistanceMatrix,
}

/// Distance between two dataset indices, fixed once per run.
#[derive(Debug)]
pub(crate) enum DistanceCalculator<'a> {
    Points {
        data: &'a [Vec<f64>],
        metric: &'a DistanceMetric,
    },
    Matrix {
        rows: &'a [Vec<f64>],
    },
}

impl<'a> DistanceCalculator<'a> {
    /// Check the dataset shape for `data_type` and select the lookup.
    ///
    /// Points must all share the first point's length; matrix rows must
    /// all be `n` long. Symmetry and the zero diagonal are not checked.
    pub(crate) fn new(
        data: &'a [Vec<f64>],
        data_type: DataType,
        metric: &'a DistanceMetric,
    ) -> Result<Self> {
        if data.is_empty() {
            return Err(ClusterError::EmptyDataset);
        }

        match data_type {
            DataType::Points => {
                let expected = data[0].len();
                if let Some((index, row)) =
                    data.iter().enumerate().find(|(_, row)| row.len() != expected)
                {
                    return Err(ClusterError::DimensionMismatch {
                        index,
                        expected,
                        found: row.len(),
                    });
                }
                Ok(DistanceCalculator::Points { data, metric })
            }
            DataType::DistanceMatrix => {
                let expected = data.len();
                if let Some((row, values)) =
                    data.iter().enumerate().find(|(_, row)| row.len() != expected)
                {
                    return Err(ClusterError::DistanceMatrixShape {
                        row,
                        expected,
                        found: values.len(),
                    });
                }
                Ok(DistanceCalculator::Matrix { rows: data })
            }
        }
    }

    /// Number of addressable points.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            DistanceCalculator::Points { data, .. } => data.len(),
            DistanceCalculator::Matrix { rows } => rows.len(),
        }
    }

    #[inline]
    pub(crate) fn distance(&self, i: usize, j: usize) -> f64 {
        match self {
            DistanceCalculator::Points { data, metric } => metric.distance(&data[i], &data[j]),
            DistanceCalculator::Matrix { rows } => rows[i][j],
        }
    }
}

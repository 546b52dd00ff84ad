// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Dissimilarity measures between sample vectors.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::ClusteringError;

const GEOMETRIC_MEDIAN_ITERATIONS: usize = 100;
const GEOMETRIC_MEDIAN_MIN_DISTANCE: f64 = 1e-12;

/// Scalar dissimilarity between two equal-length vectors.
///
/// Implementations must be symmetric, non-negative and return zero for
/// identical inputs. Seeding, assignment, cost and silhouette all go
/// through this trait, so custom metrics can be plugged in.
pub trait Distance: Send + Sync {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;

    /// K-Means++ weight of `a` against its nearest seed `b`, the squared distance
    fn seeding_weight(&self, a: &[f64], b: &[f64]) -> f64 {
        let d = self.distance(a, b);
        d * d
    }

    /// Candidate K-Means centroid for `members`; `None` for an empty cluster.
    ///
    /// Defaults to the coordinate-wise mean. K-Means only moves a centroid
    /// here when the cluster cost does not rise, so an approximate centre
    /// is safe.
    fn centre(&self, data: &Dataset, members: &[usize]) -> Option<Vec<f64>> {
        data.mean_of(members)
    }
}

/// Built-in distance metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Sum of squared coordinate differences
    #[default]
    SquaredEuclidean,
    /// Square root of the squared Euclidean distance
    Euclidean,
    /// Sum of absolute coordinate differences
    Manhattan,
}

impl DistanceMetric {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SquaredEuclidean => "squared_euclidean",
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
        }
    }
}

impl Distance for DistanceMetric {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        match self {
            Self::SquaredEuclidean => squared_euclidean(a, b),
            Self::Euclidean => squared_euclidean(a, b).sqrt(),
            Self::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
        }
    }

    fn seeding_weight(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Self::SquaredEuclidean => squared_euclidean(a, b),
            Self::Euclidean | Self::Manhattan => {
                let d = self.distance(a, b);
                d * d
            }
        }
    }

    fn centre(&self, data: &Dataset, members: &[usize]) -> Option<Vec<f64>> {
        match self {
            Self::SquaredEuclidean => data.mean_of(members),
            Self::Euclidean => geometric_median(data, members),
            Self::Manhattan => coordinate_median(data, members),
        }
    }
}

fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum()
}

/// Per-dimension median, minimises the summed Manhattan distance
fn coordinate_median(data: &Dataset, members: &[usize]) -> Option<Vec<f64>> {
    if members.is_empty() {
        return None;
    }

    let mid = members.len() / 2;
    let mut column = Vec::with_capacity(members.len());
    let median = (0..data.dimension())
        .map(|dim| {
            column.clear();
            column.extend(members.iter().map(|&i| data.sample(i)[dim]));
            column.sort_by(f64::total_cmp);
            if column.len() % 2 == 1 {
                column[mid]
            } else {
                (column[mid - 1] + column[mid]) / 2.0
            }
        })
        .collect();
    Some(median)
}

/// Weiszfeld iteration from the mean, accepting only steps that lower the
/// summed Euclidean distance
fn geometric_median(data: &Dataset, members: &[usize]) -> Option<Vec<f64>> {
    let summed = |centre: &[f64]| -> f64 {
        members
            .iter()
            .map(|&i| squared_euclidean(data.sample(i), centre).sqrt())
            .sum()
    };

    let mut centre = data.mean_of(members)?;
    let mut cost = summed(&centre);

    for _ in 0..GEOMETRIC_MEDIAN_ITERATIONS {
        let mut numerator = vec![0.0; centre.len()];
        let mut denominator = 0.0;
        for &i in members {
            let sample = data.sample(i);
            let d = squared_euclidean(sample, &centre).sqrt();
            // Points on the current centre have no defined pull
            if d < GEOMETRIC_MEDIAN_MIN_DISTANCE {
                continue;
            }
            for (acc, value) in numerator.iter_mut().zip(sample) {
                *acc += value / d;
            }
            denominator += 1.0 / d;
        }
        if denominator <= 0.0 {
            break;
        }

        let next: Vec<f64> = numerator.iter().map(|value| value / denominator).collect();
        let next_cost = summed(&next);
        if next_cost >= cost {
            break;
        }
        centre = next;
        cost = next_cost;
    }

    Some(centre)
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for DistanceMetric {
    type Err = ClusteringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "squared_euclidean" | "sqeuclidean" => Ok(Self::SquaredEuclidean),
            "euclidean" => Ok(Self::Euclidean),
            "manhattan" | "cityblock" => Ok(Self::Manhattan),
            _ => Err(ClusteringError::invalid(format!("unknown distance metric: {s}"))),
        }
    }
}

// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Silhouette coefficient for a clustered dataset.
//!
//! For sample i in cluster k:
//! - a(i): mean distance to the other members of k
//! - b(i): smallest mean distance to the members of any other cluster
//! - s(i) = (b(i) - a(i)) / max(a(i), b(i))
//!
//! Singleton clusters score 0, and so does a sample whose a(i) and b(i) are
//! both zero.

use serde::Serialize;

use crate::dataset::{Dataset, Partition};
use crate::distance::Distance;
use crate::error::{ClusteringError, ClusteringResult};

/// Per-sample, per-cluster and overall silhouette scores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SilhouetteReport {
    /// s(i) for every sample, in dataset order
    pub samples: Vec<f64>,
    /// Mean s(i) of each cluster's members (0 for singleton clusters)
    pub clusters: Vec<f64>,
    /// Cluster-size weighted mean over all samples
    pub overall: f64,
}

/// Score `partition` of `data`. Needs at least two clusters.
pub fn silhouette<D: Distance + ?Sized>(
    data: &Dataset,
    partition: &Partition,
    distance: &D,
) -> ClusteringResult<SilhouetteReport> {
    if partition.sample_count() != data.len() {
        return Err(ClusteringError::invalid(format!(
            "partition covers {} samples, dataset has {}",
            partition.sample_count(),
            data.len()
        )));
    }
    if partition.k() < 2 {
        return Err(ClusteringError::invalid(
            "silhouette needs at least two clusters",
        ));
    }

    let samples: Vec<f64> = (0..data.len())
        .map(|i| sample_score(data, partition, i, distance))
        .collect();

    let clusters: Vec<f64> = partition
        .clusters()
        .iter()
        .map(|members| mean(members.iter().map(|&i| samples[i]), members.len()))
        .collect();

    let overall = partition
        .clusters()
        .iter()
        .zip(&clusters)
        .map(|(members, score)| members.len() as f64 * score)
        .sum::<f64>()
        / data.len() as f64;

    Ok(SilhouetteReport {
        samples,
        clusters,
        overall,
    })
}

fn sample_score<D: Distance + ?Sized>(
    data: &Dataset,
    partition: &Partition,
    sample: usize,
    distance: &D,
) -> f64 {
    let own = partition.label(sample);
    let own_members = partition.members(own);
    if own_members.len() <= 1 {
        return 0.0;
    }

    let point = data.sample(sample);
    let a = mean(
        own_members
            .iter()
            .filter(|&&j| j != sample)
            .map(|&j| distance.distance(point, data.sample(j))),
        own_members.len() - 1,
    );

    let b = partition
        .clusters()
        .iter()
        .enumerate()
        .filter(|(cluster, members)| *cluster != own && !members.is_empty())
        .map(|(_, members)| {
            mean(
                members.iter().map(|&j| distance.distance(point, data.sample(j))),
                members.len(),
            )
        })
        .fold(f64::INFINITY, f64::min);

    if !b.is_finite() {
        return 0.0;
    }

    let scale = a.max(b);
    if scale > 0.0 { (b - a) / scale } else { 0.0 }
}

/// Mean of `count` values; zero for an empty list
fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! In-memory samples and cluster partitions.

use serde::Serialize;

use crate::error::{ClusteringError, ClusteringResult};

/// An ordered set of equal-length, finite sample vectors.
///
/// The dataset is immutable once built; clustering algorithms address
/// samples by their index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    samples: Vec<Vec<f64>>,
    dimension: usize,
}

impl Dataset {
    /// Build a dataset, rejecting empty input, ragged rows and non-finite values.
    pub fn new(samples: Vec<Vec<f64>>) -> ClusteringResult<Self> {
        let Some(first) = samples.first() else {
            return Err(ClusteringError::invalid("dataset has no samples"));
        };
        let dimension = first.len();
        if dimension == 0 {
            return Err(ClusteringError::invalid("samples have zero dimensions"));
        }

        for (index, sample) in samples.iter().enumerate() {
            if sample.len() != dimension {
                return Err(ClusteringError::invalid(format!(
                    "sample {index} has {} values, expected {dimension}",
                    sample.len()
                )));
            }
            if let Some(position) = sample.iter().position(|v| !v.is_finite()) {
                return Err(ClusteringError::NumericalDegeneracy(format!(
                    "sample {index} has a non-finite value at position {position}"
                )));
            }
        }

        Ok(Self { samples, dimension })
    }

    /// Number of samples (m)
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length of every sample vector (n)
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn sample(&self, index: usize) -> &[f64] {
        &self.samples[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.samples.iter().map(Vec::as_slice)
    }

    /// Arithmetic mean of the given samples, per dimension.
    ///
    /// Returns `None` for an empty member list instead of dividing by zero.
    #[must_use]
    pub fn mean_of(&self, members: &[usize]) -> Option<Vec<f64>> {
        if members.is_empty() {
            return None;
        }

        let mut mean = vec![0.0; self.dimension];
        for &index in members {
            for (acc, value) in mean.iter_mut().zip(&self.samples[index]) {
                *acc += value;
            }
        }
        let count = members.len() as f64;
        for value in &mut mean {
            *value /= count;
        }
        Some(mean)
    }
}

/// Assignment of every sample to exactly one of K clusters.
///
/// Stored both as per-sample labels and as per-cluster member lists
/// (ascending sample indices), so the cover is complete and disjoint
/// by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    labels: Vec<usize>,
    clusters: Vec<Vec<usize>>,
}

impl Partition {
    /// Build a partition from per-sample cluster labels.
    pub fn from_labels(labels: Vec<usize>, k: usize) -> ClusteringResult<Self> {
        if k == 0 {
            return Err(ClusteringError::invalid("partition needs at least one cluster"));
        }

        let mut clusters = vec![Vec::new(); k];
        for (sample, &label) in labels.iter().enumerate() {
            let Some(members) = clusters.get_mut(label) else {
                return Err(ClusteringError::invalid(format!(
                    "sample {sample} assigned to cluster {label}, but K = {k}"
                )));
            };
            members.push(sample);
        }

        Ok(Self { labels, clusters })
    }

    /// Build a partition from explicit member lists.
    ///
    /// Fails unless the lists cover `0..sample_count` exactly once.
    pub fn from_clusters(clusters: &[Vec<usize>], sample_count: usize) -> ClusteringResult<Self> {
        let mut labels = vec![None; sample_count];
        for (cluster, members) in clusters.iter().enumerate() {
            for &sample in members {
                let Some(slot) = labels.get_mut(sample) else {
                    return Err(ClusteringError::invalid(format!(
                        "sample {sample} is out of range for {sample_count} samples"
                    )));
                };
                if let Some(previous) = *slot {
                    return Err(ClusteringError::invalid(format!(
                        "sample {sample} appears in clusters {previous} and {cluster}"
                    )));
                }
                *slot = Some(cluster);
            }
        }

        let labels = labels
            .into_iter()
            .enumerate()
            .map(|(sample, label)| {
                label.ok_or_else(|| {
                    ClusteringError::invalid(format!("sample {sample} is not assigned to a cluster"))
                })
            })
            .collect::<ClusteringResult<Vec<_>>>()?;

        Self::from_labels(labels, clusters.len())
    }

    /// Number of clusters (K)
    #[must_use]
    pub fn k(&self) -> usize {
        self.clusters.len()
    }

    /// Number of partitioned samples (m)
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    #[must_use]
    pub fn label(&self, sample: usize) -> usize {
        self.labels[sample]
    }

    #[must_use]
    pub fn members(&self, cluster: usize) -> &[usize] {
        &self.clusters[cluster]
    }

    #[must_use]
    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }

    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(Vec::len).collect()
    }

    /// First cluster without members, if any
    #[must_use]
    pub fn first_empty_cluster(&self) -> Option<usize> {
        self.clusters.iter().position(Vec::is_empty)
    }

    /// Fail with `DegenerateCluster` if any cluster is empty.
    pub fn ensure_non_empty(&self) -> ClusteringResult<()> {
        match self.first_empty_cluster() {
            Some(cluster) => Err(ClusteringError::DegenerateCluster { cluster }),
            None => Ok(()),
        }
    }
}

// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Shared parameter and result types for the clustering algorithms.

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Partition};
use crate::distance::Distance;
use crate::error::{ClusteringError, ClusteringResult};
use crate::seeding::SeedingStrategy;

/// Default iteration cap for Lloyd and PAM refinement
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// Parameters shared by every clustering algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusteringParams {
    /// Number of clusters (K)
    pub k: usize,

    /// Upper bound on refinement iterations
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// How initial reference points are drawn
    #[serde(default)]
    pub seeding: SeedingStrategy,
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

impl ClusteringParams {
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seeding: SeedingStrategy::default(),
        }
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn with_seeding(mut self, seeding: SeedingStrategy) -> Self {
        self.seeding = seeding;
        self
    }

    /// Check K against the dataset size
    pub fn validate(&self, data: &Dataset) -> ClusteringResult<()> {
        if self.k == 0 {
            return Err(ClusteringError::invalid("K must be at least 1"));
        }
        if self.k > data.len() {
            return Err(ClusteringError::invalid(format!(
                "K = {} exceeds the number of samples ({})",
                self.k,
                data.len()
            )));
        }
        Ok(())
    }
}

/// Cluster representatives: synthetic centroids or real samples
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum Representatives {
    Centroids(Vec<Vec<f64>>),
    Medoids(Vec<usize>),
}

impl Representatives {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Centroids(centroids) => centroids.len(),
            Self::Medoids(medoids) => medoids.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Medoid sample indices, if these representatives are medoids
    #[must_use]
    pub fn medoids(&self) -> Option<&[usize]> {
        match self {
            Self::Medoids(medoids) => Some(medoids),
            Self::Centroids(_) => None,
        }
    }

    #[must_use]
    pub fn centroids(&self) -> Option<&[Vec<f64>]> {
        match self {
            Self::Centroids(centroids) => Some(centroids),
            Self::Medoids(_) => None,
        }
    }

    /// Vector of the representative of `cluster`
    #[must_use]
    pub fn vector<'a>(&'a self, cluster: usize, data: &'a Dataset) -> &'a [f64] {
        match self {
            Self::Centroids(centroids) => &centroids[cluster],
            Self::Medoids(medoids) => data.sample(medoids[cluster]),
        }
    }
}

/// Outcome of one clustering run (one replicate)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clustering {
    pub representatives: Representatives,
    pub partition: Partition,
    /// Sum of distances from every sample to its cluster representative
    pub cost: f64,
    /// Cost after initial assignment and after every iteration
    pub cost_history: Vec<f64>,
    /// Refinement iterations actually performed
    pub iterations: usize,
    /// Seed of the random generator that produced this result
    pub seed: u64,
}

impl Clustering {
    #[must_use]
    pub fn k(&self) -> usize {
        self.partition.k()
    }

    /// Whether the recorded cost never increased between iterations
    #[must_use]
    pub fn is_cost_monotone(&self, tolerance: f64) -> bool {
        self.cost_history
            .windows(2)
            .all(|pair| pair[1] <= pair[0] + tolerance)
    }
}

/// Sum of distances from each sample to the representative of its cluster
pub fn total_cost<D: Distance + ?Sized>(
    data: &Dataset,
    partition: &Partition,
    representatives: &Representatives,
    distance: &D,
) -> f64 {
    partition
        .clusters()
        .iter()
        .enumerate()
        .map(|(cluster, members)| {
            let center = representatives.vector(cluster, data);
            members
                .iter()
                .map(|&i| distance.distance(data.sample(i), center))
                .sum::<f64>()
        })
        .sum()
}

/// Index of the closest reference vector; ties go to the lowest index.
pub(crate) fn nearest<'a, D, I>(sample: &[f64], references: I, distance: &D) -> (usize, f64)
where
    D: Distance + ?Sized,
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut best = (0, f64::INFINITY);
    for (index, reference) in references.into_iter().enumerate() {
        let d = distance.distance(sample, reference);
        if d < best.1 {
            best = (index, d);
        }
    }
    best
}

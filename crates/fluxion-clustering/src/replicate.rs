// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Multi-seed clustering runs.
//!
//! Every replicate owns its own generator seeded from one entry of the seed
//! list, so replicates share no state and can run on the rayon pool. Results
//! are reduced in seed-list order: on equal scores the earlier seed wins.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::distance::Distance;
use crate::error::{ClusteringError, ClusteringResult};
use crate::kmeans::kmeans;
use crate::kmedoids::{SwapMode, kmedoids, kmedoids_from_means};
use crate::silhouette::silhouette;
use crate::types::{Clustering, ClusteringParams};

/// Fixed seed list used when the caller does not supply one
pub const DEFAULT_SEEDS: [u64; 10] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9];

/// Clustering algorithm run by each replicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Algorithm {
    /// Lloyd's K-Means, synthetic centroids
    KMeans,
    /// Partition-Around-Medoids
    KMedoids {
        #[serde(default)]
        swap: SwapMode,
    },
    /// K-Means centroids snapped to the closest cluster member
    MeanApproximation,
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::KMedoids {
            swap: SwapMode::Exhaustive,
        }
    }
}

impl Algorithm {
    /// Run a single replicate
    pub fn run<D: Distance + ?Sized>(
        &self,
        data: &Dataset,
        params: &ClusteringParams,
        seed: u64,
        distance: &D,
    ) -> ClusteringResult<Clustering> {
        match *self {
            Self::KMeans => kmeans(data, params, seed, distance),
            Self::KMedoids { swap } => kmedoids(data, params, swap, seed, distance),
            Self::MeanApproximation => kmedoids_from_means(data, params, seed, distance),
        }
    }
}

/// How the winning replicate is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicateSelection {
    /// Lowest total intra-cluster cost
    #[default]
    LowestCost,
    /// Highest overall silhouette (requires K >= 2)
    HighestSilhouette,
}

/// Runs one algorithm once per seed and keeps the best replicate
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicateRunner {
    pub algorithm: Algorithm,
    pub params: ClusteringParams,
    pub seeds: Vec<u64>,
    pub selection: ReplicateSelection,
}

impl ReplicateRunner {
    #[must_use]
    pub fn new(algorithm: Algorithm, params: ClusteringParams) -> Self {
        Self {
            algorithm,
            params,
            seeds: DEFAULT_SEEDS.to_vec(),
            selection: ReplicateSelection::default(),
        }
    }

    #[must_use]
    pub fn with_seeds(mut self, seeds: Vec<u64>) -> Self {
        self.seeds = seeds;
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: ReplicateSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Run every replicate and return the best one.
    ///
    /// Configuration errors abort the run. Replicates that degenerate are
    /// discarded; if none survives the run fails with `AllReplicatesFailed`.
    pub fn run<D: Distance + ?Sized>(
        &self,
        data: &Dataset,
        distance: &D,
    ) -> ClusteringResult<Clustering> {
        self.params.validate(data)?;
        if self.seeds.is_empty() {
            return Err(ClusteringError::invalid("replicate run needs at least one seed"));
        }
        if self.selection == ReplicateSelection::HighestSilhouette && self.params.k < 2 {
            return Err(ClusteringError::invalid(
                "silhouette selection needs at least two clusters",
            ));
        }

        tracing::debug!(
            algorithm = ?self.algorithm,
            k = self.params.k,
            samples = data.len(),
            replicates = self.seeds.len(),
            "Starting clustering replicates"
        );

        let outcomes = self.run_all(data, distance);

        let mut best: Option<(Clustering, f64)> = None;
        for (seed, outcome) in self.seeds.iter().zip(outcomes) {
            let clustering = match outcome {
                Ok(clustering) => clustering,
                Err(err) if err.is_recoverable() => {
                    tracing::warn!(seed, error = %err, "Discarding clustering replicate");
                    continue;
                }
                Err(err) => return Err(err),
            };

            let score = match self.selection {
                ReplicateSelection::LowestCost => clustering.cost,
                ReplicateSelection::HighestSilhouette => {
                    -silhouette(data, &clustering.partition, distance)?.overall
                }
            };
            tracing::debug!(seed, cost = clustering.cost, score, "Replicate finished");

            if best.as_ref().is_none_or(|(_, best_score)| score < *best_score) {
                best = Some((clustering, score));
            }
        }

        let (winner, _) = best.ok_or(ClusteringError::AllReplicatesFailed {
            attempts: self.seeds.len(),
        })?;
        tracing::debug!(seed = winner.seed, cost = winner.cost, "Selected replicate");
        Ok(winner)
    }

    #[cfg(feature = "parallel")]
    fn run_all<D: Distance + ?Sized>(
        &self,
        data: &Dataset,
        distance: &D,
    ) -> Vec<ClusteringResult<Clustering>> {
        use rayon::prelude::*;

        self.seeds
            .par_iter()
            .map(|&seed| self.algorithm.run(data, &self.params, seed, distance))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn run_all<D: Distance + ?Sized>(
        &self,
        data: &Dataset,
        distance: &D,
    ) -> Vec<ClusteringResult<Clustering>> {
        self.seeds
            .iter()
            .map(|&seed| self.algorithm.run(data, &self.params, seed, distance))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMetric;

    fn three_blobs() -> Dataset {
        let centres = [(0.0, 0.0), (50.0, 0.0), (25.0, 60.0)];
        let offsets = [(0.0, 0.0), (0.4, 0.1), (-0.3, 0.2), (0.1, -0.4), (-0.2, -0.3)];
        Dataset::new(
            centres
                .iter()
                .flat_map(|&(cx, cy)| offsets.iter().map(move |&(dx, dy)| vec![cx + dx, cy + dy]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_winner_has_lowest_cost() {
        let data = three_blobs();
        let runner = ReplicateRunner::new(
            Algorithm::KMedoids {
                swap: SwapMode::Random,
            },
            ClusteringParams::new(3),
        );
        let winner = runner.run(&data, &DistanceMetric::SquaredEuclidean).unwrap();

        for &seed in &runner.seeds {
            let single = runner
                .algorithm
                .run(&data, &runner.params, seed, &DistanceMetric::SquaredEuclidean)
                .unwrap();
            assert!(winner.cost <= single.cost);
        }
    }

    #[test]
    fn test_tie_keeps_first_seed() {
        // Every replicate reaches the same optimum, so the first seed wins.
        let data = three_blobs();
        let runner = ReplicateRunner::new(Algorithm::default(), ClusteringParams::new(3))
            .with_seeds(vec![5, 3, 8]);
        let winner = runner.run(&data, &DistanceMetric::SquaredEuclidean).unwrap();
        assert_eq!(winner.seed, 5);
    }

    #[test]
    fn test_empty_seed_list_is_rejected() {
        let data = three_blobs();
        let runner =
            ReplicateRunner::new(Algorithm::KMeans, ClusteringParams::new(2)).with_seeds(Vec::new());
        assert!(matches!(
            runner.run(&data, &DistanceMetric::SquaredEuclidean),
            Err(ClusteringError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_all_degenerate_replicates_fail() {
        let data = Dataset::new(vec![vec![3.0]; 6]).unwrap();
        let runner = ReplicateRunner::new(Algorithm::KMeans, ClusteringParams::new(2))
            .with_seeds(vec![1, 2, 3]);
        assert_eq!(
            runner.run(&data, &DistanceMetric::SquaredEuclidean),
            Err(ClusteringError::AllReplicatesFailed { attempts: 3 })
        );
    }

    #[test]
    fn test_silhouette_selection_requires_two_clusters() {
        let data = three_blobs();
        let runner = ReplicateRunner::new(Algorithm::default(), ClusteringParams::new(1))
            .with_selection(ReplicateSelection::HighestSilhouette);
        assert!(runner.run(&data, &DistanceMetric::SquaredEuclidean).is_err());

        let runner = ReplicateRunner::new(Algorithm::default(), ClusteringParams::new(3))
            .with_selection(ReplicateSelection::HighestSilhouette);
        let winner = runner.run(&data, &DistanceMetric::SquaredEuclidean).unwrap();
        let report = silhouette(&data, &winner.partition, &DistanceMetric::SquaredEuclidean)
            .unwrap();
        assert!(report.overall > 0.5);
    }

    #[test]
    fn test_algorithm_deserialize() {
        let algorithm: Algorithm =
            serde_json::from_str(r#"{"type": "k_medoids", "swap": "PAM_Random"}"#).unwrap();
        assert_eq!(
            algorithm,
            Algorithm::KMedoids {
                swap: SwapMode::Random
            }
        );
        let algorithm: Algorithm = serde_json::from_str(r#"{"type": "k_means"}"#).unwrap();
        assert_eq!(algorithm, Algorithm::KMeans);
    }
}

// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Partitioning algorithms behind FluxION's typical-day reduction.
//!
//! # Features
//!
//! - **Seeding**: uniform and K-Means++ selection of initial reference points
//! - **K-Means**: Lloyd refinement with synthetic centroids
//! - **K-Medoids**: PAM with exhaustive or randomized swaps, plus a cheap
//!   mean-approximation mode
//! - **Replicates**: best-of-N runs over a fixed seed list, optionally on rayon
//! - **Silhouette**: per-sample, per-cluster and overall cluster quality
//!
//! All algorithms take a [`Distance`] so the metric can be swapped; the
//! default is squared Euclidean.
//!
//! # Example
//!
//! ```
//! use fluxion_clustering::{
//!     Algorithm, ClusteringParams, Dataset, DistanceMetric, ReplicateRunner, SwapMode,
//! };
//!
//! let data = Dataset::new(vec![
//!     vec![0.0, 0.0],
//!     vec![0.2, 0.1],
//!     vec![9.0, 9.0],
//!     vec![9.1, 8.8],
//! ])?;
//!
//! let runner = ReplicateRunner::new(
//!     Algorithm::KMedoids { swap: SwapMode::Exhaustive },
//!     ClusteringParams::new(2),
//! );
//! let best = runner.run(&data, &DistanceMetric::SquaredEuclidean)?;
//! assert_eq!(best.partition.k(), 2);
//! # Ok::<(), fluxion_clustering::ClusteringError>(())
//! ```

pub mod dataset;
pub mod distance;
pub mod error;
pub mod kmeans;
pub mod kmedoids;
pub mod replicate;
pub mod seeding;
pub mod silhouette;
pub mod types;

// Re-exports for convenience
pub use dataset::{Dataset, Partition};
pub use distance::{Distance, DistanceMetric};
pub use error::{ClusteringError, ClusteringResult};
pub use kmeans::kmeans;
pub use kmedoids::{SwapMode, kmedoids, kmedoids_from_means};
pub use replicate::{Algorithm, DEFAULT_SEEDS, ReplicateRunner, ReplicateSelection};
pub use seeding::{SeedingStrategy, Seeds, seed_kmeans_plus_plus, seed_uniform};
pub use silhouette::{SilhouetteReport, silhouette};
pub use types::{
    Clustering, ClusteringParams, DEFAULT_MAX_ITERATIONS, Representatives, total_cost,
};

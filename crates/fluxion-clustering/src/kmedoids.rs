// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! K-Medoids clustering.
//!
//! Two ways to get K real samples as cluster representatives:
//!
//! - [`kmedoids`]: Partition-Around-Medoids refinement with an exhaustive or
//!   randomized swap search inside each cluster.
//! - [`kmedoids_from_means`]: run K-Means and snap every centroid to the
//!   closest member of its cluster. Cheaper, usually slightly worse.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Partition};
use crate::distance::Distance;
use crate::error::{ClusteringError, ClusteringResult};
use crate::kmeans::kmeans;
use crate::types::{Clustering, ClusteringParams, Representatives, nearest, total_cost};

/// Candidate search used by a PAM swap pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SwapMode {
    /// Try every non-medoid member of the cluster and keep the best one
    #[default]
    #[serde(rename = "exhaustive", alias = "Exhaustive", alias = "PAM_Exhaustive")]
    Exhaustive,
    /// Try a single randomly drawn non-medoid member of the cluster
    #[serde(rename = "random", alias = "Random", alias = "PAM_Random")]
    Random,
}

impl SwapMode {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exhaustive => "Exhaustive",
            Self::Random => "Random",
        }
    }
}

impl std::fmt::Display for SwapMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SwapMode {
    type Err = ClusteringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase();
        match normalized.strip_prefix("pam_").unwrap_or(&normalized) {
            "exhaustive" => Ok(Self::Exhaustive),
            "random" => Ok(Self::Random),
            _ => Err(ClusteringError::invalid(format!("unknown swap mode: {s}"))),
        }
    }
}

/// Run PAM with a generator seeded from `seed`.
///
/// Each outer pass evaluates swaps cluster by cluster against the partition
/// fixed at the start of the pass. A swap is taken only if it strictly lowers
/// that cluster's cost. After the pass the whole dataset is reassigned to the
/// new medoids. The run stops when no swap improves, when reassignment fails
/// to lower the total cost, or at the iteration cap.
pub fn kmedoids<D: Distance + ?Sized>(
    data: &Dataset,
    params: &ClusteringParams,
    swap: SwapMode,
    seed: u64,
    distance: &D,
) -> ClusteringResult<Clustering> {
    params.validate(data)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut medoids = params
        .seeding
        .select(params.k, data, &mut rng, distance)?
        .indices;

    let (labels, mut cost) = assign(data, &medoids, distance);
    let mut partition = Partition::from_labels(labels, params.k)?;
    let mut cost_history = vec![cost];
    let mut iterations = 0;

    while iterations < params.max_iterations {
        iterations += 1;

        let mut candidate_medoids = medoids.clone();
        let mut swaps = 0;
        for (cluster, members) in partition.clusters().iter().enumerate() {
            let current = medoids[cluster];
            let current_cost = cluster_cost(data, members, current, distance);

            let best = match swap {
                SwapMode::Exhaustive => best_swap(data, members, current, distance),
                SwapMode::Random => random_swap(data, members, current, &mut rng, distance),
            };

            if let Some((candidate, candidate_cost)) = best {
                if candidate_cost < current_cost {
                    candidate_medoids[cluster] = candidate;
                    swaps += 1;
                }
            }
        }

        if swaps == 0 {
            tracing::debug!(seed, iterations, cost, "PAM converged, no improving swap");
            break;
        }

        let (labels, next_cost) = assign(data, &candidate_medoids, distance);
        if next_cost >= cost {
            tracing::debug!(seed, iterations, cost, next_cost, "PAM stopped, cost did not decrease");
            break;
        }

        medoids = candidate_medoids;
        partition = Partition::from_labels(labels, params.k)?;
        cost = next_cost;
        cost_history.push(cost);
    }

    partition.ensure_non_empty()?;

    Ok(Clustering {
        representatives: Representatives::Medoids(medoids),
        partition,
        cost,
        cost_history,
        iterations,
        seed,
    })
}

/// Approximate K-Medoids: K-Means, then replace each centroid by the
/// closest member of its cluster (ties go to the lowest sample index).
///
/// The K-Means partition is kept as is; only the cost is recomputed
/// against the chosen medoids.
pub fn kmedoids_from_means<D: Distance + ?Sized>(
    data: &Dataset,
    params: &ClusteringParams,
    seed: u64,
    distance: &D,
) -> ClusteringResult<Clustering> {
    let means = kmeans(data, params, seed, distance)?;

    let medoids = means
        .partition
        .clusters()
        .iter()
        .enumerate()
        .map(|(cluster, members)| {
            let centroid = means.representatives.vector(cluster, data);
            let (position, _) = nearest(
                centroid,
                members.iter().map(|&i| data.sample(i)),
                distance,
            );
            members
                .get(position)
                .copied()
                .ok_or(ClusteringError::DegenerateCluster { cluster })
        })
        .collect::<ClusteringResult<Vec<_>>>()?;

    let representatives = Representatives::Medoids(medoids);
    let cost = total_cost(data, &means.partition, &representatives, distance);

    Ok(Clustering {
        representatives,
        partition: means.partition,
        cost,
        cost_history: vec![cost],
        iterations: means.iterations,
        seed,
    })
}

/// Assign samples to their nearest medoid.
///
/// Medoids are pinned to their own cluster, so a medoid that coincides with
/// another medoid never leaves its cluster empty.
fn assign<D: Distance + ?Sized>(
    data: &Dataset,
    medoids: &[usize],
    distance: &D,
) -> (Vec<usize>, f64) {
    let mut pinned = vec![None; data.len()];
    for (cluster, &medoid) in medoids.iter().enumerate() {
        pinned[medoid] = Some(cluster);
    }

    let mut cost = 0.0;
    let labels = data
        .iter()
        .zip(&pinned)
        .map(|(sample, pin)| {
            if let Some(cluster) = *pin {
                return cluster;
            }
            let (cluster, d) = nearest(sample, medoids.iter().map(|&m| data.sample(m)), distance);
            cost += d;
            cluster
        })
        .collect();
    (labels, cost)
}

/// Cost of a cluster if `medoid` represented it; the medoid itself adds zero
fn cluster_cost<D: Distance + ?Sized>(
    data: &Dataset,
    members: &[usize],
    medoid: usize,
    distance: &D,
) -> f64 {
    let center = data.sample(medoid);
    members
        .iter()
        .filter(|&&i| i != medoid)
        .map(|&i| distance.distance(data.sample(i), center))
        .sum()
}

/// Cheapest non-medoid member as replacement medoid; ties keep the lower index
fn best_swap<D: Distance + ?Sized>(
    data: &Dataset,
    members: &[usize],
    current: usize,
    distance: &D,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for &candidate in members.iter().filter(|&&i| i != current) {
        let cost = cluster_cost(data, members, candidate, distance);
        if best.is_none_or(|(_, best_cost)| cost < best_cost) {
            best = Some((candidate, cost));
        }
    }
    best
}

/// One random non-medoid member; `None` for singleton clusters
fn random_swap<R: Rng, D: Distance + ?Sized>(
    data: &Dataset,
    members: &[usize],
    current: usize,
    rng: &mut R,
    distance: &D,
) -> Option<(usize, f64)> {
    if members.len() < 2 {
        return None;
    }

    let pick = rng.gen_range(0..members.len() - 1);
    let candidate = members
        .iter()
        .copied()
        .filter(|&i| i != current)
        .nth(pick)?;
    Some((candidate, cluster_cost(data, members, candidate, distance)))
}

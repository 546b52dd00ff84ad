// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! K-Means clustering (Lloyd's algorithm).
//!
//! 1. Seed K centroids
//! 2. Assign every sample to its nearest centroid
//! 3. Move every centroid to the centre of its members under the metric
//!    (mean for squared Euclidean, coordinate median for Manhattan, geometric
//!    median for Euclidean), unless that would raise the cluster's cost
//! 4. Repeat 2-3 until no sample changes cluster or the iteration cap is hit
//!
//! An empty cluster keeps its previous centroid while iterating. If it is
//! still empty at the end the run fails with `DegenerateCluster`.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::dataset::{Dataset, Partition};
use crate::distance::Distance;
use crate::error::ClusteringResult;
use crate::types::{Clustering, ClusteringParams, Representatives, nearest};

/// Run K-Means with a generator seeded from `seed`.
pub fn kmeans<D: Distance + ?Sized>(
    data: &Dataset,
    params: &ClusteringParams,
    seed: u64,
    distance: &D,
) -> ClusteringResult<Clustering> {
    params.validate(data)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut centroids = params
        .seeding
        .select(params.k, data, &mut rng, distance)?
        .centroids;

    let (mut labels, mut cost) = assign(data, &centroids, distance);
    let mut cost_history = vec![cost];
    let mut iterations = 0;

    while iterations < params.max_iterations {
        iterations += 1;
        update_centroids(data, &labels, &mut centroids, distance);

        let (next_labels, next_cost) = assign(data, &centroids, distance);
        cost = next_cost;
        cost_history.push(cost);

        let converged = next_labels == labels;
        labels = next_labels;
        if converged {
            tracing::debug!(seed, iterations, cost, "K-Means converged");
            break;
        }
    }

    let partition = Partition::from_labels(labels, params.k)?;
    partition.ensure_non_empty()?;

    Ok(Clustering {
        representatives: Representatives::Centroids(centroids),
        partition,
        cost,
        cost_history,
        iterations,
        seed,
    })
}

/// Nearest-centroid labels and the resulting total cost
fn assign<D: Distance + ?Sized>(
    data: &Dataset,
    centroids: &[Vec<f64>],
    distance: &D,
) -> (Vec<usize>, f64) {
    let mut cost = 0.0;
    let labels = data
        .iter()
        .map(|sample| {
            let (cluster, d) = nearest(sample, centroids.iter().map(Vec::as_slice), distance);
            cost += d;
            cluster
        })
        .collect();
    (labels, cost)
}

fn update_centroids<D: Distance + ?Sized>(
    data: &Dataset,
    labels: &[usize],
    centroids: &mut [Vec<f64>],
    distance: &D,
) {
    let mut members = vec![Vec::new(); centroids.len()];
    for (sample, &label) in labels.iter().enumerate() {
        members[label].push(sample);
    }

    for (centroid, members) in centroids.iter_mut().zip(&members) {
        let Some(centre) = distance.centre(data, members) else {
            continue;
        };
        if cluster_cost(data, members, &centre, distance)
            <= cluster_cost(data, members, centroid, distance)
        {
            *centroid = centre;
        }
    }
}

fn cluster_cost<D: Distance + ?Sized>(
    data: &Dataset,
    members: &[usize],
    centre: &[f64],
    distance: &D,
) -> f64 {
    members
        .iter()
        .map(|&i| distance.distance(data.sample(i), centre))
        .sum()
}

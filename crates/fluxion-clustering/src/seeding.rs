// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Initial reference point selection for K-Means and K-Medoids.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::distance::Distance;
use crate::error::{ClusteringError, ClusteringResult};

/// How the first K reference points are drawn from the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SeedingStrategy {
    /// K distinct samples drawn uniformly without replacement
    #[serde(rename = "uniform", alias = "Uniform")]
    Uniform,
    /// Distance-weighted probabilistic seeding (Arthur & Vassilvitskii)
    #[default]
    #[serde(rename = "kmeans++", alias = "K-Means++", alias = "KMeans++")]
    KMeansPlusPlus,
}

impl SeedingStrategy {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform => "Uniform",
            Self::KMeansPlusPlus => "K-Means++",
        }
    }

    /// Draw K seeds with this strategy
    pub fn select<R: Rng, D: Distance + ?Sized>(
        &self,
        k: usize,
        data: &Dataset,
        rng: &mut R,
        distance: &D,
    ) -> ClusteringResult<Seeds> {
        match self {
            Self::Uniform => seed_uniform(k, data, rng),
            Self::KMeansPlusPlus => seed_kmeans_plus_plus(k, data, rng, distance),
        }
    }
}

impl std::fmt::Display for SeedingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SeedingStrategy {
    type Err = ClusteringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "uniform" | "random" => Ok(Self::Uniform),
            "kmeans++" | "kmeansplusplus" => Ok(Self::KMeansPlusPlus),
            _ => Err(ClusteringError::invalid(format!("unknown seeding strategy: {s}"))),
        }
    }
}

/// Selected seed indices and their sample vectors as initial centroids
#[derive(Debug, Clone, PartialEq)]
pub struct Seeds {
    pub indices: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
}

impl Seeds {
    fn from_indices(indices: Vec<usize>, data: &Dataset) -> Self {
        let centroids = indices.iter().map(|&i| data.sample(i).to_vec()).collect();
        Self { indices, centroids }
    }
}

fn check_k(k: usize, data: &Dataset) -> ClusteringResult<()> {
    if k == 0 {
        return Err(ClusteringError::invalid("K must be at least 1"));
    }
    if k > data.len() {
        return Err(ClusteringError::invalid(format!(
            "K = {k} exceeds the number of samples ({})",
            data.len()
        )));
    }
    Ok(())
}

/// Draw K distinct sample indices uniformly without replacement.
pub fn seed_uniform<R: Rng>(k: usize, data: &Dataset, rng: &mut R) -> ClusteringResult<Seeds> {
    check_k(k, data)?;
    let indices = rand::seq::index::sample(rng, data.len(), k).into_vec();
    Ok(Seeds::from_indices(indices, data))
}

/// K-Means++ seeding.
///
/// The first seed is uniform; every further seed is drawn with probability
/// proportional to its squared distance to the nearest seed chosen so far
/// (see [`Distance::seeding_weight`]).
pub fn seed_kmeans_plus_plus<R: Rng, D: Distance + ?Sized>(
    k: usize,
    data: &Dataset,
    rng: &mut R,
    distance: &D,
) -> ClusteringResult<Seeds> {
    check_k(k, data)?;

    let m = data.len();
    let first = rng.gen_range(0..m);
    let mut indices = Vec::with_capacity(k);
    let mut chosen = vec![false; m];
    indices.push(first);
    chosen[first] = true;

    let mut nearest: Vec<f64> = data
        .iter()
        .map(|sample| distance.seeding_weight(sample, data.sample(first)))
        .collect();

    while indices.len() < k {
        let next = draw_weighted(&nearest, &chosen, rng)?;
        indices.push(next);
        chosen[next] = true;

        let seed = data.sample(next);
        for (weight, sample) in nearest.iter_mut().zip(data.iter()) {
            let d = distance.seeding_weight(sample, seed);
            if d < *weight {
                *weight = d;
            }
        }
    }

    Ok(Seeds::from_indices(indices, data))
}

/// Roulette-wheel selection over the unchosen samples.
///
/// One uniform draw in `[0, total)` against the running cumulative weight.
/// Rounding can leave the draw past the final bucket; it then lands on the
/// last sample with positive weight. If every remaining weight is zero the
/// pick is uniform among unchosen samples.
fn draw_weighted<R: Rng>(weights: &[f64], chosen: &[bool], rng: &mut R) -> ClusteringResult<usize> {
    let candidates: Vec<usize> = (0..weights.len()).filter(|&i| !chosen[i]).collect();
    if candidates.is_empty() {
        return Err(ClusteringError::invalid("no unchosen samples left to seed from"));
    }

    let total: f64 = candidates.iter().map(|&i| weights[i]).sum();
    if !total.is_finite() {
        return Err(ClusteringError::NumericalDegeneracy(
            "K-Means++ weights overflowed".to_owned(),
        ));
    }
    if total <= 0.0 {
        return Ok(candidates[rng.gen_range(0..candidates.len())]);
    }

    let target = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last_positive = candidates[0];
    for &i in &candidates {
        let weight = weights[i];
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last_positive = i;
        if target < cumulative {
            return Ok(i);
        }
    }

    Ok(last_positive)
}

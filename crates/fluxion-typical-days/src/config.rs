// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Typical-day reduction settings, loadable from TOML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fluxion_clustering::{
    Algorithm, ClusteringParams, DEFAULT_MAX_ITERATIONS, DEFAULT_SEEDS, DistanceMetric,
    ReplicateSelection, SeedingStrategy, SwapMode,
};
use serde::{Deserialize, Serialize};

use crate::error::{TypicalDayError, TypicalDayResult};

/// How representative days are found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionMethod {
    /// Partition-Around-Medoids refinement
    #[default]
    Pam,
    /// K-Means, then snap each centroid to its closest member day
    MeanApproximation,
}

/// Per-load normalization applied to clustering features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureScaling {
    /// Raw values
    #[default]
    None,
    /// Each load rescaled to [0, 1] over the year
    MinMax,
}

/// Settings for [`crate::TypicalDayBuilder`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypicalDayConfig {
    /// Number of regular typical days (K), peak days come on top
    #[serde(default = "default_typical_days")]
    pub typical_days: usize,

    #[serde(default)]
    pub method: ReductionMethod,

    /// PAM swap search (ignored by the mean approximation)
    #[serde(default)]
    pub swap_mode: SwapMode,

    #[serde(default)]
    pub seeding: SeedingStrategy,

    #[serde(default)]
    pub metric: DistanceMetric,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// One clustering replicate per seed; the best replicate wins
    #[serde(default = "default_seeds")]
    pub seeds: Vec<u64>,

    #[serde(default)]
    pub feature_scaling: FeatureScaling,

    #[serde(default)]
    pub selection: ReplicateSelection,
}

// Default value functions
fn default_typical_days() -> usize {
    12
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_seeds() -> Vec<u64> {
    DEFAULT_SEEDS.to_vec()
}

impl Default for TypicalDayConfig {
    fn default() -> Self {
        Self {
            typical_days: default_typical_days(),
            method: ReductionMethod::default(),
            swap_mode: SwapMode::default(),
            seeding: SeedingStrategy::default(),
            metric: DistanceMetric::default(),
            max_iterations: default_max_iterations(),
            seeds: default_seeds(),
            feature_scaling: FeatureScaling::default(),
            selection: ReplicateSelection::default(),
        }
    }
}

impl TypicalDayConfig {
    #[must_use]
    pub fn with_typical_days(typical_days: usize) -> Self {
        Self {
            typical_days,
            ..Self::default()
        }
    }

    /// Parse from a TOML document and validate
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TypicalDayConfig =
            toml::from_str(content).context("Failed to parse typical-day TOML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file and validate
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid typical-day config: {}", path.display()))
    }

    pub fn validate(&self) -> TypicalDayResult<()> {
        if self.typical_days == 0 {
            return Err(TypicalDayError::invalid("typical_days must be at least 1"));
        }
        if self.seeds.is_empty() {
            return Err(TypicalDayError::invalid("at least one seed is required"));
        }
        if self.selection == ReplicateSelection::HighestSilhouette && self.typical_days < 2 {
            return Err(TypicalDayError::invalid(
                "silhouette selection needs at least two typical days",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        match self.method {
            ReductionMethod::Pam => Algorithm::KMedoids {
                swap: self.swap_mode,
            },
            ReductionMethod::MeanApproximation => Algorithm::MeanApproximation,
        }
    }

    #[must_use]
    pub fn clustering_params(&self) -> ClusteringParams {
        ClusteringParams::new(self.typical_days)
            .with_max_iterations(self.max_iterations)
            .with_seeding(self.seeding)
    }

    /// Generate an example config as a TOML string
    #[must_use]
    pub fn example_toml() -> String {
        r#"# FluxION typical-day reduction

typical_days = 12
method = "pam"              # pam | mean_approximation
swap_mode = "exhaustive"    # exhaustive | random
seeding = "kmeans++"        # uniform | kmeans++
metric = "squared_euclidean"
max_iterations = 50
seeds = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]
feature_scaling = "none"    # none | min_max
selection = "lowest_cost"   # lowest_cost | highest_silhouette
"#
        .to_owned()
    }
}

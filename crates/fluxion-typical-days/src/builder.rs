// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Annual profiles → weighted typical days.
//!
//! 1. Locate the peak day of every peak-flagged load and take it out of the
//!    clustering set
//! 2. Build one feature vector per remaining calendar day from the
//!    clustering loads
//! 3. Cluster the days (best of several seeded replicates)
//! 4. Use each cluster's medoid day as its typical day, weighted by the
//!    cluster size
//! 5. Rescale scale-corrected loads so the weighted year reproduces the
//!    annual sum
//! 6. Append the peak days, unscaled, with weight 1

use std::collections::HashSet;

use fluxion_clustering::{ClusteringError, ReplicateRunner, silhouette};

use crate::config::TypicalDayConfig;
use crate::error::{TypicalDayError, TypicalDayResult};
use crate::features::{PeakDay, clusterable_days, feature_matrix, locate_peak_days};
use crate::load::{DAYS_PER_YEAR, HOURS_PER_DAY, LoadProfile};
use crate::typical_days::{TypicalDays, TypicalLoad};

/// Below this the implied weighted sum is treated as zero
const MIN_IMPLIED_SUM: f64 = 1e-12;

/// Reduces annual load profiles to typical days
#[derive(Debug, Clone)]
pub struct TypicalDayBuilder {
    config: TypicalDayConfig,
}

impl TypicalDayBuilder {
    #[must_use]
    pub fn new(config: TypicalDayConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &TypicalDayConfig {
        &self.config
    }

    pub fn build(&self, loads: &[LoadProfile]) -> TypicalDayResult<TypicalDays> {
        self.config.validate()?;
        validate_loads(loads)?;

        let peaks = locate_peak_days(loads);
        let days = clusterable_days(&peaks);
        let k = self.config.typical_days;
        if k >= days.len() {
            return Err(TypicalDayError::invalid(format!(
                "{k} typical days requested, but only {} days remain after removing {} peak days",
                days.len(),
                peaks.len()
            )));
        }

        let data = feature_matrix(loads, &days, self.config.feature_scaling)?;
        tracing::debug!(
            days = data.len(),
            features = data.dimension(),
            peak_days = peaks.len(),
            "Built clustering features"
        );

        let clustering =
            ReplicateRunner::new(self.config.algorithm(), self.config.clustering_params())
                .with_seeds(self.config.seeds.clone())
                .with_selection(self.config.selection)
                .run(&data, &self.config.metric)?;

        let medoids = clustering.representatives.medoids().ok_or_else(|| {
            ClusteringError::invalid("typical days need medoids, got synthetic centroids")
        })?;
        let medoid_days: Vec<usize> = medoids.iter().map(|&sample| days[sample]).collect();
        let cluster_sizes = clustering.partition.sizes();

        let silhouette = if k >= 2 {
            Some(silhouette(&data, &clustering.partition, &self.config.metric)?.overall)
        } else {
            None
        };

        let typical_loads: Vec<TypicalLoad> = loads
            .iter()
            .map(|load| typical_load(load, &medoid_days, &cluster_sizes, &peaks))
            .collect();

        let mut day_counts = cluster_sizes;
        day_counts.extend(std::iter::repeat_n(1, peaks.len()));

        let weights: Vec<f64> = day_counts
            .iter()
            .flat_map(|&count| std::iter::repeat_n(count as f64, HOURS_PER_DAY))
            .collect();

        let mut day_assignment = vec![0; DAYS_PER_YEAR];
        for (sample, &day) in days.iter().enumerate() {
            day_assignment[day] = clustering.partition.label(sample);
        }
        for (offset, peak) in peaks.iter().enumerate() {
            day_assignment[peak.day] = k + offset;
        }

        tracing::info!(
            typical_days = k,
            peak_days = peaks.len(),
            seed = clustering.seed,
            cost = clustering.cost,
            silhouette = ?silhouette,
            "Reduced year to typical days"
        );

        Ok(TypicalDays {
            loads: typical_loads,
            weights,
            day_counts,
            medoid_days: medoid_days.iter().map(|day| day + 1).collect(),
            peak_days: peaks,
            day_assignment,
            cost: clustering.cost,
            silhouette,
        })
    }
}

fn validate_loads(loads: &[LoadProfile]) -> TypicalDayResult<()> {
    if loads.is_empty() {
        return Err(TypicalDayError::invalid("no load profiles given"));
    }

    let mut names = HashSet::new();
    for load in loads {
        load.validate()?;
        if !names.insert(load.name.as_str()) {
            return Err(TypicalDayError::invalid(format!(
                "duplicate load name '{}'",
                load.name
            )));
        }
    }

    if !loads.iter().any(|load| load.clustering) {
        return Err(TypicalDayError::invalid(
            "at least one load must take part in clustering",
        ));
    }
    Ok(())
}

fn typical_load(
    load: &LoadProfile,
    medoid_days: &[usize],
    cluster_sizes: &[usize],
    peaks: &[PeakDay],
) -> TypicalLoad {
    let scale_factor = if load.scale_correction {
        scale_factor(load, medoid_days, cluster_sizes, peaks)
    } else {
        1.0
    };

    let mut hourly = Vec::with_capacity((medoid_days.len() + peaks.len()) * HOURS_PER_DAY);
    for &day in medoid_days {
        hourly.extend(load.day(day).iter().map(|value| value * scale_factor));
    }
    for peak in peaks {
        hourly.extend_from_slice(load.day(peak.day));
    }

    TypicalLoad {
        name: load.name.clone(),
        hourly,
        scale_factor,
    }
}

/// Factor for the regular typical days of `load`.
///
/// Peak days are kept unscaled with weight 1, so the regular days only have
/// to make up the annual sum minus the peak-day sums.
#[must_use]
pub fn scale_factor(
    load: &LoadProfile,
    medoid_days: &[usize],
    cluster_sizes: &[usize],
    peaks: &[PeakDay],
) -> f64 {
    let peak_sum: f64 = peaks.iter().map(|peak| load.day_sum(peak.day)).sum();
    let target = load.annual_sum() - peak_sum;
    let implied: f64 = medoid_days
        .iter()
        .zip(cluster_sizes)
        .map(|(&day, &size)| size as f64 * load.day_sum(day))
        .sum();

    if implied.abs() < MIN_IMPLIED_SUM {
        if target.abs() >= MIN_IMPLIED_SUM {
            tracing::warn!(
                load = %load.name,
                target,
                "Typical days of load sum to zero, cannot scale"
            );
        }
        return 1.0;
    }

    let factor = target / implied;
    tracing::debug!(load = %load.name, target, implied, factor, "Scale correction");
    factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::HOURS_PER_YEAR;

    /// Daily shape scaled by a slow seasonal wave, different for every day
    fn seasonal_load(name: &str, amplitude: f64) -> LoadProfile {
        let hourly = (0..HOURS_PER_YEAR)
            .map(|h| {
                let day = (h / HOURS_PER_DAY) as f64;
                let hour = (h % HOURS_PER_DAY) as f64;
                let season = 1.5 + (day / 365.0 * std::f64::consts::TAU).cos();
                let shape = 1.0 + (hour / 24.0 * std::f64::consts::TAU).sin().abs();
                amplitude * season * shape
            })
            .collect();
        LoadProfile::new(name, hourly)
    }

    fn quick_config(typical_days: usize) -> TypicalDayConfig {
        TypicalDayConfig {
            seeds: vec![0, 1, 2],
            ..TypicalDayConfig::with_typical_days(typical_days)
        }
    }

    #[test]
    fn test_scale_factor_reproduces_target() {
        let load = seasonal_load("heat", 2.0);
        let peaks = vec![PeakDay {
            day: 0,
            loads: vec!["heat".to_owned()],
        }];
        let medoid_days = [50, 200];
        let sizes = [200, 164];
        let factor = scale_factor(&load, &medoid_days, &sizes, &peaks);

        let rebuilt = factor
            * (200.0 * load.day_sum(50) + 164.0 * load.day_sum(200))
            + load.day_sum(0);
        assert!((rebuilt - load.annual_sum()).abs() / load.annual_sum() < 1e-12);
    }

    #[test]
    fn test_scale_factor_of_zero_load_is_one() {
        let load = LoadProfile::new("cool", vec![0.0; HOURS_PER_YEAR]);
        assert!((scale_factor(&load, &[3], &[365], &[]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_too_many_typical_days() {
        let loads = vec![seasonal_load("heat", 1.0).with_peak_day()];
        let err = TypicalDayBuilder::new(quick_config(364))
            .build(&loads)
            .unwrap_err();
        assert!(matches!(err, TypicalDayError::InvalidConfiguration(_)));

        assert!(TypicalDayBuilder::new(quick_config(363)).build(&loads).is_ok());
    }

    #[test]
    fn test_rejects_bad_loads() {
        let builder = TypicalDayBuilder::new(quick_config(4));
        assert!(builder.build(&[]).is_err());
        assert!(
            builder
                .build(&[LoadProfile::new("heat", vec![1.0; 100])])
                .is_err()
        );
        assert!(
            builder
                .build(&[seasonal_load("heat", 1.0), seasonal_load("heat", 2.0)])
                .is_err()
        );
        assert!(
            builder
                .build(&[seasonal_load("heat", 1.0).with_clustering(false)])
                .is_err()
        );
    }

    #[test]
    fn test_output_shapes() {
        let loads = vec![
            seasonal_load("heat", 3.0).with_peak_day().with_scale_correction(),
            seasonal_load("elec", 1.0).with_clustering(false),
        ];
        let result = TypicalDayBuilder::new(quick_config(6)).build(&loads).unwrap();

        assert_eq!(result.typical_day_count(), 7);
        assert_eq!(result.weights.len(), 7 * HOURS_PER_DAY);
        for load in &result.loads {
            assert_eq!(load.hourly.len(), 7 * HOURS_PER_DAY);
        }
        assert_eq!(result.day_counts.iter().sum::<usize>(), DAYS_PER_YEAR);
        assert_eq!(result.medoid_days.len(), 6);
        assert!(result.medoid_days.iter().all(|d| (1..=DAYS_PER_YEAR).contains(d)));
        assert!(result.silhouette.is_some());
        assert!((result.load("elec").unwrap().scale_factor - 1.0).abs() < 1e-12);
    }
}

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

// End-to-end reduction of a synthetic year: energy conservation, peak-day
// isolation, reproducibility and the output layout the optimizer relies on.

use std::f64::consts::TAU;

use fluxion_clustering::{ReplicateSelection, SeedingStrategy, SwapMode};
use fluxion_typical_days::{
    DAYS_PER_YEAR, FeatureScaling, HOURS_PER_DAY, HOURS_PER_YEAR, LoadProfile, ReductionMethod,
    TypicalDayBuilder, TypicalDayConfig, TypicalDayError, TypicalDays, clusterable_days,
    feature_matrix, locate_peak_days,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PEAK_DAY: usize = 200;

/// Route library logs to the test harness; `RUST_LOG=debug` shows them
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Daily shape repeated unchanged on every day of the year
const OFFICE_PATTERN: [f64; HOURS_PER_DAY] = [
    0.3, 0.2, 0.2, 0.2, 0.3, 0.5, 0.8, 1.0, 0.9, 0.7, 0.6, 0.5, 0.5, 0.5, 0.6, 0.7, 0.8, 1.0,
    1.2, 1.0, 0.8, 0.6, 0.4, 0.3,
];

fn ambient_temperature() -> Vec<f64> {
    (0..HOURS_PER_YEAR)
        .map(|h| {
            let day = (h / HOURS_PER_DAY) as f64;
            let hour = (h % HOURS_PER_DAY) as f64;
            8.0 - 12.0 * (day / 365.0 * TAU).cos() + 4.0 * ((hour - 9.0) / 24.0 * TAU).sin()
        })
        .collect()
}

fn synthetic_year() -> Vec<LoadProfile> {
    let mut rng = StdRng::seed_from_u64(365);
    let temperature = ambient_temperature();

    let mut heating: Vec<f64> = temperature
        .iter()
        .map(|t| (16.0 - t).max(0.0) * 0.8 + rng.gen_range(0.0..0.5))
        .collect();
    // One extreme cold snap in July keeps the peak far from ordinary winter days
    for value in &mut heating[PEAK_DAY * HOURS_PER_DAY..(PEAK_DAY + 1) * HOURS_PER_DAY] {
        *value += 60.0;
    }

    let cooling: Vec<f64> = temperature
        .iter()
        .map(|t| (t - 18.0).max(0.0) * 1.1 + rng.gen_range(0.0..0.2))
        .collect();

    let electricity: Vec<f64> = (0..HOURS_PER_YEAR)
        .map(|h| OFFICE_PATTERN[h % HOURS_PER_DAY] * 4.0)
        .collect();

    let mut irradiance = Vec::with_capacity(HOURS_PER_YEAR);
    for day in 0..DAYS_PER_YEAR {
        let season = 0.6 - 0.4 * (day as f64 / 365.0 * TAU).cos();
        let clearness: f64 = rng.gen_range(0.3..1.0);
        for hour in 0..HOURS_PER_DAY {
            let sun = ((hour as f64 - 6.0) / 12.0 * std::f64::consts::PI).sin().max(0.0);
            irradiance.push(800.0 * season * clearness * sun);
        }
    }

    vec![
        LoadProfile::new("heating", heating)
            .with_peak_day()
            .with_scale_correction(),
        LoadProfile::new("cooling", cooling).with_scale_correction(),
        LoadProfile::new("electricity", electricity)
            .with_scale_correction()
            .with_clustering(false),
        LoadProfile::new("irradiance_south", irradiance),
        LoadProfile::new("ambient_temperature", temperature).with_clustering(false),
    ]
}

fn config(typical_days: usize) -> TypicalDayConfig {
    TypicalDayConfig {
        seeds: vec![0, 1, 2],
        ..TypicalDayConfig::with_typical_days(typical_days)
    }
}

fn reduce(config: TypicalDayConfig) -> (Vec<LoadProfile>, TypicalDays) {
    init_tracing();
    let loads = synthetic_year();
    let result = TypicalDayBuilder::new(config).build(&loads).unwrap();
    (loads, result)
}

fn relative_error(actual: f64, expected: f64) -> f64 {
    (actual - expected).abs() / expected.abs()
}

#[test]
fn test_repeating_pattern_conserves_energy() {
    let (loads, result) = reduce(config(8));
    let electricity = loads.iter().find(|l| l.name == "electricity").unwrap();

    let weighted = result.weighted_annual_sum("electricity").unwrap();
    assert!(relative_error(weighted, electricity.annual_sum()) < 1e-6);

    // Every day is identical, so no correction is needed
    let factor = result.load("electricity").unwrap().scale_factor;
    assert!((factor - 1.0).abs() < 1e-9);
}

#[test]
fn test_scale_corrected_loads_conserve_energy() {
    for method in [ReductionMethod::Pam, ReductionMethod::MeanApproximation] {
        let (loads, result) = reduce(TypicalDayConfig {
            method,
            ..config(10)
        });

        for load in loads.iter().filter(|l| l.scale_correction) {
            let weighted = result.weighted_annual_sum(&load.name).unwrap();
            assert!(
                relative_error(weighted, load.annual_sum()) < 1e-6,
                "{method:?} / {}: {weighted} vs {}",
                load.name,
                load.annual_sum()
            );
        }
    }
}

#[test]
fn test_uncorrected_loads_use_raw_medoid_days() {
    let (loads, result) = reduce(config(6));
    let irradiance = loads.iter().find(|l| l.name == "irradiance_south").unwrap();
    let typical = result.load("irradiance_south").unwrap();
    assert!((typical.scale_factor - 1.0).abs() < 1e-12);

    for (t, &calendar_day) in result.medoid_days.iter().enumerate() {
        let expected = irradiance.day(calendar_day - 1);
        let actual = &typical.hourly[t * HOURS_PER_DAY..(t + 1) * HOURS_PER_DAY];
        assert_eq!(actual, expected);
    }
}

#[test]
fn test_peak_day_is_kept_alone_and_unscaled() {
    let (loads, result) = reduce(config(8));
    let heating = loads.iter().find(|l| l.name == "heating").unwrap();

    assert_eq!(result.peak_days.len(), 1);
    let peak = &result.peak_days[0];
    assert_eq!(peak.day, PEAK_DAY);
    assert_eq!(peak.calendar_day(), PEAK_DAY + 1);
    assert_eq!(peak.loads, vec!["heating".to_owned()]);

    // Appended after the eight regular days, weight exactly 1
    let start = 8 * HOURS_PER_DAY;
    let typical = result.profile("heating").unwrap();
    assert_eq!(&typical[start..], heating.day(PEAK_DAY));
    assert!(
        result.weights[start..]
            .iter()
            .all(|&w| (w - 1.0).abs() < f64::EPSILON)
    );
    assert_eq!(result.day_counts[8], 1);

    // Never a regular medoid, never part of a regular cluster
    assert!(!result.medoid_days.contains(&(PEAK_DAY + 1)));
    assert_eq!(result.day_assignment[PEAK_DAY], 8);
    let regular_members: usize = result.day_counts[..8].iter().sum();
    assert_eq!(regular_members, DAYS_PER_YEAR - 1);
}

#[test]
fn test_peak_day_is_excluded_from_features() {
    let loads = synthetic_year();
    let peaks = locate_peak_days(&loads);
    let days = clusterable_days(&peaks);
    assert!(!days.contains(&PEAK_DAY));

    let data = feature_matrix(&loads, &days, FeatureScaling::None).unwrap();
    assert_eq!(data.len(), DAYS_PER_YEAR - 1);
    // heating, cooling and irradiance take part in clustering
    assert_eq!(data.dimension(), 3 * HOURS_PER_DAY);
}

#[test]
fn test_every_calendar_day_is_assigned_once() {
    let (_, result) = reduce(config(12));
    assert_eq!(result.day_assignment.len(), DAYS_PER_YEAR);

    let mut counts = vec![0; result.typical_day_count()];
    for &typical in &result.day_assignment {
        counts[typical] += 1;
    }
    assert_eq!(counts, result.day_counts);
    assert_eq!(result.day_counts.iter().sum::<usize>(), DAYS_PER_YEAR);
}

#[test]
fn test_reconstructed_year_matches_weighted_sum() {
    let (_, result) = reduce(config(8));
    for name in ["heating", "cooling", "irradiance_south"] {
        let year = result.reconstruct_year(name).unwrap();
        assert_eq!(year.len(), HOURS_PER_YEAR);
        let total: f64 = year.iter().sum();
        let weighted = result.weighted_annual_sum(name).unwrap();
        assert!(relative_error(total, weighted) < 1e-9);
    }
    assert!(result.reconstruct_year("unknown").is_none());
}

#[test]
fn test_reduction_is_reproducible() {
    let variants = [
        config(8),
        TypicalDayConfig {
            swap_mode: SwapMode::Random,
            seeding: SeedingStrategy::Uniform,
            ..config(8)
        },
        TypicalDayConfig {
            feature_scaling: FeatureScaling::MinMax,
            selection: ReplicateSelection::HighestSilhouette,
            ..config(8)
        },
    ];
    for variant in variants {
        let (_, first) = reduce(variant.clone());
        let (_, second) = reduce(variant);
        assert_eq!(first, second);
    }
}

#[test]
fn test_single_typical_day() {
    let (loads, result) = reduce(config(1));
    assert_eq!(result.typical_day_count(), 2);
    assert_eq!(result.day_counts, vec![DAYS_PER_YEAR - 1, 1]);
    assert!(result.silhouette.is_none());

    let cooling = loads.iter().find(|l| l.name == "cooling").unwrap();
    let weighted = result.weighted_annual_sum("cooling").unwrap();
    assert!(relative_error(weighted, cooling.annual_sum()) < 1e-6);
}

#[test]
fn test_too_many_typical_days_is_rejected() {
    let loads = synthetic_year();
    let err = TypicalDayBuilder::new(config(DAYS_PER_YEAR - 1))
        .build(&loads)
        .unwrap_err();
    assert!(matches!(err, TypicalDayError::InvalidConfiguration(_)));
}

#[test]
fn test_result_serializes_for_optimizer() {
    let (_, result) = reduce(config(4));
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["weights"].as_array().unwrap().len(), 5 * HOURS_PER_DAY);
    assert_eq!(json["loads"].as_array().unwrap().len(), 5);
    assert_eq!(json["peak_days"][0]["loads"][0], "heating");
    assert_eq!(json["peak_days"][0]["day"], PEAK_DAY);
    assert_eq!(json["peak_days"][0]["calendar_day"], PEAK_DAY + 1);
    assert_eq!(json["medoid_days"].as_array().unwrap().len(), 4);
}

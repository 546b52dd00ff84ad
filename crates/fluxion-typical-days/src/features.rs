// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Clustering features: one vector per calendar day, plus peak-day extraction.

use fluxion_clustering::Dataset;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::config::FeatureScaling;
use crate::error::TypicalDayResult;
use crate::load::{DAYS_PER_YEAR, HOURS_PER_DAY, LoadProfile};

/// A calendar day kept as its own typical day.
///
/// Serialized with both `day` (zero-based) and `calendar_day` (one-based,
/// the convention of `medoid_days`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakDay {
    /// Zero-based calendar day
    pub day: usize,
    /// Load types whose annual maximum falls on this day
    pub loads: Vec<String>,
}

impl PeakDay {
    /// One-based calendar day, matching `TypicalDays::medoid_days`
    #[must_use]
    pub fn calendar_day(&self) -> usize {
        self.day + 1
    }
}

impl Serialize for PeakDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PeakDay", 3)?;
        state.serialize_field("day", &self.day)?;
        state.serialize_field("calendar_day", &self.calendar_day())?;
        state.serialize_field("loads", &self.loads)?;
        state.end()
    }
}

/// Peak days of all peak-flagged loads, ordered by calendar day.
///
/// Loads peaking on the same day share one entry.
#[must_use]
pub fn locate_peak_days(loads: &[LoadProfile]) -> Vec<PeakDay> {
    let mut peaks: Vec<PeakDay> = Vec::new();
    for load in loads.iter().filter(|load| load.peak_day) {
        let day = load.peak_day_index();
        tracing::debug!(load = %load.name, day = day + 1, "Located peak day");
        match peaks.iter_mut().find(|peak| peak.day == day) {
            Some(peak) => peak.loads.push(load.name.clone()),
            None => peaks.push(PeakDay {
                day,
                loads: vec![load.name.clone()],
            }),
        }
    }
    peaks.sort_by_key(|peak| peak.day);
    peaks
}

/// Calendar days left for clustering once peak days are removed
#[must_use]
pub fn clusterable_days(peaks: &[PeakDay]) -> Vec<usize> {
    (0..DAYS_PER_YEAR)
        .filter(|day| !peaks.iter().any(|peak| peak.day == *day))
        .collect()
}

/// One feature vector per day in `days`: the day's 24 hours of every
/// clustering load, concatenated in load order.
pub fn feature_matrix(
    loads: &[LoadProfile],
    days: &[usize],
    scaling: FeatureScaling,
) -> TypicalDayResult<Dataset> {
    let clustering: Vec<(&LoadProfile, Scaler)> = loads
        .iter()
        .filter(|load| load.clustering)
        .map(|load| (load, Scaler::fit(load, scaling)))
        .collect();

    let rows = days
        .iter()
        .map(|&day| {
            let mut row = Vec::with_capacity(clustering.len() * HOURS_PER_DAY);
            for (load, scaler) in &clustering {
                row.extend(load.day(day).iter().map(|&v| scaler.apply(v)));
            }
            row
        })
        .collect();

    Ok(Dataset::new(rows)?)
}

#[derive(Debug, Clone, Copy)]
struct Scaler {
    offset: f64,
    factor: f64,
}

impl Scaler {
    fn fit(load: &LoadProfile, scaling: FeatureScaling) -> Self {
        match scaling {
            FeatureScaling::None => Self {
                offset: 0.0,
                factor: 1.0,
            },
            FeatureScaling::MinMax => {
                let min = load.hourly.iter().copied().fold(f64::INFINITY, f64::min);
                let max = load.hourly.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let range = max - min;
                // Flat series carry no shape information
                let factor = if range > 0.0 { 1.0 / range } else { 0.0 };
                Self {
                    offset: min,
                    factor,
                }
            }
        }
    }

    fn apply(self, value: f64) -> f64 {
        (value - self.offset) * self.factor
    }
}

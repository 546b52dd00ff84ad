// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Reduced-horizon output handed to the optimizer.

use serde::Serialize;

use crate::features::PeakDay;
use crate::load::{DAYS_PER_YEAR, HOURS_PER_DAY};

/// Representative hourly profile of one load type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypicalLoad {
    pub name: String,
    /// 24 × (regular + peak typical days) values; regular days first
    pub hourly: Vec<f64>,
    /// Factor applied to the regular typical days (1.0 when not corrected)
    pub scale_factor: f64,
}

/// A year compressed into weighted typical days.
///
/// Typical day `t` covers hours `24 * t .. 24 * (t + 1)` of every hourly
/// array. Regular days come first, ordered by cluster; peak days follow in
/// calendar order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypicalDays {
    pub loads: Vec<TypicalLoad>,
    /// Per output hour, the number of calendar days its typical day stands for
    pub weights: Vec<f64>,
    /// Calendar days represented by each typical day
    pub day_counts: Vec<usize>,
    /// One-based calendar day of each regular typical day's medoid
    pub medoid_days: Vec<usize>,
    /// Peak days appended after the regular typical days
    pub peak_days: Vec<PeakDay>,
    /// Typical day index for each of the 365 calendar days
    pub day_assignment: Vec<usize>,
    /// Intra-cluster cost of the selected clustering
    pub cost: f64,
    /// Overall silhouette of the selected clustering (needs two or more clusters)
    pub silhouette: Option<f64>,
}

impl TypicalDays {
    /// Regular plus peak typical days
    #[must_use]
    pub fn typical_day_count(&self) -> usize {
        self.day_counts.len()
    }

    #[must_use]
    pub fn regular_day_count(&self) -> usize {
        self.medoid_days.len()
    }

    #[must_use]
    pub fn load(&self, name: &str) -> Option<&TypicalLoad> {
        self.loads.iter().find(|load| load.name == name)
    }

    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&[f64]> {
        self.load(name).map(|load| load.hourly.as_slice())
    }

    /// Σ weight × value over all output hours
    #[must_use]
    pub fn weighted_annual_sum(&self, name: &str) -> Option<f64> {
        self.profile(name).map(|hourly| {
            hourly
                .iter()
                .zip(&self.weights)
                .map(|(value, weight)| value * weight)
                .sum()
        })
    }

    /// Expand the typical days back into an 8760-hour series
    #[must_use]
    pub fn reconstruct_year(&self, name: &str) -> Option<Vec<f64>> {
        let hourly = self.profile(name)?;
        let mut year = Vec::with_capacity(DAYS_PER_YEAR * HOURS_PER_DAY);
        for &typical in &self.day_assignment {
            let start = typical * HOURS_PER_DAY;
            year.extend_from_slice(hourly.get(start..start + HOURS_PER_DAY)?);
        }
        Some(year)
    }
}

// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Annual hourly load and weather series.

use serde::{Deserialize, Serialize};

use crate::error::{TypicalDayError, TypicalDayResult};

pub const HOURS_PER_DAY: usize = 24;
pub const DAYS_PER_YEAR: usize = 365;
pub const HOURS_PER_YEAR: usize = HOURS_PER_DAY * DAYS_PER_YEAR;

/// One annual hourly series (heating, cooling, electricity, irradiance,
/// ambient temperature, ...) together with how the reduction treats it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadProfile {
    /// Unique load type name
    pub name: String,

    /// 8760 hourly values, starting at 00:00 on the first calendar day
    pub hourly: Vec<f64>,

    /// Keep the day holding this series' annual maximum as its own typical day
    #[serde(default)]
    pub peak_day: bool,

    /// Include this series in the clustering features
    #[serde(default = "default_clustering")]
    pub clustering: bool,

    /// Rescale representative days so the weighted year matches the annual sum
    #[serde(default)]
    pub scale_correction: bool,
}

fn default_clustering() -> bool {
    true
}

impl LoadProfile {
    /// Series used for clustering, without peak day or scale correction
    pub fn new(name: impl Into<String>, hourly: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            hourly,
            peak_day: false,
            clustering: true,
            scale_correction: false,
        }
    }

    #[must_use]
    pub fn with_peak_day(mut self) -> Self {
        self.peak_day = true;
        self
    }

    #[must_use]
    pub fn with_scale_correction(mut self) -> Self {
        self.scale_correction = true;
        self
    }

    #[must_use]
    pub fn with_clustering(mut self, clustering: bool) -> Self {
        self.clustering = clustering;
        self
    }

    pub fn validate(&self) -> TypicalDayResult<()> {
        if self.hourly.len() != HOURS_PER_YEAR {
            return Err(TypicalDayError::invalid(format!(
                "load '{}' has {} hourly values, expected {HOURS_PER_YEAR}",
                self.name,
                self.hourly.len()
            )));
        }
        if let Some(hour) = self.hourly.iter().position(|v| !v.is_finite()) {
            return Err(TypicalDayError::invalid(format!(
                "load '{}' has a non-finite value at hour {hour}",
                self.name
            )));
        }
        Ok(())
    }

    /// The 24 values of a zero-based calendar day
    #[must_use]
    pub fn day(&self, day: usize) -> &[f64] {
        &self.hourly[day * HOURS_PER_DAY..(day + 1) * HOURS_PER_DAY]
    }

    /// Sum over one zero-based calendar day
    #[must_use]
    pub fn day_sum(&self, day: usize) -> f64 {
        self.day(day).iter().sum()
    }

    #[must_use]
    pub fn annual_sum(&self) -> f64 {
        self.hourly.iter().sum()
    }

    /// Zero-based calendar day containing the annual maximum.
    ///
    /// When the maximum occurs more than once the earliest hour wins.
    #[must_use]
    pub fn peak_day_index(&self) -> usize {
        let mut peak_hour = 0;
        for (hour, value) in self.hourly.iter().enumerate() {
            if *value > self.hourly[peak_hour] {
                peak_hour = hour;
            }
        }
        peak_hour / HOURS_PER_DAY
    }
}

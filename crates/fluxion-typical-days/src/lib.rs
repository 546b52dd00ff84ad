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

//! Typical-day horizon reduction for FluxION
//!
//! Compresses a year of hourly demand and weather series (8760 values per
//! load type) into a handful of representative days, each weighted by the
//! number of calendar days it stands for. Sizing and dispatch optimization
//! then runs over the typical days instead of the full year.
//!
//! # Features
//!
//! - **Medoid days**: every typical day is a real calendar day (PAM or the
//!   K-Means mean approximation)
//! - **Peak days**: the day holding a load's annual maximum is never averaged
//!   away; it is kept as its own typical day with weight 1
//! - **Scale correction**: per-load factors so the weighted typical days add
//!   up to the true annual energy
//! - **Reproducible**: fixed seed list, deterministic tie-breaking
//!
//! # Example
//!
//! ```ignore
//! use fluxion_typical_days::{LoadProfile, TypicalDayBuilder, TypicalDayConfig};
//!
//! let loads = vec![
//!     LoadProfile::new("heating", heating_8760).with_peak_day().with_scale_correction(),
//!     LoadProfile::new("electricity", electricity_8760).with_scale_correction(),
//!     LoadProfile::new("irradiance_south", irradiance_8760),
//!     LoadProfile::new("ambient_temperature", temperature_8760).with_clustering(false),
//! ];
//!
//! let config = TypicalDayConfig::from_file("typical_days.toml")?;
//! let typical = TypicalDayBuilder::new(config).build(&loads)?;
//!
//! for (day, count) in typical.medoid_days.iter().zip(&typical.day_counts) {
//!     println!("day {day} stands for {count} days");
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod features;
pub mod load;
pub mod typical_days;

// Re-exports for convenience
pub use builder::{TypicalDayBuilder, scale_factor};
pub use config::{FeatureScaling, ReductionMethod, TypicalDayConfig};
pub use error::{TypicalDayError, TypicalDayResult};
pub use features::{PeakDay, clusterable_days, feature_matrix, locate_peak_days};
pub use load::{DAYS_PER_YEAR, HOURS_PER_DAY, HOURS_PER_YEAR, LoadProfile};
pub use typical_days::{TypicalDays, TypicalLoad};

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

use fluxion_clustering::ClusteringError;
use thiserror::Error;

/// Typical-day reduction error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypicalDayError {
    /// Malformed load profiles or reduction settings
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Failure inside the clustering engine
    #[error(transparent)]
    Clustering(#[from] ClusteringError),
}

impl TypicalDayError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

pub type TypicalDayResult<T> = Result<T, TypicalDayError>;

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

use thiserror::Error;

/// Clustering error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusteringError {
    /// Malformed input shape or parameters (K out of range, mismatched lengths, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A cluster ended up without members
    #[error("Cluster {cluster} has no members")]
    DegenerateCluster { cluster: usize },

    /// Non-finite values in the input or in a computed distance
    #[error("Numerical degeneracy: {0}")]
    NumericalDegeneracy(String),

    /// Every replicate of a run failed with a recoverable error
    #[error("All {attempts} clustering replicates failed")]
    AllReplicatesFailed { attempts: usize },
}

impl ClusteringError {
    /// Convenience constructor for configuration errors
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Whether the error only invalidates a single replicate.
    ///
    /// Configuration errors are fatal for the whole run, while a degenerate
    /// replicate can be discarded in favour of another seed.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::DegenerateCluster { .. } | Self::NumericalDegeneracy(_) => true,
            Self::InvalidConfiguration(_) | Self::AllReplicatesFailed { .. } => false,
        }
    }
}

pub type ClusteringResult<T> = Result<T, ClusteringError>;

// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::analysis::error::{OpaError, Result};

/// Default upper bound on row length for exhaustive permutation (10! = 3 628 800).
pub const DEFAULT_MAX_PERMUTATION_LEN: usize = 10;

/// Largest row length whose factorial still fits into a `u64`.
pub const HARD_MAX_PERMUTATION_LEN: usize = 20;

/// Which value pairs are compared when building an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PairingPolicy {
    /// Consecutive elements only: (0,1), (1,2), ...
    Adjacent,
    /// All unordered pairs (i, j) with i < j, in row-major order.
    #[default]
    Pairwise,
}

impl PairingPolicy {
    /// Number of relations produced for a sequence of length `n`.
    pub fn n_relations(self, n: usize) -> usize {
        match self {
            PairingPolicy::Adjacent => n.saturating_sub(1),
            PairingPolicy::Pairwise => n * n.saturating_sub(1) / 2,
        }
    }
}

impl fmt::Display for PairingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingPolicy::Adjacent => f.write_str("adjacent"),
            PairingPolicy::Pairwise => f.write_str("pairwise"),
        }
    }
}

impl FromStr for PairingPolicy {
    type Err = OpaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adjacent" => Ok(PairingPolicy::Adjacent),
            "pairwise" => Ok(PairingPolicy::Pairwise),
            _ => Err(OpaError::InvalidPairing(s.to_string())),
        }
    }
}

/// Scoring configuration shared by every row of one analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpaConfig {
    pub pairing: PairingPolicy,
    /// Observed differences with magnitude <= this value are coded as ties.
    pub diff_threshold: f64,
}

impl Default for OpaConfig {
    fn default() -> Self {
        Self {
            pairing: PairingPolicy::Pairwise,
            diff_threshold: 0.0,
        }
    }
}

impl OpaConfig {
    pub fn new(pairing: PairingPolicy, diff_threshold: f64) -> Result<Self> {
        let config = Self {
            pairing,
            diff_threshold,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn adjacent() -> Self {
        Self {
            pairing: PairingPolicy::Adjacent,
            ..Self::default()
        }
    }

    pub fn pairwise() -> Self {
        Self::default()
    }

    pub fn with_threshold(self, diff_threshold: f64) -> Result<Self> {
        Self::new(self.pairing, diff_threshold)
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.diff_threshold)
    }
}

pub(crate) fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(OpaError::InvalidThreshold(threshold))
    }
}

/// Settings for Monte-Carlo c-value estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonteCarloConfig {
    pub nreps: usize,
    /// Shuffle every column across individuals before shuffling each row.
    pub shuffle_across_individuals: bool,
    /// Seed for the generator returned by [`MonteCarloConfig::rng`]; OS entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            nreps: 1000,
            shuffle_across_individuals: false,
            seed: None,
        }
    }
}

impl MonteCarloConfig {
    pub fn new(nreps: usize, shuffle_across_individuals: bool) -> Result<Self> {
        let config = Self {
            nreps,
            shuffle_across_individuals,
            seed: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.nreps == 0 {
            return Err(OpaError::InvalidRepCount(self.nreps));
        }
        Ok(())
    }

    /// Build the generator owned by one randomization run.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Bounds for exhaustive permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PermutationConfig {
    /// Longest row that will be enumerated.
    pub max_len: usize,
}

impl Default for PermutationConfig {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_PERMUTATION_LEN,
        }
    }
}

impl PermutationConfig {
    /// `max_len` is capped at [`HARD_MAX_PERMUTATION_LEN`].
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len: max_len.min(HARD_MAX_PERMUTATION_LEN),
        }
    }

    pub fn check(&self, n: usize) -> Result<()> {
        let max = self.max_len.min(HARD_MAX_PERMUTATION_LEN);
        if n > max {
            return Err(OpaError::PermutationSpaceTooLarge { n, max });
        }
        Ok(())
    }
}

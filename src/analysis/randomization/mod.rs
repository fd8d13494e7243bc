// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

// Randomization module: null distributions by exhaustive permutation or Monte-Carlo shuffling,
// and the empirical c-values derived from them.

pub mod monte_carlo;
pub mod permutation;

use ndarray::Array1;

use crate::analysis::traits::{GlobalValue, LocalValues};

pub use monte_carlo::{NullSampler, monte_carlo_cvalues, monte_carlo_cvalues_seeded};
pub use permutation::{
    LexicalPermutations, permutation_cvalues, permutation_pccs, permutations,
};

/// Empirical individual- and group-level c-values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CvalResult {
    pub group_cval: f64,
    /// Aligned with the rows of the input, `None` for rows without an observed PCC.
    pub individual_cvals: Vec<Option<f64>>,
    /// Monte-Carlo: one group-level randomized PCC per repetition (`NaN` if no row of that
    /// repetition yields pairs). Exhaustive: every attainable group PCC `100 * k / total_pairs`
    /// for `k = 0..=total_pairs`, so the length grows with the pair count and not with n!.
    pub rand_pccs: Array1<f64>,
    /// Exhaustive only: null probability of each entry of `rand_pccs`, summing to 1.
    pub null_weights: Option<Array1<f64>>,
    /// Repetitions (Monte-Carlo) or permutations per row (exhaustive) behind each c-value.
    pub n_reps: usize,
}

impl GlobalValue for CvalResult {
    fn global_value(&self) -> f64 {
        self.group_cval
    }
}

impl LocalValues for CvalResult {
    fn local_values(&self) -> Vec<Option<f64>> {
        self.individual_cvals.clone()
    }
}

/// Result of a run that may be cancelled between repetitions.
#[derive(Debug, Clone, PartialEq)]
pub enum CvalOutcome {
    Completed(CvalResult),
    /// Stopped by the cancel token after `completed` repetitions. `partial` holds c-values
    /// over the completed repetitions, or `None` if none completed.
    Cancelled {
        completed: usize,
        partial: Option<CvalResult>,
    },
}

impl CvalOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CvalOutcome::Cancelled { .. })
    }

    pub fn completed_reps(&self) -> usize {
        match self {
            CvalOutcome::Completed(r) => r.n_reps,
            CvalOutcome::Cancelled { completed, .. } => *completed,
        }
    }

    pub fn result(&self) -> Option<&CvalResult> {
        match self {
            CvalOutcome::Completed(r) => Some(r),
            CvalOutcome::Cancelled { partial, .. } => partial.as_ref(),
        }
    }

    pub fn into_result(self) -> Option<CvalResult> {
        match self {
            CvalOutcome::Completed(r) => Some(r),
            CvalOutcome::Cancelled { partial, .. } => partial,
        }
    }
}

// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2};
use rand::Rng;

use crate::analysis::compare::{self, ConditionComparison, HypothesisComparison};
use crate::analysis::config::{MonteCarloConfig, OpaConfig, PairingPolicy, PermutationConfig};
use crate::analysis::error::Result;
use crate::analysis::ordinal::ordinal_utils::{self, OrdinalCode};
use crate::analysis::randomization::{self, CvalOutcome, CvalResult};
use crate::analysis::scoring::{self, GroupResult, PccRecord};
use crate::analysis::traits::{CancelToken, NeverCancel};

/// Ordinal pattern analysis entry points
///
/// This struct groups the operations consumed by a host layer: encoding, scoring,
/// and the two randomization strategies for c-values.
pub struct Opa;

impl Opa {
    /// Encodes every value as -1, 0 or +1 relative to a difference threshold
    ///
    /// # Arguments
    ///
    /// * `values` - Numeric values, NaN marks a missing value
    /// * `threshold` - Non-negative tolerance; magnitudes up to it are ties
    pub fn encode(values: &[f64], threshold: f64) -> Result<Vec<OrdinalCode>> {
        ordinal_utils::encode(values, threshold)
    }

    /// Ordinal pattern of a sequence under a pairing policy
    ///
    /// # Returns
    ///
    /// N-1 codes for adjacent pairing, N(N-1)/2 codes for pairwise pairing
    pub fn ordering(values: &[f64], policy: PairingPolicy, threshold: f64) -> Result<Vec<OrdinalCode>> {
        ordinal_utils::ordering(values, policy, threshold)
    }

    /// PCC of a single row against a hypothesis
    ///
    /// Missing values in `row` are dropped and the hypothesis is conformed to the remaining positions.
    pub fn row_pcc(row: &[f64], hypothesis: &[f64], config: OpaConfig) -> Result<PccRecord> {
        scoring::row_pcc(row, hypothesis, config)
    }

    /// Group PCC of a data matrix (rows = individuals, columns = conditions)
    pub fn group_pcc(
        data: &Array2<f64>,
        hypothesis: &Array1<f64>,
        config: OpaConfig,
    ) -> Result<GroupResult> {
        scoring::group_pcc(data, hypothesis, config)
    }

    /// Exhaustive c-values with the default bound on row length
    pub fn permutation_cvalues(result: &GroupResult) -> Result<CvalResult> {
        randomization::permutation_cvalues(result, PermutationConfig::default())
    }

    /// Exhaustive c-values with an explicit bound on row length
    pub fn permutation_cvalues_bounded(
        result: &GroupResult,
        bounds: PermutationConfig,
    ) -> Result<CvalResult> {
        randomization::permutation_cvalues(result, bounds)
    }

    /// Monte-Carlo c-values that always run to completion
    ///
    /// # Arguments
    ///
    /// * `result` - Observed group result
    /// * `nreps` - Number of randomized datasets, must be positive
    /// * `shuffle_across_individuals` - Also shuffle every column across rows
    /// * `rng` - Generator owned by this run
    pub fn monte_carlo_cvalues<R: Rng + ?Sized>(
        result: &GroupResult,
        nreps: usize,
        shuffle_across_individuals: bool,
        rng: &mut R,
    ) -> Result<CvalResult> {
        let outcome = randomization::monte_carlo_cvalues(
            result,
            nreps,
            shuffle_across_individuals,
            rng,
            &NeverCancel,
        )?;
        match outcome {
            CvalOutcome::Completed(r) => Ok(r),
            CvalOutcome::Cancelled { .. } => unreachable!("NeverCancel never fires"),
        }
    }

    /// Monte-Carlo c-values polling `cancel` before every repetition
    pub fn monte_carlo_cvalues_cancellable<R, C>(
        result: &GroupResult,
        config: &MonteCarloConfig,
        rng: &mut R,
        cancel: &C,
    ) -> Result<CvalOutcome>
    where
        R: Rng + ?Sized,
        C: CancelToken + ?Sized,
    {
        config.validate()?;
        randomization::monte_carlo_cvalues(
            result,
            config.nreps,
            config.shuffle_across_individuals,
            rng,
            cancel,
        )
    }

    /// PCC and c-value for every pair of conditions
    ///
    /// Uses the generator described by `mc` (seeded when `mc.seed` is set).
    pub fn compare_conditions(
        data: &Array2<f64>,
        hypothesis: &Array1<f64>,
        config: OpaConfig,
        mc: &MonteCarloConfig,
    ) -> Result<ConditionComparison> {
        let mut rng = mc.rng();
        compare::compare_conditions(data, hypothesis, config, mc, &mut rng, &NeverCancel)
    }

    /// Difference between two hypotheses on the same data and its c-value
    pub fn compare_hypotheses(
        first: &GroupResult,
        second: &GroupResult,
        mc: &MonteCarloConfig,
    ) -> Result<HypothesisComparison> {
        mc.validate()?;
        let mut rng = mc.rng();
        compare::compare_hypotheses(
            first,
            second,
            mc.nreps,
            mc.shuffle_across_individuals,
            &mut rng,
            &NeverCancel,
        )
    }
}

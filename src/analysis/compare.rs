// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2, Axis, array};
use rand::Rng;
use tracing::{debug, info};

use crate::analysis::config::{MonteCarloConfig, OpaConfig};
use crate::analysis::error::{OpaError, Result};
use crate::analysis::randomization::CvalOutcome;
use crate::analysis::randomization::monte_carlo::{
    GroupTally, NullSampler, PCC_TOLERANCE, monte_carlo_cvalues, score_rows,
};
use crate::analysis::scoring::group::{GroupResult, group_pcc};
use crate::analysis::scoring::row::RowScorer;
use crate::analysis::traits::CancelToken;

/// Score and c-value of the hypothesis restricted to two conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionPair {
    pub first: usize,
    pub second: usize,
    /// `None` when no row has both conditions defined.
    pub pcc: Option<f64>,
    /// `None` when `pcc` is undefined or the run was cancelled before this pair.
    pub cval: Option<f64>,
}

/// Pairwise condition comparison.
///
/// `pccs` and `cvals` are `n_conditions x n_conditions`, filled above the diagonal;
/// every other cell, and every undefined entry, is `NaN`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionComparison {
    pub pairs: Vec<ConditionPair>,
    pub pccs: Array2<f64>,
    pub cvals: Array2<f64>,
    pub cancelled: bool,
}

impl ConditionComparison {
    pub fn get(&self, first: usize, second: usize) -> Option<&ConditionPair> {
        let (a, b) = if first < second { (first, second) } else { (second, first) };
        self.pairs.iter().find(|p| p.first == a && p.second == b)
    }
}

/// Compare every pair of conditions (i < j) by restricting data and hypothesis to the two columns.
pub fn compare_conditions<R, C>(
    data: &Array2<f64>,
    hypothesis: &Array1<f64>,
    config: OpaConfig,
    mc: &MonteCarloConfig,
    rng: &mut R,
    cancel: &C,
) -> Result<ConditionComparison>
where
    R: Rng + ?Sized,
    C: CancelToken + ?Sized,
{
    mc.validate()?;
    config.validate()?;
    let n = hypothesis.len();
    if data.ncols() != n {
        return Err(OpaError::invalid_dimension(n, data.ncols()));
    }
    if n < 2 {
        return Err(OpaError::invalid_dimension(2, n));
    }

    let mut pairs = Vec::with_capacity(n * (n - 1) / 2);
    let mut pccs = Array2::from_elem((n, n), f64::NAN);
    let mut cvals = Array2::from_elem((n, n), f64::NAN);
    let mut cancelled = false;

    for i in 0..n {
        for j in (i + 1)..n {
            let mut pair = ConditionPair {
                first: i,
                second: j,
                pcc: None,
                cval: None,
            };
            if !cancelled {
                let sub = data.select(Axis(1), &[i, j]);
                let sub_hyp = array![hypothesis[i], hypothesis[j]];
                match group_pcc(&sub, &sub_hyp, config) {
                    Ok(result) => {
                        pair.pcc = Some(result.group_pcc);
                        pccs[[i, j]] = result.group_pcc;
                        match monte_carlo_cvalues(
                            &result,
                            mc.nreps,
                            mc.shuffle_across_individuals,
                            rng,
                            cancel,
                        )? {
                            CvalOutcome::Completed(c) => {
                                pair.cval = Some(c.group_cval);
                                cvals[[i, j]] = c.group_cval;
                            }
                            CvalOutcome::Cancelled { .. } => {
                                info!(first = i, second = j, "condition comparison cancelled");
                                cancelled = true;
                            }
                        }
                    }
                    Err(OpaError::EmptyPairSet { .. }) => {}
                    Err(e) => return Err(e),
                }
            }
            pairs.push(pair);
        }
    }
    debug!(conditions = n, cancelled, "conditions compared");
    Ok(ConditionComparison {
        pairs,
        pccs,
        cvals,
        cancelled,
    })
}

/// Difference between two hypotheses scored on the same data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HypothesisComparison {
    pub first_pcc: f64,
    pub second_pcc: f64,
    /// `first_pcc - second_pcc`
    pub pcc_diff: f64,
    /// Proportion of repetitions whose difference is at least the observed one in magnitude,
    /// ties included; `None` if no repetition completed.
    pub cval: Option<f64>,
    /// Randomized difference per completed repetition (`NaN` when undefined).
    pub rand_diffs: Array1<f64>,
    pub n_reps: usize,
    pub cancelled: bool,
}

/// Compare two hypotheses on the same data.
///
/// Each repetition shuffles the data once and scores both hypotheses on that same draw.
/// When every row has the same number of pairs the differences are compared on integer
/// correct-pair totals, otherwise on the means of the defined row PCCs.
pub fn compare_hypotheses<R, C>(
    first: &GroupResult,
    second: &GroupResult,
    nreps: usize,
    shuffle_across_individuals: bool,
    rng: &mut R,
    cancel: &C,
) -> Result<HypothesisComparison>
where
    R: Rng + ?Sized,
    C: CancelToken + ?Sized,
{
    if nreps == 0 {
        return Err(OpaError::InvalidRepCount(nreps));
    }
    if first.config != second.config {
        return Err(OpaError::IncompatibleResults(
            "results were computed with different configurations",
        ));
    }
    if first.data.dim() != second.data.dim() {
        return Err(OpaError::invalid_dimension(first.n_conditions(), second.n_conditions()));
    }
    if !same_data(&first.data, &second.data) {
        return Err(OpaError::IncompatibleResults("results were computed on different data"));
    }

    let h1 = first.hypothesis_slice();
    let h2 = second.hypothesis_slice();
    let s1 = RowScorer::new(&h1, first.config)?;
    let s2 = RowScorer::new(&h2, second.config)?;
    let mut sampler = NullSampler::new(&first.data, shuffle_across_individuals);

    let pcc_diff = first.group_pcc - second.group_pcc;
    let o1 = GroupTally::from_records(&first.row_records);
    let o2 = GroupTally::from_records(&second.row_records);
    let obs_count_diff = o1.correct().abs_diff(o2.correct());
    let obs_mean_diff = match (o1.mean(), o2.mean()) {
        (Some(a), Some(b)) => (a - b).abs(),
        _ => f64::NAN,
    };
    let mut rand_diffs = Vec::with_capacity(nreps);
    let mut exceed = 0usize;
    let mut cancelled = false;

    for rep in 0..nreps {
        if cancel.is_cancelled() {
            info!(completed = rep, nreps, "hypothesis comparison cancelled");
            cancelled = true;
            break;
        }
        let rows = sampler.draw(rng);
        let t1 = GroupTally::from_records(&score_rows(&s1, rows)?);
        let t2 = GroupTally::from_records(&score_rows(&s2, rows)?);
        let d = match (t1.mean(), t2.mean()) {
            (Some(a), Some(b)) => a - b,
            _ => f64::NAN,
        };
        let at_least = if t1.same_shape(&o1) && t2.same_shape(&o2) {
            t1.correct().abs_diff(t2.correct()) >= obs_count_diff
        } else {
            d.abs() >= obs_mean_diff - PCC_TOLERANCE
        };
        if at_least {
            exceed += 1;
        }
        rand_diffs.push(d);
    }

    let n_reps = rand_diffs.len();
    Ok(HypothesisComparison {
        first_pcc: first.group_pcc,
        second_pcc: second.group_pcc,
        pcc_diff,
        cval: (n_reps > 0).then(|| exceed as f64 / n_reps as f64),
        rand_diffs: Array1::from(rand_diffs),
        n_reps,
        cancelled,
    })
}

/// Element-wise equality where NaN matches NaN.
fn same_data(a: &Array2<f64>, b: &Array2<f64>) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
}

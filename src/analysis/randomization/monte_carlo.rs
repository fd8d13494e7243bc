// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::analysis::config::MonteCarloConfig;
use crate::analysis::error::{OpaError, Result};
use crate::analysis::randomization::{CvalOutcome, CvalResult};
use crate::analysis::scoring::group::GroupResult;
use crate::analysis::scoring::row::{PccRecord, RowScorer};
use crate::analysis::traits::CancelToken;

/// Draws randomized copies of a data matrix.
///
/// Without `shuffle_across_individuals` every row is a random permutation of its own values.
/// With it, every column is first shuffled across rows and each resulting row is then shuffled.
#[derive(Debug, Clone)]
pub struct NullSampler {
    base: Vec<Vec<f64>>,
    work: Vec<Vec<f64>>,
    column: Vec<f64>,
    across: bool,
}

impl NullSampler {
    pub fn new(data: &Array2<f64>, shuffle_across_individuals: bool) -> Self {
        let base: Vec<Vec<f64>> = data.rows().into_iter().map(|r| r.to_vec()).collect();
        Self {
            work: base.clone(),
            column: Vec::with_capacity(data.nrows()),
            base,
            across: shuffle_across_individuals,
        }
    }

    /// Produce the next randomized matrix, one `Vec` per row.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[Vec<f64>] {
        for (w, b) in self.work.iter_mut().zip(self.base.iter()) {
            w.copy_from_slice(b);
        }
        if self.across {
            let ncols = self.base.first().map_or(0, Vec::len);
            for j in 0..ncols {
                self.column.clear();
                self.column.extend(self.work.iter().map(|r| r[j]));
                self.column.shuffle(rng);
                for (r, &v) in self.work.iter_mut().zip(self.column.iter()) {
                    r[j] = v;
                }
            }
        }
        for row in self.work.iter_mut() {
            row.shuffle(rng);
        }
        &self.work
    }
}

/// Score randomized rows. Rows that yield no pairs come back as `None`.
pub(crate) fn score_rows(scorer: &RowScorer<'_>, rows: &[Vec<f64>]) -> Result<Vec<Option<PccRecord>>> {
    rows.iter()
        .map(|row| match scorer.score(row) {
            Ok(rec) => Ok(Some(rec)),
            Err(OpaError::EmptyPairSet { .. }) => Ok(None),
            Err(e) => Err(e),
        })
        .collect()
}

/// Group-level randomized PCC: the mean of the defined per-row PCCs.
pub(crate) fn mean_pcc(records: &[Option<PccRecord>]) -> Option<f64> {
    let (sum, n) = records
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(s, n), r| (s + r.pcc, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Absolute slack on PCC comparisons that cannot be done on integer counts.
pub(crate) const PCC_TOLERANCE: f64 = 1e-9;

/// Summary of one scored matrix used for tie-exact comparisons.
///
/// `pairs` is `Some(n)` when every defined row has exactly `n` pairs; then the mean PCC
/// is a fixed multiple of `correct` and comparisons run on the integer count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GroupTally {
    rows: usize,
    pairs: Option<usize>,
    correct: usize,
    mean: Option<f64>,
}

impl GroupTally {
    pub(crate) fn from_records(records: &[Option<PccRecord>]) -> Self {
        let mut rows = 0usize;
        let mut correct = 0usize;
        let mut pairs: Option<usize> = None;
        let mut uniform = true;
        for r in records.iter().flatten() {
            rows += 1;
            correct += r.correct_pairs;
            match pairs {
                None if rows == 1 => pairs = Some(r.n_pairs),
                Some(n) if n != r.n_pairs => uniform = false,
                _ => {}
            }
        }
        Self {
            rows,
            pairs: if uniform { pairs } else { None },
            correct,
            mean: mean_pcc(records),
        }
    }

    pub(crate) fn mean(&self) -> Option<f64> {
        self.mean
    }

    pub(crate) fn correct(&self) -> usize {
        self.correct
    }

    /// Whether both tallies reduce to integer correct-pair counts over the same shape.
    pub(crate) fn same_shape(&self, other: &Self) -> bool {
        self.pairs.is_some() && self.pairs == other.pairs && self.rows == other.rows
    }

    /// `self >= other` on the mean PCC, ties included. `None` if either side has no rows.
    pub(crate) fn at_least(&self, other: &Self) -> Option<bool> {
        if self.same_shape(other) {
            return Some(self.correct >= other.correct);
        }
        Some(self.mean? >= other.mean? - PCC_TOLERANCE)
    }
}

/// Monte-Carlo c-values over `nreps` randomized datasets.
///
/// A repetition counts for a row when its randomized PCC is at least the row's observed PCC,
/// and for the group when the mean randomized PCC is at least the observed one. When all rows
/// have the same number of pairs the group comparison runs on integer correct-pair totals,
/// otherwise on the means of the defined row PCCs.
/// `cancel` is polled at the top of every repetition.
pub fn monte_carlo_cvalues<R, C>(
    result: &GroupResult,
    nreps: usize,
    shuffle_across_individuals: bool,
    rng: &mut R,
    cancel: &C,
) -> Result<CvalOutcome>
where
    R: Rng + ?Sized,
    C: CancelToken + ?Sized,
{
    if nreps == 0 {
        return Err(OpaError::InvalidRepCount(nreps));
    }
    let hyp = result.hypothesis_slice();
    let scorer = RowScorer::new(&hyp, result.config)?;
    let mut sampler = NullSampler::new(&result.data, shuffle_across_individuals);
    let observed = GroupTally::from_records(&result.row_records);

    let mut exceed = vec![0usize; result.n_rows()];
    let mut group_exceed = 0usize;
    let mut rand_pccs: Vec<f64> = Vec::with_capacity(nreps);

    for rep in 0..nreps {
        if cancel.is_cancelled() {
            info!(completed = rep, nreps, "monte-carlo run cancelled");
            let partial = (rep > 0).then(|| cvals(result, &exceed, group_exceed, rand_pccs, rep));
            return Ok(CvalOutcome::Cancelled {
                completed: rep,
                partial,
            });
        }
        let records = score_rows(&scorer, sampler.draw(rng))?;
        for (i, rec) in records.iter().enumerate() {
            if let (Some(rand), Some(obs)) = (rec, result.individual_pccs[i]) {
                if rand.pcc >= obs {
                    exceed[i] += 1;
                }
            }
        }
        let tally = GroupTally::from_records(&records);
        match tally.mean() {
            Some(group_rand) => {
                if tally.at_least(&observed) == Some(true) {
                    group_exceed += 1;
                }
                rand_pccs.push(group_rand);
            }
            None => {
                warn!(rep, "no row of this repetition yields pairs");
                rand_pccs.push(f64::NAN);
            }
        }
    }

    let out = cvals(result, &exceed, group_exceed, rand_pccs, nreps);
    debug!(
        nreps,
        shuffle_across_individuals,
        group_cval = out.group_cval,
        "monte-carlo c-values computed"
    );
    Ok(CvalOutcome::Completed(out))
}

/// Run [`monte_carlo_cvalues`] with a generator built from `config`.
pub fn monte_carlo_cvalues_seeded<C>(
    result: &GroupResult,
    config: &MonteCarloConfig,
    cancel: &C,
) -> Result<CvalOutcome>
where
    C: CancelToken + ?Sized,
{
    config.validate()?;
    let mut rng = config.rng();
    monte_carlo_cvalues(
        result,
        config.nreps,
        config.shuffle_across_individuals,
        &mut rng,
        cancel,
    )
}

fn cvals(
    result: &GroupResult,
    exceed: &[usize],
    group_exceed: usize,
    rand_pccs: Vec<f64>,
    reps: usize,
) -> CvalResult {
    let n = reps as f64;
    CvalResult {
        group_cval: group_exceed as f64 / n,
        individual_cvals: exceed
            .iter()
            .zip(result.individual_pccs.iter())
            .map(|(&e, obs)| obs.map(|_| e as f64 / n))
            .collect(),
        rand_pccs: Array1::from(rand_pccs),
        null_weights: None,
        n_reps: reps,
    }
}

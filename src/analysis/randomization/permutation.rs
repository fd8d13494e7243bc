// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::Array1;
use tracing::debug;

use crate::analysis::config::{OpaConfig, PermutationConfig};
use crate::analysis::error::{OpaError, Result};
use crate::analysis::randomization::CvalResult;
use crate::analysis::scoring::group::GroupResult;
use crate::analysis::scoring::row::{PccRecord, RowScorer};

/// Factorial for n ≤ 20 (fits in u64).
pub fn factorial(n: usize) -> Option<u64> {
    (1..=n as u64).try_fold(1u64, |acc, k| acc.checked_mul(k))
}

/// All orderings of the positions 0..n, in lexicographic order starting with the identity.
///
/// Positions are permuted, not values, so repeated values yield repeated permutations.
#[derive(Debug, Clone)]
pub struct LexicalPermutations {
    idx: Vec<usize>,
    started: bool,
    done: bool,
}

impl LexicalPermutations {
    pub fn new(n: usize) -> Self {
        Self {
            idx: (0..n).collect(),
            started: false,
            done: false,
        }
    }

    /// Step to the next permutation in place. Returns `false` once exhausted.
    pub fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }
        if !self.started {
            self.started = true;
            return true;
        }
        let n = self.idx.len();
        if n < 2 {
            self.done = true;
            return false;
        }
        // Rightmost ascent
        let mut i = n - 1;
        while i > 0 && self.idx[i - 1] >= self.idx[i] {
            i -= 1;
        }
        if i == 0 {
            self.done = true;
            return false;
        }
        let mut j = n - 1;
        while self.idx[j] <= self.idx[i - 1] {
            j -= 1;
        }
        self.idx.swap(i - 1, j);
        self.idx[i..].reverse();
        true
    }

    /// Current permutation of positions.
    pub fn indices(&self) -> &[usize] {
        &self.idx
    }
}

impl Iterator for LexicalPermutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().then(|| self.idx.clone())
    }
}

/// Every permutation of `values` (n! of them, duplicates kept).
pub fn permutations(values: &[f64]) -> Vec<Vec<f64>> {
    LexicalPermutations::new(values.len())
        .map(|p| p.iter().map(|&k| values[k]).collect())
        .collect()
}

/// Visit every permutation of `values` through a reused buffer.
fn for_each_permutation<F>(values: &[f64], mut f: F) -> Result<()>
where
    F: FnMut(&[f64]) -> Result<()>,
{
    let mut perms = LexicalPermutations::new(values.len());
    let mut buf = values.to_vec();
    while perms.advance() {
        for (slot, &k) in buf.iter_mut().zip(perms.indices()) {
            *slot = values[k];
        }
        f(&buf)?;
    }
    Ok(())
}

/// Score every permutation of `row` against `hypothesis`.
pub fn permutation_pccs(
    row: &[f64],
    hypothesis: &[f64],
    config: OpaConfig,
    bounds: PermutationConfig,
) -> Result<Vec<PccRecord>> {
    bounds.check(row.len())?;
    let scorer = RowScorer::new(hypothesis, config)?;
    let mut out = Vec::new();
    for_each_permutation(row, |perm| {
        out.push(scorer.score(perm)?);
        Ok(())
    })?;
    Ok(out)
}

/// Exhaustive c-values: every row is compared with all n! permutations of its own values.
///
/// The group c-value is exact: the per-row null distributions of correct pairs are
/// convolved, and the probability of reaching at least the observed correct pairs is reported.
/// The null distribution comes back as attainable group PCCs (`rand_pccs`) with their
/// probabilities (`null_weights`); per-permutation scores are not kept.
pub fn permutation_cvalues(result: &GroupResult, bounds: PermutationConfig) -> Result<CvalResult> {
    let n = result.n_conditions();
    bounds.check(n)?;
    let n_perms = factorial(n).ok_or(OpaError::PermutationSpaceTooLarge {
        n,
        max: bounds.max_len,
    })? as usize;

    let hyp = result.hypothesis_slice();
    let scorer = RowScorer::new(&hyp, result.config)?;

    let mut individual_cvals = Vec::with_capacity(result.n_rows());
    // dist[k] = P(total correct pairs == k) over the rows seen so far
    let mut dist: Vec<f64> = vec![1.0];

    for (i, row) in result.data.rows().into_iter().enumerate() {
        let Some(observed) = result.row_records[i] else {
            individual_cvals.push(None);
            continue;
        };
        let row = row.to_vec();
        let mut hist = vec![0usize; observed.n_pairs + 1];
        let mut exceed = 0usize;
        for_each_permutation(&row, |perm| {
            let rec = scorer.score(perm)?;
            hist[rec.correct_pairs] += 1;
            if rec.pcc >= observed.pcc {
                exceed += 1;
            }
            Ok(())
        })?;
        individual_cvals.push(Some(exceed as f64 / n_perms as f64));
        dist = convolve(&dist, &hist, n_perms);
    }

    let group_cval: f64 = dist.iter().skip(result.correct_pairs).sum();
    let total = dist.len() - 1;
    let rand_pccs: Array1<f64> = (0..=total)
        .map(|k| 100.0 * k as f64 / total as f64)
        .collect();
    debug!(
        rows = result.n_rows(),
        n_perms,
        group_cval,
        "exhaustive permutation c-values computed"
    );
    Ok(CvalResult {
        group_cval: group_cval.clamp(0.0, 1.0),
        individual_cvals,
        rand_pccs,
        null_weights: Some(Array1::from(dist)),
        n_reps: n_perms,
    })
}

/// Distribution of the sum of two independent counts, `hist` normalised by `total`.
fn convolve(dist: &[f64], hist: &[usize], total: usize) -> Vec<f64> {
    let mut out = vec![0.0; dist.len() + hist.len() - 1];
    for (a, &pa) in dist.iter().enumerate() {
        if pa == 0.0 {
            continue;
        }
        for (b, &cnt) in hist.iter().enumerate() {
            if cnt > 0 {
                out[a + b] += pa * cnt as f64 / total as f64;
            }
        }
    }
    out
}

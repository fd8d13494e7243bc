// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::borrow::Cow;

use ndarray::{Array1, Array2, ArrayView1};
use tracing::{debug, warn};

use crate::analysis::config::OpaConfig;
use crate::analysis::error::{OpaError, Result};
use crate::analysis::scoring::row::{PccRecord, RowScorer};
use crate::analysis::traits::{GlobalValue, LocalValues};

/// Observed scores of a whole data matrix against one hypothesis.
///
/// Carries the data, hypothesis and configuration so the randomization routines
/// can consume it as a single bundle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupResult {
    pub group_pcc: f64,
    /// One entry per row, `None` for rows that yield no pairs.
    pub individual_pccs: Vec<Option<f64>>,
    pub total_pairs: usize,
    pub correct_pairs: usize,
    pub row_records: Vec<Option<PccRecord>>,
    pub data: Array2<f64>,
    pub hypothesis: Array1<f64>,
    pub config: OpaConfig,
}

impl GroupResult {
    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_conditions(&self) -> usize {
        self.data.ncols()
    }

    /// Indices of rows excluded because they yield no pairs.
    pub fn excluded_rows(&self) -> Vec<usize> {
        self.individual_pccs
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.is_none().then_some(i))
            .collect()
    }

    pub(crate) fn hypothesis_slice(&self) -> Cow<'_, [f64]> {
        contiguous(self.hypothesis.view())
    }
}

impl GlobalValue for GroupResult {
    fn global_value(&self) -> f64 {
        self.group_pcc
    }
}

impl LocalValues for GroupResult {
    fn local_values(&self) -> Vec<Option<f64>> {
        self.individual_pccs.clone()
    }
}

/// Borrow a 1D view as a slice, copying only when it is not contiguous.
pub(crate) fn contiguous<'a>(view: ArrayView1<'a, f64>) -> Cow<'a, [f64]> {
    match view.to_slice() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(view.to_vec()),
    }
}

/// Score every row of `data` and aggregate pair counts into the group PCC.
///
/// Rows that yield no pairs are excluded from the totals and reported as `None`.
pub fn group_pcc(
    data: &Array2<f64>,
    hypothesis: &Array1<f64>,
    config: OpaConfig,
) -> Result<GroupResult> {
    if data.nrows() == 0 {
        return Err(OpaError::EmptyData);
    }
    if data.ncols() != hypothesis.len() {
        return Err(OpaError::invalid_dimension(hypothesis.len(), data.ncols()));
    }
    let hyp = contiguous(hypothesis.view());
    let scorer = RowScorer::new(&hyp, config)?;

    let mut row_records = Vec::with_capacity(data.nrows());
    let mut total_pairs = 0usize;
    let mut correct_pairs = 0usize;
    for (i, row) in data.rows().into_iter().enumerate() {
        match scorer.score(&contiguous(row)) {
            Ok(rec) => {
                total_pairs += rec.n_pairs;
                correct_pairs += rec.correct_pairs;
                row_records.push(Some(rec));
            }
            Err(OpaError::EmptyPairSet { .. }) => {
                warn!(row = i, "row yields no pairs after removing missing values, excluded");
                row_records.push(None);
            }
            Err(e) => return Err(e),
        }
    }
    let group = PccRecord::from_counts(total_pairs, correct_pairs)?;
    debug!(
        rows = data.nrows(),
        total_pairs,
        correct_pairs,
        group_pcc = group.pcc,
        pairing = %config.pairing,
        "group pcc computed"
    );

    Ok(GroupResult {
        group_pcc: group.pcc,
        individual_pccs: row_records.iter().map(|r| r.map(|r| r.pcc)).collect(),
        total_pairs,
        correct_pairs,
        row_records,
        data: data.to_owned(),
        hypothesis: Array1::from(hyp.into_owned()),
        config,
    })
}

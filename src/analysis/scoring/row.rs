// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::borrow::Cow;

use crate::analysis::config::OpaConfig;
use crate::analysis::error::{OpaError, Result};
use crate::analysis::ordinal::ordinal_utils::{
    OrdinalCode, conform, drop_missing, has_missing, ordering,
};

/// Pair counts and PCC for one row.
///
/// `pcc == 100 * correct_pairs / n_pairs`; a record is only built when `n_pairs > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PccRecord {
    pub n_pairs: usize,
    pub correct_pairs: usize,
    pub pcc: f64,
}

impl PccRecord {
    /// Build a record from pair counts. Fails with `EmptyPairSet` when `n_pairs == 0`.
    pub fn from_counts(n_pairs: usize, correct_pairs: usize) -> Result<Self> {
        if n_pairs == 0 {
            return Err(OpaError::EmptyPairSet { row: None });
        }
        debug_assert!(correct_pairs <= n_pairs);
        Ok(Self {
            n_pairs,
            correct_pairs,
            pcc: 100.0 * correct_pairs as f64 / n_pairs as f64,
        })
    }
}

/// Scores rows against one hypothesis.
///
/// The hypothesis ordering is always built with zero tolerance. It is computed once
/// for complete rows and recomputed from the conformed hypothesis for rows with missing values.
#[derive(Debug, Clone)]
pub struct RowScorer<'h> {
    hypothesis: &'h [f64],
    full_ordering: Vec<OrdinalCode>,
    config: OpaConfig,
}

impl<'h> RowScorer<'h> {
    pub fn new(hypothesis: &'h [f64], config: OpaConfig) -> Result<Self> {
        config.validate()?;
        let full_ordering = ordering(hypothesis, config.pairing, 0.0)?;
        Ok(Self {
            hypothesis,
            full_ordering,
            config,
        })
    }

    pub fn hypothesis(&self) -> &'h [f64] {
        self.hypothesis
    }

    pub fn config(&self) -> OpaConfig {
        self.config
    }

    /// Score one row. Returns `EmptyPairSet` when fewer than two values are defined.
    pub fn score(&self, row: &[f64]) -> Result<PccRecord> {
        if row.len() != self.hypothesis.len() {
            return Err(OpaError::invalid_dimension(self.hypothesis.len(), row.len()));
        }
        let conformed_ordering: Vec<OrdinalCode>;
        let (observed, hyp_ordering): (Cow<'_, [f64]>, &[OrdinalCode]) = if has_missing(row) {
            let defined = drop_missing(row);
            if defined.len() < 2 {
                return Err(OpaError::EmptyPairSet { row: None });
            }
            let h = conform(row, self.hypothesis)?;
            conformed_ordering = ordering(&h, self.config.pairing, 0.0)?;
            (Cow::Owned(defined), conformed_ordering.as_slice())
        } else {
            (Cow::Borrowed(row), self.full_ordering.as_slice())
        };
        let obs_ordering = ordering(&observed, self.config.pairing, self.config.diff_threshold)?;
        debug_assert_eq!(obs_ordering.len(), hyp_ordering.len());

        let correct = obs_ordering
            .iter()
            .zip(hyp_ordering.iter())
            .filter(|(o, h)| o == h)
            .count();
        PccRecord::from_counts(obs_ordering.len(), correct)
    }
}

/// Score a single row against `hypothesis`.
pub fn row_pcc(row: &[f64], hypothesis: &[f64], config: OpaConfig) -> Result<PccRecord> {
    RowScorer::new(hypothesis, config)?.score(row)
}

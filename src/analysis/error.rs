// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for ordinal pattern analysis.

use thiserror::Error;

/// Errors raised synchronously at the start of the offending operation.
///
/// Cancellation of a Monte-Carlo run is not an error, see
/// [`CvalOutcome`](crate::analysis::randomization::CvalOutcome).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OpaError {
    /// Row, hypothesis or sequence length does not match what the operation needs.
    #[error("Invalid dimension: expected {expected}, actual {actual}")]
    InvalidDimension {
        /// Required length (or minimum length)
        expected: usize,
        /// Length that was provided
        actual: usize,
    },

    /// A row yields zero valid pairs after missing values are removed.
    /// `row` is `None` when no row of a matrix yields any pair.
    #[error("Empty pair set{}", row_suffix(.row))]
    EmptyPairSet {
        /// Index of the offending row, if known
        row: Option<usize>,
    },

    /// Difference threshold is negative or not finite.
    #[error("Invalid threshold: {0} (must be finite and >= 0)")]
    InvalidThreshold(f64),

    /// Exhaustive enumeration was requested for a row longer than the configured bound.
    #[error("Permutation space too large: {n}! permutations exceed the bound of {max}!")]
    PermutationSpaceTooLarge {
        /// Row length
        n: usize,
        /// Largest accepted row length
        max: usize,
    },

    /// Repetition count must be positive.
    #[error("Invalid repetition count: {0}")]
    InvalidRepCount(usize),

    /// Unknown pairing policy name.
    #[error("Invalid pairing policy: {0:?} (expected \"adjacent\" or \"pairwise\")")]
    InvalidPairing(String),

    /// Two results cannot be compared with each other.
    #[error("Incompatible results: {0}")]
    IncompatibleResults(&'static str),

    /// Data matrix has no rows.
    #[error("Data matrix has no rows")]
    EmptyData,
}

impl OpaError {
    /// Create an InvalidDimension error.
    pub fn invalid_dimension(expected: usize, actual: usize) -> Self {
        Self::InvalidDimension { expected, actual }
    }

    /// Create an EmptyPairSet error for a known row.
    pub fn empty_pair_set(row: usize) -> Self {
        Self::EmptyPairSet { row: Some(row) }
    }
}

fn row_suffix(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!(" in row {r}"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, OpaError>;

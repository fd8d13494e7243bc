use std::borrow::Cow;

use crate::analysis::config::{PairingPolicy, validate_threshold};
use crate::analysis::error::{OpaError, Result};

/// Ordinal relation between two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrdinalCode {
    /// -1
    Decrease,
    /// 0
    Tie,
    /// +1
    Increase,
    /// Undefined input (NaN). Never produced by a threshold comparison.
    Missing,
}

impl OrdinalCode {
    /// Numeric form in {-1, 0, 1}, `None` for `Missing`.
    pub fn value(self) -> Option<i8> {
        match self {
            OrdinalCode::Decrease => Some(-1),
            OrdinalCode::Tie => Some(0),
            OrdinalCode::Increase => Some(1),
            OrdinalCode::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        self == OrdinalCode::Missing
    }
}

/// Sign of `x` conditional on a difference threshold.
///
/// Equivalent to the classical sign function when `threshold == 0`.
#[inline]
pub fn sign_with_threshold(x: f64, threshold: f64) -> OrdinalCode {
    if x.is_nan() {
        OrdinalCode::Missing
    } else if x > threshold {
        OrdinalCode::Increase
    } else if x < -threshold {
        OrdinalCode::Decrease
    } else {
        OrdinalCode::Tie
    }
}

/// Encode every value as an ordinal code. Output has the same length and order as `values`.
pub fn encode(values: &[f64], threshold: f64) -> Result<Vec<OrdinalCode>> {
    validate_threshold(threshold)?;
    Ok(values
        .iter()
        .map(|&x| sign_with_threshold(x, threshold))
        .collect())
}

/// Index pairs compared under `policy` for a sequence of length `n`.
///
/// Pairwise order is (0,1), (0,2), ..., (0,n-1), (1,2), ...; adjacent order is (i, i+1).
pub fn pairs(n: usize, policy: PairingPolicy) -> Result<Vec<(usize, usize)>> {
    if n < 1 {
        return Err(OpaError::invalid_dimension(1, n));
    }
    let mut out = Vec::with_capacity(policy.n_relations(n));
    match policy {
        PairingPolicy::Adjacent => {
            for i in 0..n - 1 {
                out.push((i, i + 1));
            }
        }
        PairingPolicy::Pairwise => {
            for i in 0..n {
                for j in (i + 1)..n {
                    out.push((i, j));
                }
            }
        }
    }
    Ok(out)
}

/// Differences `xs[j] - xs[i]` over the pairs generated by `policy`.
///
/// For an input of length N the pairwise output has length N(N-1)/2, the adjacent output N-1.
pub fn differences(xs: &[f64], policy: PairingPolicy) -> Vec<f64> {
    let n = xs.len();
    let mut diffs = Vec::with_capacity(policy.n_relations(n));
    match policy {
        PairingPolicy::Adjacent => {
            diffs.extend(xs.windows(2).map(|w| w[1] - w[0]));
        }
        PairingPolicy::Pairwise => {
            for i in 0..n {
                for j in (i + 1)..n {
                    diffs.push(xs[j] - xs[i]);
                }
            }
        }
    }
    diffs
}

/// Ordinal pattern of `xs`: the encoded differences under `policy`.
///
/// Requires at least two values.
pub fn ordering(xs: &[f64], policy: PairingPolicy, threshold: f64) -> Result<Vec<OrdinalCode>> {
    if xs.len() < 2 {
        return Err(OpaError::invalid_dimension(2, xs.len()));
    }
    encode(&differences(xs, policy), threshold)
}

pub fn has_missing(xs: &[f64]) -> bool {
    xs.iter().any(|x| x.is_nan())
}

/// Values of `xs` that are not missing, in order.
pub fn drop_missing(xs: &[f64]) -> Vec<f64> {
    xs.iter().copied().filter(|x| !x.is_nan()).collect()
}

/// Align `hypothesis` to the defined positions of `row`.
///
/// Borrows the hypothesis unchanged when the row has no missing values.
pub fn conform<'h>(row: &[f64], hypothesis: &'h [f64]) -> Result<Cow<'h, [f64]>> {
    if row.len() != hypothesis.len() {
        return Err(OpaError::invalid_dimension(hypothesis.len(), row.len()));
    }
    if !has_missing(row) {
        return Ok(Cow::Borrowed(hypothesis));
    }
    Ok(Cow::Owned(
        row.iter()
            .zip(hypothesis.iter())
            .filter(|(r, _)| !r.is_nan())
            .map(|(_, &h)| h)
            .collect(),
    ))
}

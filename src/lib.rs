// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # opa
//!
//! Ordinal Pattern Analysis: scores how well the ordering of repeated measurements
//! matches a hypothesized ordinal pattern, and estimates the significance of that score
//! by randomization.
//!
//! ## Quick Start
//!
//! ```rust
//! use opa::{Opa, OpaConfig, GlobalValue};
//! use ndarray::array;
//!
//! let data = array![[1.0, 2.0, 3.0], [3.0, 2.0, 1.0]];
//! let hypothesis = array![1.0, 2.0, 3.0];
//! let result = Opa::group_pcc(&data, &hypothesis, OpaConfig::default()).unwrap();
//! assert_eq!(result.global_value(), 50.0);
//! ```
//!
//! ## Building Blocks
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Ordinal encoding | `analysis::ordinal` | codes in {-1, 0, +1} |
//! | Row scoring | `analysis::scoring::row` | `PccRecord` |
//! | Group aggregation | `analysis::scoring::group` | `GroupResult` |
//! | Exhaustive permutation | `analysis::randomization::permutation` | `CvalResult` |
//! | Monte-Carlo shuffling | `analysis::randomization::monte_carlo` | `CvalOutcome` |
//!
//! ## PCC and c-values
//!
//! The PCC (percent correct classifications) is the percentage of ordinal relations in the
//! observed data that agree with the hypothesis. A c-value is the proportion of randomized
//! datasets whose PCC is at least as large as the observed one. It is an empirical rank,
//! no parametric approximation is involved.
//!
//! ## Feature Flags
//!
//! - `serde`: derive `Serialize`/`Deserialize` for configuration and result records.
//!
//! ## Reproducibility
//!
//! Every randomization routine takes its random generator by `&mut`, so a seeded
//! `rand::rngs::StdRng` makes results reproducible. No process-global RNG state is used.

pub mod analysis;

pub use analysis::compare::{ConditionComparison, ConditionPair, HypothesisComparison};
pub use analysis::config::{MonteCarloConfig, OpaConfig, PairingPolicy, PermutationConfig};
pub use analysis::error::{OpaError, Result};
pub use analysis::opa::Opa;
pub use analysis::ordinal::ordinal_utils::OrdinalCode;
pub use analysis::randomization::{CvalOutcome, CvalResult};
pub use analysis::scoring::{GroupResult, PccRecord};
pub use analysis::traits::{CancelFn, CancelToken, GlobalValue, LocalValues, NeverCancel};

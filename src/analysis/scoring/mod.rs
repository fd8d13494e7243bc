// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

// Scoring module: percent correct classifications for single rows and whole groups.

pub mod group;
pub mod row;

pub use group::{GroupResult, group_pcc};
pub use row::{PccRecord, RowScorer, row_pcc};

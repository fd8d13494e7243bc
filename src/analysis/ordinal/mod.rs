// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

// Ordinal encoding module
// Converts numeric sequences into relation codes and aligns hypotheses to partially missing rows.

pub mod ordinal_utils;

pub use ordinal_utils::{conform, differences, drop_missing, encode, ordering, pairs, OrdinalCode};

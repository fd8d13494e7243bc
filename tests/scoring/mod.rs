//! Tests for row and group PCC.
mod group_pcc;

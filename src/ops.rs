// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

pub mod duplicates;
pub mod extract;
pub mod filter;
pub mod gc;
pub mod merge;
pub mod revcomp;
pub mod search;
pub mod split;
pub mod summary;
pub mod translate;
pub mod validate;

// Percentages are reported with two decimals.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(100.0 * part as f64 / whole as f64)
    }
}

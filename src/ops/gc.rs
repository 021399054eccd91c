// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

//! Nucleotide composition: per-record counts and percentages, optional sliding-window GC profile,
//! and an overall summary across records.

use log::{debug, info};
use serde::Serialize;

use crate::ops::{percent, round2};
use crate::seq::record::{strip_whitespace, SeqRecord};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BaseCounts {
    #[serde(rename = "A")]
    pub a: usize,
    #[serde(rename = "T")]
    pub t: usize,
    #[serde(rename = "G")]
    pub g: usize,
    #[serde(rename = "C")]
    pub c: usize,
    #[serde(rename = "N")]
    pub n: usize,
}

impl BaseCounts {
    // Expects uppercase input; anything not A, T, G, C or N is ignored.
    pub fn from_bytes(seq: &[u8]) -> Self {
        let mut counts = BaseCounts::default();
        for b in seq {
            match b {
                b'A' => counts.a += 1,
                b'T' => counts.t += 1,
                b'G' => counts.g += 1,
                b'C' => counts.c += 1,
                b'N' => counts.n += 1,
                _ => {}
            }
        }
        counts
    }

    pub fn known(&self) -> usize {
        self.a + self.t + self.g + self.c
    }

    pub fn gc_percent(&self) -> f64 {
        percent(self.g + self.c, self.known())
    }

    pub fn at_percent(&self) -> f64 {
        percent(self.a + self.t, self.known())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStats {
    pub window_size: usize,
    pub window_count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GcStats {
    pub id: String,
    pub length: usize,
    pub gc_content: f64,
    pub at_content: f64,
    pub n_content: f64,
    pub counts: BaseCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sliding_window: Option<WindowStats>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallGc {
    pub total_sequences: usize,
    pub total_length: usize,
    pub mean_gc: f64,
    pub min_gc: f64,
    pub max_gc: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GcResult {
    pub overall: OverallGc,
    pub sequences: Vec<GcStats>,
}

fn normalized(sequence: &str) -> Vec<u8> {
    strip_whitespace(sequence).to_ascii_uppercase().into_bytes()
}

// One GC% per start position, step 1. Only defined for 0 < window_size < len.
pub fn sliding_window_gc(seq: &[u8], window_size: usize) -> Option<WindowStats> {
    if window_size == 0 || window_size >= seq.len() {
        return None;
    }
    let values: Vec<f64> = seq
        .windows(window_size)
        .map(|w| BaseCounts::from_bytes(w).gc_percent())
        .collect();
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(WindowStats {
        window_size,
        window_count: values.len(),
        mean: round2(mean),
        min: round2(min),
        max: round2(max),
        std_dev: round2(variance.sqrt()),
        values,
    })
}

pub fn gc_stats(record: &SeqRecord, window_size: Option<usize>) -> GcStats {
    let seq = normalized(&record.sequence);
    let counts = BaseCounts::from_bytes(&seq);
    let sliding_window = window_size.and_then(|w| sliding_window_gc(&seq, w));
    if window_size.is_some() && sliding_window.is_none() {
        debug!(
            "{}: window size {:?} not below sequence length {}, no windows",
            record.id,
            window_size,
            seq.len()
        );
    }
    GcStats {
        id: record.id.clone(),
        length: seq.len(),
        gc_content: counts.gc_percent(),
        at_content: counts.at_percent(),
        n_content: percent(counts.n, seq.len()),
        counts,
        sliding_window,
    }
}

pub fn overall_gc(stats: &[GcStats]) -> OverallGc {
    let gcs: Vec<f64> = stats.iter().map(|s| s.gc_content).collect();
    let mean = if gcs.is_empty() {
        0.0
    } else {
        round2(gcs.iter().sum::<f64>() / gcs.len() as f64)
    };
    OverallGc {
        total_sequences: stats.len(),
        total_length: stats.iter().map(|s| s.length).sum(),
        mean_gc: mean,
        min_gc: gcs.iter().copied().reduce(f64::min).unwrap_or(0.0),
        max_gc: gcs.iter().copied().reduce(f64::max).unwrap_or(0.0),
    }
}

pub fn gc_content(records: &[SeqRecord], window_size: Option<usize>) -> GcResult {
    info!(
        "GC content of {} records (window: {:?})",
        records.len(),
        window_size
    );
    let sequences: Vec<GcStats> = records.iter().map(|r| gc_stats(r, window_size)).collect();
    GcResult {
        overall: overall_gc(&sequences),
        sequences,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_counts_and_percentages() {
        let rec = SeqRecord::new("s", "", "ggccAT NN\tx");
        let stats = gc_stats(&rec, None);
        assert_eq!(stats.length, 9);
        assert_eq!(
            stats.counts,
            BaseCounts { a: 1, t: 1, g: 2, c: 2, n: 2 }
        );
        assert_abs_diff_eq!(stats.gc_content, 66.67);
        assert_abs_diff_eq!(stats.at_content, 33.33);
        assert_abs_diff_eq!(stats.n_content, 22.22);
        assert!(stats.sliding_window.is_none());
    }

    #[test]
    fn test_no_known_bases() {
        let stats = gc_stats(&SeqRecord::new("s", "", "NNNN"), None);
        assert_eq!(stats.gc_content, 0.0);
        assert_eq!(stats.at_content, 0.0);
        assert_eq!(stats.n_content, 100.0);
        let empty = gc_stats(&SeqRecord::new("e", "", ""), None);
        assert_eq!(empty.n_content, 0.0);
    }

    #[test]
    fn test_bounds() {
        for s in ["ACGTRYNN", "GGGG", "atat", "", "N-N-CG"] {
            let stats = gc_stats(&SeqRecord::new("s", "", s), None);
            assert!(stats.gc_content >= 0.0 && stats.gc_content <= 100.0);
            assert!(stats.gc_content + stats.at_content <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn test_sliding_window() {
        let rec = SeqRecord::new("s", "", "GGAA");
        let stats = gc_stats(&rec, Some(2));
        let win = stats.sliding_window.expect("windows");
        assert_eq!(win.window_count, 3);
        assert_eq!(win.values, vec![100.0, 50.0, 0.0]);
        assert_abs_diff_eq!(win.mean, 50.0);
        assert_abs_diff_eq!(win.min, 0.0);
        assert_abs_diff_eq!(win.max, 100.0);
        // population std dev of (100, 50, 0)
        assert_abs_diff_eq!(win.std_dev, 40.82);
    }

    #[test]
    fn test_window_not_smaller_than_sequence_is_skipped() {
        let rec = SeqRecord::new("s", "", "GGAA");
        assert!(gc_stats(&rec, Some(4)).sliding_window.is_none());
        assert!(gc_stats(&rec, Some(10)).sliding_window.is_none());
        assert!(gc_stats(&rec, Some(0)).sliding_window.is_none());
    }

    #[test]
    fn test_overall() {
        let records = vec![
            SeqRecord::new("a", "", "GGCC"),
            SeqRecord::new("b", "", "GCAT"),
            SeqRecord::new("c", "", "AAAT"),
        ];
        let result = gc_content(&records, None);
        assert_eq!(result.sequences.len(), 3);
        assert_eq!(result.overall.total_sequences, 3);
        assert_eq!(result.overall.total_length, 12);
        assert_abs_diff_eq!(result.overall.mean_gc, 50.0);
        assert_abs_diff_eq!(result.overall.min_gc, 0.0);
        assert_abs_diff_eq!(result.overall.max_gc, 100.0);
    }

    #[test]
    fn test_overall_empty() {
        let overall = overall_gc(&[]);
        assert_eq!(overall.total_sequences, 0);
        assert_eq!(overall.mean_gc, 0.0);
    }
}

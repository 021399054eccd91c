// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use log::info;
use serde::Serialize;

use crate::errors::FastaError;
use crate::ops::gc::BaseCounts;
use crate::ops::round2;
use crate::ops::validate::{detect_type, duplicate_ids, SequenceType};
use crate::seq::file::position_of;
use crate::seq::record::SeqRecord;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedRecord {
    pub id: String,
    pub description: String,
    pub sequence: String,
    pub length: usize,
}

impl From<&SeqRecord> for LoadedRecord {
    fn from(rec: &SeqRecord) -> Self {
        LoadedRecord {
            id: rec.id.clone(),
            description: rec.description.clone(),
            sequence: rec.sequence.clone(),
            length: rec.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadResult {
    pub count: usize,
    pub sequences: Vec<LoadedRecord>,
}

pub fn load(records: &[SeqRecord]) -> LoadResult {
    LoadResult {
        count: records.len(),
        sequences: records.iter().map(LoadedRecord::from).collect(),
    }
}

pub fn get_by_id(records: &[SeqRecord], id: &str) -> Result<LoadedRecord, FastaError> {
    position_of(records, id)
        .map(|i| LoadedRecord::from(&records[i]))
        .ok_or_else(|| FastaError::NotFound(format!("no sequence with id '{}'", id)))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_sequences: usize,
    pub total_length: usize,
    pub min_length: usize,
    pub max_length: usize,
    pub mean_length: f64,
    pub median_length: f64,
    pub n50: usize,
    pub gc_content: f64,
    pub sequence_type: SequenceType,
    pub empty_sequences: usize,
    pub duplicate_ids: usize,
}

// Smallest length L such that records of length >= L hold at least half of all residues.
pub fn n50(lengths: &[usize]) -> usize {
    let mut sorted = lengths.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    let total: usize = sorted.iter().sum();
    let mut running = 0;
    for len in sorted {
        running += len;
        if running * 2 >= total {
            return len;
        }
    }
    0
}

fn median(lengths: &[usize]) -> f64 {
    if lengths.is_empty() {
        return 0.0;
    }
    let mut sorted = lengths.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    }
}

pub fn summarize(records: &[SeqRecord]) -> Summary {
    info!("summarising {} records", records.len());
    let lengths: Vec<usize> = records.iter().map(|r| r.len()).collect();
    let total: usize = lengths.iter().sum();

    let all_residues: String = records
        .iter()
        .map(|r| r.residues())
        .collect::<String>()
        .to_ascii_uppercase();
    let counts = BaseCounts::from_bytes(all_residues.as_bytes());

    Summary {
        total_sequences: records.len(),
        total_length: total,
        min_length: lengths.iter().copied().min().unwrap_or(0),
        max_length: lengths.iter().copied().max().unwrap_or(0),
        mean_length: if records.is_empty() {
            0.0
        } else {
            round2(total as f64 / records.len() as f64)
        },
        median_length: median(&lengths),
        n50: n50(&lengths),
        gc_content: counts.gc_percent(),
        sequence_type: detect_type(&all_residues),
        empty_sequences: records.iter().filter(|r| r.is_empty()).count(),
        duplicate_ids: duplicate_ids(records).len(),
    }
}

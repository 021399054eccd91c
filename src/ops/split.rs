// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::{debug, info};
use serde::Serialize;

use crate::errors::FastaError;
use crate::seq::fasta::{format_fasta, format_record};
use crate::seq::record::SeqRecord;

pub const DEFAULT_SPLIT_COUNT: usize = 100;
pub const DEFAULT_SPLIT_SIZE_MB: usize = 10;
pub const BYTES_PER_MB: usize = 1024 * 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitBy {
    Count,
    Size,
    Individual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPlan {
    Individual,
    Count(usize),
    /// Byte budget per chunk.
    Size(usize),
}

impl SplitPlan {
    // `value` is records per file for Count and megabytes for Size.
    pub fn new(split_by: SplitBy, value: Option<usize>) -> Result<Self, FastaError> {
        if value == Some(0) {
            return Err(FastaError::Param(String::from("split value must be positive")));
        }
        Ok(match split_by {
            SplitBy::Individual => SplitPlan::Individual,
            SplitBy::Count => SplitPlan::Count(value.unwrap_or(DEFAULT_SPLIT_COUNT)),
            SplitBy::Size => SplitPlan::Size(value.unwrap_or(DEFAULT_SPLIT_SIZE_MB) * BYTES_PER_MB),
        })
    }
}

// Formatted size of a record, including its final newline.
fn record_bytes(record: &SeqRecord) -> usize {
    format_record(record).len() + 1
}

/// Partitions records into contiguous chunks. In Size mode a chunk is closed when the next record
/// would push it past the budget; a chunk always holds at least one record.
pub fn partition(records: &[SeqRecord], plan: SplitPlan) -> Vec<&[SeqRecord]> {
    match plan {
        SplitPlan::Individual => records.chunks(1).collect(),
        SplitPlan::Count(n) => records.chunks(n.max(1)).collect(),
        SplitPlan::Size(budget) => {
            let mut chunks = Vec::new();
            let mut start = 0;
            let mut size = 0;
            for (i, record) in records.iter().enumerate() {
                let bytes = record_bytes(record);
                if i > start && size + bytes > budget {
                    chunks.push(&records[start..i]);
                    start = i;
                    size = 0;
                }
                size += bytes;
            }
            if start < records.len() {
                chunks.push(&records[start..]);
            }
            chunks
        }
    }
}

pub fn sanitize_file_name(id: &str) -> String {
    let cleaned: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        String::from("unnamed")
    } else {
        cleaned
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitFile {
    pub path: String,
    pub sequences: usize,
    pub size_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitSummary {
    pub split_by: SplitBy,
    pub total_sequences: usize,
    pub files_created: usize,
    pub total_bytes: usize,
    pub output_dir: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitResult {
    pub summary: SplitSummary,
    pub files: Vec<SplitFile>,
}

fn chunk_file_names(chunks: &[&[SeqRecord]], plan: SplitPlan, prefix: &str) -> Vec<String> {
    match plan {
        SplitPlan::Individual => {
            let mut used: HashSet<String> = HashSet::new();
            chunks
                .iter()
                .enumerate()
                .map(|(i, chunk)| {
                    let base = format!("{}_{}", prefix, sanitize_file_name(&chunk[0].id));
                    let mut name = format!("{}.fasta", base);
                    let mut suffix = i + 1;
                    while !used.insert(name.clone()) {
                        name = format!("{}_{}.fasta", base, suffix);
                        suffix += 1;
                    }
                    name
                })
                .collect()
        }
        _ => (1..=chunks.len())
            .map(|n| format!("{}_{}.fasta", prefix, n))
            .collect(),
    }
}

pub fn split_records(
    records: &[SeqRecord],
    split_by: SplitBy,
    plan: SplitPlan,
    output_dir: &Path,
    prefix: &str,
) -> Result<SplitResult, FastaError> {
    if records.is_empty() {
        return Err(FastaError::Empty(String::from("nothing to split")));
    }
    let chunks = partition(records, plan);
    info!(
        "splitting {} records into {} files under {}",
        records.len(),
        chunks.len(),
        output_dir.display()
    );
    fs::create_dir_all(output_dir)?;

    let names = chunk_file_names(&chunks, plan, prefix);
    let mut files = Vec::with_capacity(chunks.len());
    for (chunk, name) in chunks.iter().zip(names) {
        let path: PathBuf = output_dir.join(name);
        let text = format_fasta(chunk);
        fs::write(&path, &text)?;
        debug!("wrote {} ({} records)", path.display(), chunk.len());
        files.push(SplitFile {
            path: path.display().to_string(),
            sequences: chunk.len(),
            size_bytes: text.len(),
        });
    }

    Ok(SplitResult {
        summary: SplitSummary {
            split_by,
            total_sequences: records.len(),
            files_created: files.len(),
            total_bytes: files.iter().map(|f| f.size_bytes).sum(),
            output_dir: output_dir.display().to_string(),
        },
        files,
    })
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::collections::HashSet;
use std::path::Path;

use log::{info, warn};
use serde::Serialize;

use crate::errors::FastaError;
use crate::seq::fasta::{read_fasta_file, write_fasta_file};
use crate::seq::record::SeqRecord;

#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    pub remove_duplicates: bool,
    pub add_file_prefix: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: String,
    pub sequences_read: usize,
    pub added: usize,
    pub duplicates: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeSummary {
    pub input_files: usize,
    pub files_read: usize,
    pub files_failed: usize,
    pub total_sequences: usize,
    pub duplicates_removed: usize,
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeResult {
    pub summary: MergeSummary,
    pub files: Vec<FileReport>,
    #[serde(skip)]
    pub records: Vec<SeqRecord>,
}

// Last path component without its extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Merges already-loaded inputs. Each input is a label (the path) and either its records or the
/// reason it could not be read.
pub fn merge_records(
    inputs: Vec<(String, Result<Vec<SeqRecord>, String>)>,
    opts: &MergeOptions,
) -> (Vec<SeqRecord>, Vec<FileReport>) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged: Vec<SeqRecord> = Vec::new();
    let mut reports: Vec<FileReport> = Vec::new();

    for (path, loaded) in inputs {
        let records = match loaded {
            Ok(records) => records,
            Err(error) => {
                warn!("skipping {}: {}", path, error);
                reports.push(FileReport {
                    path,
                    sequences_read: 0,
                    added: 0,
                    duplicates: 0,
                    error: Some(error),
                });
                continue;
            }
        };
        let stem = file_stem(Path::new(&path));
        let mut report = FileReport {
            path,
            sequences_read: records.len(),
            added: 0,
            duplicates: 0,
            error: None,
        };
        for mut record in records {
            if opts.add_file_prefix {
                record.id = format!("{}_{}", stem, record.id);
            }
            if opts.remove_duplicates && !seen.insert(record.id.clone()) {
                report.duplicates += 1;
                continue;
            }
            report.added += 1;
            merged.push(record);
        }
        reports.push(report);
    }
    (merged, reports)
}

pub fn merge_files<P: AsRef<Path>>(
    input_paths: &[P],
    output_path: &Path,
    opts: &MergeOptions,
) -> Result<MergeResult, FastaError> {
    info!(
        "merging {} files into {}",
        input_paths.len(),
        output_path.display()
    );
    let inputs: Vec<(String, Result<Vec<SeqRecord>, String>)> = input_paths
        .iter()
        .map(|p| {
            let p = p.as_ref();
            (
                p.display().to_string(),
                read_fasta_file(p).map_err(|e| e.to_string()),
            )
        })
        .collect();
    let (records, files) = merge_records(inputs, opts);
    if records.is_empty() {
        return Err(FastaError::Empty(String::from(
            "none of the input files yielded any sequence",
        )));
    }
    write_fasta_file(output_path, &records)?;
    info!("wrote {} records to {}", records.len(), output_path.display());

    let files_failed = files.iter().filter(|f| f.error.is_some()).count();
    Ok(MergeResult {
        summary: MergeSummary {
            input_files: files.len(),
            files_read: files.len() - files_failed,
            files_failed,
            total_sequences: records.len(),
            duplicates_removed: files.iter().map(|f| f.duplicates).sum(),
            output_path: output_path.display().to_string(),
        },
        files,
        records,
    })
}

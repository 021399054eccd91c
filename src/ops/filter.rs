// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use log::info;
use serde::Serialize;

use crate::errors::FastaError;
use crate::seq::record::SeqRecord;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthEntry {
    pub id: String,
    pub description: String,
    pub length: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResult {
    pub min_length: usize,
    pub max_length: usize,
    pub total_sequences: usize,
    pub passed: usize,
    pub filtered_out: usize,
    pub sequences: Vec<LengthEntry>,
}

pub fn filter_by_length(
    records: &[SeqRecord],
    min_length: usize,
    max_length: usize,
) -> Result<FilterResult, FastaError> {
    if min_length > max_length {
        return Err(FastaError::Param(format!(
            "minimum length {} is greater than maximum length {}",
            min_length, max_length
        )));
    }
    let sequences: Vec<LengthEntry> = records
        .iter()
        .filter(|r| (min_length..=max_length).contains(&r.len()))
        .map(|r| LengthEntry {
            id: r.id.clone(),
            description: r.description.clone(),
            length: r.len(),
        })
        .collect();
    info!(
        "{} of {} records within [{}, {}]",
        sequences.len(),
        records.len(),
        min_length,
        max_length
    );
    Ok(FilterResult {
        min_length,
        max_length,
        total_sequences: records.len(),
        passed: sequences.len(),
        filtered_out: records.len() - sequences.len(),
        sequences,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_bounds() {
        let records = vec![
            SeqRecord::new("a", "", "AC"),
            SeqRecord::new("b", "x", "ACG"),
            SeqRecord::new("c", "", "ACGTA"),
            SeqRecord::new("d", "", ""),
        ];
        let result = filter_by_length(&records, 2, 3).unwrap();
        assert_eq!(result.passed, 2);
        assert_eq!(result.filtered_out, 2);
        assert_eq!(result.sequences[0].id, "a");
        assert_eq!(result.sequences[1].description, "x");
        assert_eq!(result.sequences[1].length, 3);
    }

    #[test]
    fn test_min_greater_than_max() {
        assert!(filter_by_length(&[], 5, 2).is_err());
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use log::{debug, info};
use serde::Serialize;

use crate::seq::record::{append_description, SeqRecord};

// Standalone complement: case is kept, gaps and N stay as they are, anything else becomes N (or
// n).
pub fn complement_base(base: char) -> char {
    match base {
        'A' => 'T',
        'T' => 'A',
        'C' => 'G',
        'G' => 'C',
        'a' => 't',
        't' => 'a',
        'c' => 'g',
        'g' => 'c',
        'N' => 'N',
        'n' => 'n',
        '-' => '-',
        other if other.is_lowercase() => 'n',
        _ => 'N',
    }
}

pub fn reverse_complement(sequence: &str) -> String {
    sequence.chars().rev().map(complement_base).collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevCompRecord {
    pub id: String,
    pub description: String,
    pub original_length: usize,
    pub reverse_complement: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevCompResult {
    pub total_processed: usize,
    pub records: Vec<RevCompRecord>,
}

impl RevCompResult {
    pub fn to_records(&self) -> Vec<SeqRecord> {
        self.records
            .iter()
            .map(|r| SeqRecord::new(r.id.clone(), r.description.clone(), r.reverse_complement.clone()))
            .collect()
    }
}

/// Reverse-complements every record, or only those whose id is in `ids` (file order is kept
/// either way).
pub fn reverse_complement_records(records: &[SeqRecord], ids: Option<&[String]>) -> RevCompResult {
    info!("reverse complement of {} records", records.len());
    let selected: Vec<RevCompRecord> = records
        .iter()
        .filter(|rec| ids.map_or(true, |ids| ids.iter().any(|id| *id == rec.id)))
        .map(|rec| {
            debug!("reverse complementing {}", rec.id);
            RevCompRecord {
                id: rec.id.clone(),
                description: append_description(&rec.description, "reverse complement"),
                original_length: rec.len(),
                reverse_complement: reverse_complement(&rec.sequence),
            }
        })
        .collect();
    RevCompResult {
        total_processed: selected.len(),
        records: selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_complementary() {
        assert_eq!(reverse_complement("GAATTC"), "GAATTC");
    }

    #[test]
    fn test_case_preserved() {
        assert_eq!(reverse_complement("AAcg"), "cgTT");
    }

    #[test]
    fn test_gaps_and_unknowns() {
        assert_eq!(reverse_complement("A-NR"), "NN-T");
        assert_eq!(reverse_complement("ay"), "nt");
    }

    #[test]
    fn test_involution() {
        let seqs = ["ATCGatcg", "GGGcccAAAttt", "", "tAcGgCaT"];
        for s in seqs {
            assert_eq!(reverse_complement(&reverse_complement(s)), s);
        }
    }

    #[test]
    fn test_selected_ids() {
        let records = vec![
            SeqRecord::new("a", "", "AAA"),
            SeqRecord::new("b", "desc", "CCG"),
            SeqRecord::new("c", "", "T"),
        ];
        let ids = vec![String::from("c"), String::from("b")];
        let result = reverse_complement_records(&records, Some(&ids));
        assert_eq!(result.total_processed, 2);
        assert_eq!(result.records[0].id, "b");
        assert_eq!(result.records[0].reverse_complement, "CGG");
        assert_eq!(result.records[0].description, "desc reverse complement");
        assert_eq!(result.records[1].id, "c");
        assert_eq!(result.records[1].reverse_complement, "A");
    }

    #[test]
    fn test_all_records() {
        let records = vec![SeqRecord::new("a", "", "AC"), SeqRecord::new("b", "", "GT")];
        let result = reverse_complement_records(&records, None);
        assert_eq!(result.total_processed, 2);
        let out = result.to_records();
        assert_eq!(out[0].sequence, "GT");
        assert_eq!(out[0].description, "reverse complement");
        assert_eq!(out[1].sequence, "AC");
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::collections::{BTreeSet, HashMap};

use clap::ValueEnum;
use log::{debug, info};
use serde::Serialize;

use crate::seq::record::SeqRecord;

const IUPAC_AMBIGUITY: &str = "RYSWKMBDHV";
const DNA_BASES: &str = "ACGTN";
const RNA_BASES: &str = "ACGUN";
const AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWYBZXJUO*";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceType {
    Dna,
    Rna,
    Protein,
    Auto,
}

impl SequenceType {
    pub fn allows(&self, residue: char) -> bool {
        let r = residue.to_ascii_uppercase();
        if r == '-' {
            return true;
        }
        match self {
            SequenceType::Dna => DNA_BASES.contains(r) || IUPAC_AMBIGUITY.contains(r),
            SequenceType::Rna => RNA_BASES.contains(r) || IUPAC_AMBIGUITY.contains(r),
            SequenceType::Protein => AMINO_ACIDS.contains(r),
            // Auto is resolved per record before checking.
            SequenceType::Auto => false,
        }
    }
}

/// Guesses the alphabet: nucleotides only (with T) is DNA, nucleotides only with U is RNA,
/// anything else is protein.
pub fn detect_type(residues: &str) -> SequenceType {
    let upper = residues.to_ascii_uppercase();
    if upper.chars().all(|c| DNA_BASES.contains(c)) {
        SequenceType::Dna
    } else if upper.chars().all(|c| RNA_BASES.contains(c)) {
        SequenceType::Rna
    } else {
        SequenceType::Protein
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordValidation {
    pub id: String,
    pub valid: bool,
    pub sequence_type: SequenceType,
    pub length: usize,
    pub invalid_characters: Vec<char>,
    pub invalid_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_invalid_position: Option<usize>,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub sequence_type: SequenceType,
    pub total_sequences: usize,
    pub valid_sequences: usize,
    pub invalid_sequences: usize,
    pub duplicate_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub summary: ValidationSummary,
    pub results: Vec<RecordValidation>,
}

pub fn validate_record(record: &SeqRecord, sequence_type: SequenceType) -> RecordValidation {
    let residues = record.residues();
    let effective = match sequence_type {
        SequenceType::Auto => detect_type(&residues),
        other => other,
    };
    let mut invalid: BTreeSet<char> = BTreeSet::new();
    let mut invalid_count = 0;
    let mut first_invalid_position = None;
    for (i, c) in residues.chars().enumerate() {
        if !effective.allows(c) {
            invalid.insert(c);
            invalid_count += 1;
            first_invalid_position.get_or_insert(i + 1);
        }
    }
    let mut issues = Vec::new();
    if record.id.is_empty() {
        issues.push(String::from("empty id"));
    }
    if residues.is_empty() {
        issues.push(String::from("empty sequence"));
    }
    if invalid_count > 0 {
        issues.push(format!("{} invalid residue(s)", invalid_count));
    }
    RecordValidation {
        id: record.id.clone(),
        valid: issues.is_empty(),
        sequence_type: effective,
        length: residues.chars().count(),
        invalid_characters: invalid.into_iter().collect(),
        invalid_count,
        first_invalid_position,
        issues,
    }
}

// Ids seen more than once, in order of first appearance.
pub fn duplicate_ids(records: &[SeqRecord]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for rec in records {
        let count = counts.entry(rec.id.as_str()).or_insert(0);
        if *count == 0 {
            order.push(rec.id.as_str());
        }
        *count += 1;
    }
    order
        .into_iter()
        .filter(|id| counts.get(id).copied().unwrap_or(0) > 1)
        .map(String::from)
        .collect()
}

pub fn validate_records(records: &[SeqRecord], sequence_type: SequenceType) -> ValidationResult {
    info!("validating {} records as {:?}", records.len(), sequence_type);
    let results: Vec<RecordValidation> = records
        .iter()
        .map(|r| validate_record(r, sequence_type))
        .collect();
    let valid = results.iter().filter(|r| r.valid).count();
    debug!("{} valid, {} invalid", valid, results.len() - valid);
    ValidationResult {
        summary: ValidationSummary {
            sequence_type,
            total_sequences: results.len(),
            valid_sequences: valid,
            invalid_sequences: results.len() - valid,
            duplicate_ids: duplicate_ids(records),
        },
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_type() {
        assert_eq!(detect_type("ACGTNacgt"), SequenceType::Dna);
        assert_eq!(detect_type("ACGUU"), SequenceType::Rna);
        assert_eq!(detect_type("MKVLAAG"), SequenceType::Protein);
        assert_eq!(detect_type(""), SequenceType::Dna);
    }

    #[test]
    fn test_dna_with_ambiguity_and_gaps() {
        let rec = SeqRecord::new("s", "", "ACGT-RYN");
        let v = validate_record(&rec, SequenceType::Dna);
        assert!(v.valid);
        assert!(v.invalid_characters.is_empty());
    }

    #[test]
    fn test_invalid_dna() {
        let rec = SeqRecord::new("s", "", "ACGUXXA");
        let v = validate_record(&rec, SequenceType::Dna);
        assert!(!v.valid);
        assert_eq!(v.invalid_characters, vec!['U', 'X']);
        assert_eq!(v.invalid_count, 3);
        assert_eq!(v.first_invalid_position, Some(4));
    }

    #[test]
    fn test_rna_rejects_t() {
        let v = validate_record(&SeqRecord::new("s", "", "ACGT"), SequenceType::Rna);
        assert_eq!(v.invalid_characters, vec!['T']);
    }

    #[test]
    fn test_protein() {
        let v = validate_record(&SeqRecord::new("p", "", "MKV*"), SequenceType::Protein);
        assert!(v.valid);
        let v = validate_record(&SeqRecord::new("p", "", "MK1"), SequenceType::Protein);
        assert_eq!(v.invalid_characters, vec!['1']);
    }

    #[test]
    fn test_auto_and_issues() {
        let records = vec![
            SeqRecord::new("a", "", "ACGT"),
            SeqRecord::new("b", "", "MKVL"),
            SeqRecord::new("", "", "ACGU"),
            SeqRecord::new("a", "", ""),
        ];
        let result = validate_records(&records, SequenceType::Auto);
        assert_eq!(result.results[0].sequence_type, SequenceType::Dna);
        assert_eq!(result.results[1].sequence_type, SequenceType::Protein);
        assert_eq!(result.results[2].sequence_type, SequenceType::Rna);
        assert_eq!(result.results[2].issues, vec!["empty id"]);
        assert_eq!(result.results[3].issues, vec!["empty sequence"]);
        assert_eq!(result.summary.valid_sequences, 2);
        assert_eq!(result.summary.invalid_sequences, 2);
        assert_eq!(result.summary.duplicate_ids, vec!["a"]);
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::fmt;

use log::{debug, info};
use serde::Serialize;

use crate::errors::FastaError;
use crate::seq::record::{append_description, SeqRecord};

// Amino acid tables in NCBI order: first base varies slowest, bases ordered T, C, A, G.

const STANDARD: &[u8; 64] = b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
const VERTEBRATE_MITO: &[u8; 64] =
    b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG";
const YEAST_MITO: &[u8; 64] = b"FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
const MYCOPLASMA: &[u8; 64] = b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
const INVERTEBRATE_MITO: &[u8; 64] =
    b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG";
const CILIATE: &[u8; 64] = b"FFLLSSSSYYQQCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneticCode {
    pub id: u8,
    pub name: &'static str,
    table: &'static [u8; 64],
}

pub const GENETIC_CODES: [GeneticCode; 7] = [
    GeneticCode { id: 1, name: "standard", table: STANDARD },
    GeneticCode { id: 2, name: "vertebrate_mitochondrial", table: VERTEBRATE_MITO },
    GeneticCode { id: 3, name: "yeast_mitochondrial", table: YEAST_MITO },
    GeneticCode { id: 4, name: "mycoplasma", table: MYCOPLASMA },
    GeneticCode { id: 5, name: "invertebrate_mitochondrial", table: INVERTEBRATE_MITO },
    GeneticCode { id: 6, name: "ciliate", table: CILIATE },
    GeneticCode { id: 11, name: "bacterial", table: STANDARD },
];

fn base_index(b: u8) -> Option<usize> {
    match b {
        b'T' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

impl GeneticCode {
    pub fn standard() -> Self {
        GENETIC_CODES[0]
    }

    /// Looks a table up by name (case-insensitive) or by NCBI number.
    pub fn from_name(name: &str) -> Result<Self, FastaError> {
        let key = name.trim().to_ascii_lowercase();
        GENETIC_CODES
            .iter()
            .find(|code| code.name == key || code.id.to_string() == key)
            .copied()
            .ok_or_else(|| FastaError::Param(format!("unknown genetic code '{}'", name)))
    }

    /// Amino acid for an uppercase codon; 'X' if the codon has anything but A, C, G or T.
    pub fn translate_codon(&self, codon: &[u8]) -> char {
        match codon {
            [b1, b2, b3] => match (base_index(*b1), base_index(*b2), base_index(*b3)) {
                (Some(i), Some(j), Some(k)) => self.table[i * 16 + j * 4 + k] as char,
                _ => 'X',
            },
            _ => 'X',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingFrame(i8);

impl TryFrom<i8> for ReadingFrame {
    type Error = FastaError;

    fn try_from(frame: i8) -> Result<Self, Self::Error> {
        match frame {
            1..=3 | -3..=-1 => Ok(ReadingFrame(frame)),
            _ => Err(FastaError::Param(format!(
                "reading frame must be one of -3, -2, -1, 1, 2, 3 (got {})",
                frame
            ))),
        }
    }
}

impl ReadingFrame {
    pub fn value(&self) -> i8 {
        self.0
    }

    pub fn is_reverse(&self) -> bool {
        self.0 < 0
    }

    // Number of leading residues skipped before the first codon.
    pub fn offset(&self) -> usize {
        (self.0.unsigned_abs() - 1) as usize
    }
}

impl fmt::Display for ReadingFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

impl Serialize for ReadingFrame {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.0)
    }
}

// Uppercase, and anything that is not A, C, G, T or N becomes N.
fn normalize_dna(sequence: &str) -> Vec<u8> {
    sequence
        .bytes()
        .map(|b| b.to_ascii_uppercase())
        .map(|b| match b {
            b'A' | b'C' | b'G' | b'T' | b'N' => b,
            _ => b'N',
        })
        .collect()
}

// Only ever sees normalized input, so the table is just the four bases plus N.
fn reverse_complement_normalized(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|b| match b {
            b'A' => b'T',
            b'T' => b'A',
            b'C' => b'G',
            b'G' => b'C',
            _ => b'N',
        })
        .collect()
}

pub fn translate_sequence(sequence: &str, frame: ReadingFrame, code: &GeneticCode) -> String {
    let mut dna = normalize_dna(sequence);
    if frame.is_reverse() {
        dna = reverse_complement_normalized(&dna);
    }
    let coding = dna.get(frame.offset()..).unwrap_or_default();
    coding
        .chunks_exact(3)
        .map(|codon| code.translate_codon(codon))
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedRecord {
    pub id: String,
    pub description: String,
    pub protein: String,
    pub frame: ReadingFrame,
    pub genetic_code: &'static str,
    pub stop_codons: usize,
    pub dna_length: usize,
    pub protein_length: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResult {
    pub frame: ReadingFrame,
    pub genetic_code: &'static str,
    pub total_sequences: usize,
    pub records: Vec<TranslatedRecord>,
}

impl TranslateResult {
    pub fn to_records(&self) -> Vec<SeqRecord> {
        self.records
            .iter()
            .map(|r| {
                SeqRecord::new(
                    r.id.clone(),
                    append_description(&r.description, &format!("frame={}", r.frame)),
                    r.protein.clone(),
                )
            })
            .collect()
    }
}

pub fn translate_records(
    records: &[SeqRecord],
    frame: ReadingFrame,
    code: &GeneticCode,
) -> TranslateResult {
    info!(
        "translating {} records in frame {} ({} code)",
        records.len(),
        frame,
        code.name
    );
    let translated: Vec<TranslatedRecord> = records
        .iter()
        .map(|rec| {
            let protein = translate_sequence(&rec.sequence, frame, code);
            debug!("{}: {} aa", rec.id, protein.len());
            TranslatedRecord {
                id: rec.id.clone(),
                description: rec.description.clone(),
                stop_codons: protein.matches('*').count(),
                dna_length: rec.len(),
                protein_length: protein.len(),
                protein,
                frame,
                genetic_code: code.name,
            }
        })
        .collect();
    TranslateResult {
        frame,
        genetic_code: code.name,
        total_sequences: translated.len(),
        records: translated,
    }
}

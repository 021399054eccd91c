// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use serde::{Deserialize, Serialize};

// A FastA record: the first whitespace-delimited token of the header, whatever follows it, and the
// raw sequence (lines concatenated after trimming, so internal whitespace may survive).

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeqRecord {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub sequence: String,
}

impl SeqRecord {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        sequence: impl Into<String>,
    ) -> Self {
        SeqRecord {
            id: id.into(),
            description: description.into(),
            sequence: sequence.into(),
        }
    }

    /// Header line contents, without the leading '>'.
    pub fn header(&self) -> String {
        if self.description.is_empty() {
            self.id.clone()
        } else {
            format!("{} {}", self.id, self.description)
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Sequence with all embedded whitespace removed.
    pub fn residues(&self) -> String {
        strip_whitespace(&self.sequence)
    }
}

// A record together with its position in the source file.
#[derive(Debug, Clone, Copy)]
pub struct IndexedRecord<'a> {
    pub record: &'a SeqRecord,
    pub index: usize,
}

pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn append_description(description: &str, suffix: &str) -> String {
    if description.is_empty() {
        suffix.to_string()
    } else {
        format!("{} {}", description, suffix)
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use crate::seq::record::SeqRecord;

// For our purposes, a sequence file is just a Vec of sequence records, in file order.
//

pub type SeqFile = Vec<SeqRecord>;

// Index of the first record with the given id. Ids are not guaranteed unique.
pub fn position_of(seq_file: &[SeqRecord], id: &str) -> Option<usize> {
    seq_file.iter().position(|rec| rec.id == id)
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::fs;
use std::path::Path;

use itertools::Itertools;
use log::debug;

use crate::seq::file::SeqFile;
use crate::seq::record::SeqRecord;

pub const LINE_WIDTH: usize = 80;

// Lenient parser: text before the first header is dropped, headers without sequence lines give
// empty-sequence records, and ids are not checked for uniqueness (or even emptiness).
pub fn parse_fasta(text: &str) -> SeqFile {
    let mut result: SeqFile = Vec::new();
    let mut current_record: Option<SeqRecord> = None;

    for line in text.lines() {
        let l = line.trim_end_matches('\r');
        if let Some(hdr) = l.strip_prefix('>') {
            if let Some(rec) = current_record.take() {
                result.push(rec);
            }
            let mut fields = hdr.split_whitespace();
            let id = fields.next().unwrap_or_default();
            current_record = Some(SeqRecord::new(id, fields.join(" "), String::new()));
        } else if let Some(rec) = current_record.as_mut() {
            // append line to current record's sequence
            rec.sequence.push_str(l.trim());
        }
    }
    if let Some(rec) = current_record {
        result.push(rec);
    }
    debug!("parsed {} FastA records", result.len());
    result
}

pub fn read_fasta_file<P: AsRef<Path>>(path: P) -> Result<SeqFile, std::io::Error> {
    let text = fs::read_to_string(path)?;
    Ok(parse_fasta(&text))
}

pub fn wrap_sequence(sequence: &str, width: usize) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = sequence;
    while !rest.is_empty() {
        let cut = rest
            .char_indices()
            .nth(width)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (line, tail) = rest.split_at(cut);
        lines.push(line);
        rest = tail;
    }
    lines
}

/// Renders one record: the header line, then the sequence wrapped at [`LINE_WIDTH`]. An empty
/// sequence gives a lone header line. No trailing newline.
pub fn format_record(record: &SeqRecord) -> String {
    let mut out = String::with_capacity(record.len() + record.len() / LINE_WIDTH + 64);
    out.push('>');
    out.push_str(&record.header());
    for line in wrap_sequence(&record.sequence, LINE_WIDTH) {
        out.push('\n');
        out.push_str(line);
    }
    out
}

pub fn format_fasta(records: &[SeqRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }
    let mut out = records.iter().map(format_record).join("\n");
    out.push('\n');
    out
}

pub fn write_fasta_file<P: AsRef<Path>>(path: P, records: &[SeqRecord]) -> Result<(), std::io::Error> {
    fs::write(path, format_fasta(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_fasta_file_1() {
        let path = "tests/data/test1.fas";
        let fasta: SeqFile = read_fasta_file(path).expect("Test file not found");
        assert_eq!(fasta[0].id, "seq1");
        assert_eq!(fasta[0].sequence, "GAATTC");
    }

    #[test]
    fn test_read_fasta_file_2() {
        let path = "tests/data/test2.fas";
        let fasta: SeqFile = read_fasta_file(path).expect("Test file not found");
        assert_eq!(fasta.len(), 3);
        assert_eq!(fasta[0].id, "seq1");
        assert_eq!(fasta[0].description, "first sequence");
        assert_eq!(fasta[0].sequence, "TTGCCG-CGA");
        assert_eq!(fasta[1].id, "seq2");
        assert_eq!(fasta[1].sequence, "TTCCCGGCGA");
        assert_eq!(fasta[2].id, "seq3");
        assert_eq!(fasta[2].description, "");
        assert_eq!(fasta[2].sequence, "TTACCG-CAA");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_fasta("").is_empty());
    }

    #[test]
    fn test_parse_crlf() {
        let fasta = parse_fasta(">a desc\r\nACGT\r\nTT\r\n>b\r\nGG");
        assert_eq!(fasta.len(), 2);
        assert_eq!(fasta[0].description, "desc");
        assert_eq!(fasta[0].sequence, "ACGTTT");
        assert_eq!(fasta[1].id, "b");
        assert_eq!(fasta[1].sequence, "GG");
    }

    #[test]
    fn test_parse_text_before_first_header_is_ignored() {
        let fasta = parse_fasta("junk line\nmore junk\n>a\nAC\n");
        assert_eq!(fasta.len(), 1);
        assert_eq!(fasta[0].sequence, "AC");
    }

    #[test]
    fn test_parse_consecutive_headers() {
        let fasta = parse_fasta(">a\n>b\n>c\nACGT\n");
        assert_eq!(fasta.len(), 3);
        assert_eq!(fasta[0].sequence, "");
        assert_eq!(fasta[1].sequence, "");
        assert_eq!(fasta[2].sequence, "ACGT");
    }

    #[test]
    fn test_parse_description_whitespace_collapsed() {
        let fasta = parse_fasta(">id1   a   spaced\tdescription\nAC\n");
        assert_eq!(fasta[0].id, "id1");
        assert_eq!(fasta[0].description, "a spaced description");
    }

    #[test]
    fn test_parse_line_trimming_keeps_internal_whitespace() {
        let fasta = parse_fasta(">a\n  AC GT  \n\tNN\n");
        assert_eq!(fasta[0].sequence, "AC GTNN");
    }

    #[test]
    fn test_parse_empty_id() {
        let fasta = parse_fasta(">\nACGT\n");
        assert_eq!(fasta.len(), 1);
        assert_eq!(fasta[0].id, "");
        assert_eq!(fasta[0].sequence, "ACGT");
    }

    #[test]
    fn test_wrap_sequence() {
        let seq = "A".repeat(170);
        let lines = wrap_sequence(&seq, LINE_WIDTH);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 80);
        assert_eq!(lines[1].len(), 80);
        assert_eq!(lines[2].len(), 10);
        assert!(wrap_sequence("", LINE_WIDTH).is_empty());
    }

    #[test]
    fn test_format_fasta() {
        let records = vec![
            SeqRecord::new("a", "first", "ACGT"),
            SeqRecord::new("b", "", ""),
            SeqRecord::new("c", "third one", "GG"),
        ];
        insta::assert_snapshot!(format_fasta(&records), @r###"
        >a first
        ACGT
        >b
        >c third one
        GG
        "###);
    }

    #[test]
    fn test_format_ends_with_newline() {
        let records = vec![SeqRecord::new("a", "", "ACGT")];
        assert_eq!(format_fasta(&records), ">a\nACGT\n");
        assert_eq!(format_fasta(&[]), "");
    }

    #[test]
    fn test_round_trip() {
        let records = vec![
            SeqRecord::new("r1", "alpha chain", "ACGT".repeat(50)),
            SeqRecord::new("r2", "beta", "MKVLAAGIV"),
            SeqRecord::new("r3", "gamma delta", "N".repeat(80)),
        ];
        assert_eq!(parse_fasta(&format_fasta(&records)), records);
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use clap::ValueEnum;
use log::{debug, info};
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::errors::FastaError;
use crate::ops::revcomp::reverse_complement;
use crate::seq::record::SeqRecord;

const CONTEXT: usize = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Exact,
    Regex,
    Iupac,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    Forward,
    Reverse,
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub search_type: SearchType,
    pub case_sensitive: bool,
    pub include_reverse_complement: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeqMatch {
    /// 1-based, always in forward-strand coordinates.
    pub position: usize,
    pub matched: String,
    pub strand: Strand,
    pub context: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMatches {
    pub id: String,
    pub description: String,
    pub length: usize,
    pub match_count: usize,
    pub matches: Vec<SeqMatch>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSummary {
    pub pattern: String,
    pub search_type: SearchType,
    pub total_sequences: usize,
    pub sequences_with_matches: usize,
    pub total_matches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub summary: SearchSummary,
    pub results: Vec<RecordMatches>,
}

pub fn iupac_class(code: char) -> Option<&'static str> {
    match code {
        'R' => Some("[AG]"),
        'Y' => Some("[CT]"),
        'S' => Some("[GC]"),
        'W' => Some("[AT]"),
        'K' => Some("[GT]"),
        'M' => Some("[AC]"),
        'B' => Some("[CGT]"),
        'D' => Some("[AGT]"),
        'H' => Some("[ACT]"),
        'V' => Some("[ACG]"),
        'N' => Some("[ACGT]"),
        _ => None,
    }
}

// Ambiguity codes become character classes in the case of the code; everything
// else is matched literally.
pub fn iupac_to_regex(pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| match iupac_class(c.to_ascii_uppercase()) {
            Some(class) if c.is_ascii_lowercase() => class.to_ascii_lowercase(),
            Some(class) => class.to_string(),
            None => regex::escape(&c.to_string()),
        })
        .collect()
}

pub fn build_regex(pattern: &str, opts: &SearchOptions) -> Result<Regex, FastaError> {
    // Only exact patterns are folded; regex sources are compiled as given.
    let source = match opts.search_type {
        SearchType::Exact if opts.case_sensitive => regex::escape(pattern),
        SearchType::Exact => regex::escape(&pattern.to_uppercase()),
        SearchType::Regex => pattern.to_string(),
        SearchType::Iupac => iupac_to_regex(pattern),
    };
    let re = RegexBuilder::new(&source)
        .case_insensitive(!opts.case_sensitive)
        .build()?;
    Ok(re)
}

// Global scan; a zero-length match moves the scan one character forward.
pub fn scan(re: &Regex, text: &str) -> Vec<(usize, String)> {
    let mut hits = Vec::new();
    let mut start = 0;
    while start <= text.len() {
        let Some(m) = re.find_at(text, start) else {
            break;
        };
        hits.push((m.start(), m.as_str().to_string()));
        start = if m.is_empty() {
            m.end() + text[m.end()..].chars().next().map_or(1, char::len_utf8)
        } else {
            m.end()
        };
    }
    hits
}

fn context(text: &str, start: usize, end: usize) -> String {
    let mut from = start.saturating_sub(CONTEXT);
    while !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + CONTEXT).min(text.len());
    while !text.is_char_boundary(to) {
        to += 1;
    }
    text[from..to].to_string()
}

pub fn search_record(record: &SeqRecord, re: &Regex, opts: &SearchOptions) -> RecordMatches {
    let sequence = if opts.case_sensitive {
        record.sequence.clone()
    } else {
        record.sequence.to_uppercase()
    };
    let len = sequence.len();

    let mut matches: Vec<SeqMatch> = scan(re, &sequence)
        .into_iter()
        .map(|(idx, matched)| SeqMatch {
            position: idx + 1,
            context: context(&sequence, idx, idx + matched.len()),
            matched,
            strand: Strand::Forward,
        })
        .collect();

    if opts.include_reverse_complement {
        let rc = reverse_complement(&sequence);
        let rc_len = rc.len();
        matches.extend(scan(re, &rc).into_iter().map(|(idx, matched)| SeqMatch {
            position: rc_len - idx - matched.len() + 1,
            context: context(&rc, idx, idx + matched.len()),
            matched,
            strand: Strand::Reverse,
        }));
        matches.sort_by_key(|m| m.position);
    }

    debug!("{}: {} matches", record.id, matches.len());
    RecordMatches {
        id: record.id.clone(),
        description: record.description.clone(),
        length: len,
        match_count: matches.len(),
        matches,
    }
}

pub fn search_records(
    records: &[SeqRecord],
    pattern: &str,
    opts: &SearchOptions,
) -> Result<SearchResult, FastaError> {
    if pattern.is_empty() {
        return Err(FastaError::Param(String::from("empty search pattern")));
    }
    let re = build_regex(pattern, opts)?;
    info!(
        "searching {} records for '{}' ({:?}, regex: {})",
        records.len(),
        pattern,
        opts.search_type,
        re.as_str()
    );
    let results: Vec<RecordMatches> = records
        .iter()
        .map(|rec| search_record(rec, &re, opts))
        .collect();
    let summary = SearchSummary {
        pattern: pattern.to_string(),
        search_type: opts.search_type,
        total_sequences: results.len(),
        sequences_with_matches: results.iter().filter(|r| r.match_count > 0).count(),
        total_matches: results.iter().map(|r| r.match_count).sum(),
    };
    Ok(SearchResult { summary, results })
}

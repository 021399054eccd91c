// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::FastaError;
use crate::seq::file::position_of;
use crate::seq::record::SeqRecord;

/// One extraction request: 1-based, inclusive coordinates on the whitespace-stripped sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub sequence_id: String,
    pub start: i64,
    pub end: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Coordinate {
    /// Parses `id:start-end`, optionally followed by `=name`.
    pub fn parse_region(region: &str) -> Result<Self, FastaError> {
        let bad = || {
            FastaError::Param(format!(
                "malformed region '{}' (expected id:start-end[=name])",
                region
            ))
        };
        let (spec, name) = match region.split_once('=') {
            Some((spec, name)) => (spec, Some(name.to_string())),
            None => (region, None),
        };
        let (id, range) = spec.rsplit_once(':').ok_or_else(bad)?;
        let (start, end) = range.split_once('-').ok_or_else(bad)?;
        Ok(Coordinate {
            sequence_id: id.to_string(),
            start: start.trim().parse().map_err(|_| bad())?,
            end: end.trim().parse().map_err(|_| bad())?,
            name,
        })
    }

    pub fn default_name(&self) -> String {
        format!("{}_{}-{}", self.sequence_id, self.start, self.end)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extracted {
    pub id: String,
    pub description: String,
    pub source_id: String,
    pub start: i64,
    pub end: i64,
    pub length: usize,
    pub sequence: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractError {
    pub request: usize,
    pub sequence_id: String,
    pub start: i64,
    pub end: i64,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractSummary {
    pub total_requests: usize,
    pub successful: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractResult {
    pub summary: ExtractSummary,
    pub extracted: Vec<Extracted>,
    pub errors: Vec<ExtractError>,
}

impl ExtractResult {
    pub fn to_records(&self) -> Vec<SeqRecord> {
        self.extracted
            .iter()
            .map(|e| SeqRecord::new(e.id.clone(), e.description.clone(), e.sequence.clone()))
            .collect()
    }
}

// First failing check wins, in this order.
fn check_bounds(start: i64, end: i64, length: usize) -> Result<(), String> {
    let length = length as i64;
    if start < 1 {
        Err(format!("start ({}) must be at least 1", start))
    } else if end < 1 {
        Err(format!("end ({}) must be at least 1", end))
    } else if start > length {
        Err(format!("start ({}) exceeds sequence length ({})", start, length))
    } else if end > length {
        Err(format!("end ({}) exceeds sequence length ({})", end, length))
    } else if start > end {
        Err(format!("start ({}) is greater than end ({})", start, end))
    } else {
        Ok(())
    }
}

fn extract_one(records: &[SeqRecord], coord: &Coordinate) -> Result<Extracted, String> {
    let idx = position_of(records, &coord.sequence_id)
        .ok_or_else(|| format!("sequence '{}' not found", coord.sequence_id))?;
    let residues: Vec<char> = records[idx].residues().chars().collect();
    check_bounds(coord.start, coord.end, residues.len())?;
    let sequence: String = residues[(coord.start - 1) as usize..coord.end as usize]
        .iter()
        .collect();
    Ok(Extracted {
        id: coord.name.clone().unwrap_or_else(|| coord.default_name()),
        description: format!("{}:{}-{}", coord.sequence_id, coord.start, coord.end),
        source_id: coord.sequence_id.clone(),
        start: coord.start,
        end: coord.end,
        length: sequence.len(),
        sequence,
    })
}

pub fn extract_subsequences(records: &[SeqRecord], coordinates: &[Coordinate]) -> ExtractResult {
    info!(
        "extracting {} regions from {} records",
        coordinates.len(),
        records.len()
    );
    let mut extracted = Vec::new();
    let mut errors = Vec::new();
    for (request, coord) in coordinates.iter().enumerate() {
        match extract_one(records, coord) {
            Ok(ext) => extracted.push(ext),
            Err(error) => {
                warn!("region {}: {}", request + 1, error);
                errors.push(ExtractError {
                    request,
                    sequence_id: coord.sequence_id.clone(),
                    start: coord.start,
                    end: coord.end,
                    error,
                });
            }
        }
    }
    ExtractResult {
        summary: ExtractSummary {
            total_requests: coordinates.len(),
            successful: extracted.len(),
            errors: errors.len(),
        },
        extracted,
        errors,
    }
}

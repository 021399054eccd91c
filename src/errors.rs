// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{fmt, io};

#[derive(Debug)]
pub enum FastaError {
    Io(io::Error),
    NotFound(String),
    Param(String),
    Regex(regex::Error),
    Json(serde_json::Error),
    Empty(String),
}

// These allow conversion to FastaError, required for main() to return Result<()> and for '?' to
// work.

impl From<io::Error> for FastaError {
    fn from(e: io::Error) -> Self {
        FastaError::Io(e)
    }
}

impl From<regex::Error> for FastaError {
    fn from(e: regex::Error) -> Self {
        FastaError::Regex(e)
    }
}

impl From<serde_json::Error> for FastaError {
    fn from(e: serde_json::Error) -> Self {
        FastaError::Json(e)
    }
}

impl fmt::Display for FastaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FastaError::Io(e) => write!(f, "I/O error: {}", e),
            FastaError::NotFound(msg) => write!(f, "Not found: {}", msg),
            FastaError::Param(msg) => write!(f, "Invalid parameter: {}", msg),
            FastaError::Regex(e) => write!(f, "Malformed pattern: {}", e),
            FastaError::Json(e) => write!(f, "JSON error: {}", e),
            FastaError::Empty(msg) => write!(f, "No sequences: {}", msg),
        }
    }
}

impl std::error::Error for FastaError {}

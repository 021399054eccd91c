// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::FastaError;
use crate::ops::split::{DEFAULT_SPLIT_COUNT, DEFAULT_SPLIT_SIZE_MB};

pub const CONFIG_FILE_NAME: &str = ".fastakitconfig";

// Defaults that the command line may override. Read from a JSON file; unknown keys are ignored and
// missing or mistyped ones fall back to the built-in values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaKitConfig {
    pub split_count: usize,
    pub split_size_mb: usize,
    pub split_prefix: String,
    pub genetic_code: String,
}

impl Default for FastaKitConfig {
    fn default() -> Self {
        FastaKitConfig {
            split_count: DEFAULT_SPLIT_COUNT,
            split_size_mb: DEFAULT_SPLIT_SIZE_MB,
            split_prefix: String::from("split"),
            genetic_code: String::from("standard"),
        }
    }
}

fn positive(value: &Value, key: &str) -> Option<usize> {
    value
        .get(key)
        .and_then(Value::as_u64)
        .filter(|n| *n > 0)
        .map(|n| n as usize)
}

fn string(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

impl FastaKitConfig {
    pub fn from_value(value: &Value) -> Self {
        let defaults = FastaKitConfig::default();
        FastaKitConfig {
            split_count: positive(value, "split_count").unwrap_or(defaults.split_count),
            split_size_mb: positive(value, "split_size_mb").unwrap_or(defaults.split_size_mb),
            split_prefix: string(value, "split_prefix").unwrap_or(defaults.split_prefix),
            genetic_code: string(value, "genetic_code").unwrap_or(defaults.genetic_code),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, FastaError> {
        let text = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)?;
        Ok(Self::from_value(&value))
    }
}

pub fn find_config() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let path = PathBuf::from(home).join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_from_value() {
        let value = json!({
            "split_count": 25,
            "split_size_mb": 3,
            "split_prefix": "chunk",
            "genetic_code": "bacterial"
        });
        let cfg = FastaKitConfig::from_value(&value);
        assert_eq!(cfg.split_count, 25);
        assert_eq!(cfg.split_size_mb, 3);
        assert_eq!(cfg.split_prefix, "chunk");
        assert_eq!(cfg.genetic_code, "bacterial");
    }

    #[test]
    fn test_config_defaults_on_bad_values() {
        let value = json!({ "split_count": 0, "split_size_mb": "big", "other": true });
        assert_eq!(FastaKitConfig::from_value(&value), FastaKitConfig::default());
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"split_prefix": "part"}"#).unwrap();
        let cfg = FastaKitConfig::from_file(&path).unwrap();
        assert_eq!(cfg.split_prefix, "part");
        assert_eq!(cfg.split_count, DEFAULT_SPLIT_COUNT);

        fs::write(&path, "not json").unwrap();
        assert!(matches!(FastaKitConfig::from_file(&path), Err(FastaError::Json(_))));
    }
}

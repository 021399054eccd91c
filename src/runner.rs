// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;

use crate::config::{find_config, FastaKitConfig};
use crate::errors::FastaError;
use crate::ops::duplicates::{find_duplicates, DuplicateType};
use crate::ops::extract::{extract_subsequences, Coordinate};
use crate::ops::filter::filter_by_length;
use crate::ops::gc::gc_content;
use crate::ops::merge::{merge_files, MergeOptions};
use crate::ops::revcomp::reverse_complement_records;
use crate::ops::search::{build_regex, search_records, SearchOptions, SearchType};
use crate::ops::split::{split_records, SplitBy, SplitPlan};
use crate::ops::summary::{get_by_id, load, summarize};
use crate::ops::translate::{translate_records, GeneticCode, ReadingFrame};
use crate::ops::validate::{validate_records, SequenceType};
use crate::seq::fasta::{read_fasta_file, write_fasta_file};
use crate::seq::file::SeqFile;
use crate::seq::record::SeqRecord;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every record as JSON
    Load {
        /// FastA file
        path: PathBuf,
    },

    /// Count, length and composition statistics
    Summarize { path: PathBuf },

    /// Print the first record with the given id
    GetById { path: PathBuf, id: String },

    /// List records whose length is within [min, max]
    FilterByLength {
        path: PathBuf,
        #[arg(long = "min-length")]
        min_length: usize,
        #[arg(long = "max-length")]
        max_length: usize,
    },

    /// Write records given as JSON ([{"id", "description", "sequence"}, ...]) to a FastA file
    Write {
        path: PathBuf,
        #[arg(short, long)]
        sequences: String,
    },

    /// Check residues against an alphabet
    Validate {
        path: PathBuf,
        #[arg(short = 't', long = "sequence-type", value_enum)]
        sequence_type: SequenceType,
    },

    /// Reverse-complement all (or selected) records
    ReverseComplement {
        path: PathBuf,
        #[arg(short, long = "output")]
        output_path: Option<PathBuf>,
        /// Only these ids (repeat, or separate with commas)
        #[arg(short = 'i', long = "ids", value_delimiter = ',')]
        sequence_ids: Vec<String>,
    },

    /// Translate nucleotide records to protein
    Translate {
        path: PathBuf,
        /// One of -3, -2, -1, 1, 2, 3
        #[arg(short = 'f', long = "frame", allow_negative_numbers = true)]
        reading_frame: i8,
        /// Genetic code, by name or NCBI number [default: standard]
        #[arg(short, long = "genetic-code")]
        genetic_code: Option<String>,
        #[arg(short, long = "output")]
        output_path: Option<PathBuf>,
    },

    /// Find a pattern in every record
    Search {
        path: PathBuf,
        pattern: String,
        #[arg(short = 't', long = "search-type", value_enum)]
        search_type: SearchType,
        #[arg(short, long = "case-sensitive")]
        case_sensitive: bool,
        /// Also search the reverse strand
        #[arg(short = 'r', long = "reverse-complement")]
        include_reverse_complement: bool,
    },

    /// GC/AT/N content, optionally with a sliding window
    GcContent {
        path: PathBuf,
        #[arg(short, long = "window-size")]
        window_size: Option<usize>,
    },

    /// Split into several FastA files
    Split {
        path: PathBuf,
        #[arg(short = 'b', long = "split-by", value_enum)]
        split_by: SplitBy,
        #[arg(short = 'd', long = "output-dir")]
        output_dir: PathBuf,
        /// Records per file (count) or megabytes per file (size)
        #[arg(short, long)]
        value: Option<usize>,
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Concatenate several FastA files
    Merge {
        #[arg(required = true, num_args = 1..)]
        input_paths: Vec<PathBuf>,
        #[arg(short, long = "output")]
        output_path: PathBuf,
        #[arg(long = "remove-duplicates")]
        remove_duplicates: bool,
        /// Prefix ids with the input file's stem
        #[arg(long = "add-file-prefix")]
        add_file_prefix: bool,
    },

    /// Extract regions given as JSON coordinates and/or id:start-end[=name]
    Extract {
        path: PathBuf,
        #[arg(short, long)]
        coordinates: Option<String>,
        #[arg(short, long = "region")]
        regions: Vec<String>,
        #[arg(short, long = "output")]
        output_path: Option<PathBuf>,
    },

    /// Group records sharing an id and/or a sequence
    FindDuplicates {
        path: PathBuf,
        #[arg(short = 't', long = "duplicate-type", value_enum)]
        duplicate_type: DuplicateType,
        #[arg(short, long = "case-sensitive")]
        case_sensitive: bool,
        #[arg(long = "output-duplicates")]
        output_duplicates: Option<PathBuf>,
        #[arg(long = "output-unique")]
        output_unique: Option<PathBuf>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), FastaError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_records(path: &Path) -> Result<SeqFile, FastaError> {
    info!("reading {}", path.display());
    Ok(read_fasta_file(path)?)
}

fn load_nonempty(path: &Path) -> Result<SeqFile, FastaError> {
    let records = load_records(path)?;
    if records.is_empty() {
        return Err(FastaError::Empty(format!(
            "no FastA records in {}",
            path.display()
        )));
    }
    Ok(records)
}

fn write_records(path: &Path, records: &[SeqRecord]) -> Result<String, FastaError> {
    write_fasta_file(path, records)?;
    info!("wrote {} records to {}", records.len(), path.display());
    Ok(format!(
        "Wrote {} sequence(s) to {}",
        records.len(),
        path.display()
    ))
}

fn load_config() -> FastaKitConfig {
    match find_config() {
        Some(path) => match FastaKitConfig::from_file(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Error reading {}: {}", path.display(), e);
                FastaKitConfig::default()
            }
        },
        None => FastaKitConfig::default(),
    }
}

fn parse_coordinates(
    coordinates: Option<&str>,
    regions: &[String],
) -> Result<Vec<Coordinate>, FastaError> {
    let mut coords: Vec<Coordinate> = match coordinates {
        Some(json) => serde_json::from_str(json)?,
        None => Vec::new(),
    };
    for region in regions {
        coords.push(Coordinate::parse_region(region)?);
    }
    if coords.is_empty() {
        return Err(FastaError::Param(String::from(
            "no coordinates given (use --coordinates or --region)",
        )));
    }
    Ok(coords)
}

fn dispatch(command: Command, config: &FastaKitConfig) -> Result<(), FastaError> {
    match command {
        Command::Load { path } => print_json(&load(&load_records(&path)?)),
        Command::Summarize { path } => print_json(&summarize(&load_records(&path)?)),
        Command::GetById { path, id } => print_json(&get_by_id(&load_records(&path)?, &id)?),
        Command::FilterByLength {
            path,
            min_length,
            max_length,
        } => {
            let records = load_records(&path)?;
            print_json(&filter_by_length(&records, min_length, max_length)?)
        }
        Command::Write { path, sequences } => {
            let records: Vec<SeqRecord> = serde_json::from_str(&sequences)?;
            println!("{}", write_records(&path, &records)?);
            Ok(())
        }
        Command::Validate {
            path,
            sequence_type,
        } => print_json(&validate_records(&load_records(&path)?, sequence_type)),
        Command::ReverseComplement {
            path,
            output_path,
            sequence_ids,
        } => {
            let records = load_records(&path)?;
            let ids = (!sequence_ids.is_empty()).then_some(sequence_ids.as_slice());
            let result = reverse_complement_records(&records, ids);
            match output_path {
                Some(out) => {
                    println!("{}", write_records(&out, &result.to_records())?);
                    Ok(())
                }
                None => print_json(&result),
            }
        }
        Command::Translate {
            path,
            reading_frame,
            genetic_code,
            output_path,
        } => {
            let frame = ReadingFrame::try_from(reading_frame)?;
            let code_name = genetic_code.as_deref().unwrap_or(config.genetic_code.as_str());
            let code = GeneticCode::from_name(code_name)?;
            let records = load_nonempty(&path)?;
            let result = translate_records(&records, frame, &code);
            match output_path {
                Some(out) => {
                    println!("{}", write_records(&out, &result.to_records())?);
                    Ok(())
                }
                None => print_json(&result),
            }
        }
        Command::Search {
            path,
            pattern,
            search_type,
            case_sensitive,
            include_reverse_complement,
        } => {
            let opts = SearchOptions {
                search_type,
                case_sensitive,
                include_reverse_complement,
            };
            build_regex(&pattern, &opts)?;
            let records = load_records(&path)?;
            print_json(&search_records(&records, &pattern, &opts)?)
        }
        Command::GcContent { path, window_size } => {
            let records = load_nonempty(&path)?;
            print_json(&gc_content(&records, window_size))
        }
        Command::Split {
            path,
            split_by,
            output_dir,
            value,
            prefix,
        } => {
            let default_value = match split_by {
                SplitBy::Count => Some(config.split_count),
                SplitBy::Size => Some(config.split_size_mb),
                SplitBy::Individual => None,
            };
            let plan = SplitPlan::new(split_by, value.or(default_value))?;
            let prefix = prefix.unwrap_or_else(|| config.split_prefix.clone());
            let records = load_nonempty(&path)?;
            print_json(&split_records(
                &records,
                split_by,
                plan,
                &output_dir,
                &prefix,
            )?)
        }
        Command::Merge {
            input_paths,
            output_path,
            remove_duplicates,
            add_file_prefix,
        } => {
            let opts = MergeOptions {
                remove_duplicates,
                add_file_prefix,
            };
            print_json(&merge_files(&input_paths, &output_path, &opts)?)
        }
        Command::Extract {
            path,
            coordinates,
            regions,
            output_path,
        } => {
            let coords = parse_coordinates(coordinates.as_deref(), &regions)?;
            let records = load_records(&path)?;
            let result = extract_subsequences(&records, &coords);
            match output_path {
                Some(out) => {
                    println!("{}", write_records(&out, &result.to_records())?);
                    if !result.errors.is_empty() {
                        print_json(&result.errors)?;
                    }
                    Ok(())
                }
                None => print_json(&result),
            }
        }
        Command::FindDuplicates {
            path,
            duplicate_type,
            case_sensitive,
            output_duplicates,
            output_unique,
        } => {
            let records = load_records(&path)?;
            let report = find_duplicates(&records, duplicate_type, case_sensitive);
            if let Some(out) = output_duplicates {
                write_records(&out, &report.duplicates)?;
            }
            if let Some(out) = output_unique {
                write_records(&out, &report.unique)?;
            }
            print_json(&report)
        }
    }
}

pub fn run() -> Result<(), FastaError> {
    env_logger::init();
    info!("Starting log");

    let cli = Cli::parse();
    let config = load_config();
    dispatch(cli.command, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_negative_frame() {
        let cli = Cli::try_parse_from(["fastakit", "translate", "in.fa", "-f", "-2"]).unwrap();
        match cli.command {
            Command::Translate { reading_frame, .. } => assert_eq!(reading_frame, -2),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_enum_values() {
        assert!(Cli::try_parse_from(["fastakit", "search", "in.fa", "AT", "-t", "fuzzy"]).is_err());
        assert!(Cli::try_parse_from([
            "fastakit", "split", "in.fa", "-b", "lines", "-d", "out"
        ])
        .is_err());
    }

    #[test]
    fn test_cli_ids_are_comma_separated() {
        let cli =
            Cli::try_parse_from(["fastakit", "reverse-complement", "in.fa", "-i", "a,b"]).unwrap();
        match cli.command {
            Command::ReverseComplement { sequence_ids, .. } => {
                assert_eq!(sequence_ids, vec!["a", "b"])
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_coordinates_mixed() {
        let json = r#"[{"sequenceId": "a", "start": 1, "end": 2}]"#;
        let coords = parse_coordinates(Some(json), &[String::from("b:3-4=x")]).unwrap();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[1].name.as_deref(), Some("x"));
        assert!(parse_coordinates(None, &[]).is_err());
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let res = load_records(Path::new("tests/data/does-not-exist.fas"));
        assert!(matches!(res, Err(FastaError::Io(_))));
    }

    #[test]
    fn test_translate_rejects_bad_frame_before_reading() {
        let config = FastaKitConfig::default();
        let cmd = Command::Translate {
            path: PathBuf::from("tests/data/does-not-exist.fas"),
            reading_frame: 5,
            genetic_code: None,
            output_path: None,
        };
        assert!(matches!(dispatch(cmd, &config), Err(FastaError::Param(_))));
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::collections::{HashMap, HashSet};

use clap::ValueEnum;
use log::{debug, info};
use serde::Serialize;

use crate::seq::record::{strip_whitespace, IndexedRecord, SeqRecord};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateType {
    Id,
    Sequence,
    Both,
}

impl DuplicateType {
    fn by_id(&self) -> bool {
        matches!(self, DuplicateType::Id | DuplicateType::Both)
    }

    fn by_sequence(&self) -> bool {
        matches!(self, DuplicateType::Sequence | DuplicateType::Both)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Id,
    Sequence,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub index: usize,
    pub id: String,
    pub description: String,
    pub length: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    pub kind: GroupKind,
    pub key: String,
    pub count: usize,
    pub members: Vec<GroupMember>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateSummary {
    pub total_sequences: usize,
    pub duplicate_type: DuplicateType,
    pub case_sensitive: bool,
    pub id_duplicate_groups: usize,
    pub sequence_duplicate_groups: usize,
    pub duplicated_records: usize,
    pub unique_sequences: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateReport {
    pub summary: DuplicateSummary,
    pub groups: Vec<DuplicateGroup>,
    #[serde(skip)]
    pub duplicates: Vec<SeqRecord>,
    #[serde(skip)]
    pub unique: Vec<SeqRecord>,
}

pub fn normalize_sequence(sequence: &str, case_sensitive: bool) -> String {
    let stripped = strip_whitespace(sequence);
    if case_sensitive {
        stripped
    } else {
        stripped.to_uppercase()
    }
}

// Groups indices by key, keeping keys in order of first appearance. Only groups of two or more
// are returned.
fn group_by_key<'a, F>(records: &'a [SeqRecord], key: F) -> Vec<(String, Vec<IndexedRecord<'a>>)>
where
    F: Fn(&SeqRecord) -> String,
{
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<IndexedRecord<'a>>> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        let k = key(record);
        groups
            .entry(k.clone())
            .or_insert_with(|| {
                order.push(k);
                Vec::new()
            })
            .push(IndexedRecord { record, index });
    }
    order
        .into_iter()
        .filter_map(|k| groups.remove(&k).map(|members| (k, members)))
        .filter(|(_, members)| members.len() > 1)
        .collect()
}

fn to_group(kind: GroupKind, key: String, members: &[IndexedRecord]) -> DuplicateGroup {
    DuplicateGroup {
        kind,
        key,
        count: members.len(),
        members: members
            .iter()
            .map(|m| GroupMember {
                index: m.index,
                id: m.record.id.clone(),
                description: m.record.description.clone(),
                length: m.record.len(),
            })
            .collect(),
    }
}

pub fn find_duplicates(
    records: &[SeqRecord],
    duplicate_type: DuplicateType,
    case_sensitive: bool,
) -> DuplicateReport {
    info!(
        "looking for {:?} duplicates among {} records",
        duplicate_type,
        records.len()
    );
    let id_groups = if duplicate_type.by_id() {
        group_by_key(records, |r| r.id.clone())
    } else {
        Vec::new()
    };
    let seq_groups = if duplicate_type.by_sequence() {
        group_by_key(records, |r| normalize_sequence(&r.sequence, case_sensitive))
    } else {
        Vec::new()
    };
    debug!(
        "{} id groups, {} sequence groups",
        id_groups.len(),
        seq_groups.len()
    );

    let in_group: HashSet<usize> = id_groups
        .iter()
        .chain(seq_groups.iter())
        .flat_map(|(_, members)| members.iter().map(|m| m.index))
        .collect();

    let duplicates: Vec<SeqRecord> = records
        .iter()
        .enumerate()
        .filter(|(i, _)| in_group.contains(i))
        .map(|(_, r)| r.clone())
        .collect();

    // Everything outside any group, then the first member of each id group, then the first
    // member of each sequence group unless a record with that id is already in.
    let mut unique: Vec<SeqRecord> = records
        .iter()
        .enumerate()
        .filter(|(i, _)| !in_group.contains(i))
        .map(|(_, r)| r.clone())
        .collect();
    for (_, members) in &id_groups {
        unique.push(members[0].record.clone());
    }
    for (_, members) in &seq_groups {
        let first = members[0].record;
        if !unique.iter().any(|r| r.id == first.id) {
            unique.push(first.clone());
        }
    }

    let groups: Vec<DuplicateGroup> = id_groups
        .iter()
        .map(|(k, m)| to_group(GroupKind::Id, k.clone(), m))
        .chain(
            seq_groups
                .iter()
                .map(|(k, m)| to_group(GroupKind::Sequence, k.clone(), m)),
        )
        .collect();

    DuplicateReport {
        summary: DuplicateSummary {
            total_sequences: records.len(),
            duplicate_type,
            case_sensitive,
            id_duplicate_groups: id_groups.len(),
            sequence_duplicate_groups: seq_groups.len(),
            duplicated_records: duplicates.len(),
            unique_sequences: unique.len(),
        },
        groups,
        duplicates,
        unique,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::fasta::parse_fasta;

    fn ids(records: &[SeqRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_sequence_duplicates() {
        let records = parse_fasta(">a desc1\nATCG\n>b desc2\nATCG\n");
        let report = find_duplicates(&records, DuplicateType::Sequence, false);
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].kind, GroupKind::Sequence);
        assert_eq!(report.groups[0].count, 2);
        let member_ids: Vec<&str> = report.groups[0].members.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(member_ids, vec!["a", "b"]);
        assert_eq!(ids(&report.unique), vec!["a"]);
    }

    #[test]
    fn test_id_duplicates() {
        let records = vec![
            SeqRecord::new("x", "", "A"),
            SeqRecord::new("dup", "", "C"),
            SeqRecord::new("y", "", "G"),
            SeqRecord::new("dup", "", "T"),
            SeqRecord::new("dup", "", "AA"),
        ];
        let report = find_duplicates(&records, DuplicateType::Id, false);
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].count, 3);
        assert_eq!(report.groups[0].key, "dup");
        assert_eq!(report.unique.len(), records.len() - 3 + 1);
        assert_eq!(ids(&report.unique), vec!["x", "y", "dup"]);
        assert_eq!(report.unique[2].sequence, "C");
        assert_eq!(report.duplicates.len(), 3);
    }

    #[test]
    fn test_case_and_whitespace_normalisation() {
        let records = vec![
            SeqRecord::new("a", "", "acgt"),
            SeqRecord::new("b", "", "AC GT"),
        ];
        let insensitive = find_duplicates(&records, DuplicateType::Sequence, false);
        assert_eq!(insensitive.summary.sequence_duplicate_groups, 1);
        assert_eq!(insensitive.groups[0].key, "ACGT");
        let sensitive = find_duplicates(&records, DuplicateType::Sequence, true);
        assert_eq!(sensitive.summary.sequence_duplicate_groups, 0);
        assert_eq!(sensitive.unique.len(), 2);
    }

    #[test]
    fn test_both_modes_no_double_insertion() {
        // 'a' is both an id duplicate and the first of a sequence group
        let records = vec![
            SeqRecord::new("a", "", "AAAA"),
            SeqRecord::new("a", "", "CCCC"),
            SeqRecord::new("b", "", "AAAA"),
            SeqRecord::new("c", "", "GGGG"),
        ];
        let report = find_duplicates(&records, DuplicateType::Both, false);
        assert_eq!(report.summary.id_duplicate_groups, 1);
        assert_eq!(report.summary.sequence_duplicate_groups, 1);
        assert_eq!(report.groups[0].kind, GroupKind::Id);
        assert_eq!(report.groups[1].kind, GroupKind::Sequence);
        assert_eq!(ids(&report.unique), vec!["c", "a"]);
        assert_eq!(report.summary.duplicated_records, 3);
    }

    #[test]
    fn test_no_duplicates() {
        let records = vec![SeqRecord::new("a", "", "A"), SeqRecord::new("b", "", "C")];
        let report = find_duplicates(&records, DuplicateType::Both, false);
        assert!(report.groups.is_empty());
        assert_eq!(report.unique, records);
        assert!(report.duplicates.is_empty());
    }
}

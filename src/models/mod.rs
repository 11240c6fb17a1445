use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Opaque key for one partition of the result source, e.g. `statewiseS071`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationId(String);

impl LocationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw markup of one fetched results page.
#[derive(Debug, Clone)]
pub struct RawDocument(pub String);

/// Cell values projected out of one accepted table row, still untyped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub constituency: String,
    pub number: String,
    pub leading_candidate: String,
    pub leading_party: String,
    pub trailing_candidate: String,
    pub trailing_party: String,
    pub margin: String,
    pub round: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Counting,
    ResultDeclared,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Counting => "Counting",
            Status::ResultDeclared => "Result Declared",
        }
    }
}

/// One electoral unit after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub constituency: String,
    pub number: u32,
    pub leading_candidate: String,
    pub leading_party: String,
    pub trailing_candidate: String,
    pub trailing_party: String,
    pub margin: u64,
    pub round: Option<String>,
    pub status: Status,
    pub party_code: String,
    pub label: String,
}

impl ResultRecord {
    /// Stable per-row key used as the chart category axis.
    pub fn seat_key(&self) -> String {
        format!("X{}", self.number)
    }

    pub fn is_declared(&self) -> bool {
        self.status == Status::ResultDeclared
    }
}

/// An immutable merged result set. Constituency numbers are unique and rows
/// are ordered by margin (descending), then constituency number.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultTable {
    records: Vec<ResultRecord>,
    // Constituency number -> position in `records`.
    #[serde(skip)]
    index: HashMap<u32, usize>,
}

impl ResultTable {
    /// Builds a table, keeping the first record seen for each constituency
    /// number. Returns the table and the numbers that were dropped as
    /// duplicates.
    pub fn new(records: Vec<ResultRecord>) -> (Self, Vec<u32>) {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        let mut kept: Vec<ResultRecord> = Vec::with_capacity(records.len());

        for record in records {
            if seen.insert(record.number) {
                kept.push(record);
            } else {
                duplicates.push(record.number);
            }
        }

        kept.sort_by(|a, b| b.margin.cmp(&a.margin).then(a.number.cmp(&b.number)));

        let index = kept.iter().enumerate().map(|(i, r)| (r.number, i)).collect();

        (
            Self {
                records: kept,
                index,
            },
            duplicates,
        )
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, number: u32) -> Option<&ResultRecord> {
        self.index.get(&number).map(|&i| &self.records[i])
    }

    /// True once every constituency has a declared result.
    pub fn is_complete(&self) -> bool {
        !self.records.is_empty() && self.records.iter().all(ResultRecord::is_declared)
    }
}

/// The currently published table together with its version marker.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub table: Arc<ResultTable>,
    /// Zero until the first publish; strictly increasing afterwards.
    pub version: u64,
    pub published_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            table: Arc::new(ResultTable::default()),
            version: 0,
            published_at: None,
        }
    }
}

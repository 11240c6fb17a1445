use crate::error::PipelineError;
use crate::models::{RawRow, ResultRecord, Status};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Party code used when the leading party is not known yet.
pub const UNKNOWN_PARTY_CODE: &str = "X";

/// Margin cell text while no candidate leads.
pub const NO_MARGIN: &str = "-";

const LABEL_DELIMITER: &str = " <> ";

lazy_static! {
    static ref DECLARED: Regex = Regex::new(r"(?i)^result\s+declared").expect("declared pattern");
    static ref GROUPED_DIGITS: Regex = Regex::new(r"^[0-9]+(,[0-9]+)*$").expect("digits pattern");
}

/// Types and derives one record from a raw row. Deterministic: the same row
/// always yields the same record.
pub fn normalize(row: &RawRow) -> Result<ResultRecord, PipelineError> {
    let number = row
        .number
        .trim()
        .parse::<u32>()
        .map_err(|_| coercion("constituency number", &row.number))?;
    let margin = parse_margin(&row.margin)?;

    let round = row
        .round
        .as_ref()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    let mut record = ResultRecord {
        constituency: row.constituency.trim().to_string(),
        number,
        leading_candidate: row.leading_candidate.trim().to_string(),
        leading_party: row.leading_party.trim().to_string(),
        trailing_candidate: row.trailing_candidate.trim().to_string(),
        trailing_party: row.trailing_party.trim().to_string(),
        margin,
        round,
        status: parse_status(&row.status),
        party_code: party_code(&row.leading_party),
        label: String::new(),
    };
    record.label = label_for(&record);

    Ok(record)
}

pub fn parse_margin(raw: &str) -> Result<u64, PipelineError> {
    let raw = raw.trim();
    if raw == NO_MARGIN {
        return Ok(0);
    }
    if !GROUPED_DIGITS.is_match(raw) {
        return Err(coercion("margin", raw));
    }
    raw.replace(',', "").parse::<u64>().map_err(|_| coercion("margin", raw))
}

pub fn parse_status(raw: &str) -> Status {
    if DECLARED.is_match(raw.trim()) {
        Status::ResultDeclared
    } else {
        Status::Counting
    }
}

/// Abbreviates a party name to its word initials, e.g.
/// "Bharatiya Janata Party" -> "BJP".
pub fn party_code(raw: &str) -> String {
    let code: String = raw
        .split_whitespace()
        .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
        .flat_map(char::to_uppercase)
        .collect();

    if code.is_empty() {
        UNKNOWN_PARTY_CODE.to_string()
    } else {
        code
    }
}

/// Formats a number with Indian digit grouping: the last three digits, then
/// groups of two (`1,23,456`).
pub fn format_indian(n: u64) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while head.len() > 2 {
        let (rest, group) = head.split_at(head.len() - 2);
        groups.push(group);
        head = rest;
    }
    groups.push(head);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// The display label the charts show next to each bar.
pub fn label_for(record: &ResultRecord) -> String {
    let stage = match (&record.status, &record.round) {
        (Status::ResultDeclared, _) => Status::ResultDeclared.as_str(),
        (Status::Counting, Some(round)) => round.as_str(),
        (Status::Counting, None) => Status::Counting.as_str(),
    };
    let margin = format_indian(record.margin);

    [
        margin.as_str(),
        record.constituency.as_str(),
        stage,
        record.leading_candidate.as_str(),
        record.party_code.as_str(),
    ]
    .join(LABEL_DELIMITER)
}

// Parties whose codes the charts already know; these never get a suffix.
const KNOWN_PARTIES: &[(&str, &str)] = &[
    ("Bharatiya Janata Party", "BJP"),
    ("Indian National Congress", "INC"),
    ("Indian National Lok Dal", "INLD"),
    ("Aam Aadmi Party", "AAP"),
    ("Jannayak Janta Party", "JJP"),
];

/// Assigns each raw party name one code for the lifetime of the registry.
/// Known parties and the empty name are fixed up front; any other name gets
/// its initials, or the initials plus the first free numeric suffix if that
/// code already belongs to another name. Once given, a code never changes.
#[derive(Debug, Clone)]
pub struct PartyCodes {
    by_name: HashMap<String, String>,
    taken: HashSet<String>,
}

impl PartyCodes {
    pub fn new() -> Self {
        let mut codes = Self {
            by_name: HashMap::new(),
            taken: HashSet::new(),
        };
        codes.reserve("", UNKNOWN_PARTY_CODE);
        for (name, code) in KNOWN_PARTIES {
            codes.reserve(name, code);
        }
        codes
    }

    fn reserve(&mut self, name: &str, code: &str) {
        self.by_name.insert(name.to_string(), code.to_string());
        self.taken.insert(code.to_string());
    }

    pub fn code_for(&mut self, name: &str) -> String {
        let name = name.trim();
        if let Some(code) = self.by_name.get(name) {
            return code.clone();
        }

        let base = party_code(name);
        let mut code = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&code) {
            code = format!("{}{}", base, suffix);
            suffix += 1;
        }
        self.reserve(name, &code);
        code
    }
}

impl Default for PartyCodes {
    fn default() -> Self {
        Self::new()
    }
}

/// Table-wide pass over freshly normalized records: replaces each record's
/// party code with the one `codes` holds for its party, assigning new codes
/// in order of first appearance, and rebuilds labels that changed.
pub fn annotate(mut records: Vec<ResultRecord>, codes: &mut PartyCodes) -> Vec<ResultRecord> {
    for record in &mut records {
        let code = codes.code_for(&record.leading_party);
        if code != record.party_code {
            record.party_code = code;
            record.label = label_for(record);
        }
    }
    records
}

fn coercion(field: &'static str, value: &str) -> PipelineError {
    PipelineError::FieldCoercion {
        field,
        value: value.to_string(),
    }
}

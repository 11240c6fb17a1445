use crate::models::{ResultRecord, ResultTable};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

// Seats led by one party
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyTally {
    pub party_code: String,
    pub seats: usize,
}

pub fn available_constituencies(table: &ResultTable) -> Vec<String> {
    table
        .records()
        .iter()
        .map(|r| r.constituency.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Seats led per party, most seats first. Rows without a leader yet count
/// under the unknown-party code.
pub fn party_tally(table: &ResultTable) -> Vec<PartyTally> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in table.records() {
        *counts.entry(record.party_code.as_str()).or_insert(0) += 1;
    }

    let mut tally: Vec<PartyTally> = counts
        .into_iter()
        .map(|(code, seats)| PartyTally {
            party_code: code.to_string(),
            seats,
        })
        .collect();
    tally.sort_by(|a, b| b.seats.cmp(&a.seats).then_with(|| a.party_code.cmp(&b.party_code)));
    tally
}

/// The `n` tightest races, smallest margin first. A zero margin means no
/// candidate leads yet, so those rows are left out.
pub fn closest_contests(table: &ResultTable, n: usize) -> Vec<&ResultRecord> {
    let mut contested: Vec<&ResultRecord> = table.records().iter().filter(|r| r.margin > 0).collect();
    contested.sort_by(|a, b| a.margin.cmp(&b.margin).then(a.number.cmp(&b.number)));
    contested.truncate(n);
    contested
}

/// Rows for the selected constituencies, in table order. Selecting nothing
/// selects everything.
pub fn filter_constituencies<'a>(table: &'a ResultTable, selected: &[String]) -> Vec<&'a ResultRecord> {
    if selected.is_empty() {
        return table.records().iter().collect();
    }
    let wanted: HashSet<&str> = selected.iter().map(String::as_str).collect();
    table
        .records()
        .iter()
        .filter(|r| wanted.contains(r.constituency.as_str()))
        .collect()
}

use crate::models::{ResultRecord, ResultTable};
use std::collections::HashMap;

/// Whether `candidate` differs in content from the last published table.
/// Rows are matched by constituency number, so row order does not matter.
/// With nothing published yet, everything counts as a change.
pub fn has_changed(previous: Option<&ResultTable>, candidate: &ResultTable) -> bool {
    let previous = match previous {
        Some(table) => table,
        None => return true,
    };

    if previous.len() != candidate.len() {
        return true;
    }

    let by_number: HashMap<u32, &ResultRecord> =
        previous.records().iter().map(|r| (r.number, r)).collect();

    candidate
        .records()
        .iter()
        .any(|record| by_number.get(&record.number) != Some(&record))
}

use crate::error::PipelineError;
use crate::models::{LocationId, ResultRecord, ResultTable};
use crate::pipeline::normalize::{annotate, PartyCodes};
use log::warn;

/// Merges the records of every location that produced data this tick into
/// one table. Locations that failed are simply absent; partial data is still
/// published. Fails only when nothing at all came back.
///
/// Party codes come from `codes`, which the caller keeps across ticks so a
/// party's code does not move when other parties appear or drop out.
pub fn aggregate(
    batches: Vec<(LocationId, Vec<ResultRecord>)>,
    codes: &mut PartyCodes,
) -> Result<ResultTable, PipelineError> {
    let merged: Vec<ResultRecord> = batches
        .into_iter()
        .flat_map(|(_, records)| records)
        .collect();

    if merged.is_empty() {
        return Err(PipelineError::EmptyAggregate);
    }

    let (table, duplicates) = ResultTable::new(annotate(merged, codes));
    if !duplicates.is_empty() {
        warn!(
            "Ignoring {} duplicate constituency row(s): {:?}",
            duplicates.len(),
            duplicates
        );
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    fn record(number: u32, party: &str, margin: u64) -> ResultRecord {
        ResultRecord {
            constituency: format!("Seat {}", number),
            number,
            leading_candidate: String::new(),
            leading_party: party.to_string(),
            trailing_candidate: String::new(),
            trailing_party: String::new(),
            margin,
            round: None,
            status: Status::Counting,
            party_code: crate::pipeline::normalize::party_code(party),
            label: String::new(),
        }
    }

    #[test]
    fn concatenates_locations() {
        let table = aggregate(
            vec![
                (LocationId::new("A"), vec![record(1, "Aam Aadmi Party", 5), record(2, "", 0)]),
                (LocationId::new("B"), vec![]),
                (LocationId::new("C"), vec![record(90, "Bharatiya Janata Party", 50)]),
            ],
            &mut PartyCodes::new(),
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.records()[0].number, 90);
        assert_eq!(table.get(2).map(|r| r.party_code.as_str()), Some("X"));
    }

    #[test]
    fn empty_merge_is_not_ready() {
        let mut codes = PartyCodes::new();
        assert!(matches!(aggregate(vec![], &mut codes), Err(PipelineError::EmptyAggregate)));
        assert!(matches!(
            aggregate(vec![(LocationId::new("A"), vec![])], &mut codes),
            Err(PipelineError::EmptyAggregate)
        ));
    }

    #[test]
    fn duplicate_numbers_keep_first_location() {
        let table = aggregate(
            vec![
                (LocationId::new("A"), vec![record(1, "Aam Aadmi Party", 5)]),
                (LocationId::new("B"), vec![record(1, "Bharatiya Janata Party", 9)]),
            ],
            &mut PartyCodes::new(),
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1).map(|r| r.party_code.as_str()), Some("AAP"));
    }

    #[test]
    fn party_keeps_its_code_across_ticks() {
        let mut codes = PartyCodes::new();
        let code_of = |table: &ResultTable, number: u32| table.get(number).map(|r| r.party_code.clone());

        let first = aggregate(
            vec![(
                LocationId::new("A"),
                vec![record(1, "Indian Nationalist Conference", 5), record(2, "Indian National Congress", 7)],
            )],
            &mut codes,
        )
        .unwrap();
        assert_eq!(code_of(&first, 1).as_deref(), Some("INC2"));
        assert_eq!(code_of(&first, 2).as_deref(), Some("INC"));

        // Next tick: Congress is gone and a third colliding name shows up.
        let second = aggregate(
            vec![(
                LocationId::new("A"),
                vec![record(1, "Indian Nationalist Conference", 5), record(3, "Independent Nagrik Committee", 2)],
            )],
            &mut codes,
        )
        .unwrap();
        assert_eq!(code_of(&second, 1).as_deref(), Some("INC2"));
        assert_eq!(code_of(&second, 3).as_deref(), Some("INC3"));
        assert!(second.get(1).is_some_and(|r| r.label.ends_with(" <> INC2")));
    }
}

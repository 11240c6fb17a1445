use crate::error::PipelineError;
use crate::models::{RawDocument, RawRow};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    // document -> main region -> third panel -> results table body
    static ref RESULTS_BODY: Selector =
        Selector::parse("html > body > main > div > div:nth-of-type(3) > div > table > tbody")
            .expect("results body selector");
    static ref ROW: Selector = Selector::parse("tr").expect("row selector");
    static ref CELL: Selector = Selector::parse("td").expect("cell selector");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("whitespace pattern");
}

// Cell positions shared by both page layouts.
const CONSTITUENCY: usize = 0;
const NUMBER: usize = 1;
const LEADING_CANDIDATE: usize = 2;
const LEADING_PARTY: usize = 4;
const TRAILING_CANDIDATE: usize = 15;
const TRAILING_PARTY: usize = 17;
const MARGIN: usize = 28;
const ROUND: usize = 29;

/// Known layouts of a result row, identified by how many cells the row
/// carries. Any other cell count is a header, footer, or nested table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    /// 30 cells; margin then status in the last two cells.
    Standard,
    /// 31 cells; margin, round, then status.
    WithRound,
}

impl SchemaVariant {
    pub const STANDARD_ARITY: usize = 30;
    pub const WITH_ROUND_ARITY: usize = 31;

    pub fn from_arity(cells: usize) -> Option<Self> {
        match cells {
            Self::STANDARD_ARITY => Some(SchemaVariant::Standard),
            Self::WITH_ROUND_ARITY => Some(SchemaVariant::WithRound),
            _ => None,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            SchemaVariant::Standard => Self::STANDARD_ARITY,
            SchemaVariant::WithRound => Self::WITH_ROUND_ARITY,
        }
    }

    fn project(&self, cells: &[String]) -> RawRow {
        let round = match self {
            SchemaVariant::Standard => None,
            SchemaVariant::WithRound => Some(cells[ROUND].clone()),
        };

        RawRow {
            constituency: cells[CONSTITUENCY].clone(),
            number: cells[NUMBER].clone(),
            leading_candidate: cells[LEADING_CANDIDATE].clone(),
            leading_party: cells[LEADING_PARTY].clone(),
            trailing_candidate: cells[TRAILING_CANDIDATE].clone(),
            trailing_party: cells[TRAILING_PARTY].clone(),
            margin: cells[MARGIN].clone(),
            round,
            status: cells[self.arity() - 1].clone(),
        }
    }
}

/// Pulls candidate result rows out of a results page, in document order.
///
/// Rows whose cell count matches no known [`SchemaVariant`] are skipped. A
/// page without the results table at all is a shape mismatch.
pub fn extract(document: &RawDocument) -> Result<Vec<RawRow>, PipelineError> {
    let html = Html::parse_document(&document.0);

    let body = html
        .select(&RESULTS_BODY)
        .next()
        .ok_or_else(|| PipelineError::ParseShapeMismatch("results table not found".to_string()))?;

    let mut rows = Vec::new();
    for row in body.select(&ROW) {
        let cells: Vec<String> = row.select(&CELL).map(cell_text).collect();

        match SchemaVariant::from_arity(cells.len()) {
            Some(variant) => rows.push(variant.project(&cells)),
            None => debug!("skipping row with {} cells", cells.len()),
        }
    }

    Ok(rows)
}

fn cell_text(cell: ElementRef<'_>) -> String {
    let text: String = cell.text().collect();
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_html(cells: &[String]) -> String {
        let tds: String = cells.iter().map(|c| format!("<td>{}</td>", c)).collect();
        format!("<tr>{}</tr>", tds)
    }

    fn page(rows: &[String]) -> RawDocument {
        RawDocument(format!(
            "<html><body><main><div><div>nav</div><div>banner</div><div><div><table><tbody>{}</tbody></table></div></div></div></main></body></html>",
            rows.concat()
        ))
    }

    fn cells(arity: usize) -> Vec<String> {
        (0..arity).map(|i| format!("c{}", i)).collect()
    }

    #[test]
    fn projects_standard_row() {
        let doc = page(&[row_html(&cells(30))]);
        let rows = extract(&doc).unwrap();
        assert_eq!(
            rows,
            vec![RawRow {
                constituency: "c0".to_string(),
                number: "c1".to_string(),
                leading_candidate: "c2".to_string(),
                leading_party: "c4".to_string(),
                trailing_candidate: "c15".to_string(),
                trailing_party: "c17".to_string(),
                margin: "c28".to_string(),
                round: None,
                status: "c29".to_string(),
            }]
        );
    }

    #[test]
    fn projects_row_with_round() {
        let doc = page(&[row_html(&cells(31))]);
        let rows = extract(&doc).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].margin, "c28");
        assert_eq!(rows[0].round.as_deref(), Some("c29"));
        assert_eq!(rows[0].status, "c30");
    }

    #[test]
    fn drops_rows_of_unknown_arity() {
        let doc = page(&[
            row_html(&cells(3)),
            row_html(&cells(30)),
            row_html(&cells(29)),
            row_html(&cells(32)),
        ]);
        assert_eq!(extract(&doc).unwrap().len(), 1);
    }

    #[test]
    fn collapses_whitespace_in_cells() {
        let mut values = cells(30);
        values[0] = "  Ambala\n   City ".to_string();
        values[4] = "<span>Bharatiya</span>   Janata Party".to_string();
        let rows = extract(&page(&[row_html(&values)])).unwrap();
        assert_eq!(rows[0].constituency, "Ambala City");
        assert_eq!(rows[0].leading_party, "Bharatiya Janata Party");
    }

    #[test]
    fn missing_table_is_a_shape_mismatch() {
        let doc = RawDocument("<html><body><p>Results will be available soon</p></body></html>".to_string());
        assert!(matches!(extract(&doc), Err(PipelineError::ParseShapeMismatch(_))));
    }

    #[test]
    fn arity_constants_round_trip() {
        for variant in [SchemaVariant::Standard, SchemaVariant::WithRound] {
            assert_eq!(SchemaVariant::from_arity(variant.arity()), Some(variant));
        }
    }
}

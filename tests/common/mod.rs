#![allow(dead_code)]

use async_trait::async_trait;
use live_tally::config::{LOCATIONS_VAR, POLL_INTERVAL_VAR};
use live_tally::models::RawDocument;
use live_tally::pipeline::Fetch;
use live_tally::{Config, LocationId, PipelineError};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub enum Reply {
    Page(String),
    Fail,
}

/// In-memory stand-in for the results site. Each location replays its
/// scripted replies in order and then keeps repeating the last one.
#[derive(Clone, Default)]
pub struct FakeSite {
    scripts: Arc<Mutex<HashMap<LocationId, VecDeque<Reply>>>>,
    calls: Arc<Mutex<Vec<LocationId>>>,
}

impl FakeSite {
    pub fn script(&self, location: &str, replies: Vec<Reply>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(LocationId::new(location), replies.into());
    }

    pub fn calls(&self) -> Vec<LocationId> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetch for FakeSite {
    async fn fetch(&self, location: &LocationId) -> Result<RawDocument, PipelineError> {
        self.calls.lock().unwrap().push(location.clone());

        let reply = {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(location) {
                Some(script) if script.len() > 1 => script.pop_front(),
                Some(script) => script.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Page(html)) => Ok(RawDocument(html)),
            Some(Reply::Fail) | None => Err(PipelineError::transport(location, "connection reset by peer")),
        }
    }
}

pub fn config(locations: &str) -> Config {
    let locations = locations.to_string();
    Config::from_lookup(move |key| match key {
        LOCATIONS_VAR => Some(locations.clone()),
        POLL_INTERVAL_VAR => Some("15".to_string()),
        _ => None,
    })
    .unwrap()
}

/// One 30-cell result row laid out like the live page.
pub fn result_row(number: u32, constituency: &str, party: &str, margin: &str, status: &str) -> String {
    let mut cells: Vec<String> = (0..30).map(|_| String::new()).collect();
    cells[0] = constituency.to_string();
    cells[1] = number.to_string();
    cells[2] = format!("CANDIDATE {}", number);
    cells[4] = party.to_string();
    cells[15] = format!("RUNNER UP {}", number);
    cells[17] = "Indian National Congress".to_string();
    cells[28] = margin.to_string();
    cells[29] = status.to_string();
    row(&cells)
}

/// A row that is not a result row (wrong number of cells).
pub fn junk_row(cells: usize) -> String {
    let cells: Vec<String> = (0..cells).map(|i| format!("note {}", i)).collect();
    row(&cells)
}

fn row(cells: &[String]) -> String {
    let tds: String = cells.iter().map(|c| format!("<td>{}</td>", c)).collect();
    format!("<tr>{}</tr>", tds)
}

pub fn page(rows: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>Results</title></head><body>\
         <main><div>\
         <div class=\"nav\">menu</div>\
         <div class=\"summary\">summary</div>\
         <div class=\"results\"><div><table><thead><tr><th>Constituency</th></tr></thead>\
         <tbody>{}</tbody></table></div></div>\
         </div></main></body></html>",
        rows.concat()
    )
}

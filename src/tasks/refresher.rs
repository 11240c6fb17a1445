use crate::config::Config;
use crate::error::PipelineError;
use crate::models::{LocationId, ResultTable};
use crate::pipeline::{aggregate, collect_location, has_changed, Fetch, PartyCodes};
use crate::snapshot::SnapshotPublisher;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Polling,
    /// Every result is declared; nothing left to fetch.
    Stopped,
}

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Locations that failed to fetch or parse.
    pub failed_locations: Vec<LocationId>,
    /// Rows in the table computed this tick, if one was.
    pub rows: Option<usize>,
    /// Version published this tick, if the table changed.
    pub published_version: Option<u64>,
    pub complete: bool,
}

/// Owns the refresh loop: builds a fresh table every interval, publishes it
/// when it differs from the last one, and stops once results are final.
pub struct Refresher<F> {
    fetcher: F,
    locations: Vec<LocationId>,
    poll_interval: Duration,
    publisher: SnapshotPublisher,
    state: RefreshState,
    last_published: Option<Arc<ResultTable>>,
    party_codes: PartyCodes,
}

impl<F: Fetch> Refresher<F> {
    pub fn new(fetcher: F, config: &Config, publisher: SnapshotPublisher) -> Self {
        Self {
            fetcher,
            locations: config.locations.clone(),
            poll_interval: config.poll_interval,
            publisher,
            state: RefreshState::Polling,
            last_published: None,
            party_codes: PartyCodes::new(),
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    /// Runs ticks every poll interval, starting immediately, until the
    /// results are complete.
    pub async fn run(mut self) {
        info!(
            "Starting refresh task for {} location(s), every {:?}",
            self.locations.len(),
            self.poll_interval
        );
        let mut interval = interval(self.poll_interval);
        // A slow tick pushes the schedule back instead of bunching ticks up.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.state == RefreshState::Polling {
            interval.tick().await;
            self.tick().await;
        }

        info!("Refresh task finished.");
    }

    /// One pass of fetch, parse, merge and publish over all locations.
    pub async fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if self.state == RefreshState::Stopped {
            report.complete = true;
            return report;
        }

        let mut batches = Vec::with_capacity(self.locations.len());
        for location in &self.locations {
            match collect_location(&self.fetcher, location).await {
                Ok(records) => batches.push((location.clone(), records)),
                Err(e) => {
                    warn!("Skipping {} this round: {}", location, e);
                    report.failed_locations.push(location.clone());
                }
            }
        }

        let table = match aggregate(batches, &mut self.party_codes) {
            Ok(table) => Arc::new(table),
            Err(PipelineError::EmptyAggregate) => {
                info!("No results available yet; retrying in {:?}", self.poll_interval);
                return report;
            }
            Err(e) => {
                warn!("Could not merge results: {}", e);
                return report;
            }
        };
        report.rows = Some(table.len());

        if has_changed(self.last_published.as_deref(), &table) {
            let snapshot = self.publisher.publish(Arc::clone(&table));
            info!(
                "Published results v{} ({} rows, complete: {})",
                snapshot.version,
                table.len(),
                table.is_complete()
            );
            report.published_version = Some(snapshot.version);
            self.last_published = Some(Arc::clone(&table));
        } else {
            info!("No change in results ({} rows).", table.len());
        }

        // Completion is judged on the table just computed, published or not.
        if table.is_complete() {
            info!("All results declared; stopping refresh.");
            self.state = RefreshState::Stopped;
            report.complete = true;
        }

        report
    }
}

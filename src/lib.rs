//! Background refresh of a published election-results page: fetch, extract,
//! normalize, merge, detect changes, and publish an immutable snapshot that
//! readers can take at any time.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod snapshot;
pub mod tasks;
pub mod views;

pub use config::Config;
pub use error::PipelineError;
pub use models::{LocationId, ResultRecord, ResultTable, Snapshot, Status};
pub use snapshot::{SnapshotPublisher, SnapshotReader};
pub use tasks::{RefreshState, Refresher};

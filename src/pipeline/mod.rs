pub mod aggregate;
pub mod change;
pub mod extract;
pub mod fetch;
pub mod normalize;

use crate::error::PipelineError;
use crate::models::{LocationId, ResultRecord};
use log::warn;

pub use aggregate::aggregate;
pub use change::has_changed;
pub use extract::{extract, SchemaVariant};
pub use fetch::{Fetch, HttpFetcher};
pub use normalize::{annotate, normalize, PartyCodes};

/// Fetch, extract and normalize one location. Rows that fail to normalize
/// are dropped here; fetch and page-shape failures fail the whole location.
pub async fn collect_location<F>(fetcher: &F, location: &LocationId) -> Result<Vec<ResultRecord>, PipelineError>
where
    F: Fetch + ?Sized,
{
    let document = fetcher.fetch(location).await?;
    let rows = extract(&document)?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        match normalize(row) {
            Ok(record) => records.push(record),
            Err(e) => warn!("{}: dropping row for {:?}: {}", location, row.constituency, e),
        }
    }

    Ok(records)
}

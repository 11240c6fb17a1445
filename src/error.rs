use crate::models::LocationId;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can go wrong inside one refresh tick. None of these stop
/// the refresh loop; they are logged and the next tick tries again.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Network or HTTP-level failure while fetching one location.
    #[error("failed to fetch {location}: {source}")]
    Transport {
        location: LocationId,
        #[source]
        source: BoxError,
    },

    /// The document did not have the expected structure.
    #[error("unexpected page structure: {0}")]
    ParseShapeMismatch(String),

    /// A field of an otherwise well-shaped row could not be coerced.
    #[error("cannot read {field} from {value:?}")]
    FieldCoercion { field: &'static str, value: String },

    /// No location produced a single usable record.
    #[error("no result rows available yet")]
    EmptyAggregate,
}

impl PipelineError {
    pub fn transport(location: &LocationId, source: impl Into<BoxError>) -> Self {
        PipelineError::Transport {
            location: location.clone(),
            source: source.into(),
        }
    }
}

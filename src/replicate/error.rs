//! Error taxonomy for replication batches.
//!
//! Only failures that abort work are errors; expected per-item skip paths
//! are [`CopyOutcome`](super::outcome::CopyOutcome) values instead.

use thiserror::Error;

use crate::drive::ProviderError;

/// Fatal replication failures surfaced at the entry point.
#[derive(Debug, Error)]
pub enum ReplicateError {
    #[error("no item id found in the source URL")]
    InvalidSourceUrl,

    #[error("source item is missing or not accessible")]
    SourceUnresolvable,

    #[error("no item id found in the destination URL")]
    InvalidDestinationUrl,

    #[error("destination folder is missing or not accessible")]
    DestinationUnresolvable,

    #[error("no edit permission on the destination folder")]
    DestinationNotWritable,

    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

use std::path::PathBuf;
use thiserror::Error;

use crate::{ClergyId, EventId};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid event date `{0}` (expected YYYY-MM-DD, YYYY, or `unknown`)")]
    InvalidEventDate(String),

    #[error("duplicate clergy id {0}")]
    DuplicateClergyId(ClergyId),

    #[error("duplicate {kind} id {id}")]
    DuplicateEventId { kind: &'static str, id: EventId },

    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

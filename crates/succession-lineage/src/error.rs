use std::path::PathBuf;
use thiserror::Error;

use succession_model::ClergyId;

#[derive(Debug, Error)]
pub enum LineageError {
    #[error("no clergy record with id {0}")]
    UnknownClergy(ClergyId),

    #[error("clergy {0} is soft-deleted")]
    DeletedClergy(ClergyId),

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigJson(#[from] serde_json::Error),
}

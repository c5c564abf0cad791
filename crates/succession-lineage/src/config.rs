//! Engine configuration.
//!
//! Loaded from JSON; every field has a default so a config file only needs to
//! mention what it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;

use succession_model::RankTable;

use crate::LineageError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rank lookup used when the snapshot does not ship its own.
    pub ranks: RankTable,
    /// Rank given to clergy auto-created when a form names an unknown bishop.
    pub placeholder_rank: String,
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Report actors that fail `was_bishop_on` at the event date.
    pub check_actor_rank: bool,
    /// Report events dated outside the subject's lifetime.
    pub check_lifetimes: bool,
    /// Report bishops with no consecration on record (informational).
    pub report_undocumented_bishops: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ranks: RankTable::default(),
            placeholder_rank: "Bishop".to_string(),
            audit: AuditConfig::default(),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            check_actor_rank: true,
            check_lifetimes: true,
            report_undocumented_bishops: false,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(text: &str) -> Result<Self, LineageError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, LineageError> {
        let text = std::fs::read_to_string(path).map_err(|source| LineageError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// The rank table to use for `snapshot_ranks`: the snapshot's own when it
    /// has one, otherwise the configured table.
    pub fn effective_ranks<'a>(&'a self, snapshot_ranks: &'a RankTable) -> &'a RankTable {
        if snapshot_ranks.is_empty() {
            &self.ranks
        } else {
            snapshot_ranks
        }
    }
}

//! A read-only bundle of registry records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::{Clergy, ClergyId, Consecration, EventId, ModelError, Ordination, RankTable};

/// Everything the lineage engine reads, materialized in memory.
///
/// The storage layer is responsible for producing one of these (eager-loading
/// events and their references); the engine never goes back to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Rank lookup shipped with the data. Empty means "use the configured table".
    #[serde(default = "RankTable::empty", skip_serializing_if = "RankTable::is_empty")]
    pub ranks: RankTable,
    #[serde(default)]
    pub clergy: Vec<Clergy>,
    #[serde(default)]
    pub ordinations: Vec<Ordination>,
    #[serde(default)]
    pub consecrations: Vec<Consecration>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl Snapshot {
    pub fn new() -> Self {
        Self {
            ranks: RankTable::empty(),
            clergy: Vec::new(),
            ordinations: Vec::new(),
            consecrations: Vec::new(),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ModelError> {
        let snapshot: Self = serde_json::from_str(text)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject snapshots whose record ids collide.
    ///
    /// Other irregularities (dangling references, self-references, cycles) are
    /// legal in a snapshot; the engine tolerates them and the audit reports them.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen: BTreeSet<ClergyId> = BTreeSet::new();
        for c in &self.clergy {
            if !seen.insert(c.id) {
                return Err(ModelError::DuplicateClergyId(c.id));
            }
        }
        check_unique_events("ordination", self.ordinations.iter().map(|o| o.id))?;
        check_unique_events("consecration", self.consecrations.iter().map(|c| c.id))?;
        Ok(())
    }

    pub fn clergy(&self, id: ClergyId) -> Option<&Clergy> {
        self.clergy.iter().find(|c| c.id == id)
    }

    pub fn next_clergy_id(&self) -> ClergyId {
        ClergyId(self.clergy.iter().map(|c| c.id.0).max().unwrap_or(0) + 1)
    }

    pub fn next_ordination_id(&self) -> EventId {
        EventId(self.ordinations.iter().map(|o| o.id.0).max().unwrap_or(0) + 1)
    }

    pub fn next_consecration_id(&self) -> EventId {
        EventId(self.consecrations.iter().map(|c| c.id.0).max().unwrap_or(0) + 1)
    }
}

fn check_unique_events(
    kind: &'static str,
    ids: impl Iterator<Item = EventId>,
) -> Result<(), ModelError> {
    let mut seen: BTreeSet<EventId> = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ModelError::DuplicateEventId { kind, id });
        }
    }
    Ok(())
}

//! Eager lookup tables over a snapshot.

use chrono::NaiveDate;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use succession_model::{Clergy, ClergyId, Consecration, Ordination, RankTable, Snapshot};

use crate::{primary, validity, EngineConfig};

/// Per-clergy view of a [`Snapshot`], built once and then only read.
///
/// Every engine operation goes through an index so that traversals never
/// re-scan the event tables. Events are grouped by the clergy member they
/// belong to (the one receiving orders) and kept in record-id order.
#[derive(Debug, Clone)]
pub struct LineageIndex<'a> {
    snapshot: &'a Snapshot,
    ranks: Cow<'a, RankTable>,
    clergy: BTreeMap<ClergyId, &'a Clergy>,
    ordinations: HashMap<ClergyId, Vec<&'a Ordination>>,
    consecrations: HashMap<ClergyId, Vec<&'a Consecration>>,
}

impl<'a> LineageIndex<'a> {
    /// Index `snapshot` using its own rank table, or the default table if it has none.
    pub fn new(snapshot: &'a Snapshot) -> Self {
        let ranks = if snapshot.ranks.is_empty() {
            Cow::Owned(RankTable::default())
        } else {
            Cow::Borrowed(&snapshot.ranks)
        };
        Self::build(snapshot, ranks)
    }

    /// Index `snapshot`, falling back to the configured rank table.
    pub fn with_config(snapshot: &'a Snapshot, config: &'a EngineConfig) -> Self {
        Self::build(snapshot, Cow::Borrowed(config.effective_ranks(&snapshot.ranks)))
    }

    /// Index `snapshot` with an explicit rank table, ignoring the snapshot's.
    pub fn with_ranks(snapshot: &'a Snapshot, ranks: &'a RankTable) -> Self {
        Self::build(snapshot, Cow::Borrowed(ranks))
    }

    fn build(snapshot: &'a Snapshot, ranks: Cow<'a, RankTable>) -> Self {
        let clergy = snapshot.clergy.iter().map(|c| (c.id, c)).collect();

        let mut ordinations: HashMap<ClergyId, Vec<&'a Ordination>> = HashMap::new();
        for o in &snapshot.ordinations {
            ordinations.entry(o.clergy_id).or_default().push(o);
        }
        for events in ordinations.values_mut() {
            events.sort_by_key(|o| o.id);
        }

        let mut consecrations: HashMap<ClergyId, Vec<&'a Consecration>> = HashMap::new();
        for c in &snapshot.consecrations {
            consecrations.entry(c.clergy_id).or_default().push(c);
        }
        for events in consecrations.values_mut() {
            events.sort_by_key(|c| c.id);
        }

        Self {
            snapshot,
            ranks,
            clergy,
            ordinations,
            consecrations,
        }
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    pub fn ranks(&self) -> &RankTable {
        &self.ranks
    }

    /// Any clergy record, deleted or not.
    pub fn clergy(&self, id: ClergyId) -> Option<&'a Clergy> {
        self.clergy.get(&id).copied()
    }

    /// A clergy record that is present and not soft-deleted.
    pub fn active(&self, id: ClergyId) -> Option<&'a Clergy> {
        self.clergy(id).filter(|c| c.is_active())
    }

    /// All non-deleted clergy, in id order.
    pub fn active_clergy(&self) -> impl Iterator<Item = &'a Clergy> + '_ {
        self.clergy.values().copied().filter(|c| c.is_active())
    }

    pub fn ordinations_of(&self, id: ClergyId) -> &[&'a Ordination] {
        self.ordinations.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn consecrations_of(&self, id: ClergyId) -> &[&'a Consecration] {
        self.consecrations.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn primary_ordination(&self, id: ClergyId) -> Option<&'a Ordination> {
        primary(self.ordinations_of(id).iter().copied())
    }

    pub fn primary_consecration(&self, id: ClergyId) -> Option<&'a Consecration> {
        primary(self.consecrations_of(id).iter().copied())
    }

    /// Whether the person's *current* rank is a bishop rank.
    pub fn is_bishop(&self, person: &Clergy) -> bool {
        self.ranks.is_bishop_rank(&person.rank)
    }

    pub fn was_alive_on(&self, person: &Clergy, date: Option<NaiveDate>) -> bool {
        validity::was_alive_on(person, date)
    }

    /// [`validity::was_bishop_on`] using the person's primary consecration.
    pub fn was_bishop_on(&self, person: &Clergy, date: Option<NaiveDate>) -> bool {
        let consecrated = self.primary_consecration(person.id).map(|c| c.date);
        validity::was_bishop_on(person, &self.ranks, consecrated, date)
    }
}

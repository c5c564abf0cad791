//! Clergy identity records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rank whose holders are displayed by their papal name (when one is set).
pub const POPE_RANK: &str = "Pope";

/// Unique identifier of a clergy record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ClergyId(pub i64);

impl ClergyId {
    pub fn raw(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ClergyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ClergyId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// A clergy member.
///
/// Records are soft-deleted: `is_deleted` hides them from graph construction and
/// candidate filtering, while their events (and other clergy's events pointing
/// at them) stay in place until an administrative purge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clergy {
    pub id: ClergyId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub papal_name: Option<String>,
    /// Free-text rank; whether it is a bishop rank is decided by the `RankTable`.
    pub rank: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_death: Option<NaiveDate>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Clergy {
    pub fn new(id: ClergyId, name: impl Into<String>, rank: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            papal_name: None,
            rank: rank.into(),
            organization: None,
            date_of_birth: None,
            date_of_death: None,
            is_deleted: false,
            deleted_at: None,
        }
    }

    pub fn with_papal_name(mut self, papal_name: impl Into<String>) -> Self {
        self.papal_name = Some(papal_name.into());
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn born(mut self, date: NaiveDate) -> Self {
        self.date_of_birth = Some(date);
        self
    }

    pub fn died(mut self, date: NaiveDate) -> Self {
        self.date_of_death = Some(date);
        self
    }

    /// Mark the record soft-deleted at `at`.
    pub fn soft_delete(&mut self, at: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(at);
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    pub fn is_pope(&self) -> bool {
        self.rank.trim().eq_ignore_ascii_case(POPE_RANK)
    }

    /// Name shown in graphs and pickers: the papal name for popes, otherwise `name`.
    pub fn display_name(&self) -> &str {
        match self.papal_name.as_deref().map(str::trim) {
            Some(papal) if self.is_pope() && !papal.is_empty() => papal,
            _ => &self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_uses_papal_name_only_for_popes() {
        let pope =
            Clergy::new(ClergyId(1), "Joseph Ratzinger", "Pope").with_papal_name("Benedict XVI");
        assert_eq!(pope.display_name(), "Benedict XVI");

        let cardinal = Clergy::new(ClergyId(2), "Joseph Ratzinger", "Cardinal")
            .with_papal_name("Benedict XVI");
        assert_eq!(cardinal.display_name(), "Joseph Ratzinger");

        let blank = Clergy::new(ClergyId(3), "Angelo Roncalli", "pope").with_papal_name("  ");
        assert_eq!(blank.display_name(), "Angelo Roncalli");
    }

    #[test]
    fn soft_delete_records_timestamp() {
        let mut c = Clergy::new(ClergyId(7), "A", "Priest");
        assert!(c.is_active());
        let at = Utc::now();
        c.soft_delete(at);
        assert!(!c.is_active());
        assert_eq!(c.deleted_at, Some(at));
    }
}

//! Rank → `is_bishop` lookup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub name: String,
    pub is_bishop: bool,
}

impl Rank {
    pub fn new(name: impl Into<String>, is_bishop: bool) -> Self {
        Self {
            name: name.into(),
            is_bishop,
        }
    }
}

/// Which free-text ranks denote bishops.
///
/// Keys are matched trimmed and case-insensitively; ranks missing from the
/// table are not bishop ranks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankTable {
    ranks: BTreeMap<String, Rank>,
}

fn rank_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl RankTable {
    pub fn empty() -> Self {
        Self {
            ranks: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, rank: Rank) {
        self.ranks.insert(rank_key(&rank.name), rank);
    }

    pub fn with(mut self, name: &str, is_bishop: bool) -> Self {
        self.insert(Rank::new(name, is_bishop));
        self
    }

    pub fn is_bishop_rank(&self, rank: &str) -> bool {
        self.ranks
            .get(&rank_key(rank))
            .map(|r| r.is_bishop)
            .unwrap_or(false)
    }

    pub fn get(&self, rank: &str) -> Option<&Rank> {
        self.ranks.get(&rank_key(rank))
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rank> {
        self.ranks.values()
    }
}

impl Default for RankTable {
    fn default() -> Self {
        Self::empty()
            .with("Deacon", false)
            .with("Priest", false)
            .with("Bishop", true)
            .with("Archbishop", true)
            .with("Metropolitan", true)
            .with("Patriarch", true)
            .with("Cardinal", true)
            .with("Pope", true)
    }
}

impl FromIterator<Rank> for RankTable {
    fn from_iter<T: IntoIterator<Item = Rank>>(iter: T) -> Self {
        let mut table = Self::empty();
        for rank in iter {
            table.insert(rank);
        }
        table
    }
}

impl Serialize for RankTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.ranks.values())
    }
}

impl<'de> Deserialize<'de> for RankTable {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Vec::<Rank>::deserialize(deserializer)?.into_iter().collect())
    }
}

//! Who could have performed an ordination or consecration on a given date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use succession_model::{Clergy, ClergyId};

use crate::LineageIndex;

/// Picker entry for "select an ordaining bishop / consecrator" inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub id: ClergyId,
    pub name: String,
    pub rank: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl From<&Clergy> for CandidateEntry {
    fn from(c: &Clergy) -> Self {
        Self {
            id: c.id,
            name: c.display_name().to_string(),
            rank: c.rank.clone(),
            date_of_birth: c.date_of_birth,
            date_of_death: c.date_of_death,
        }
    }
}

/// Dates currently entered in an authoring form, plus the record being edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CandidateQuery {
    pub ordination_date: Option<NaiveDate>,
    pub consecration_date: Option<NaiveDate>,
    /// Never offer this clergy member (nobody ordains or consecrates themselves).
    pub exclude: Option<ClergyId>,
}

impl CandidateQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ordination_date(mut self, date: Option<NaiveDate>) -> Self {
        self.ordination_date = date;
        self
    }

    pub fn consecration_date(mut self, date: Option<NaiveDate>) -> Self {
        self.consecration_date = date;
        self
    }

    pub fn excluding(mut self, id: ClergyId) -> Self {
        self.exclude = Some(id);
        self
    }

    /// Active clergy who were bishops on every date given, in id order.
    pub fn run<'a>(&self, index: &LineageIndex<'a>) -> Vec<&'a Clergy> {
        let dates = [self.ordination_date, self.consecration_date];
        index
            .active_clergy()
            .filter(|c| Some(c.id) != self.exclude)
            .filter(|c| index.is_bishop(c))
            .filter(|c| dates.iter().flatten().all(|d| index.was_bishop_on(c, Some(*d))))
            .collect()
    }

    /// [`Self::run`] projected to picker entries, sorted by display name then id.
    pub fn entries(&self, index: &LineageIndex<'_>) -> Vec<CandidateEntry> {
        let mut out: Vec<CandidateEntry> = self.run(index).into_iter().map(Into::into).collect();
        out.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        out
    }
}

/// Clergy eligible to have performed an event on the given date(s).
///
/// With no dates this is simply every active bishop.
pub fn eligible_bishops<'a>(
    index: &LineageIndex<'a>,
    ordination_date: Option<NaiveDate>,
    consecration_date: Option<NaiveDate>,
) -> Vec<&'a Clergy> {
    CandidateQuery::new()
        .ordination_date(ordination_date)
        .consecration_date(consecration_date)
        .run(index)
}

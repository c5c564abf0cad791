//! Temporal validity: was a person alive, and already a bishop, on a date.
//!
//! Unknown dates never exclude anyone. The registry is historically incomplete,
//! so every missing datum is read as "no constraint".

use chrono::NaiveDate;

use succession_model::{Clergy, EventDate, RankTable};

/// Whether `person` was alive on `date`.
///
/// No date means "assume alive". Birth and death dates are inclusive bounds.
pub fn was_alive_on(person: &Clergy, date: Option<NaiveDate>) -> bool {
    let Some(date) = date else {
        return true;
    };
    if person.date_of_birth.is_some_and(|born| date < born) {
        return false;
    }
    if person.date_of_death.is_some_and(|died| date > died) {
        return false;
    }
    true
}

/// Whether `person` could act as a bishop on `date`.
///
/// `consecrated` is the date of the person's primary consecration, `None` when
/// no consecration is on record.
///
/// - without a date: the current rank alone decides;
/// - with a date: bishop rank, alive on `date`, and not consecrated after `date`.
///
/// A bishop with no recorded consecration date may act on any date in their
/// lifetime; undocumented lineages stay eligible.
pub fn was_bishop_on(
    person: &Clergy,
    ranks: &RankTable,
    consecrated: Option<EventDate>,
    date: Option<NaiveDate>,
) -> bool {
    if !ranks.is_bishop_rank(&person.rank) {
        return false;
    }
    let Some(date) = date else {
        return true;
    };
    if !was_alive_on(person, Some(date)) {
        return false;
    }
    consecrated.map_or(true, |c| c.permits_on_or_before(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use succession_model::ClergyId;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bishop() -> Clergy {
        Clergy::new(ClergyId(1), "B", "Bishop")
            .born(ymd(1900, 1, 1))
            .died(ymd(1955, 6, 30))
    }

    #[test]
    fn alive_bounds_are_inclusive() {
        let b = bishop();
        assert!(was_alive_on(&b, None));
        assert!(!was_alive_on(&b, Some(ymd(1899, 12, 31))));
        assert!(was_alive_on(&b, Some(ymd(1900, 1, 1))));
        assert!(was_alive_on(&b, Some(ymd(1955, 6, 30))));
        assert!(!was_alive_on(&b, Some(ymd(1955, 7, 1))));
    }

    #[test]
    fn no_date_means_current_rank() {
        let ranks = RankTable::default();
        assert!(was_bishop_on(&bishop(), &ranks, None, None));
        let priest = Clergy::new(ClergyId(2), "P", "Priest");
        assert!(!was_bishop_on(&priest, &ranks, None, None));
    }

    #[test]
    fn cannot_act_before_own_consecration() {
        let ranks = RankTable::default();
        let b = bishop();
        let consecrated = Some(EventDate::Exact(ymd(1930, 5, 1)));
        assert!(!was_bishop_on(&b, &ranks, consecrated, Some(ymd(1930, 4, 30))));
        assert!(was_bishop_on(&b, &ranks, consecrated, Some(ymd(1930, 5, 1))));
        assert!(!was_bishop_on(&b, &ranks, consecrated, Some(ymd(1960, 1, 1))));
    }

    #[test]
    fn missing_consecration_date_is_permissive() {
        let ranks = RankTable::default();
        let b = bishop();
        assert!(was_bishop_on(&b, &ranks, None, Some(ymd(1901, 1, 1))));
        assert!(was_bishop_on(
            &b,
            &ranks,
            Some(EventDate::Unknown),
            Some(ymd(1901, 1, 1))
        ));
        assert!(!was_bishop_on(
            &b,
            &ranks,
            Some(EventDate::Year(1931)),
            Some(ymd(1930, 12, 31))
        ));
    }
}

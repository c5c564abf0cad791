//! Choosing the canonical event among a person's ordinations or consecrations.

use succession_model::Event;

/// Pick the primary event.
///
/// Invalid events are discarded. Among the rest: the earliest exact date; if
/// none is dated, the earliest bare year; if neither, the first in creation
/// order. Ties always break on the lower record id, so the choice does not
/// depend on input order.
///
/// Returns `None` when `events` is empty or every event is invalid.
pub fn primary<'e, E: Event + 'e>(events: impl IntoIterator<Item = &'e E>) -> Option<&'e E> {
    let candidates: Vec<&'e E> = events
        .into_iter()
        .filter(|e| !e.validity().is_invalid())
        .collect();

    let dated = candidates
        .iter()
        .filter_map(|e| e.date().exact().map(|d| (d, e.id(), *e)))
        .min_by_key(|(d, id, _)| (*d, *id));
    if let Some((_, _, e)) = dated {
        return Some(e);
    }

    let by_year = candidates
        .iter()
        .filter_map(|e| e.date().year().map(|y| (y, e.id(), *e)))
        .min_by_key(|(y, id, _)| (*y, *id));
    if let Some((_, _, e)) = by_year {
        return Some(e);
    }

    candidates.into_iter().min_by_key(|e| e.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use succession_model::{ClergyId, EventDate, EventFlags, EventId, Ordination, Validity};

    fn ord(id: i64, date: EventDate) -> Ordination {
        Ordination::new(EventId(id), ClergyId(1), Some(ClergyId(2)), date)
    }

    fn exact(y: i32, m: u32, d: u32) -> EventDate {
        EventDate::Exact(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn invalid(o: Ordination) -> Ordination {
        o.with_flags(EventFlags {
            validity: Validity::Invalid,
            ..EventFlags::default()
        })
    }

    #[test]
    fn empty_input_has_no_primary() {
        let none: Vec<Ordination> = Vec::new();
        assert!(primary(&none).is_none());
    }

    #[test]
    fn earliest_exact_date_wins_over_years() {
        let events = vec![
            ord(1, EventDate::Year(1900)),
            ord(2, exact(1950, 3, 1)),
            ord(3, exact(1949, 3, 1)),
            ord(4, EventDate::Unknown),
        ];
        assert_eq!(primary(&events).map(|e| e.id), Some(EventId(3)));
    }

    #[test]
    fn invalid_events_are_ignored_even_when_earlier() {
        let events = vec![invalid(ord(1, exact(1940, 1, 1))), ord(2, exact(1960, 1, 1))];
        assert_eq!(primary(&events).map(|e| e.id), Some(EventId(2)));

        let all_invalid = vec![invalid(ord(1, exact(1940, 1, 1)))];
        assert!(primary(&all_invalid).is_none());
    }

    #[test]
    fn falls_back_to_year_then_creation_order() {
        let years = vec![
            ord(5, EventDate::Year(1801)),
            ord(6, EventDate::Year(1799)),
            ord(7, EventDate::Unknown),
        ];
        assert_eq!(primary(&years).map(|e| e.id), Some(EventId(6)));

        let undated = vec![ord(9, EventDate::Unknown), ord(8, EventDate::Unknown)];
        assert_eq!(primary(&undated).map(|e| e.id), Some(EventId(8)));
    }

    #[test]
    fn equal_dates_break_on_record_id_regardless_of_order() {
        let forward = vec![ord(11, exact(1970, 1, 1)), ord(10, exact(1970, 1, 1))];
        let reversed: Vec<Ordination> = forward.iter().rev().cloned().collect();
        assert_eq!(primary(&forward).map(|e| e.id), Some(EventId(10)));
        assert_eq!(primary(&reversed).map(|e| e.id), Some(EventId(10)));
    }

    #[test]
    fn doubtful_events_still_count() {
        let doubtful = ord(1, exact(1930, 1, 1)).with_flags(EventFlags {
            is_doubtful_event: true,
            validity: Validity::DoubtfullyValid,
            ..EventFlags::default()
        });
        let repeat = ord(2, exact(1931, 1, 1)).with_flags(EventFlags {
            is_sub_conditione: true,
            ..EventFlags::default()
        });
        let events = vec![repeat, doubtful];
        assert_eq!(primary(&events).map(|e| e.id), Some(EventId(1)));
    }
}

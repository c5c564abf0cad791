use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::HashSet;

use succession_lineage::{
    build_graph, lineage_chain, primary, was_alive_on, was_bishop_on, EdgeKind, LineageIndex,
};
use succession_model::{
    Clergy, ClergyId, Consecration, EventDate, EventFlags, EventId, Ordination, RankTable,
    Snapshot, Validity,
};

fn date() -> impl Strategy<Value = NaiveDate> {
    // 1500-01-01 plus up to ~500 years.
    (0i64..182_000).prop_map(|days| {
        NaiveDate::from_ymd_opt(1500, 1, 1).unwrap() + Duration::days(days)
    })
}

fn event_date() -> impl Strategy<Value = EventDate> {
    prop_oneof![
        date().prop_map(EventDate::Exact),
        (1500i32..2000).prop_map(EventDate::Year),
        Just(EventDate::Unknown),
    ]
}

fn validity() -> impl Strategy<Value = Validity> {
    prop_oneof![
        3 => Just(Validity::Valid),
        1 => Just(Validity::DoubtfullyValid),
        1 => Just(Validity::Invalid),
    ]
}

fn ordinations() -> impl Strategy<Value = Vec<Ordination>> {
    proptest::collection::vec((event_date(), validity()), 0..8).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (date, validity))| {
                Ordination::new(EventId(i as i64 + 1), ClergyId(1), Some(ClergyId(2)), date)
                    .with_flags(EventFlags {
                        validity,
                        ..EventFlags::default()
                    })
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn death_date_bounds_alive_checks(died in date(), on in date()) {
        let person = Clergy::new(ClergyId(1), "P", "Priest").died(died);
        prop_assert_eq!(was_alive_on(&person, Some(on)), on <= died);
    }

    #[test]
    fn undocumented_bishop_depends_on_rank_and_life(
        rank in prop_oneof![Just("Bishop"), Just("Priest"), Just("Cardinal"), Just("Deacon")],
        died in proptest::option::of(date()),
        on in proptest::option::of(date()),
    ) {
        let mut person = Clergy::new(ClergyId(1), "P", rank);
        person.date_of_death = died;
        let ranks = RankTable::default();
        let expected = ranks.is_bishop_rank(rank) && was_alive_on(&person, on);
        prop_assert_eq!(was_bishop_on(&person, &ranks, None, on), expected);
    }

    #[test]
    fn primary_is_stable_and_a_member(events in ordinations()) {
        let first = primary(&events);
        let second = primary(&events);
        prop_assert_eq!(first.map(|e| e.id), second.map(|e| e.id));

        let reversed: Vec<Ordination> = events.iter().rev().cloned().collect();
        prop_assert_eq!(first.map(|e| e.id), primary(&reversed).map(|e| e.id));

        match first {
            Some(chosen) => {
                prop_assert!(events.iter().any(|e| e.id == chosen.id));
                prop_assert!(!chosen.flags.validity.is_invalid());
            }
            None => {
                prop_assert!(events.iter().all(|e| e.flags.validity.is_invalid()));
            }
        }
    }

    #[test]
    fn earlier_invalid_event_never_wins(valid in date(), gap in 1i64..10_000) {
        let invalid = Ordination::new(
            EventId(1),
            ClergyId(1),
            Some(ClergyId(2)),
            EventDate::Exact(valid - Duration::days(gap)),
        )
        .with_flags(EventFlags { validity: Validity::Invalid, ..EventFlags::default() });
        let good =
            Ordination::new(EventId(2), ClergyId(1), Some(ClergyId(2)), EventDate::Exact(valid));
        let events = vec![invalid, good];
        prop_assert_eq!(primary(&events).map(|e| e.id), Some(EventId(2)));
    }

    #[test]
    fn consecration_walk_never_repeats_an_edge(
        len in 2usize..8,
        start in 0usize..8,
    ) {
        // Bishops 1..=len each consecrated by the next, the last by the first.
        let mut s = Snapshot::new();
        for i in 1..=len as i64 {
            s.clergy.push(Clergy::new(ClergyId(i), format!("B{i}"), "Bishop"));
            let by = if i == len as i64 { 1 } else { i + 1 };
            s.consecrations.push(Consecration::new(
                EventId(i),
                ClergyId(i),
                Some(ClergyId(by)),
                EventDate::Unknown,
            ));
        }
        let index = LineageIndex::new(&s);
        let target = ClergyId((start % len) as i64 + 1);
        let chain = lineage_chain(&index, target).unwrap();

        prop_assert_eq!(chain.edges.len(), len);
        let distinct: HashSet<(ClergyId, ClergyId)> =
            chain.edges.iter().map(|e| (e.source_id, e.target_id)).collect();
        prop_assert_eq!(distinct.len(), chain.edges.len());
        prop_assert_eq!(chain.node_ids.len(), len);
    }

    #[test]
    fn graph_never_references_deleted_clergy(
        deleted in proptest::collection::vec(any::<bool>(), 4)
    ) {
        let mut s = Snapshot::new();
        for (i, gone) in deleted.iter().enumerate() {
            let mut c = Clergy::new(ClergyId(i as i64 + 1), format!("C{i}"), "Bishop");
            if *gone {
                c.soft_delete(chrono::Utc::now());
            }
            s.clergy.push(c);
        }
        s.ordinations.push(Ordination::new(
            EventId(1),
            ClergyId(1),
            Some(ClergyId(2)),
            EventDate::Unknown,
        ));
        s.consecrations.push(
            Consecration::new(EventId(1), ClergyId(3), Some(ClergyId(4)), EventDate::Unknown)
                .with_co_consecrators([ClergyId(1), ClergyId(2)]),
        );
        let index = LineageIndex::new(&s);
        let graph = build_graph(&index);

        let active: HashSet<ClergyId> = graph.nodes.iter().map(|n| n.id).collect();
        prop_assert_eq!(active.len(), deleted.iter().filter(|d| !**d).count());
        for e in &graph.edges {
            prop_assert!(active.contains(&e.source_id) && active.contains(&e.target_id));
        }
        let ordination_kept = !deleted[0] && !deleted[1];
        prop_assert_eq!(
            graph.edges_of_kind(EdgeKind::Ordination).count(),
            usize::from(ordination_kept)
        );
    }
}

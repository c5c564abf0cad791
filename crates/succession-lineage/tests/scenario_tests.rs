use chrono::NaiveDate;
use std::collections::BTreeSet;

use succession_lineage::{
    audit, build_graph, eligible_bishops, lineage_chain, render_graph_dot, AuditConfig, EdgeKind,
    EngineConfig, LineageIndex, Termination,
};
use succession_model::{Clergy, ClergyId, Consecration, EventDate, EventId, Ordination, Snapshot};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn on(y: i32, m: u32, d: u32) -> EventDate {
    EventDate::Exact(ymd(y, m, d))
}

#[test]
fn priest_lineage_climbs_through_ordaining_bishop() {
    let mut s = Snapshot::new();
    s.clergy.push(Clergy::new(ClergyId(1), "P", "Priest"));
    s.clergy.push(Clergy::new(ClergyId(2), "B1", "Bishop"));
    s.clergy.push(Clergy::new(ClergyId(3), "B2", "Bishop"));
    s.consecrations.push(Consecration::new(
        EventId(1),
        ClergyId(2),
        Some(ClergyId(3)),
        on(1980, 1, 1),
    ));
    s.consecrations
        .push(Consecration::new(EventId(2), ClergyId(3), None, on(1950, 1, 1)));
    s.ordinations.push(Ordination::new(
        EventId(1),
        ClergyId(1),
        Some(ClergyId(2)),
        on(1990, 1, 1),
    ));

    let index = LineageIndex::new(&s);
    let chain = lineage_chain(&index, ClergyId(1)).unwrap();

    assert_eq!(
        chain.node_ids,
        BTreeSet::from([ClergyId(1), ClergyId(2), ClergyId(3)])
    );
    let edges: Vec<(EdgeKind, ClergyId, ClergyId)> = chain
        .edges
        .iter()
        .map(|e| (e.kind, e.source_id, e.target_id))
        .collect();
    assert_eq!(
        edges,
        vec![
            (EdgeKind::Ordination, ClergyId(2), ClergyId(1)),
            (EdgeKind::Consecration, ClergyId(3), ClergyId(2)),
        ]
    );
    assert_eq!(chain.termination, Termination::NoConsecrator);
}

#[test]
fn candidates_respect_consecration_and_death_dates() {
    let mut s = Snapshot::new();
    s.clergy.push(Clergy::new(ClergyId(1), "Late", "Bishop"));
    s.clergy
        .push(Clergy::new(ClergyId(2), "Dead", "Bishop").died(ymd(1955, 5, 1)));
    s.clergy.push(Clergy::new(ClergyId(3), "Ready", "Bishop"));
    s.consecrations
        .push(Consecration::new(EventId(1), ClergyId(1), None, on(1970, 3, 1)));
    s.consecrations
        .push(Consecration::new(EventId(2), ClergyId(2), None, on(1940, 3, 1)));
    s.consecrations
        .push(Consecration::new(EventId(3), ClergyId(3), None, on(1950, 3, 1)));

    let index = LineageIndex::new(&s);
    let eligible = eligible_bishops(&index, None, Some(ymd(1960, 1, 1)));
    let ids: Vec<ClergyId> = eligible.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![ClergyId(3)]);
}

#[test]
fn co_consecrators_become_dashed_edges_sharing_the_date() {
    let mut s = Snapshot::new();
    for (id, name) in [(1, "New"), (2, "Principal"), (3, "Co A"), (4, "Co B")] {
        s.clergy.push(Clergy::new(ClergyId(id), name, "Bishop"));
    }
    s.consecrations.push(
        Consecration::new(EventId(1), ClergyId(1), Some(ClergyId(2)), on(2001, 9, 8))
            .with_co_consecrators([ClergyId(3), ClergyId(4)]),
    );

    let index = LineageIndex::new(&s);
    let graph = build_graph(&index);

    assert_eq!(graph.edges_of_kind(EdgeKind::Consecration).count(), 1);
    let co: Vec<_> = graph.edges_of_kind(EdgeKind::CoConsecration).collect();
    assert_eq!(co.len(), 2);
    assert!(co.iter().all(|e| e.dashed && e.target_id == ClergyId(1)));
    assert!(graph.edges.iter().all(|e| e.date == on(2001, 9, 8)));

    let dot = render_graph_dot(&graph);
    assert_eq!(dot.matches("style=dashed").count(), 2);
}

#[test]
fn deleted_ordaining_bishop_leaves_no_edge() {
    let mut s = Snapshot::new();
    s.clergy.push(Clergy::new(ClergyId(1), "P", "Priest"));
    let mut gone = Clergy::new(ClergyId(2), "Gone", "Bishop");
    gone.soft_delete(chrono::Utc::now());
    s.clergy.push(gone);
    s.ordinations.push(Ordination::new(
        EventId(1),
        ClergyId(1),
        Some(ClergyId(2)),
        EventDate::Unknown,
    ));

    let index = LineageIndex::new(&s);
    assert_eq!(build_graph(&index).edges_of_kind(EdgeKind::Ordination).count(), 0);

    let chain = lineage_chain(&index, ClergyId(1)).unwrap();
    assert!(chain.edges.is_empty());
    assert_eq!(chain.termination, Termination::MissingClergy { id: ClergyId(2) });

    let report = audit(&index, &AuditConfig::default());
    assert_eq!(report.summary.warning_count, 1);
    assert_eq!(report.findings[0].code, "dangling-reference");
}

#[test]
fn configured_ranks_apply_when_snapshot_has_none() {
    let config = EngineConfig::from_json_str(
        r#"{ "ranks": [ { "name": "Abbot", "is_bishop": true } ] }"#,
    )
    .unwrap();

    let mut s = Snapshot::new();
    s.clergy.push(Clergy::new(ClergyId(1), "Mitred", "Abbot"));
    s.clergy.push(Clergy::new(ClergyId(2), "Plain", "Bishop"));

    let index = LineageIndex::with_config(&s, &config);
    let ids: Vec<ClergyId> = eligible_bishops(&index, None, None)
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![ClergyId(1)]);
}

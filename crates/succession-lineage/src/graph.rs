//! Flat projection of the registry into a node/edge graph.
//!
//! One pass, no traversal: every active clergy member becomes a node, every
//! event with a known actor becomes an edge from the actor to the person
//! receiving orders. Cycles (data-entry errors such as A consecrating B
//! consecrating A) are passed through untouched; anything that walks this graph
//! must guard against them itself (see [`crate::lineage`]).

use serde::{Deserialize, Serialize};
use std::fmt;

use succession_model::{Clergy, ClergyId, EventDate, EventFlags, EventId};

use crate::LineageIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    Ordination,
    Consecration,
    CoConsecration,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ordination => "ordination",
            Self::Consecration => "consecration",
            Self::CoConsecration => "co-consecration",
        }
    }

    /// Co-consecrations are drawn dashed to set them apart from the principal consecrator.
    pub fn is_dashed(self) -> bool {
        matches!(self, Self::CoConsecration)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: ClergyId,
    /// Display name (papal name for popes).
    pub name: String,
    pub rank: String,
    pub organization: Option<String>,
    /// Date of the primary ordination, if the person has one.
    pub ordination_date: Option<EventDate>,
    /// Date of the primary consecration, if the person has one.
    pub consecration_date: Option<EventDate>,
}

impl GraphNode {
    pub fn from_clergy(index: &LineageIndex<'_>, clergy: &Clergy) -> Self {
        Self {
            id: clergy.id,
            name: clergy.display_name().to_string(),
            rank: clergy.rank.clone(),
            organization: clergy.organization.clone(),
            ordination_date: index.primary_ordination(clergy.id).map(|o| o.date),
            consecration_date: index.primary_consecration(clergy.id).map(|c| c.date),
        }
    }
}

/// A directed edge from the acting bishop to the person receiving orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source_id: ClergyId,
    pub target_id: ClergyId,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    /// Ordination or consecration record this edge came from.
    pub event_id: EventId,
    pub date: EventDate,
    pub is_sub_conditione: bool,
    pub is_doubtful_event: bool,
    pub is_invalid: bool,
    pub is_doubtfully_valid: bool,
    pub dashed: bool,
}

impl GraphEdge {
    pub fn new(
        kind: EdgeKind,
        source_id: ClergyId,
        target_id: ClergyId,
        event_id: EventId,
        date: EventDate,
        flags: &EventFlags,
    ) -> Self {
        Self {
            source_id,
            target_id,
            kind,
            event_id,
            date,
            is_sub_conditione: flags.is_sub_conditione,
            is_doubtful_event: flags.is_doubtful_event,
            is_invalid: flags.validity.is_invalid(),
            is_doubtfully_valid: flags.validity.is_doubtfully_valid(),
            dashed: kind.is_dashed(),
        }
    }

    pub fn is_doubtful(&self) -> bool {
        self.is_doubtful_event || self.is_doubtfully_valid
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl LineageGraph {
    pub fn node(&self, id: ClergyId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }
}

/// Build the full graph of active clergy.
///
/// Edges whose source or target is soft-deleted or missing are dropped, as are
/// self-referencing edges.
pub fn build_graph(index: &LineageIndex<'_>) -> LineageGraph {
    let nodes: Vec<GraphNode> = index
        .active_clergy()
        .map(|c| GraphNode::from_clergy(index, c))
        .collect();

    let snapshot = index.snapshot();
    let mut edges: Vec<GraphEdge> = Vec::new();
    let mut dropped = 0usize;

    let mut push = |edge: GraphEdge| {
        if edge.source_id == edge.target_id {
            tracing::warn!(
                clergy_id = %edge.source_id,
                event_id = %edge.event_id,
                kind = %edge.kind,
                "skipping self-referencing edge"
            );
            dropped += 1;
        } else if index.active(edge.source_id).is_none()
            || index.active(edge.target_id).is_none()
        {
            dropped += 1;
        } else {
            edges.push(edge);
        }
    };

    for o in &snapshot.ordinations {
        if let Some(bishop) = o.ordaining_bishop_id {
            push(GraphEdge::new(
                EdgeKind::Ordination,
                bishop,
                o.clergy_id,
                o.id,
                o.date,
                &o.flags,
            ));
        }
    }

    for c in &snapshot.consecrations {
        if let Some(consecrator) = c.consecrator_id {
            push(GraphEdge::new(
                EdgeKind::Consecration,
                consecrator,
                c.clergy_id,
                c.id,
                c.date,
                &c.flags,
            ));
        }
        for &co in &c.co_consecrators {
            push(GraphEdge::new(
                EdgeKind::CoConsecration,
                co,
                c.clergy_id,
                c.id,
                c.date,
                &c.flags,
            ));
        }
    }

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        dropped,
        "built lineage graph"
    );

    LineageGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use succession_model::{Consecration, Ordination, Snapshot, Validity};

    fn snapshot() -> Snapshot {
        let mut s = Snapshot::new();
        s.clergy.push(Clergy::new(ClergyId(1), "Priest", "Priest"));
        s.clergy.push(Clergy::new(ClergyId(2), "Bishop", "Bishop"));
        s.clergy
            .push(Clergy::new(ClergyId(3), "Giovanni", "Pope").with_papal_name("John XXIII"));
        s
    }

    #[test]
    fn nodes_carry_display_names_and_primary_dates() {
        let mut s = snapshot();
        s.consecrations.push(Consecration::new(
            EventId(1),
            ClergyId(2),
            Some(ClergyId(3)),
            EventDate::Year(1958),
        ));
        let index = LineageIndex::new(&s);
        let g = build_graph(&index);

        assert_eq!(g.nodes.len(), 3);
        assert_eq!(g.node(ClergyId(3)).map(|n| n.name.as_str()), Some("John XXIII"));
        let b = g.node(ClergyId(2)).unwrap();
        assert_eq!(b.consecration_date, Some(EventDate::Year(1958)));
        assert_eq!(b.ordination_date, None);
    }

    #[test]
    fn events_without_actor_produce_no_edge() {
        let mut s = snapshot();
        s.ordinations
            .push(Ordination::new(EventId(1), ClergyId(1), None, EventDate::Unknown));
        let index = LineageIndex::new(&s);
        assert!(build_graph(&index).edges.is_empty());
    }

    #[test]
    fn edges_carry_validity_flags() {
        let mut s = snapshot();
        s.ordinations.push(
            Ordination::new(EventId(1), ClergyId(1), Some(ClergyId(2)), EventDate::Unknown)
                .with_flags(EventFlags {
                    is_sub_conditione: true,
                    is_doubtful_event: false,
                    validity: Validity::DoubtfullyValid,
                }),
        );
        let index = LineageIndex::new(&s);
        let g = build_graph(&index);
        let e = &g.edges[0];
        assert_eq!((e.source_id, e.target_id), (ClergyId(2), ClergyId(1)));
        assert_eq!(e.kind, EdgeKind::Ordination);
        assert!(e.is_sub_conditione && e.is_doubtfully_valid);
        assert!(!e.is_invalid && !e.dashed);
    }

    #[test]
    fn self_references_are_dropped() {
        let mut s = snapshot();
        s.consecrations.push(Consecration::new(
            EventId(1),
            ClergyId(2),
            Some(ClergyId(2)),
            EventDate::Unknown,
        ));
        let index = LineageIndex::new(&s);
        assert!(build_graph(&index).edges.is_empty());
    }

    #[test]
    fn edge_json_uses_type_field() {
        let edge = GraphEdge::new(
            EdgeKind::CoConsecration,
            ClergyId(1),
            ClergyId(2),
            EventId(7),
            EventDate::Unknown,
            &EventFlags::default(),
        );
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["type"], "co-consecration");
        assert_eq!(json["date"], "unknown");
        assert_eq!(json["dashed"], true);
    }
}

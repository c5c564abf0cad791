//! Upward lineage chains for a single clergy member.
//!
//! The walk follows *primary* events only, so the result is a chain rather
//! than a tree:
//!
//! ```text
//!   AtTarget ──(not a bishop, ordaining bishop known)──► AscendingViaOrdination
//!      │                                                        │
//!      └──(bishop)──► AscendingViaConsecration ◄────────────────┘
//!                             │   ▲
//!                             │   └─(consecrator known, not yet visited)
//!                             ▼
//!                        Terminated
//! ```
//!
//! Each clergy member contributes at most one consecration edge because the
//! consecration walk keeps a visited set; a chain that loops back on itself
//! stops at the repeated node.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use succession_model::{Clergy, ClergyId, Event};

use crate::graph::{EdgeKind, GraphEdge, GraphNode};
use crate::{LineageError, LineageIndex};

/// Where the walk currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineageState {
    AtTarget,
    AscendingViaOrdination,
    AscendingViaConsecration,
    Terminated(Termination),
}

/// Why the walk stopped. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum Termination {
    /// The target is not a bishop and has no ordaining bishop on record.
    NoOrdainingBishop,
    /// The last bishop reached has no consecrator on record.
    NoConsecrator,
    /// The next ordaining bishop or consecrator is soft-deleted or absent.
    MissingClergy { id: ClergyId },
    /// The consecration chain returned to an already visited bishop.
    Cycle { at: ClergyId },
    /// The primary event names its own subject as the acting bishop.
    SelfReference { at: ClergyId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageChain {
    pub target: ClergyId,
    pub node_ids: BTreeSet<ClergyId>,
    /// Edges in walk order, nearest first.
    pub edges: Vec<GraphEdge>,
    pub termination: Termination,
}

impl LineageChain {
    /// Node payloads for the chain members, in id order.
    pub fn nodes(&self, index: &LineageIndex<'_>) -> Vec<GraphNode> {
        self.node_ids
            .iter()
            .filter_map(|id| index.clergy(*id))
            .map(|c| GraphNode::from_clergy(index, c))
            .collect()
    }

    /// Clergy ids from the target upward, following the edges.
    pub fn path(&self) -> Vec<ClergyId> {
        let mut path = vec![self.target];
        path.extend(self.edges.iter().map(|e| e.source_id));
        path
    }
}

/// Extract the minimal upward chain for `target`.
///
/// Fails only when `target` is unknown or soft-deleted.
pub fn lineage_chain(
    index: &LineageIndex<'_>,
    target: ClergyId,
) -> Result<LineageChain, LineageError> {
    let person = match index.clergy(target) {
        None => return Err(LineageError::UnknownClergy(target)),
        Some(c) if !c.is_active() => return Err(LineageError::DeletedClergy(target)),
        Some(c) => c,
    };

    let mut walk = Walk {
        index,
        node_ids: BTreeSet::from([target]),
        edges: Vec::new(),
        visited: HashSet::new(),
        current: person,
    };

    let mut state = LineageState::AtTarget;
    let termination = loop {
        state = match state {
            LineageState::AtTarget => walk.leave_target(),
            LineageState::AscendingViaOrdination | LineageState::AscendingViaConsecration => {
                walk.ascend_consecration()
            }
            LineageState::Terminated(reason) => break reason,
        };
    };

    tracing::debug!(
        clergy_id = %target,
        nodes = walk.node_ids.len(),
        edges = walk.edges.len(),
        ?termination,
        "extracted lineage chain"
    );

    Ok(LineageChain {
        target,
        node_ids: walk.node_ids,
        edges: walk.edges,
        termination,
    })
}

struct Walk<'i, 'a> {
    index: &'i LineageIndex<'a>,
    node_ids: BTreeSet<ClergyId>,
    edges: Vec<GraphEdge>,
    visited: HashSet<ClergyId>,
    current: &'a Clergy,
}

impl<'i, 'a> Walk<'i, 'a> {
    fn leave_target(&mut self) -> LineageState {
        if self.index.is_bishop(self.current) {
            return LineageState::AscendingViaConsecration;
        }

        let Some(ordination) = self.index.primary_ordination(self.current.id) else {
            return LineageState::Terminated(Termination::NoOrdainingBishop);
        };
        let Some(bishop_id) = ordination.actor() else {
            return LineageState::Terminated(Termination::NoOrdainingBishop);
        };
        if bishop_id == self.current.id {
            return self.self_reference(EdgeKind::Ordination);
        }
        let Some(bishop) = self.index.active(bishop_id) else {
            return LineageState::Terminated(Termination::MissingClergy { id: bishop_id });
        };

        self.step(EdgeKind::Ordination, ordination, bishop);
        LineageState::AscendingViaOrdination
    }

    fn ascend_consecration(&mut self) -> LineageState {
        let bishop = self.current;
        if !self.visited.insert(bishop.id) {
            tracing::debug!(clergy_id = %bishop.id, "consecration chain loops back");
            return LineageState::Terminated(Termination::Cycle { at: bishop.id });
        }

        let Some(consecration) = self.index.primary_consecration(bishop.id) else {
            return LineageState::Terminated(Termination::NoConsecrator);
        };
        let Some(consecrator_id) = consecration.actor() else {
            return LineageState::Terminated(Termination::NoConsecrator);
        };
        if consecrator_id == bishop.id {
            return self.self_reference(EdgeKind::Consecration);
        }
        let Some(consecrator) = self.index.active(consecrator_id) else {
            return LineageState::Terminated(Termination::MissingClergy { id: consecrator_id });
        };

        self.step(EdgeKind::Consecration, consecration, consecrator);
        LineageState::AscendingViaConsecration
    }

    fn self_reference(&self, kind: EdgeKind) -> LineageState {
        tracing::warn!(clergy_id = %self.current.id, %kind, "dropping self-loop from lineage");
        LineageState::Terminated(Termination::SelfReference { at: self.current.id })
    }

    fn step<E: Event>(&mut self, kind: EdgeKind, event: &E, actor: &'a Clergy) {
        self.edges.push(GraphEdge::new(
            kind,
            actor.id,
            event.subject(),
            event.id(),
            event.date(),
            event.flags(),
        ));
        self.node_ids.insert(actor.id);
        self.current = actor;
    }
}

//! Data-quality audit over a snapshot.
//!
//! The engine tolerates dangling references, self-references and cycles; this
//! module is where they get reported. Findings are advisory and never change
//! what the graph builder or the lineage walk produce.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use succession_model::{Clergy, ClergyId, Event, EventId};

use crate::{AuditConfig, EdgeKind, LineageIndex};

pub const CODE_SELF_REFERENCE: &str = "self-reference";
pub const CODE_DANGLING_REFERENCE: &str = "dangling-reference";
pub const CODE_CONSECRATION_CYCLE: &str = "consecration-cycle";
pub const CODE_ACTOR_NOT_BISHOP: &str = "actor-not-bishop";
pub const CODE_OUTSIDE_LIFETIME: &str = "event-outside-lifetime";
pub const CODE_UNDOCUMENTED_BISHOP: &str = "bishop-without-consecration";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingLevel {
    Error,
    Warning,
    Info,
}

/// Which record a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef {
    pub kind: EdgeKind,
    pub id: EventId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFinding {
    pub level: FindingLevel,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clergy_id: Option<ClergyId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EventRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub summary: AuditSummary,
    pub findings: Vec<AuditFinding>,
}

impl AuditReport {
    pub fn with_code<'r>(&'r self, code: &'r str) -> impl Iterator<Item = &'r AuditFinding> {
        self.findings.iter().filter(move |f| f.code == code)
    }

    fn push(&mut self, finding: AuditFinding) {
        match finding.level {
            FindingLevel::Error => self.summary.error_count += 1,
            FindingLevel::Warning => self.summary.warning_count += 1,
            FindingLevel::Info => self.summary.info_count += 1,
        }
        self.findings.push(finding);
    }
}

/// Run every enabled check over the active part of the snapshot.
///
/// Events belonging to soft-deleted clergy are skipped along with their owner.
pub fn audit(index: &LineageIndex<'_>, config: &AuditConfig) -> AuditReport {
    let mut report = AuditReport::default();
    let snapshot = index.snapshot();

    for o in &snapshot.ordinations {
        let Some(subject) = index.active(o.clergy_id) else {
            continue;
        };
        check_event(index, config, &mut report, EdgeKind::Ordination, o, subject);
        if let Some(actor) = o.ordaining_bishop_id {
            check_actor(index, config, &mut report, EdgeKind::Ordination, o, actor);
        }
    }

    for c in &snapshot.consecrations {
        let Some(subject) = index.active(c.clergy_id) else {
            continue;
        };
        check_event(index, config, &mut report, EdgeKind::Consecration, c, subject);
        if let Some(actor) = c.consecrator_id {
            check_actor(index, config, &mut report, EdgeKind::Consecration, c, actor);
        }
        for &co in &c.co_consecrators {
            check_actor(index, config, &mut report, EdgeKind::CoConsecration, c, co);
        }
    }

    for (key, members) in consecration_cycles(index) {
        let names: Vec<String> = members
            .iter()
            .map(|id| label(index, *id))
            .collect();
        report.push(AuditFinding {
            level: FindingLevel::Warning,
            code: CODE_CONSECRATION_CYCLE.to_string(),
            message: format!("primary consecrations form a cycle: {}", names.join(" <- ")),
            clergy_id: Some(key),
            event: None,
        });
    }

    if config.report_undocumented_bishops {
        for c in index.active_clergy() {
            if index.is_bishop(c) && index.consecrations_of(c.id).is_empty() {
                report.push(AuditFinding {
                    level: FindingLevel::Info,
                    code: CODE_UNDOCUMENTED_BISHOP.to_string(),
                    message: format!(
                        "{} has a bishop rank but no consecration on record",
                        label(index, c.id)
                    ),
                    clergy_id: Some(c.id),
                    event: None,
                });
            }
        }
    }

    tracing::info!(
        errors = report.summary.error_count,
        warnings = report.summary.warning_count,
        infos = report.summary.info_count,
        "audit finished"
    );
    report
}

fn label(index: &LineageIndex<'_>, id: ClergyId) -> String {
    match index.clergy(id) {
        Some(c) => format!("{} (#{id})", c.display_name()),
        None => format!("#{id}"),
    }
}

fn check_event<E: Event>(
    index: &LineageIndex<'_>,
    config: &AuditConfig,
    report: &mut AuditReport,
    kind: EdgeKind,
    event: &E,
    subject: &Clergy,
) {
    if !config.check_lifetimes {
        return;
    }
    let Some(date) = event.date().exact() else {
        return;
    };
    if !index.was_alive_on(subject, Some(date)) {
        report.push(AuditFinding {
            level: FindingLevel::Warning,
            code: CODE_OUTSIDE_LIFETIME.to_string(),
            message: format!(
                "{kind} {} of {} is dated {date}, outside their lifetime",
                event.id(),
                label(index, subject.id)
            ),
            clergy_id: Some(subject.id),
            event: Some(EventRef {
                kind,
                id: event.id(),
            }),
        });
    }
}

fn check_actor<E: Event>(
    index: &LineageIndex<'_>,
    config: &AuditConfig,
    report: &mut AuditReport,
    kind: EdgeKind,
    event: &E,
    actor: ClergyId,
) {
    let event_ref = Some(EventRef {
        kind,
        id: event.id(),
    });

    if actor == event.subject() {
        report.push(AuditFinding {
            level: FindingLevel::Error,
            code: CODE_SELF_REFERENCE.to_string(),
            message: format!(
                "{kind} {} names {} as acting on themselves",
                event.id(),
                label(index, actor)
            ),
            clergy_id: Some(actor),
            event: event_ref,
        });
        return;
    }

    let Some(person) = index.active(actor) else {
        let state = if index.clergy(actor).is_some() {
            "soft-deleted"
        } else {
            "missing"
        };
        report.push(AuditFinding {
            level: FindingLevel::Warning,
            code: CODE_DANGLING_REFERENCE.to_string(),
            message: format!(
                "{kind} {} of {} references {state} clergy #{actor}",
                event.id(),
                label(index, event.subject())
            ),
            clergy_id: Some(event.subject()),
            event: event_ref,
        });
        return;
    };

    if !config.check_actor_rank {
        return;
    }
    let Some(date) = event.date().exact() else {
        return;
    };
    if !index.was_bishop_on(person, Some(date)) {
        report.push(AuditFinding {
            level: FindingLevel::Warning,
            code: CODE_ACTOR_NOT_BISHOP.to_string(),
            message: format!(
                "{} was not a bishop on {date} ({kind} {} of {})",
                label(index, actor),
                event.id(),
                label(index, event.subject())
            ),
            clergy_id: Some(actor),
            event: event_ref,
        });
    }
}

/// Cycles in the primary-consecration relation among active clergy.
///
/// Keyed by the smallest member id; members are listed starting from that id
/// and following consecrators upward.
fn consecration_cycles(index: &LineageIndex<'_>) -> BTreeMap<ClergyId, Vec<ClergyId>> {
    let next = |id: ClergyId| -> Option<ClergyId> {
        index
            .primary_consecration(id)
            .and_then(|c| c.consecrator_id)
            .filter(|c| *c != id && index.active(*c).is_some())
    };

    let mut cycles: BTreeMap<ClergyId, Vec<ClergyId>> = BTreeMap::new();
    let mut settled: HashSet<ClergyId> = HashSet::new();

    for start in index.active_clergy() {
        let mut path: Vec<ClergyId> = Vec::new();
        let mut position: HashMap<ClergyId, usize> = HashMap::new();
        let mut current = Some(start.id);

        while let Some(id) = current {
            if settled.contains(&id) {
                break;
            }
            if let Some(&at) = position.get(&id) {
                let members = &path[at..];
                let (offset, key) = members
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, m)| **m)
                    .map(|(i, m)| (i, *m))
                    .unwrap_or((0, id));
                let mut rotated = members[offset..].to_vec();
                rotated.extend_from_slice(&members[..offset]);
                cycles.entry(key).or_insert(rotated);
                break;
            }
            position.insert(id, path.len());
            path.push(id);
            current = next(id);
        }

        settled.extend(path);
    }

    cycles
}

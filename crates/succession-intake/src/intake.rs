use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use succession_lineage::{audit, EdgeKind, EngineConfig, EventRef, LineageIndex};
use succession_model::{
    parse_event_date, parse_lenient_date, Clergy, ClergyId, Consecration, Event, EventDate,
    EventFlags, EventId, Ordination, Snapshot,
};

use crate::{ActorRef, ClergyForm, ConsecrationInput, FlagsInput, IntakeError};

/// What [`Intake::apply`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedForm {
    pub clergy_id: ClergyId,
    /// `false` when the form edited an existing record.
    pub created: bool,
    pub ordination_ids: Vec<EventId>,
    pub consecration_ids: Vec<EventId>,
    /// Clergy created because a form named a bishop not yet in the registry.
    pub created_placeholders: Vec<ClergyId>,
    /// Non-fatal problems: unreadable dates and data-quality findings about
    /// the events just written.
    pub warnings: Vec<String>,
}

/// Owns the working snapshot that forms are applied to.
#[derive(Debug, Clone)]
pub struct Intake {
    snapshot: Snapshot,
    config: EngineConfig,
}

impl Intake {
    pub fn new(snapshot: Snapshot, config: EngineConfig) -> Self {
        Self { snapshot, config }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.snapshot
    }

    /// Resolve an actor reference, creating a placeholder bishop for an
    /// unmatched name.
    ///
    /// Names match the display name of active clergy exactly, ignoring case and
    /// surrounding whitespace; the lowest id wins. Explicit ids must name an
    /// active record.
    pub fn resolve_or_create_placeholder(
        &mut self,
        actor: &ActorRef,
    ) -> Result<ClergyId, IntakeError> {
        let mut created = Vec::new();
        resolve_actor(&mut self.snapshot, &self.config, actor, &mut created)
    }

    /// Soft-delete a clergy record. Its events stay in place.
    pub fn soft_delete(&mut self, id: ClergyId) -> Result<(), IntakeError> {
        let clergy = self
            .snapshot
            .clergy
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(IntakeError::UnknownClergy(id))?;
        if !clergy.is_active() {
            return Err(IntakeError::DeletedClergy(id));
        }
        clergy.soft_delete(Utc::now());
        tracing::info!(clergy_id = %id, "soft-deleted clergy");
        Ok(())
    }

    /// Validate `form` and write it into the snapshot.
    pub fn apply(&mut self, form: &ClergyForm) -> Result<AppliedForm, IntakeError> {
        let mut draft = self.snapshot.clone();
        let applied = apply_form(&mut draft, &self.config, form)?;
        self.snapshot = draft;

        tracing::info!(
            clergy_id = %applied.clergy_id,
            created = applied.created,
            ordinations = applied.ordination_ids.len(),
            consecrations = applied.consecration_ids.len(),
            placeholders = applied.created_placeholders.len(),
            warnings = applied.warnings.len(),
            "applied clergy form"
        );
        Ok(applied)
    }
}

// ============================================================================
// Form application
// ============================================================================

fn apply_form(
    draft: &mut Snapshot,
    config: &EngineConfig,
    form: &ClergyForm,
) -> Result<AppliedForm, IntakeError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(IntakeError::EmptyName);
    }
    let rank = form.rank.trim();
    if rank.is_empty() {
        return Err(IntakeError::EmptyRank);
    }

    let mut warnings = Vec::new();
    let born = lenient_field(form.date_of_birth.as_deref(), "date of birth", &mut warnings);
    let died = lenient_field(form.date_of_death.as_deref(), "date of death", &mut warnings);
    if let (Some(born), Some(died)) = (born, died) {
        if died < born {
            return Err(IntakeError::DeathBeforeBirth { born, died });
        }
    }

    let ord_flags: Vec<EventFlags> = form
        .ordinations
        .iter()
        .map(|o| o.flags)
        .enumerate()
        .map(|(i, f)| checked_flags(f, Ordination::KIND, i + 1))
        .collect::<Result<_, _>>()?;
    let cons_flags: Vec<EventFlags> = form
        .consecrations
        .iter()
        .map(|c| c.flags)
        .enumerate()
        .map(|(i, f)| checked_flags(f, Consecration::KIND, i + 1))
        .collect::<Result<_, _>>()?;

    let (subject, created) = match form.id {
        Some(id) => {
            let existing = draft
                .clergy
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(IntakeError::UnknownClergy(id))?;
            if !existing.is_active() {
                return Err(IntakeError::DeletedClergy(id));
            }
            fill_clergy(existing, name, rank, form, born, died);
            draft.ordinations.retain(|o| o.clergy_id != id);
            draft.consecrations.retain(|c| c.clergy_id != id);
            (id, false)
        }
        None => {
            let id = draft.next_clergy_id();
            let mut clergy = Clergy::new(id, name, rank);
            fill_clergy(&mut clergy, name, rank, form, born, died);
            draft.clergy.push(clergy);
            (id, true)
        }
    };

    let mut placeholders = Vec::new();
    let mut ordination_ids = Vec::new();
    let mut consecration_ids = Vec::new();

    for (i, (input, flags)) in form.ordinations.iter().zip(ord_flags).enumerate() {
        let position = i + 1;
        let date = event_date(
            input.date.as_deref(),
            input.year,
            Ordination::KIND,
            position,
            &mut warnings,
        );
        let bishop = resolve_optional(
            draft,
            config,
            input.ordaining_bishop.as_ref(),
            &mut placeholders,
        )?;
        if bishop == Some(subject) {
            return Err(IntakeError::SelfReference {
                kind: Ordination::KIND,
                position,
            });
        }
        let id = draft.next_ordination_id();
        draft
            .ordinations
            .push(Ordination::new(id, subject, bishop, date).with_flags(flags));
        ordination_ids.push(id);
    }

    for (i, (input, flags)) in form.consecrations.iter().zip(cons_flags).enumerate() {
        let position = i + 1;
        let date = event_date(
            input.date.as_deref(),
            input.year,
            Consecration::KIND,
            position,
            &mut warnings,
        );
        let consecrator =
            resolve_optional(draft, config, input.consecrator.as_ref(), &mut placeholders)?;
        let co = resolve_co_consecrators(draft, config, input, consecrator, &mut placeholders)?;
        if consecrator == Some(subject) || co.contains(&subject) {
            return Err(IntakeError::SelfReference {
                kind: Consecration::KIND,
                position,
            });
        }
        let id = draft.next_consecration_id();
        draft.consecrations.push(
            Consecration::new(id, subject, consecrator, date)
                .with_co_consecrators(co)
                .with_flags(flags),
        );
        consecration_ids.push(id);
    }

    warnings.extend(review(draft, config, &ordination_ids, &consecration_ids));

    Ok(AppliedForm {
        clergy_id: subject,
        created,
        ordination_ids,
        consecration_ids,
        created_placeholders: placeholders,
        warnings,
    })
}

fn fill_clergy(
    clergy: &mut Clergy,
    name: &str,
    rank: &str,
    form: &ClergyForm,
    born: Option<NaiveDate>,
    died: Option<NaiveDate>,
) {
    clergy.name = name.to_string();
    clergy.rank = rank.to_string();
    clergy.papal_name = non_blank(form.papal_name.as_deref());
    clergy.organization = non_blank(form.organization.as_deref());
    clergy.date_of_birth = born;
    clergy.date_of_death = died;
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn checked_flags(
    input: FlagsInput,
    kind: &'static str,
    position: usize,
) -> Result<EventFlags, IntakeError> {
    input
        .to_flags()
        .ok_or(IntakeError::ConflictingValidity { kind, position })
}

fn lenient_field(text: Option<&str>, field: &str, warnings: &mut Vec<String>) -> Option<NaiveDate> {
    let text = text.map(str::trim).filter(|t| !t.is_empty())?;
    let parsed = parse_lenient_date(text);
    if parsed.is_none() {
        tracing::warn!(field, text, "unreadable date ignored");
        warnings.push(format!("could not read {field} `{text}`; left empty"));
    }
    parsed
}

fn event_date(
    text: Option<&str>,
    year: Option<i32>,
    kind: &str,
    position: usize,
    warnings: &mut Vec<String>,
) -> EventDate {
    let parsed = parse_event_date(text, year);
    if let Some(raw) = parsed.malformed {
        tracing::warn!(
            kind,
            position,
            text = %raw,
            fallback = %parsed.date,
            "unreadable event date"
        );
        warnings.push(format!(
            "{kind} #{position}: could not read date `{raw}`; recorded as {}",
            parsed.date
        ));
    }
    parsed.date
}

// ============================================================================
// Actor resolution
// ============================================================================

fn resolve_actor(
    draft: &mut Snapshot,
    config: &EngineConfig,
    actor: &ActorRef,
    created: &mut Vec<ClergyId>,
) -> Result<ClergyId, IntakeError> {
    match actor {
        ActorRef::Id(id) => match draft.clergy(*id) {
            None => Err(IntakeError::UnknownClergy(*id)),
            Some(c) if !c.is_active() => Err(IntakeError::DeletedClergy(*id)),
            Some(_) => Ok(*id),
        },
        ActorRef::Name(name) => {
            let wanted = name.trim();
            if wanted.is_empty() {
                return Err(IntakeError::EmptyActorName);
            }
            let found = draft
                .clergy
                .iter()
                .filter(|c| c.is_active() && c.display_name().trim().eq_ignore_ascii_case(wanted))
                .map(|c| c.id)
                .min();
            if let Some(id) = found {
                return Ok(id);
            }

            let id = draft.next_clergy_id();
            draft
                .clergy
                .push(Clergy::new(id, wanted, config.placeholder_rank.as_str()));
            created.push(id);
            tracing::info!(
                clergy_id = %id,
                name = wanted,
                rank = %config.placeholder_rank,
                "created placeholder clergy"
            );
            Ok(id)
        }
    }
}

fn resolve_optional(
    draft: &mut Snapshot,
    config: &EngineConfig,
    actor: Option<&ActorRef>,
    created: &mut Vec<ClergyId>,
) -> Result<Option<ClergyId>, IntakeError> {
    match actor {
        Some(a) if !a.is_blank() => resolve_actor(draft, config, a, created).map(Some),
        _ => Ok(None),
    }
}

/// Resolved co-consecrators in form order, without repeats and without the
/// principal consecrator.
fn resolve_co_consecrators(
    draft: &mut Snapshot,
    config: &EngineConfig,
    input: &ConsecrationInput,
    consecrator: Option<ClergyId>,
    created: &mut Vec<ClergyId>,
) -> Result<Vec<ClergyId>, IntakeError> {
    let mut seen: HashSet<ClergyId> = consecrator.into_iter().collect();
    let mut out = Vec::new();
    for actor in input.co_consecrators.iter().filter(|a| !a.is_blank()) {
        let id = resolve_actor(draft, config, actor, created)?;
        if seen.insert(id) {
            out.push(id);
        }
    }
    Ok(out)
}

/// Audit findings that concern the events just written, as warning text.
fn review(
    draft: &Snapshot,
    config: &EngineConfig,
    ordination_ids: &[EventId],
    consecration_ids: &[EventId],
) -> Vec<String> {
    let index = LineageIndex::with_config(draft, config);
    audit(&index, &config.audit)
        .findings
        .into_iter()
        .filter(|f| match f.event {
            Some(EventRef {
                kind: EdgeKind::Ordination,
                id,
            }) => ordination_ids.contains(&id),
            Some(EventRef { id, .. }) => consecration_ids.contains(&id),
            None => false,
        })
        .map(|f| f.message)
        .collect()
}

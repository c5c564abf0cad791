//! Request objects handed over by the web layer.
//!
//! Field names follow the registry's form fields; every optional field may be
//! omitted from JSON.

use serde::{Deserialize, Serialize};

use succession_model::{ClergyId, EventFlags, Validity};

/// Reference to an acting bishop: an existing record, or a name to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRef {
    Id(ClergyId),
    Name(String),
}

impl ActorRef {
    pub fn id(id: ClergyId) -> Self {
        Self::Id(id)
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Blank names are what an untouched form field submits.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Name(n) if n.trim().is_empty())
    }
}

/// The four checkboxes an event row carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagsInput {
    pub is_sub_conditione: bool,
    pub is_doubtful_event: bool,
    pub is_invalid: bool,
    pub is_doubtfully_valid: bool,
}

impl FlagsInput {
    /// `None` when both validity boxes are ticked.
    pub fn to_flags(self) -> Option<EventFlags> {
        Some(EventFlags {
            is_sub_conditione: self.is_sub_conditione,
            is_doubtful_event: self.is_doubtful_event,
            validity: Validity::from_flags(self.is_invalid, self.is_doubtfully_valid)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdinationInput {
    /// Free-text date as typed.
    pub date: Option<String>,
    pub year: Option<i32>,
    pub ordaining_bishop: Option<ActorRef>,
    #[serde(flatten)]
    pub flags: FlagsInput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsecrationInput {
    pub date: Option<String>,
    pub year: Option<i32>,
    pub consecrator: Option<ActorRef>,
    pub co_consecrators: Vec<ActorRef>,
    #[serde(flatten)]
    pub flags: FlagsInput,
}

/// A submitted clergy form.
///
/// With `id` set the form edits that record and replaces all of its events;
/// without it a new record is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClergyForm {
    pub id: Option<ClergyId>,
    pub name: String,
    pub rank: String,
    pub papal_name: Option<String>,
    pub organization: Option<String>,
    pub date_of_birth: Option<String>,
    pub date_of_death: Option<String>,
    pub ordinations: Vec<OrdinationInput>,
    pub consecrations: Vec<ConsecrationInput>,
}

impl ClergyForm {
    pub fn new(name: impl Into<String>, rank: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rank: rank.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_json_is_forgiving() {
        let form = ClergyForm::from_json_str(
            r#"{
                "name": "Marcel",
                "rank": "Archbishop",
                "consecrations": [
                    { "date": "1947-09-24", "consecrator": { "name": "Achille Liénart" },
                      "co_consecrators": [ { "id": 7 }, { "name": "" } ],
                      "is_doubtfully_valid": true }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(form.id, None);
        assert!(form.ordinations.is_empty());
        let c = &form.consecrations[0];
        assert_eq!(c.consecrator, Some(ActorRef::name("Achille Liénart")));
        assert_eq!(c.co_consecrators[0], ActorRef::Id(ClergyId(7)));
        assert!(c.co_consecrators[1].is_blank());
        assert_eq!(
            c.flags.to_flags().map(|f| f.validity),
            Some(Validity::DoubtfullyValid)
        );
    }

    #[test]
    fn both_validity_boxes_cannot_be_ticked() {
        let flags = FlagsInput {
            is_invalid: true,
            is_doubtfully_valid: true,
            ..FlagsInput::default()
        };
        assert_eq!(flags.to_flags(), None);
    }
}

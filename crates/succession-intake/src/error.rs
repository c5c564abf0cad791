use thiserror::Error;

use succession_model::ClergyId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("clergy name must not be empty")]
    EmptyName,

    #[error("clergy rank must not be empty")]
    EmptyRank,

    #[error("actor name must not be empty")]
    EmptyActorName,

    #[error("unknown clergy id {0}")]
    UnknownClergy(ClergyId),

    #[error("clergy {0} is deleted")]
    DeletedClergy(ClergyId),

    #[error("{kind} #{position} names the clergy member as acting on themselves")]
    SelfReference { kind: &'static str, position: usize },

    #[error("{kind} #{position} is flagged both invalid and doubtfully valid")]
    ConflictingValidity { kind: &'static str, position: usize },

    #[error("date of death {died} is before date of birth {born}")]
    DeathBeforeBirth {
        born: chrono::NaiveDate,
        died: chrono::NaiveDate,
    },
}

//! Intake of structured clergy forms.
//!
//! The web layer decodes whatever it receives into a [`ClergyForm`] before the
//! engine sees it. From there [`Intake::apply`] validates the form, resolves
//! actor references (by id, or by name with placeholder creation), parses the
//! lenient date fields and writes the clergy record and its events into the
//! working [`Snapshot`].
//!
//! Applying a form is all-or-nothing: on error the snapshot is left untouched.
//!
//! [`Snapshot`]: succession_model::Snapshot

pub mod error;
pub mod form;
pub mod intake;

pub use error::IntakeError;
pub use form::{ActorRef, ClergyForm, ConsecrationInput, FlagsInput, OrdinationInput};
pub use intake::{AppliedForm, Intake};

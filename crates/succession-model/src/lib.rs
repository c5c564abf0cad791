//! Succession data model
//!
//! In-memory records for an apostolic succession registry:
//!
//! - [`Clergy`]: identity records (rank, lifetime, soft-delete state)
//! - [`Ordination`] / [`Consecration`]: lineage events, each linking an acting
//!   bishop to the clergy member receiving orders
//! - [`RankTable`]: the rank → `is_bishop` lookup
//! - [`Snapshot`]: a read-only bundle of all of the above, as loaded by the
//!   storage layer (or from a JSON file)
//!
//! The types encode the record invariants directly: an [`EventDate`] is exactly
//! one of an exact date, a bare year, or unknown, and [`Validity`] is a
//! tri-state, so "invalid and doubtfully valid" cannot be represented.
//!
//! Nothing here decides lineage questions; that lives in `succession-lineage`.

pub mod clergy;
pub mod date;
pub mod error;
pub mod event;
pub mod rank;
pub mod snapshot;

pub use clergy::{Clergy, ClergyId, POPE_RANK};
pub use date::{parse_event_date, parse_lenient_date, LenientDate};
pub use error::ModelError;
pub use event::{Consecration, Event, EventDate, EventFlags, EventId, Ordination, Validity};
pub use rank::{Rank, RankTable};
pub use snapshot::Snapshot;

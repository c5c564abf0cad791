//! Succession lineage engine
//!
//! Pure decision logic and graph algorithms over an in-memory [`Snapshot`]:
//!
//! ```text
//!            Snapshot (clergy + ordinations + consecrations + ranks)
//!                                   │
//!                                   ▼
//!                            ┌──────────────┐
//!                            │ LineageIndex │  eager per-clergy lookups
//!                            └──────┬───────┘
//!          ┌──────────────┬─────────┼───────────────┬─────────────────┐
//!          ▼              ▼         ▼               ▼                 ▼
//!     validity        primary   candidates        graph            lineage
//!  (alive/bishop   (canonical  (who could have  (flat node/edge  (upward chain,
//!   on a date)       event)     performed it)    projection)      cycle-safe)
//!                                                   │                 │
//!                                                   └──── dot ────────┘
//! ```
//!
//! Every function here is synchronous and side-effect free: it reads the
//! snapshot through a [`LineageIndex`] and returns fresh values. Unknown dates
//! and dangling references are treated as normal incompleteness of historical
//! data, never as errors; only programmer errors (asking for a clergy id that
//! does not exist) produce a [`LineageError`].
//!
//! [`Snapshot`]: succession_model::Snapshot

pub mod audit;
pub mod candidates;
pub mod config;
pub mod dot;
pub mod error;
pub mod graph;
pub mod index;
pub mod lineage;
pub mod primary;
pub mod validity;

pub use audit::{audit, AuditFinding, AuditReport, AuditSummary, EventRef, FindingLevel};
pub use candidates::{eligible_bishops, CandidateEntry, CandidateQuery};
pub use config::{AuditConfig, EngineConfig};
pub use dot::{render_chain_dot, render_graph_dot};
pub use error::LineageError;
pub use graph::{build_graph, EdgeKind, GraphEdge, GraphNode, LineageGraph};
pub use index::LineageIndex;
pub use lineage::{lineage_chain, LineageChain, LineageState, Termination};
pub use primary::primary;
pub use validity::{was_alive_on, was_bishop_on};

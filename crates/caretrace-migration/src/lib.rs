//! Regulation migration planning.
//!
//! Findings and topics link to regulation sections by reference, and
//! regulation text gets revised. This crate keeps those links honest across
//! revisions:
//!
//! 1. upstream produces classified section changes
//!    ([`SectionChange`](caretrace_logic::change::SectionChange), usually via
//!    [`diff_catalog`](caretrace_logic::change::diff_catalog));
//! 2. [`plan_migration`] maps every active [`RegulationLink`] to a
//!    [`MigrationAction`];
//! 3. [`apply_plan`] executes the plan without deleting anything: superseded
//!    links are deprecated in place with forward references, and successor
//!    links are appended.
//!
//! Nothing here touches findings. A finding recorded against a deprecated
//! link still resolves to the section text it was written against; only new
//! work follows the successors.

pub mod link;
pub mod plan;

pub use link::{LinkStatus, RegulationLink};
pub use plan::{
    apply_plan, plan_migration, MigrationAction, MigrationCounts, MigrationPlan, PlannedMigration,
};

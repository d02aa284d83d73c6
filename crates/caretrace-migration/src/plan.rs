//! Migration planning over classified section changes.
//!
//! The planner reads section-change classifications
//! ([`SectionChangeKind`](caretrace_logic::change::SectionChangeKind)) and
//! turns them into per-link actions; applying a plan deprecates links in
//! place and appends successors — nothing is deleted or overwritten, so the
//! link set never shrinks.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use caretrace_contracts::catalog::SectionRef;
use caretrace_contracts::clock::Clock;
use caretrace_contracts::identity::{LinkId, TopicId};
use caretrace_logic::change::{SectionChange, SectionChangeKind};

use crate::link::{LinkStatus, RegulationLink};

/// What to do with one link when its section changed upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum MigrationAction {
    /// Section unchanged; the link stays as it is.
    Retain,
    /// Section text changed in place; the link target is still right but a
    /// human should re-read the wording.
    FlagForReview,
    /// Section moved or split; deprecate the link and create successors.
    Supersede { replacements: Vec<SectionRef> },
    /// Section removed with no successor; deprecate the link outright.
    Deprecate,
}

impl MigrationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationAction::Retain => "retain",
            MigrationAction::FlagForReview => "flag-for-review",
            MigrationAction::Supersede { .. } => "supersede",
            MigrationAction::Deprecate => "deprecate",
        }
    }
}

/// The planned action for one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedMigration {
    pub link_id: LinkId,
    pub topic_id: TopicId,
    pub section: SectionRef,
    pub action: MigrationAction,
}

/// Per-action tallies, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationCounts {
    pub retained: usize,
    pub flagged: usize,
    pub superseded: usize,
    pub deprecated: usize,
}

/// A computed migration: one entry per active link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationPlan {
    entries: Vec<PlannedMigration>,
}

impl MigrationPlan {
    /// All planned entries, in input link order.
    pub fn entries(&self) -> &[PlannedMigration] {
        &self.entries
    }

    /// The planned action for one link, if it was planned.
    pub fn action_for(&self, link_id: LinkId) -> Option<&MigrationAction> {
        self.entries
            .iter()
            .find(|entry| entry.link_id == link_id)
            .map(|entry| &entry.action)
    }

    pub fn counts(&self) -> MigrationCounts {
        let mut counts = MigrationCounts::default();
        for entry in &self.entries {
            match entry.action {
                MigrationAction::Retain => counts.retained += 1,
                MigrationAction::FlagForReview => counts.flagged += 1,
                MigrationAction::Supersede { .. } => counts.superseded += 1,
                MigrationAction::Deprecate => counts.deprecated += 1,
            }
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Map one change classification onto a link action.
fn action_for_change(change: Option<&SectionChange>) -> MigrationAction {
    match change {
        // No change entry for this section means it was untouched.
        None => MigrationAction::Retain,
        Some(change) => match change.kind {
            SectionChangeKind::Unchanged => MigrationAction::Retain,
            SectionChangeKind::Reworded => MigrationAction::FlagForReview,
            SectionChangeKind::Renumbered | SectionChangeKind::Split => {
                MigrationAction::Supersede {
                    replacements: change.replacements.clone(),
                }
            }
            SectionChangeKind::Removed => MigrationAction::Deprecate,
        },
    }
}

/// Plan the migration of a link set across a set of classified changes.
///
/// Only active links are planned; already-deprecated links are history and
/// stay untouched. Links whose section appears in no change entry are
/// retained.
pub fn plan_migration(links: &[RegulationLink], changes: &[SectionChange]) -> MigrationPlan {
    let entries: Vec<PlannedMigration> = links
        .iter()
        .filter(|link| link.is_active())
        .map(|link| {
            let change = changes
                .iter()
                .find(|change| change.old.section == link.section);
            let action = action_for_change(change);
            debug!(
                link_id = %link.id,
                topic = %link.topic_id,
                section = %link.section,
                action = action.as_str(),
                "link migration planned"
            );
            PlannedMigration {
                link_id: link.id,
                topic_id: link.topic_id.clone(),
                section: link.section.clone(),
                action,
            }
        })
        .collect();

    let plan = MigrationPlan { entries };
    let counts = plan.counts();
    info!(
        planned = plan.len(),
        retained = counts.retained,
        superseded = counts.superseded,
        deprecated = counts.deprecated,
        "migration plan computed"
    );
    plan
}

/// Apply a plan to a link set, non-destructively.
///
/// Superseded and removed links are deprecated **in place**, keeping their
/// section references; successor links are appended for every replacement
/// section. The returned set always contains every input link.
pub fn apply_plan(
    mut links: Vec<RegulationLink>,
    plan: &MigrationPlan,
    clock: &dyn Clock,
) -> Vec<RegulationLink> {
    let now = clock.now();
    let mut successors: Vec<RegulationLink> = Vec::new();

    for link in links.iter_mut() {
        let action = match plan.action_for(link.id) {
            Some(action) => action,
            None => continue,
        };

        match action {
            MigrationAction::Retain | MigrationAction::FlagForReview => {}
            MigrationAction::Supersede { replacements } => {
                let replacement_links: Vec<RegulationLink> = replacements
                    .iter()
                    .map(|section| {
                        RegulationLink::new(link.topic_id.clone(), section.clone(), clock)
                    })
                    .collect();
                link.status = LinkStatus::Deprecated {
                    superseded_by: replacement_links.iter().map(|l| l.id).collect(),
                    at: now,
                };
                successors.extend(replacement_links);
            }
            MigrationAction::Deprecate => {
                link.status = LinkStatus::Deprecated {
                    superseded_by: Vec::new(),
                    at: now,
                };
            }
        }
    }

    info!(
        prior = links.len(),
        appended = successors.len(),
        "migration plan applied"
    );
    links.extend(successors);
    links
}

//! Scenario 4: Regulation Migration
//!
//! The regulator republishes reg-12 and three linked sections change:
//!
//!   §12.2 keeps its text but moves to §12.4     → renumbered
//!   §12.5 keeps its path but is rewritten       → reworded
//!   §12.9 disappears without replacement        → removed
//!
//! The pipeline diffs the two catalog versions content-addressed, plans one
//! action per active link, and applies the plan non-destructively: prior
//! links are deprecated in place with forward references, successors are
//! appended, and nothing is deleted.

use caretrace_contracts::catalog::{SectionPath, SectionRef};
use caretrace_contracts::clock::SystemClock;
use caretrace_contracts::error::CoreResult;
use caretrace_contracts::identity::{RegulationId, TopicId};
use caretrace_logic::{diff_catalog, SectionSnapshot};
use caretrace_migration::{apply_plan, plan_migration, LinkStatus, RegulationLink};

// ── Catalog text (mock) ───────────────────────────────────────────────────────

/// reg-12 sections as first published.
const CATALOG_V1: &[(&str, &str)] = &[
    ("12.2", "Medicines must be supplied in sufficient quantities, managed safely, and administered by competent staff."),
    ("12.5", "Premises and equipment must be kept clean and secure."),
    ("12.9", "Providers must display their most recent inspection rating on site."),
];

/// reg-12 sections after the republication.
const CATALOG_V2: &[(&str, &str)] = &[
    ("12.4", "Medicines must be supplied in sufficient quantities, managed safely, and administered by competent staff."),
    ("12.5", "Premises and equipment must be kept clean, secure, and suitable for the service provided."),
];

fn sections(catalog: &[(&str, &str)]) -> Vec<SectionSnapshot> {
    catalog
        .iter()
        .map(|(path, text)| {
            SectionSnapshot::new(
                SectionRef::new(RegulationId::new("reg-12"), SectionPath::new(*path)),
                text,
            )
        })
        .collect()
}

// ── Scenario runner ───────────────────────────────────────────────────────────

/// Run Scenario 4: Regulation Migration.
pub fn run_scenario() -> CoreResult<()> {
    println!("=== Scenario 4: Regulation Migration ===");
    println!();

    let clock = SystemClock;

    // ── Diff the catalog versions ─────────────────────────────────────────────

    let old_sections = sections(CATALOG_V1);
    let new_sections = sections(CATALOG_V2);
    let changes = diff_catalog(&old_sections, &new_sections);

    println!("  Section changes (content-addressed diff):");
    for change in &changes {
        let moved_to = change
            .replacements
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "    [{}] {}{}",
            change.kind,
            change.old.section,
            if moved_to.is_empty() { String::new() } else { format!(" → {}", moved_to) }
        );
    }
    println!();

    // ── Plan against the live links ───────────────────────────────────────────

    let links = vec![
        link("medication-management", "12.2", &clock),
        link("infection-control", "12.5", &clock),
        link("care-planning", "12.9", &clock),
    ];

    let plan = plan_migration(&links, &changes);
    println!("  Migration plan ({} links):", plan.len());
    for entry in plan.entries() {
        println!(
            "    [{}] {} ({})",
            entry.action.as_str(),
            entry.topic_id,
            entry.section
        );
    }
    let counts = plan.counts();
    println!(
        "  Tally:                  {} retained, {} flagged, {} superseded, {} deprecated",
        counts.retained, counts.flagged, counts.superseded, counts.deprecated
    );
    println!();

    // ── Apply non-destructively ───────────────────────────────────────────────

    let before = links.len();
    let migrated = apply_plan(links, &plan, &clock);

    println!("  Link set after apply:   {} (was {}, nothing deleted)", migrated.len(), before);
    for link in &migrated {
        let status = match &link.status {
            LinkStatus::Active => "active".to_string(),
            LinkStatus::Deprecated { superseded_by, .. } if superseded_by.is_empty() => {
                "deprecated, no successor".to_string()
            }
            LinkStatus::Deprecated { superseded_by, .. } => {
                format!("deprecated, {} successor(s)", superseded_by.len())
            }
        };
        println!("    {} ({}): {}", link.topic_id, link.section, status);
    }

    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}

fn link(topic: &str, path: &str, clock: &SystemClock) -> RegulationLink {
    RegulationLink::new(
        TopicId::new(topic),
        SectionRef::new(RegulationId::new("reg-12"), SectionPath::new(path)),
        clock,
    )
}

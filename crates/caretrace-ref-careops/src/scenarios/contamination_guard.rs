//! Scenario 3: Contamination Guard
//!
//! Demonstrates that simulated findings can never reach the regulatory
//! record, in either direction:
//!
//! Sub-case A — a mock finding claiming the regulatory domain is refused
//!              at construction
//! Sub-case B — a legally built mock finding is refused promotion
//! Sub-case C — integrity verification exposes a rehydrated record whose
//!              claimed provenance hash does not match its content
//! Sub-case D — a real-inspection finding promotes cleanly, re-issued
//!              through the same constructor
//!
//! The guard is a constructor boundary, not a filter: contaminated records
//! are never built, so there is nothing to scrub downstream.

use chrono::{TimeZone, Utc};

use caretrace_contracts::catalog::{SectionPath, SectionRef};
use caretrace_contracts::error::CoreResult;
use caretrace_contracts::finding::{FindingInput, InspectionFinding, Origin, ReportingDomain, Severity};
use caretrace_contracts::identity::{Actor, FindingId, RegulationId, SnapshotId, TopicId};
use caretrace_provenance::guard;

// ── Fixture ───────────────────────────────────────────────────────────────────

/// A finding input for the demo provider, with the given provenance tags.
fn finding_input(origin: Origin, reporting_domain: ReportingDomain) -> FindingInput {
    FindingInput {
        id: FindingId::new(),
        topic_id: TopicId::new("medication-management"),
        section: SectionRef::new(RegulationId::new("reg-12"), SectionPath::new("12.2")),
        severity: Severity::High,
        impact_score: 80,
        likelihood_score: 70,
        why_hash: "c".repeat(64),
        origin,
        reporting_domain,
        identified_by: Actor::System,
        snapshot_id: SnapshotId::new(),
        snapshot_hash: "a".repeat(64),
        recorded_at: Utc.with_ymd_and_hms(2024, 6, 10, 11, 0, 0).unwrap(),
    }
}

// ── Scenario runner ───────────────────────────────────────────────────────────

/// Run Scenario 3: Contamination Guard.
pub fn run_scenario() -> CoreResult<()> {
    println!("=== Scenario 3: Contamination Guard ===");
    println!();

    // ── Sub-case A: contaminated input never constructs ───────────────────────

    {
        println!("  Sub-case A: mock-origin finding claiming the regulatory record");
        let input = finding_input(Origin::SystemMock, ReportingDomain::RegulatoryHistory);
        match guard::create_finding(input) {
            Err(e) => {
                println!("  Construction:           REFUSED");
                println!("  Error:                  {}", e);
            }
            Ok(_) => println!("  Construction:           unexpectedly succeeded"),
        }
        println!("  RESULT: contamination blocked at the constructor (expected)");
        println!();
    }

    // ── Sub-case B: a legal mock finding cannot be promoted ───────────────────

    let mock = guard::create_finding(finding_input(
        Origin::SystemMock,
        ReportingDomain::MockSimulation,
    ))?;

    {
        println!("  Sub-case B: promoting a legally built mock finding");
        println!(
            "  Finding:                {} ({} / {})",
            mock.id(),
            mock.origin(),
            mock.reporting_domain()
        );
        match guard::attempt_promote_to_regulatory(&mock) {
            Err(e) => {
                println!("  Promotion:              REFUSED");
                println!("  Error:                  {}", e);
            }
            Ok(_) => println!("  Promotion:              unexpectedly succeeded"),
        }
        println!("  RESULT: simulation output stays out of the official record (expected)");
        println!();
    }

    // ── Sub-case C: integrity verification on a doctored record ───────────────

    {
        println!("  Sub-case C: rehydrated record with a doctored provenance hash");
        println!(
            "  Fresh record verifies:  {}",
            guard::verify_integrity(&mock)
        );

        let doctored =
            InspectionFinding::rehydrate(mock.as_input(), "d".repeat(64))?;
        println!(
            "  Doctored record:        claimed hash {}…",
            &doctored.provenance_hash()[..16]
        );
        println!(
            "  Doctored verifies:      {}",
            guard::verify_integrity(&doctored)
        );
        println!("  RESULT: content/hash mismatch exposed by recomputation (expected)");
        println!();
    }

    // ── Sub-case D: a real-inspection finding promotes ────────────────────────

    {
        println!("  Sub-case D: promoting a real-inspection finding");
        let real = guard::create_finding(finding_input(
            Origin::ActualInspection,
            ReportingDomain::RegulatoryHistory,
        ))?;
        let promoted = guard::attempt_promote_to_regulatory(&real)?;
        println!(
            "  Promotion:              OK ({} / {}, integrity {})",
            promoted.origin(),
            promoted.reporting_domain(),
            if guard::verify_integrity(&promoted) {
                "VERIFIED"
            } else {
                "FAILED"
            }
        );
        println!("  RESULT: legitimate provenance passes untouched (expected)");
        println!();
    }

    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}

//! The guard at the boundary between simulation and the official record.
//!
//! Everything a mock inspection produces is tagged [`Origin::SystemMock`]
//! and may only ever report into `ReportingDomain::MockSimulation`. The
//! guard enforces the pairing at construction, verifies stored records by
//! recomputing their provenance hash, and refuses every attempt to promote
//! simulated output into regulatory history. A violation is a hard failure,
//! not a warning: the contaminated record is never built.

use tracing::{debug, info, warn};

use caretrace_contracts::canonical::content_hash;
use caretrace_contracts::error::{CoreError, CoreResult};
use caretrace_contracts::finding::{FindingInput, InspectionFinding, Origin};

/// Construct the canonical finding record from its semantic content.
///
/// Thin front door over [`InspectionFinding::from_input`] that puts every
/// refusal on the log; the invariants themselves live in the constructor so
/// no other code path can bypass them.
///
/// # Errors
///
/// [`CoreError::MockContamination`] when the origin/domain pairing is
/// illegal; [`CoreError::MissingSnapshotLink`] when the frozen-context
/// reference is not a usable digest.
pub fn create_finding(input: FindingInput) -> CoreResult<InspectionFinding> {
    match InspectionFinding::from_input(input) {
        Ok(finding) => {
            debug!(
                finding_id = %finding.id(),
                origin = %finding.origin(),
                domain = %finding.reporting_domain(),
                "finding record created"
            );
            Ok(finding)
        }
        Err(err) => {
            warn!(error = %err, "finding construction refused");
            Err(err)
        }
    }
}

/// Recompute a record's provenance hash and compare it to the stored one.
///
/// `true` means the semantic content still matches what the hash committed
/// to. `false` means the record was altered after construction — typically
/// a rehydrated record whose stored copy was tampered with.
pub fn verify_integrity(finding: &InspectionFinding) -> bool {
    match content_hash(&finding.as_input()) {
        Ok(recomputed) => {
            let intact = recomputed == finding.provenance_hash();
            if !intact {
                warn!(
                    finding_id = %finding.id(),
                    stored = %finding.provenance_hash(),
                    recomputed = %recomputed,
                    "provenance hash mismatch"
                );
            }
            intact
        }
        // Constructed records always canonicalized once already; a failure
        // here means the content is no longer canonicalizable at all.
        Err(err) => {
            warn!(finding_id = %finding.id(), error = %err, "provenance recomputation failed");
            false
        }
    }
}

/// Attempt to move a finding into the official regulatory record.
///
/// For `SystemMock` origin this **always** fails: simulated output has no
/// path into regulatory history, no matter who asks. For real-world origins
/// the record is re-issued through the checked constructor with a freshly
/// computed provenance hash; only legitimate upstream workflows call this,
/// never the simulation path.
///
/// # Errors
///
/// [`CoreError::MockContamination`] for any mock-origin record.
pub fn attempt_promote_to_regulatory(
    finding: &InspectionFinding,
) -> CoreResult<InspectionFinding> {
    if finding.origin() == Origin::SystemMock {
        warn!(
            finding_id = %finding.id(),
            origin = %finding.origin(),
            "promotion to regulatory history refused"
        );
        return Err(CoreError::MockContamination {
            origin: finding.origin().to_string(),
            reporting_domain: "regulatory-history".to_string(),
        });
    }

    let promoted = InspectionFinding::from_input(finding.as_input())?;
    info!(
        finding_id = %promoted.id(),
        origin = %promoted.origin(),
        "finding re-issued into regulatory history"
    );
    Ok(promoted)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use caretrace_contracts::catalog::{SectionPath, SectionRef};
    use caretrace_contracts::error::ErrorKind;
    use caretrace_contracts::finding::ReportingDomain;
    use caretrace_contracts::identity::{Actor, FindingId, RegulationId, SnapshotId, TopicId};

    use super::*;

    fn input(origin: Origin, domain: ReportingDomain) -> FindingInput {
        FindingInput {
            id: FindingId::new(),
            topic_id: TopicId::new("medication-management"),
            section: SectionRef::new(RegulationId::new("reg-12"), SectionPath::new("2.1")),
            severity: caretrace_contracts::finding::Severity::High,
            impact_score: 80,
            likelihood_score: 70,
            why_hash: "c".repeat(64),
            origin,
            reporting_domain: domain,
            identified_by: Actor::System,
            snapshot_id: SnapshotId::new(),
            snapshot_hash: "a".repeat(64),
            recorded_at: Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap(),
        }
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_mock_finding_reports_into_mock_simulation() {
        let finding =
            create_finding(input(Origin::SystemMock, ReportingDomain::MockSimulation)).unwrap();
        assert_eq!(finding.reporting_domain(), ReportingDomain::MockSimulation);
    }

    #[test]
    fn test_contaminated_input_is_refused_outright() {
        match create_finding(input(Origin::SystemMock, ReportingDomain::RegulatoryHistory)) {
            Err(err @ CoreError::MockContamination { .. }) => {
                assert_eq!(err.kind(), ErrorKind::Invariant);
            }
            other => panic!("expected MockContamination, got {:?}", other),
        }
    }

    // ── Integrity ─────────────────────────────────────────────────────────────

    #[test]
    fn test_freshly_constructed_records_verify() {
        let finding =
            create_finding(input(Origin::SystemMock, ReportingDomain::MockSimulation)).unwrap();
        assert!(verify_integrity(&finding));
    }

    /// A rehydrated record whose stored hash no longer matches its content
    /// must fail verification.
    #[test]
    fn test_tampered_stored_record_fails_verification() {
        let stored = InspectionFinding::rehydrate(
            input(Origin::SystemMock, ReportingDomain::MockSimulation),
            "d".repeat(64),
        )
        .unwrap();
        assert!(!verify_integrity(&stored));
    }

    #[test]
    fn test_rehydrated_record_with_the_true_hash_verifies() {
        let original =
            create_finding(input(Origin::SystemMock, ReportingDomain::MockSimulation)).unwrap();
        let stored = InspectionFinding::rehydrate(
            original.as_input(),
            original.provenance_hash().to_string(),
        )
        .unwrap();
        assert!(verify_integrity(&stored));
    }

    // ── Promotion ─────────────────────────────────────────────────────────────

    /// The core security property: no mock finding reaches regulatory
    /// history through any code path, promotion included.
    #[test]
    fn test_mock_findings_can_never_be_promoted() {
        let finding =
            create_finding(input(Origin::SystemMock, ReportingDomain::MockSimulation)).unwrap();

        match attempt_promote_to_regulatory(&finding) {
            Err(CoreError::MockContamination {
                origin,
                reporting_domain,
            }) => {
                assert_eq!(origin, "system-mock");
                assert_eq!(reporting_domain, "regulatory-history");
            }
            other => panic!("expected MockContamination, got {:?}", other),
        }
    }

    #[test]
    fn test_real_origins_promote_cleanly() {
        let finding = create_finding(input(
            Origin::ActualInspection,
            ReportingDomain::RegulatoryHistory,
        ))
        .unwrap();

        let promoted = attempt_promote_to_regulatory(&finding).unwrap();
        assert_eq!(promoted.reporting_domain(), ReportingDomain::RegulatoryHistory);
        assert_eq!(promoted.id(), finding.id());
        // Identical content yields an identical recomputed hash.
        assert_eq!(promoted.provenance_hash(), finding.provenance_hash());
        assert!(verify_integrity(&promoted));
    }

    #[test]
    fn test_self_identified_findings_promote_cleanly() {
        let finding = create_finding(input(
            Origin::SelfIdentified,
            ReportingDomain::RegulatoryHistory,
        ))
        .unwrap();
        assert!(attempt_promote_to_regulatory(&finding).is_ok());
    }
}

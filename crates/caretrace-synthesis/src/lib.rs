//! # caretrace-synthesis
//!
//! Turns evidence gaps into ranked, provenance-checked findings.
//!
//! ## Overview
//!
//! The synthesizer closes the loop of a mock inspection:
//!
//! 1. [`analyze_topic_evidence`] compares a topic's evidence hunt against
//!    what the provider supplied and produces a [`GapAnalysis`].
//! 2. [`generate_missing_evidence_finding`] turns a non-clean analysis into
//!    a [`DraftFinding`](caretrace_contracts::finding::DraftFinding) under a
//!    fixed severity/scoring policy.
//! 3. [`rank_drafts`] orders drafts by composite risk under the session's
//!    severity multiplier, with deterministic tie-breaks.
//! 4. [`finalize_draft_findings`] converts the session's drafts into
//!    canonical records through the provenance guard, re-checking every
//!    draft's reporting domain on the way.

pub mod gap;
pub mod synth;

pub use gap::{analyze_topic_evidence, EvidenceGap, GapAnalysis};
pub use synth::{
    composite_score, finalize_draft_findings, generate_missing_evidence_finding, rank_drafts,
    MISSING_EVIDENCE_LIKELIHOOD, OPTIONAL_GAP_IMPACT, REQUIRED_GAP_IMPACT,
};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};

    use caretrace_contracts::catalog::{
        EvidenceRequest, EvidenceType, RegulationScope, SectionPath, SectionRef, Topic,
    };
    use caretrace_contracts::clock::FixedClock;
    use caretrace_contracts::error::{CoreError, ErrorKind};
    use caretrace_contracts::evaluation::{InteractionMode, LogicEvaluation};
    use caretrace_contracts::finding::{DraftFinding, Origin, ReportingDomain, Severity};
    use caretrace_contracts::identity::{Actor, ProfileId, RegulationId, TenantId, TopicId};
    use caretrace_contracts::snapshot::{ContextSnapshot, LifecycleState};
    use caretrace_session::MockInspectionSession;

    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 6, 10, 11, 0, 0).unwrap())
    }

    fn snapshot() -> ContextSnapshot {
        ContextSnapshot::capture(
            TenantId::new("willow-lodge"),
            LifecycleState::RoutineCompliance,
            vec![RegulationId::new("reg-12")],
            BTreeMap::new(),
            &clock(),
        )
        .unwrap()
    }

    fn topic(id: &str, requests: Vec<EvidenceRequest>) -> Topic {
        Topic {
            id: TopicId::new(id),
            title: id.replace('-', " "),
            primary_section: SectionRef::new(
                RegulationId::new("reg-12"),
                SectionPath::new("2.1"),
            ),
            scope: RegulationScope {
                regulation_ids: vec![RegulationId::new("reg-12")],
                include: vec![],
                exclude: vec![],
            },
            evidence_requests: requests,
        }
    }

    fn request(evidence_type: EvidenceType, required: bool) -> EvidenceRequest {
        EvidenceRequest {
            evidence_type,
            required,
            min_count: 1,
        }
    }

    fn evaluation(multiplier: f64, snapshot_hash: String) -> LogicEvaluation {
        LogicEvaluation::bind(
            multiplier,
            3,
            20,
            false,
            InteractionMode::NarrativeFirst,
            snapshot_hash,
            "b".repeat(64),
        )
        .unwrap()
    }

    fn gapped_draft(topic_id: &str) -> DraftFinding {
        let topic = topic(topic_id, vec![request(EvidenceType::PolicyDocument, true)]);
        let snapshot = snapshot();
        let analysis = analyze_topic_evidence(&topic, &[]);
        generate_missing_evidence_finding(&topic, &analysis, &snapshot, &clock()).unwrap()
    }

    // ── Severity and scoring policy ───────────────────────────────────────────

    #[test]
    fn test_required_gap_is_high_severity() {
        let topic = topic(
            "medication-management",
            vec![
                request(EvidenceType::PolicyDocument, true),
                request(EvidenceType::TrainingRecord, false),
            ],
        );
        let snapshot = snapshot();
        let analysis = analyze_topic_evidence(&topic, &[]);

        let draft =
            generate_missing_evidence_finding(&topic, &analysis, &snapshot, &clock()).unwrap();

        assert_eq!(draft.severity, Severity::High);
        assert_eq!(draft.impact_score, REQUIRED_GAP_IMPACT);
        assert_eq!(draft.likelihood_score, MISSING_EVIDENCE_LIKELIHOOD);
        assert_eq!(draft.origin, Origin::SystemMock);
        assert_eq!(draft.reporting_domain, ReportingDomain::MockSimulation);
        assert_eq!(draft.identified_by, Actor::System);
        assert_eq!(draft.snapshot_id, snapshot.id());
    }

    #[test]
    fn test_three_optional_gaps_are_medium_severity() {
        let topic = topic(
            "care-planning",
            vec![
                request(EvidenceType::CarePlan, false),
                request(EvidenceType::InterviewNote, false),
                request(EvidenceType::AuditReport, false),
            ],
        );
        let analysis = analyze_topic_evidence(&topic, &[]);

        let draft =
            generate_missing_evidence_finding(&topic, &analysis, &snapshot(), &clock()).unwrap();

        assert_eq!(draft.severity, Severity::Medium);
        assert_eq!(draft.impact_score, OPTIONAL_GAP_IMPACT);
    }

    #[test]
    fn test_a_couple_of_optional_gaps_stay_low_severity() {
        let topic = topic(
            "staffing",
            vec![
                request(EvidenceType::StaffRota, false),
                request(EvidenceType::TrainingRecord, false),
            ],
        );
        let analysis = analyze_topic_evidence(&topic, &[]);

        let draft =
            generate_missing_evidence_finding(&topic, &analysis, &snapshot(), &clock()).unwrap();

        assert_eq!(draft.severity, Severity::Low);
        assert_eq!(draft.impact_score, OPTIONAL_GAP_IMPACT);
    }

    #[test]
    fn test_a_clean_topic_yields_no_draft() {
        let topic = topic("infection-control", vec![]);
        let analysis = analyze_topic_evidence(&topic, &[]);

        assert!(
            generate_missing_evidence_finding(&topic, &analysis, &snapshot(), &clock()).is_none()
        );
    }

    // ── Why-hash determinism ──────────────────────────────────────────────────

    /// The why-hash commits to the sorted missing set, so request order
    /// never leaks into it.
    #[test]
    fn test_why_hash_ignores_request_order() {
        let forward = topic(
            "safeguarding",
            vec![
                request(EvidenceType::StaffRota, false),
                request(EvidenceType::PolicyDocument, false),
            ],
        );
        let reversed = topic(
            "safeguarding",
            vec![
                request(EvidenceType::PolicyDocument, false),
                request(EvidenceType::StaffRota, false),
            ],
        );
        let snapshot = snapshot();

        let a = generate_missing_evidence_finding(
            &forward,
            &analyze_topic_evidence(&forward, &[]),
            &snapshot,
            &clock(),
        )
        .unwrap();
        let b = generate_missing_evidence_finding(
            &reversed,
            &analyze_topic_evidence(&reversed, &[]),
            &snapshot,
            &clock(),
        )
        .unwrap();

        assert_eq!(a.why_hash, b.why_hash);
        assert_ne!(a.id, b.id, "drafts stay distinct aggregates");
    }

    #[test]
    fn test_why_hash_distinguishes_missing_sets() {
        let one = topic("safeguarding", vec![request(EvidenceType::PolicyDocument, false)]);
        let other = topic("safeguarding", vec![request(EvidenceType::StaffRota, false)]);
        let snapshot = snapshot();

        let a = generate_missing_evidence_finding(
            &one,
            &analyze_topic_evidence(&one, &[]),
            &snapshot,
            &clock(),
        )
        .unwrap();
        let b = generate_missing_evidence_finding(
            &other,
            &analyze_topic_evidence(&other, &[]),
            &snapshot,
            &clock(),
        )
        .unwrap();

        assert_ne!(a.why_hash, b.why_hash);
    }

    // ── Ranking ───────────────────────────────────────────────────────────────

    #[test]
    fn test_rank_orders_by_composite_risk_descending() {
        let evaluation = evaluation(1.0, "a".repeat(64));

        let mut low = gapped_draft("b-care-planning");
        low.impact_score = 60;
        low.likelihood_score = 50; // composite 30
        let mut high = gapped_draft("z-medication");
        high.impact_score = 80;
        high.likelihood_score = 70; // composite 56

        let ranked = rank_drafts(&[low.clone(), high.clone()], &evaluation);
        assert_eq!(ranked[0].id, high.id);
        assert_eq!(ranked[1].id, low.id);
        assert_eq!(composite_score(&high, &evaluation), 56);
        assert_eq!(composite_score(&low, &evaluation), 30);
    }

    /// An aggressive multiplier saturates adjusted impact at 100 before the
    /// composite is taken.
    #[test]
    fn test_multiplier_saturates_before_composite() {
        let evaluation = evaluation(2.0, "a".repeat(64));
        let mut draft = gapped_draft("safeguarding");
        draft.impact_score = 90;
        draft.likelihood_score = 80;

        assert_eq!(composite_score(&draft, &evaluation), 80);
    }

    #[test]
    fn test_equal_risks_break_ties_by_topic_then_id() {
        let evaluation = evaluation(1.0, "a".repeat(64));

        let second_topic = gapped_draft("medication-management");
        let first_topic = gapped_draft("care-planning");
        let ranked = rank_drafts(&[second_topic.clone(), first_topic.clone()], &evaluation);
        assert_eq!(ranked[0].id, first_topic.id, "topic id ascending breaks the tie");

        // Same topic: finding id ascending decides.
        let a = gapped_draft("safeguarding");
        let b = gapped_draft("safeguarding");
        let ranked = rank_drafts(&[a.clone(), b.clone()], &evaluation);
        let mut expected = vec![a.id, b.id];
        expected.sort();
        assert_eq!(vec![ranked[0].id, ranked[1].id], expected);
    }

    // ── Finalization ──────────────────────────────────────────────────────────

    fn session_with_draft(draft: DraftFinding) -> MockInspectionSession {
        let snapshot = snapshot();
        let mut session = MockInspectionSession::start(
            TenantId::new("willow-lodge"),
            snapshot.id(),
            ProfileId::new(),
            evaluation(1.0, snapshot.snapshot_hash().to_string()),
            &clock(),
        );
        session
            .open_topic(draft.topic_id.clone(), &clock())
            .unwrap();
        session.add_draft_finding(draft, &clock()).unwrap();
        session
    }

    #[test]
    fn test_finalize_converts_drafts_through_the_guard() {
        let draft = gapped_draft("medication-management");
        let session = session_with_draft(draft.clone());

        let findings = finalize_draft_findings(&session, &clock()).unwrap();

        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.id(), draft.id);
        assert_eq!(finding.why_hash(), draft.why_hash);
        assert_eq!(finding.snapshot_hash(), session.snapshot_hash());
        assert_eq!(finding.recorded_at(), clock().0);
        assert_eq!(finding.reporting_domain(), ReportingDomain::MockSimulation);
    }

    #[test]
    fn test_finalize_of_a_draftless_session_is_empty() {
        let snapshot = snapshot();
        let session = MockInspectionSession::start(
            TenantId::new("willow-lodge"),
            snapshot.id(),
            ProfileId::new(),
            evaluation(1.0, snapshot.snapshot_hash().to_string()),
            &clock(),
        );

        assert!(finalize_draft_findings(&session, &clock())
            .unwrap()
            .is_empty());
    }

    /// Defense in depth: a draft whose domain was flipped in transit is
    /// refused by finalization's own check, before construction.
    #[test]
    fn test_finalize_refuses_a_domain_tampered_draft() {
        let mut tampered = gapped_draft("safeguarding");
        tampered.reporting_domain = ReportingDomain::RegulatoryHistory;
        let session = session_with_draft(tampered);

        match finalize_draft_findings(&session, &clock()) {
            Err(err @ CoreError::MockContamination { .. }) => {
                assert_eq!(err.kind(), ErrorKind::Invariant);
            }
            other => panic!("expected MockContamination, got {:?}", other),
        }
    }

    /// An origin flipped to a real-world value still dies at the guard's
    /// construction-time pairing check.
    #[test]
    fn test_finalize_refuses_an_origin_tampered_draft() {
        let mut tampered = gapped_draft("safeguarding");
        tampered.origin = Origin::ActualInspection;
        let session = session_with_draft(tampered);

        assert!(matches!(
            finalize_draft_findings(&session, &clock()),
            Err(CoreError::MockContamination { .. })
        ));
    }

    /// Ranking then finalizing preserves order and content end to end.
    #[test]
    fn test_ranked_drafts_finalize_in_rank_order() {
        let snapshot = snapshot();
        let evaluation = evaluation(1.5, snapshot.snapshot_hash().to_string());

        let mut session = MockInspectionSession::start(
            TenantId::new("willow-lodge"),
            snapshot.id(),
            ProfileId::new(),
            evaluation.clone(),
            &clock(),
        );

        let mut minor = gapped_draft("care-planning");
        minor.impact_score = 40;
        let major = gapped_draft("medication-management");
        for draft in rank_drafts(&[minor.clone(), major.clone()], &evaluation) {
            session.open_topic(draft.topic_id.clone(), &clock()).unwrap();
            session.add_draft_finding(draft, &clock()).unwrap();
        }

        let findings = finalize_draft_findings(&session, &clock()).unwrap();
        assert_eq!(findings[0].id(), major.id);
        assert_eq!(findings[1].id(), minor.id);
    }
}

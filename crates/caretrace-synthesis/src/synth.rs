//! Draft generation, risk ranking, and guarded finalization.

use serde::Serialize;
use tracing::{debug, info, warn};

use caretrace_contracts::canonical::content_hash;
use caretrace_contracts::catalog::{EvidenceType, SectionRef, Topic};
use caretrace_contracts::clock::Clock;
use caretrace_contracts::error::{CoreError, CoreResult};
use caretrace_contracts::evaluation::LogicEvaluation;
use caretrace_contracts::finding::{
    DraftFinding, FindingInput, InspectionFinding, Origin, ReportingDomain, Severity,
};
use caretrace_contracts::identity::{Actor, FindingId, TopicId};
use caretrace_contracts::snapshot::ContextSnapshot;
use caretrace_logic::score::composite_from_base;
use caretrace_provenance::guard;
use caretrace_session::MockInspectionSession;

use crate::gap::GapAnalysis;

// ── Scoring policy ────────────────────────────────────────────────────────────

/// Base impact when a required evidence request went unmet.
pub const REQUIRED_GAP_IMPACT: u8 = 80;

/// Base impact when only optional requests went unmet.
pub const OPTIONAL_GAP_IMPACT: u8 = 60;

/// Likelihood assigned to every missing-evidence finding: absence of
/// evidence is taken as a strong, not certain, indicator of absent
/// practice. A policy constant, tunable once field data says otherwise.
pub const MISSING_EVIDENCE_LIKELIHOOD: u8 = 70;

/// Number of optional gaps at which a topic stops being a low-severity
/// housekeeping matter.
const MEDIUM_SEVERITY_GAP_COUNT: usize = 3;

/// Hash input for a draft's why-hash. Missing types arrive sorted from
/// [`GapAnalysis::missing_types`], so the hash is independent of supply and
/// iteration order.
#[derive(Serialize)]
struct WhyHashInput<'a> {
    topic_id: &'a TopicId,
    missing_evidence: &'a [EvidenceType],
    section: &'a SectionRef,
    snapshot_hash: &'a str,
}

/// Turn a gap analysis into a draft finding, or `None` for a clean topic.
///
/// Severity policy: any required gap makes the finding `High`; three or more
/// optional gaps make it `Medium`; anything else is `Low`. Impact is
/// [`REQUIRED_GAP_IMPACT`] when a required gap exists, else
/// [`OPTIONAL_GAP_IMPACT`]; likelihood is always
/// [`MISSING_EVIDENCE_LIKELIHOOD`].
///
/// # Panics
///
/// Never in practice: the why-hash input is built from plain strings and
/// enums, which always canonicalize.
pub fn generate_missing_evidence_finding(
    topic: &Topic,
    analysis: &GapAnalysis,
    snapshot: &ContextSnapshot,
    clock: &dyn Clock,
) -> Option<DraftFinding> {
    if analysis.is_clean() {
        return None;
    }

    let missing = analysis.missing_types();
    let has_required = analysis.has_required_gaps();

    let severity = if has_required {
        Severity::High
    } else if missing.len() >= MEDIUM_SEVERITY_GAP_COUNT {
        Severity::Medium
    } else {
        Severity::Low
    };
    let impact_score = if has_required {
        REQUIRED_GAP_IMPACT
    } else {
        OPTIONAL_GAP_IMPACT
    };

    let why_hash = content_hash(&WhyHashInput {
        topic_id: &topic.id,
        missing_evidence: &missing,
        section: &topic.primary_section,
        snapshot_hash: snapshot.snapshot_hash(),
    })
    .expect("why-hash input of strings and enums always canonicalizes");

    debug!(
        topic = %topic.id,
        severity = %severity,
        missing = missing.len(),
        required = has_required,
        "missing-evidence draft generated"
    );

    Some(DraftFinding {
        id: FindingId::new(),
        topic_id: topic.id.clone(),
        section: topic.primary_section.clone(),
        severity,
        impact_score,
        likelihood_score: MISSING_EVIDENCE_LIKELIHOOD,
        missing_evidence: missing,
        why_hash,
        origin: Origin::SystemMock,
        reporting_domain: ReportingDomain::MockSimulation,
        identified_by: Actor::System,
        snapshot_id: snapshot.id(),
        drafted_at: clock.now(),
    })
}

// ── Ranking ───────────────────────────────────────────────────────────────────

/// A draft's composite risk under the evaluation's severity multiplier.
pub fn composite_score(draft: &DraftFinding, evaluation: &LogicEvaluation) -> u8 {
    composite_from_base(
        draft.impact_score,
        draft.likelihood_score,
        evaluation.severity_multiplier,
    )
}

/// Rank drafts by composite risk, highest first.
///
/// Ties break by topic id ascending, then finding id ascending, so equal
/// risks always present in the same order.
pub fn rank_drafts(drafts: &[DraftFinding], evaluation: &LogicEvaluation) -> Vec<DraftFinding> {
    let mut scored: Vec<(u8, DraftFinding)> = drafts
        .iter()
        .map(|draft| (composite_score(draft, evaluation), draft.clone()))
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .cmp(score_a)
            .then_with(|| a.topic_id.cmp(&b.topic_id))
            .then_with(|| a.id.cmp(&b.id))
    });

    scored.into_iter().map(|(_, draft)| draft).collect()
}

// ── Finalization ──────────────────────────────────────────────────────────────

/// Convert a session's buffered drafts into canonical findings via the
/// provenance guard.
///
/// Every draft's reporting domain is re-checked here, independently of the
/// constructor's own pairing check: a draft altered in transit to claim a
/// regulatory domain is refused before it ever reaches construction.
///
/// # Errors
///
/// [`CoreError::MockContamination`] if any draft claims a domain other than
/// `MockSimulation`, or if the guard refuses the constructed record.
pub fn finalize_draft_findings(
    session: &MockInspectionSession,
    clock: &dyn Clock,
) -> CoreResult<Vec<InspectionFinding>> {
    let mut findings = Vec::with_capacity(session.drafts().len());

    for draft in session.drafts() {
        if draft.reporting_domain != ReportingDomain::MockSimulation {
            warn!(
                session_id = %session.id(),
                finding_id = %draft.id,
                claimed_domain = %draft.reporting_domain,
                "draft claims a non-simulation domain, refusing finalization"
            );
            return Err(CoreError::MockContamination {
                origin: draft.origin.to_string(),
                reporting_domain: draft.reporting_domain.to_string(),
            });
        }

        let input = FindingInput {
            id: draft.id,
            topic_id: draft.topic_id.clone(),
            section: draft.section.clone(),
            severity: draft.severity,
            impact_score: draft.impact_score,
            likelihood_score: draft.likelihood_score,
            why_hash: draft.why_hash.clone(),
            origin: draft.origin,
            reporting_domain: draft.reporting_domain,
            identified_by: draft.identified_by.clone(),
            snapshot_id: draft.snapshot_id,
            snapshot_hash: session.snapshot_hash().to_string(),
            recorded_at: clock.now(),
        };
        findings.push(guard::create_finding(input)?);
    }

    info!(
        session_id = %session.id(),
        finding_count = findings.len(),
        "draft findings finalized"
    );
    Ok(findings)
}

//! Scenario 1: Full Mock Inspection
//!
//! The end-to-end Caretrace pipeline against the fictional provider
//! "Willow Lodge", currently rated requires-improvement:
//!
//!   1. Capture a frozen context snapshot of the provider
//!   2. Load the reference logic profile and evaluate it against the snapshot
//!   3. Start a mock inspection session bounded by the evaluation
//!   4. Open every catalog topic, ask questions, record answers
//!   5. Analyze the evidence on file and draft findings for the gaps
//!   6. Rank the drafts by composite risk and finalize them through the
//!      provenance guard
//!   7. Verify the audit chain and replay the session event log
//!
//! Every mutating step is appended to the tenant's hash chain, so the
//! closing verification covers the whole run.

use std::sync::Arc;

use serde_json::json;

use caretrace_contracts::clock::{Clock, SystemClock};
use caretrace_contracts::error::CoreResult;
use caretrace_contracts::identity::{Actor, TenantId, TopicId};
use caretrace_contracts::snapshot::LifecycleState;
use caretrace_ledger::{
    AuditAction, AuditEventInput, AuditLedger, InMemoryLedger, ResourceKind, ResourceRef,
};
use caretrace_logic::{evaluate, LogicProfile};
use caretrace_provenance::guard;
use caretrace_session::{replay_session, MockInspectionSession};
use caretrace_synthesis::{
    analyze_topic_evidence, composite_score, finalize_draft_findings,
    generate_missing_evidence_finding, rank_drafts,
};

use crate::mock_data::{care_topics, evidence_on_file, provider_snapshot};

// ── Logic profile TOML ────────────────────────────────────────────────────────

/// Embedded reference profile covering all demo scenarios.
const DEFAULT_PROFILE: &str = include_str!("../../profiles/default.toml");

// ── Audit helper ──────────────────────────────────────────────────────────────

/// Append one system-actor event to the tenant's chain.
fn audit(
    ledger: &InMemoryLedger,
    tenant: &TenantId,
    action: AuditAction,
    resource: ResourceRef,
    payload: serde_json::Value,
) -> CoreResult<()> {
    ledger.append(AuditEventInput::new(
        tenant.clone(),
        Actor::System,
        action,
        resource,
        &payload,
    )?)?;
    Ok(())
}

// ── Scenario runner ───────────────────────────────────────────────────────────

/// Run Scenario 1: Full Mock Inspection.
pub fn run_scenario() -> CoreResult<()> {
    println!("=== Scenario 1: Full Mock Inspection ===");
    println!();

    let clock = SystemClock;
    let ledger = InMemoryLedger::new(Arc::new(SystemClock));
    let tenant = TenantId::new("willow-lodge");

    // ── 1. Capture the provider context ───────────────────────────────────────

    let snapshot =
        provider_snapshot("willow-lodge", LifecycleState::RequiresImprovement, &clock)?;
    audit(
        &ledger,
        &tenant,
        AuditAction::SnapshotCaptured,
        ResourceRef::new(ResourceKind::Snapshot, snapshot.id().to_string()),
        json!({ "snapshot_hash": snapshot.snapshot_hash() }),
    )?;

    println!("  Provider:               Willow Lodge (32-bed residential care)");
    println!("  Lifecycle state:        {}", snapshot.lifecycle_state());
    println!("  Snapshot hash:          {}…", &snapshot.snapshot_hash()[..16]);
    println!();

    // ── 2. Evaluate the logic profile ─────────────────────────────────────────

    let profile = LogicProfile::from_toml_str(DEFAULT_PROFILE)?;
    let evaluation = evaluate(&snapshot, &profile);

    println!("  Profile:                {} v{}", profile.name(), profile.version());
    println!("  Interaction mode:       {}", evaluation.interaction_mode);
    println!("  Severity multiplier:    x{}", evaluation.severity_multiplier);
    println!(
        "  Session bounds:         {} follow-ups per topic, {} questions total",
        evaluation.max_follow_ups_per_topic, evaluation.max_total_questions
    );
    println!();

    // ── 3. Start the session ──────────────────────────────────────────────────

    let mut session = MockInspectionSession::start(
        tenant.clone(),
        snapshot.id(),
        profile.id(),
        evaluation.clone(),
        &clock,
    );
    audit(
        &ledger,
        &tenant,
        AuditAction::SessionStarted,
        ResourceRef::new(ResourceKind::Session, session.id().to_string()),
        json!({ "evaluation_hash": evaluation.evaluation_hash }),
    )?;

    // ── 4. Walk the topics ────────────────────────────────────────────────────

    let topics = care_topics();
    for topic in &topics {
        session.open_topic(topic.id.clone(), &clock)?;
        audit(
            &ledger,
            &tenant,
            AuditAction::TopicOpened,
            ResourceRef::new(ResourceKind::Topic, topic.id.to_string()),
            json!({ "title": topic.title }),
        )?;
    }

    ask(
        &mut session, &ledger, &tenant, &clock,
        "safeguarding",
        "Your matrix shows two staff completed safeguarding refreshers in May. Who holds the level-3 lead role?",
        "The deputy manager holds level 3; referrals go through her within 24 hours.",
    )?;
    ask(
        &mut session, &ledger, &tenant, &clock,
        "medication-management",
        "The evidence pack holds one MAR chart, for Unit A only. Where are the Unit B charts?",
        "Unit B charts were archived last month; we can retrieve them from the portal.",
    )?;
    session.ask_follow_up(
        TopicId::new("medication-management"),
        "Who signed off the Unit B archive, and on what date?",
        &clock,
    )?;
    audit(
        &ledger,
        &tenant,
        AuditAction::QuestionAsked,
        ResourceRef::new(ResourceKind::Topic, "medication-management"),
        json!({ "kind": "follow-up" }),
    )?;
    ask(
        &mut session, &ledger, &tenant, &clock,
        "care-planning",
        "Only two of the three sampled care plans are on file. When was room 7's plan last reviewed?",
        "Room 7's plan is with the family for signature; the review was in April.",
    )?;

    println!(
        "  Topics opened:          {} ({} questions asked, within budget {})",
        session.topics().len(),
        session.questions_asked_total(),
        evaluation.max_total_questions
    );
    println!();

    // ── 5. Gap analysis and drafting ──────────────────────────────────────────

    let mut drafts = Vec::new();
    for topic in &topics {
        let evidence = evidence_on_file(&topic.id);
        let analysis = analyze_topic_evidence(topic, &evidence);
        if analysis.is_clean() {
            println!("  {}: evidence complete", topic.id);
            continue;
        }
        println!(
            "  {}: {} gap(s){}",
            topic.id,
            analysis.gaps().len(),
            if analysis.has_required_gaps() {
                ", required evidence missing"
            } else {
                ""
            }
        );
        if let Some(draft) = generate_missing_evidence_finding(topic, &analysis, &snapshot, &clock)
        {
            drafts.push(draft);
        }
    }
    println!();

    // Buffer in rank order so finalization emits highest risk first.
    let ranked = rank_drafts(&drafts, &evaluation);
    println!("  Draft findings by composite risk:");
    for draft in &ranked {
        println!(
            "    [{}] {}: composite {}",
            draft.severity.as_str(),
            draft.topic_id,
            composite_score(draft, &evaluation)
        );
        session.add_draft_finding(draft.clone(), &clock)?;
        audit(
            &ledger,
            &tenant,
            AuditAction::FindingDrafted,
            ResourceRef::new(ResourceKind::Finding, draft.id.to_string()),
            json!({ "why_hash": draft.why_hash }),
        )?;
    }
    println!();

    // ── 6. Complete and finalize ──────────────────────────────────────────────

    session.complete(&clock)?;
    audit(
        &ledger,
        &tenant,
        AuditAction::SessionCompleted,
        ResourceRef::new(ResourceKind::Session, session.id().to_string()),
        json!({ "drafts": session.drafts().len() }),
    )?;

    let findings = finalize_draft_findings(&session, &clock)?;
    for finding in &findings {
        audit(
            &ledger,
            &tenant,
            AuditAction::FindingFinalized,
            ResourceRef::new(ResourceKind::Finding, finding.id().to_string()),
            json!({ "provenance_hash": finding.provenance_hash() }),
        )?;
    }

    let all_verified = findings.iter().all(guard::verify_integrity);
    println!(
        "  Findings finalized:     {} ({} domain, integrity {})",
        findings.len(),
        findings
            .first()
            .map(|f| f.reporting_domain().as_str())
            .unwrap_or("-"),
        if all_verified { "VERIFIED" } else { "FAILED" }
    );

    // ── 7. Audit chain and replay ─────────────────────────────────────────────

    let report = ledger.verify_tenant(&tenant);
    report.ok()?;
    let trail = ledger.export_trail(&tenant);
    println!(
        "  Audit chain:            VALID ({} events, terminal {}…)",
        report.events_checked,
        trail
            .terminal_hash
            .as_deref()
            .map(|h| &h[..16])
            .unwrap_or("-"),
    );

    let replayed = replay_session(session.events())?;
    println!(
        "  Replay check:           {}",
        if replayed == session {
            "event log reproduces the live session"
        } else {
            "DIVERGED"
        }
    );

    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}

/// Ask one question and record the provider's answer, auditing both.
fn ask(
    session: &mut MockInspectionSession,
    ledger: &InMemoryLedger,
    tenant: &TenantId,
    clock: &dyn Clock,
    topic: &str,
    question: &str,
    answer: &str,
) -> CoreResult<()> {
    let topic_id = TopicId::new(topic);
    session.ask_question(topic_id.clone(), question, clock)?;
    audit(
        ledger,
        tenant,
        AuditAction::QuestionAsked,
        ResourceRef::new(ResourceKind::Topic, topic),
        json!({ "question": question }),
    )?;
    session.record_answer(topic_id, answer, clock)?;
    audit(
        ledger,
        tenant,
        AuditAction::AnswerRecorded,
        ResourceRef::new(ResourceKind::Topic, topic),
        json!({ "answer": answer }),
    )?;
    Ok(())
}

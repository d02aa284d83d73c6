//! Simulated care-provider data for the Caretrace reference runtime.
//!
//! All data in this module is hardcoded and fictional. No external systems
//! are contacted. It stands in for the regulation catalog, the evidence
//! store, and the provider registry of a production deployment.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};

use caretrace_contracts::catalog::{
    EvidenceRecord, EvidenceRequest, EvidenceType, RegulationScope, SectionPath, SectionRef,
    Topic,
};
use caretrace_contracts::clock::Clock;
use caretrace_contracts::error::CoreResult;
use caretrace_contracts::identity::{RegulationId, TenantId, TopicId};
use caretrace_contracts::snapshot::{ContextSnapshot, LifecycleState};

// ── Topic catalog (mock) ──────────────────────────────────────────────────────

fn request(evidence_type: EvidenceType, required: bool, min_count: u32) -> EvidenceRequest {
    EvidenceRequest {
        evidence_type,
        required,
        min_count,
    }
}

fn topic(
    id: &str,
    title: &str,
    regulation: &str,
    path: &str,
    requests: Vec<EvidenceRequest>,
) -> Topic {
    let regulation_id = RegulationId::new(regulation);
    Topic {
        id: TopicId::new(id),
        title: title.to_string(),
        primary_section: SectionRef::new(regulation_id.clone(), SectionPath::new(path)),
        scope: RegulationScope {
            regulation_ids: vec![regulation_id],
            include: Vec::new(),
            exclude: Vec::new(),
        },
        evidence_requests: requests,
    }
}

/// The five inspectable topics of the demo catalog.
///
/// Each topic names its primary regulation section and the typed evidence it
/// hunts for. Required requests that go unmet become required gaps.
pub fn care_topics() -> Vec<Topic> {
    vec![
        topic(
            "safeguarding",
            "Safeguarding adults from abuse",
            "reg-13",
            "13.2",
            vec![
                request(EvidenceType::PolicyDocument, true, 1),
                request(EvidenceType::TrainingRecord, true, 2),
                request(EvidenceType::IncidentLog, false, 1),
            ],
        ),
        topic(
            "medication-management",
            "Safe management of medicines",
            "reg-12",
            "12.2",
            vec![
                request(EvidenceType::MedicationChart, true, 2),
                request(EvidenceType::TrainingRecord, true, 1),
                request(EvidenceType::AuditReport, false, 1),
            ],
        ),
        topic(
            "staffing",
            "Sufficient and suitably qualified staff",
            "reg-18",
            "18.1",
            vec![
                request(EvidenceType::StaffRota, true, 1),
                request(EvidenceType::TrainingRecord, false, 2),
            ],
        ),
        topic(
            "infection-control",
            "Preventing and controlling infection",
            "reg-15",
            "15.2",
            vec![
                request(EvidenceType::PolicyDocument, true, 1),
                request(EvidenceType::AuditReport, false, 1),
                request(EvidenceType::Certificate, false, 1),
                request(EvidenceType::TrainingRecord, false, 1),
            ],
        ),
        topic(
            "care-planning",
            "Person-centred care planning",
            "reg-9",
            "9.1",
            vec![request(EvidenceType::CarePlan, true, 3)],
        ),
    ]
}

// ── Evidence store (mock) ─────────────────────────────────────────────────────

fn record(evidence_type: EvidenceType, day: u32, identity: &str) -> EvidenceRecord {
    EvidenceRecord {
        evidence_type,
        collected_at: Utc.with_ymd_and_hms(2024, 5, day, 10, 0, 0).unwrap(),
        identity: identity.to_string(),
    }
}

/// What Willow Lodge has on file for one topic.
///
/// The fixtures are deliberately uneven so the gap analysis has something to
/// find:
/// - `safeguarding` is fully evidenced;
/// - `medication-management` is short one chart and has no training record
///   (required gaps);
/// - `staffing` is one training record short (optional gap);
/// - `infection-control` has only its policy (three optional gaps);
/// - `care-planning` is one care plan short of the required three.
pub fn evidence_on_file(topic_id: &TopicId) -> Vec<EvidenceRecord> {
    match topic_id.0.as_str() {
        "safeguarding" => vec![
            record(EvidenceType::PolicyDocument, 2, "POL-SG-2024"),
            record(EvidenceType::TrainingRecord, 3, "TRN-1041"),
            record(EvidenceType::TrainingRecord, 3, "TRN-1042"),
            record(EvidenceType::IncidentLog, 7, "INC-APRIL"),
        ],
        "medication-management" => vec![
            record(EvidenceType::MedicationChart, 10, "MAR-UNIT-A"),
            record(EvidenceType::AuditReport, 12, "AUD-MEDS-Q1"),
        ],
        "staffing" => vec![
            record(EvidenceType::StaffRota, 6, "ROTA-MAY"),
            record(EvidenceType::TrainingRecord, 8, "TRN-0907"),
        ],
        "infection-control" => vec![record(EvidenceType::PolicyDocument, 4, "POL-IPC-2023")],
        "care-planning" => vec![
            record(EvidenceType::CarePlan, 15, "CP-ROOM-04"),
            record(EvidenceType::CarePlan, 16, "CP-ROOM-11"),
        ],
        _ => Vec::new(),
    }
}

// ── Provider registry (mock) ──────────────────────────────────────────────────

/// Capture a frozen context snapshot for a fictional provider.
///
/// Attributes mimic what the hosting platform would supply from its
/// registration records.
pub fn provider_snapshot(
    tenant: &str,
    lifecycle_state: LifecycleState,
    clock: &dyn Clock,
) -> CoreResult<ContextSnapshot> {
    let mut attributes = BTreeMap::new();
    attributes.insert("service-type".to_string(), "residential-care".to_string());
    attributes.insert("registered-beds".to_string(), "32".to_string());
    attributes.insert(
        "registered-manager".to_string(),
        "in-post-since-2021".to_string(),
    );
    attributes.insert("last-inspection".to_string(), "2023-11-08".to_string());

    ContextSnapshot::capture(
        TenantId::new(tenant),
        lifecycle_state,
        vec![
            RegulationId::new("reg-9"),
            RegulationId::new("reg-12"),
            RegulationId::new("reg-13"),
            RegulationId::new("reg-15"),
            RegulationId::new("reg-18"),
        ],
        attributes,
        clock,
    )
}

//! Topic catalog and evidence shapes.
//!
//! The core treats the regulation/topic catalog as read-only, pre-validated
//! input from a collaborator: each topic names the regulation sections it
//! covers and the typed evidence it hunts for. Evidence records arrive
//! already validated (ownership and malware checks happen upstream).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{RegulationId, TopicId};

/// Closed set of evidence kinds a topic can request.
///
/// `Ord` matters here: missing-evidence lists are sorted before hashing so
/// that supply order never leaks into a why-hash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceType {
    PolicyDocument,
    TrainingRecord,
    AuditReport,
    CarePlan,
    IncidentLog,
    StaffRota,
    MedicationChart,
    Certificate,
    InterviewNote,
}

impl EvidenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceType::PolicyDocument => "policy-document",
            EvidenceType::TrainingRecord => "training-record",
            EvidenceType::AuditReport => "audit-report",
            EvidenceType::CarePlan => "care-plan",
            EvidenceType::IncidentLog => "incident-log",
            EvidenceType::StaffRota => "staff-rota",
            EvidenceType::MedicationChart => "medication-chart",
            EvidenceType::Certificate => "certificate",
            EvidenceType::InterviewNote => "interview-note",
        }
    }
}

impl std::fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supplied piece of evidence, already validated upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub evidence_type: EvidenceType,
    pub collected_at: DateTime<Utc>,
    /// Opaque reference to the stored item (blob id, document number).
    pub identity: String,
}

/// Dot-separated section path within a regulation, e.g. `"12.2.a"`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SectionPath(String);

impl SectionPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Segment-aware prefix test: `"12.2"` prefixes `"12.2.1"` but not
    /// `"12.21"`.
    pub fn starts_with(&self, prefix: &SectionPath) -> bool {
        let mut own = self.segments();
        prefix.segments().all(|p| own.next() == Some(p))
    }
}

impl std::fmt::Display for SectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fully qualified pointer into regulation text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionRef {
    pub regulation_id: RegulationId,
    pub path: SectionPath,
}

impl SectionRef {
    pub fn new(regulation_id: RegulationId, path: SectionPath) -> Self {
        Self {
            regulation_id,
            path,
        }
    }
}

impl std::fmt::Display for SectionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} §{}", self.regulation_id, self.path)
    }
}

/// Which regulation sections a topic covers.
///
/// An empty `include` list means the whole regulation, minus exclusions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RegulationScope {
    pub regulation_ids: Vec<RegulationId>,
    pub include: Vec<SectionPath>,
    pub exclude: Vec<SectionPath>,
}

impl RegulationScope {
    pub fn covers(&self, section: &SectionRef) -> bool {
        if !self.regulation_ids.contains(&section.regulation_id) {
            return false;
        }
        if self.exclude.iter().any(|p| section.path.starts_with(p)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| section.path.starts_with(p))
    }
}

/// One typed evidence demand within a topic's hunt profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRequest {
    pub evidence_type: EvidenceType,
    /// A required request that goes unmet makes the resulting gap required.
    pub required: bool,
    pub min_count: u32,
}

/// An inspectable topic: its primary section, scope, and evidence hunt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub title: String,
    pub primary_section: SectionRef,
    pub scope: RegulationScope,
    /// Ordered evidence requests; order is presentation only and never
    /// affects hashing.
    pub evidence_requests: Vec<EvidenceRequest>,
}

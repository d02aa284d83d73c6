//! Finding records and their provenance tags.
//!
//! Origin and reporting domain are closed sum types with a fixed legal
//! pairing: simulated output ([`Origin::SystemMock`]) may only ever report
//! into [`ReportingDomain::MockSimulation`], and real-world origins may only
//! report into [`ReportingDomain::RegulatoryHistory`]. The pairing is
//! enforced by [`InspectionFinding`]'s sole constructor, so a contaminated
//! record cannot be built anywhere in the process, not merely filtered later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::canonical::content_hash;
use crate::catalog::{EvidenceType, SectionRef};
use crate::error::{CoreError, CoreResult};
use crate::identity::{Actor, FindingId, SnapshotId, TopicId};

/// Where a finding came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    /// Produced by the simulated-inspection engine.
    SystemMock,
    /// Raised during a real regulator inspection.
    ActualInspection,
    /// Reported by the provider itself.
    SelfIdentified,
}

impl Origin {
    /// The only reporting domain this origin may legally pair with.
    pub fn implied_domain(&self) -> ReportingDomain {
        match self {
            Origin::SystemMock => ReportingDomain::MockSimulation,
            Origin::ActualInspection | Origin::SelfIdentified => {
                ReportingDomain::RegulatoryHistory
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::SystemMock => "system-mock",
            Origin::ActualInspection => "actual-inspection",
            Origin::SelfIdentified => "self-identified",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which record book a finding reports into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportingDomain {
    /// Practice output. Never part of the official record.
    MockSimulation,
    /// The official regulatory record.
    RegulatoryHistory,
}

impl ReportingDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportingDomain::MockSimulation => "mock-simulation",
            ReportingDomain::RegulatoryHistory => "regulatory-history",
        }
    }
}

impl std::fmt::Display for ReportingDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finding severity. Ordered so `High` compares greatest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An origin-tagged candidate finding living inside its owning session.
///
/// `missing_evidence` is kept sorted by the synthesizer so `why_hash` is
/// independent of evidence iteration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftFinding {
    pub id: FindingId,
    pub topic_id: TopicId,
    pub section: SectionRef,
    pub severity: Severity,
    pub impact_score: u8,
    pub likelihood_score: u8,
    pub missing_evidence: Vec<EvidenceType>,
    /// Fingerprint of the inputs that caused this draft to exist.
    pub why_hash: String,
    pub origin: Origin,
    pub reporting_domain: ReportingDomain,
    pub identified_by: Actor,
    pub snapshot_id: SnapshotId,
    pub drafted_at: DateTime<Utc>,
}

/// The full semantic content of a finding, as handed to the Provenance
/// Guard. This struct is also the provenance-hash input, canonicalized
/// whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingInput {
    pub id: FindingId,
    pub topic_id: TopicId,
    pub section: SectionRef,
    pub severity: Severity,
    pub impact_score: u8,
    pub likelihood_score: u8,
    pub why_hash: String,
    pub origin: Origin,
    pub reporting_domain: ReportingDomain,
    pub identified_by: Actor,
    pub snapshot_id: SnapshotId,
    pub snapshot_hash: String,
    pub recorded_at: DateTime<Utc>,
}

/// The canonical, immutable finding record.
///
/// Fields are private and there is exactly one way to obtain an instance:
/// [`InspectionFinding::from_input`], which rejects any origin/domain pair
/// outside the legal table and any record without a usable frozen-context
/// reference. Everything downstream can therefore rely on provenance being
/// consistent by construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionFinding {
    id: FindingId,
    topic_id: TopicId,
    section: SectionRef,
    severity: Severity,
    impact_score: u8,
    likelihood_score: u8,
    why_hash: String,
    origin: Origin,
    reporting_domain: ReportingDomain,
    identified_by: Actor,
    snapshot_id: SnapshotId,
    snapshot_hash: String,
    recorded_at: DateTime<Utc>,
    provenance_hash: String,
}

fn is_hex64(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

impl InspectionFinding {
    /// Construct the canonical record, enforcing the provenance invariant.
    ///
    /// Fails with `MockContamination` if the origin/domain pairing is
    /// illegal, and with `MissingSnapshotLink` if the snapshot hash is not a
    /// usable digest. The provenance hash is computed here, over the whole
    /// canonicalized input.
    pub fn from_input(input: FindingInput) -> CoreResult<Self> {
        if input.reporting_domain != input.origin.implied_domain() {
            return Err(CoreError::MockContamination {
                origin: input.origin.to_string(),
                reporting_domain: input.reporting_domain.to_string(),
            });
        }
        if !is_hex64(&input.snapshot_hash) {
            return Err(CoreError::MissingSnapshotLink {
                reason: format!(
                    "snapshot hash '{}' is not a 64-char hex digest",
                    input.snapshot_hash
                ),
            });
        }

        let provenance_hash = content_hash(&input)?;
        Ok(Self {
            id: input.id,
            topic_id: input.topic_id,
            section: input.section,
            severity: input.severity,
            impact_score: input.impact_score,
            likelihood_score: input.likelihood_score,
            why_hash: input.why_hash,
            origin: input.origin,
            reporting_domain: input.reporting_domain,
            identified_by: input.identified_by,
            snapshot_id: input.snapshot_id,
            snapshot_hash: input.snapshot_hash,
            recorded_at: input.recorded_at,
            provenance_hash,
        })
    }

    /// Rehydrate a stored record, keeping its claimed provenance hash as-is.
    ///
    /// This is the door for records coming back across a trust boundary
    /// (storage, transfer): the pairing and snapshot-link invariants are
    /// still enforced, but the hash is **not** recomputed — run integrity
    /// verification before trusting a rehydrated record.
    pub fn rehydrate(input: FindingInput, claimed_provenance_hash: String) -> CoreResult<Self> {
        let mut finding = Self::from_input(input)?;
        finding.provenance_hash = claimed_provenance_hash;
        Ok(finding)
    }

    /// Rebuild the semantic content this record was constructed from.
    ///
    /// Used for integrity verification (recompute and compare) and for
    /// legitimate reclassification workflows.
    pub fn as_input(&self) -> FindingInput {
        FindingInput {
            id: self.id,
            topic_id: self.topic_id.clone(),
            section: self.section.clone(),
            severity: self.severity,
            impact_score: self.impact_score,
            likelihood_score: self.likelihood_score,
            why_hash: self.why_hash.clone(),
            origin: self.origin,
            reporting_domain: self.reporting_domain,
            identified_by: self.identified_by.clone(),
            snapshot_id: self.snapshot_id,
            snapshot_hash: self.snapshot_hash.clone(),
            recorded_at: self.recorded_at,
        }
    }

    pub fn id(&self) -> FindingId {
        self.id
    }

    pub fn topic_id(&self) -> &TopicId {
        &self.topic_id
    }

    pub fn section(&self) -> &SectionRef {
        &self.section
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn impact_score(&self) -> u8 {
        self.impact_score
    }

    pub fn likelihood_score(&self) -> u8 {
        self.likelihood_score
    }

    pub fn why_hash(&self) -> &str {
        &self.why_hash
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn reporting_domain(&self) -> ReportingDomain {
        self.reporting_domain
    }

    pub fn identified_by(&self) -> &Actor {
        &self.identified_by
    }

    pub fn snapshot_id(&self) -> SnapshotId {
        self.snapshot_id
    }

    pub fn snapshot_hash(&self) -> &str {
        &self.snapshot_hash
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn provenance_hash(&self) -> &str {
        &self.provenance_hash
    }
}

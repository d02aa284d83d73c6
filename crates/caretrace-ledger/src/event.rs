//! Audit event and trail types.
//!
//! `AuditEvent` is a single entry in a tenant's hash chain. It records who
//! did what to which resource, a hash of the action's payload, and the
//! SHA-256 links that make tampering detectable. `AuditTrail` is the sealed
//! copy produced when a tenant's chain is exported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use caretrace_contracts::error::{CoreError, CoreResult};
use caretrace_contracts::identity::{Actor, TenantId};

/// Closed set of mutating actions the core records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditAction {
    SnapshotCaptured,
    SessionStarted,
    TopicOpened,
    QuestionAsked,
    AnswerRecorded,
    FindingDrafted,
    SessionCompleted,
    SessionAbandoned,
    FindingFinalized,
    FindingPromoted,
    MigrationApplied,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::SnapshotCaptured => "snapshot-captured",
            AuditAction::SessionStarted => "session-started",
            AuditAction::TopicOpened => "topic-opened",
            AuditAction::QuestionAsked => "question-asked",
            AuditAction::AnswerRecorded => "answer-recorded",
            AuditAction::FindingDrafted => "finding-drafted",
            AuditAction::SessionCompleted => "session-completed",
            AuditAction::SessionAbandoned => "session-abandoned",
            AuditAction::FindingFinalized => "finding-finalized",
            AuditAction::FindingPromoted => "finding-promoted",
            AuditAction::MigrationApplied => "migration-applied",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of resource an event acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Snapshot,
    Session,
    Topic,
    Finding,
    Profile,
    RegulationLink,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Snapshot => "snapshot",
            ResourceKind::Session => "session",
            ResourceKind::Topic => "topic",
            ResourceKind::Finding => "finding",
            ResourceKind::Profile => "profile",
            ResourceKind::RegulationLink => "regulation-link",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resource an audit event refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: String,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// The caller-supplied portion of an audit event.
///
/// The payload is captured as a JSON value built from a closed, serializable
/// struct at the call site. Conversion happens here, in the sole
/// constructor, so a payload the ledger cannot canonicalize is rejected
/// before it ever reaches the chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEventInput {
    pub tenant_id: TenantId,
    pub actor: Actor,
    pub action: AuditAction,
    pub resource: ResourceRef,
    pub payload: Value,
}

impl AuditEventInput {
    pub fn new(
        tenant_id: TenantId,
        actor: Actor,
        action: AuditAction,
        resource: ResourceRef,
        payload: &impl Serialize,
    ) -> CoreResult<Self> {
        let payload = serde_json::to_value(payload).map_err(|e| CoreError::Canonicalization {
            reason: format!("audit payload is not JSON-representable: {}", e),
        })?;
        Ok(Self {
            tenant_id,
            actor,
            action,
            resource,
            payload,
        })
    }
}

/// A single entry in a tenant's SHA-256 hash chain.
///
/// Each event commits to the previous event via `prev_hash`; the first event
/// of a chain has `prev_hash = None`. Modifying any stored field invalidates
/// `event_hash` or the linkage of the following event, which
/// `chain::verify_events` detects. Events are never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Wall-clock time (UTC) the event was appended.
    pub timestamp: DateTime<Utc>,

    /// The tenant whose chain this event belongs to.
    pub tenant_id: TenantId,

    /// Who performed the action.
    pub actor: Actor,

    /// What was done.
    pub action: AuditAction,

    /// What it was done to.
    pub resource: ResourceRef,

    /// SHA-256 (hex) of the canonicalized action payload. The payload itself
    /// is not stored in the chain.
    pub payload_hash: String,

    /// `event_hash` of the previous event, or `None` for the first event of
    /// a tenant's chain.
    pub prev_hash: Option<String>,

    /// SHA-256 (hex) over this event's own fields, computed by
    /// `chain::compute_event_hash`.
    pub event_hash: String,
}

/// A sealed, exported copy of one tenant's chain.
///
/// The `terminal_hash` is the `event_hash` of the last event and serves as a
/// compact commitment to the entire trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditTrail {
    pub tenant_id: TenantId,

    /// All events in chain order (oldest first).
    pub events: Vec<AuditEvent>,

    /// Wall-clock time (UTC) the trail was exported.
    pub exported_at: DateTime<Utc>,

    /// The `event_hash` of the last event; `None` for an empty trail.
    pub terminal_hash: Option<String>,
}

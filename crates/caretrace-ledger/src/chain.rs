//! Hash-chain primitives: event hashing and chain integrity verification.
//!
//! Every field that contributes to an event's hash is listed explicitly in a
//! closed struct so nothing is accidentally omitted and no ambient iteration
//! order leaks in. The struct is canonicalized (sorted keys, RFC 8785)
//! before SHA-256.
//!
//! Event hash input fields:
//!   timestamp, tenant_id, actor, action, resource_kind, resource_id,
//!   payload_hash, prev_hash (null for the first event of a chain)

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use caretrace_contracts::canonical::content_hash;
use caretrace_contracts::error::{CoreError, CoreResult};
use caretrace_contracts::identity::{Actor, TenantId};

use crate::event::{AuditAction, AuditEvent, ResourceRef};

/// The closed hash-input structure for one audit event.
#[derive(Serialize)]
struct EventHashInput<'a> {
    timestamp: &'a DateTime<Utc>,
    tenant_id: &'a TenantId,
    actor: &'a Actor,
    action: AuditAction,
    resource_kind: crate::event::ResourceKind,
    resource_id: &'a str,
    payload_hash: &'a str,
    prev_hash: Option<&'a str>,
}

/// Hash a canonicalized audit payload.
///
/// Returns a lowercase 64-character hex string, independent of the property
/// order the payload was built with.
///
/// # Panics
///
/// Panics if the payload cannot be canonicalized — which cannot happen for a
/// `serde_json::Value`, since its numbers are always finite and its keys are
/// always strings.
pub fn hash_payload(payload: &Value) -> String {
    content_hash(payload).expect("JSON payload must always canonicalize")
}

/// Compute the SHA-256 hash for a single audit event.
///
/// The hash commits to every stored field of the event: its timestamp, the
/// tenant chain it belongs to, the acting party, the action and resource,
/// the payload hash, and the link to the previous event.
///
/// Returns a lowercase 64-character hex string.
///
/// # Panics
///
/// Panics if the hash input cannot be canonicalized — which cannot happen
/// for these closed, float-free field types.
#[allow(clippy::too_many_arguments)]
pub fn compute_event_hash(
    timestamp: &DateTime<Utc>,
    tenant_id: &TenantId,
    actor: &Actor,
    action: AuditAction,
    resource: &ResourceRef,
    payload_hash: &str,
    prev_hash: Option<&str>,
) -> String {
    content_hash(&EventHashInput {
        timestamp,
        tenant_id,
        actor,
        action,
        resource_kind: resource.kind,
        resource_id: &resource.id,
        payload_hash,
        prev_hash,
    })
    .expect("event hash input must always canonicalize")
}

/// Recompute an event's hash from its stored fields, ignoring the stored
/// `event_hash`.
pub fn recompute_event_hash(event: &AuditEvent) -> String {
    compute_event_hash(
        &event.timestamp,
        &event.tenant_id,
        &event.actor,
        event.action,
        &event.resource,
        &event.payload_hash,
        event.prev_hash.as_deref(),
    )
}

/// How a stored chain diverged from its recomputed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DivergenceKind {
    /// The stored `event_hash` does not match the recomputed value: some
    /// stored field of the event (payload hash or metadata) was mutated.
    EventHash,
    /// The stored `prev_hash` does not match the preceding event's hash:
    /// the chain was reordered, or an event was inserted or removed.
    PreviousHash,
}

impl DivergenceKind {
    /// The human-readable mismatch message for forensic reports.
    pub fn message(&self) -> &'static str {
        match self {
            DivergenceKind::EventHash => "eventHash mismatch",
            DivergenceKind::PreviousHash => "previousEventHash mismatch",
        }
    }
}

/// The first point at which a chain fails verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Divergence {
    /// Index of the first event at which the stored and recomputed chains
    /// disagree.
    pub index: usize,
    pub kind: DivergenceKind,
    /// Human-readable mismatch description, including the expected and
    /// found values.
    pub detail: String,
}

/// Result of verifying one chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainReport {
    pub valid: bool,
    /// `None` when the chain is intact. Verification stops at the first
    /// divergence; later corruption is reported only once earlier links are
    /// repaired, which this ledger never does itself.
    pub first_divergence: Option<Divergence>,
    pub events_checked: usize,
}

impl ChainReport {
    fn intact(events_checked: usize) -> Self {
        Self {
            valid: true,
            first_divergence: None,
            events_checked,
        }
    }

    fn broken(divergence: Divergence, events_checked: usize) -> Self {
        Self {
            valid: false,
            first_divergence: Some(divergence),
            events_checked,
        }
    }

    /// Convert the report into a result, for callers that treat a broken
    /// chain as a hard failure.
    pub fn ok(&self) -> CoreResult<()> {
        match &self.first_divergence {
            None => Ok(()),
            Some(d) => Err(CoreError::ChainIntegrity {
                index: d.index,
                detail: d.detail.clone(),
            }),
        }
    }
}

/// Verify the integrity of one tenant's chain.
///
/// Two rules, checked per event in order:
///
/// 1. **Prev-hash linkage** — the stored `prev_hash` equals the `event_hash`
///    of the preceding event (`None` for event 0). A violation is a
///    `PreviousHash` divergence: reordering, insertion, or removal.
/// 2. **Hash correctness** — the stored `event_hash` equals the value
///    recomputed from the event's own fields. A violation is an `EventHash`
///    divergence: mutation of stored data.
///
/// Reports the first divergence and stops. An empty chain is valid.
pub fn verify_events(events: &[AuditEvent]) -> ChainReport {
    let mut expected_prev: Option<String> = None;

    for (index, event) in events.iter().enumerate() {
        if event.prev_hash != expected_prev {
            let detail = format!(
                "{}: expected {:?}, found {:?}",
                DivergenceKind::PreviousHash.message(),
                expected_prev,
                event.prev_hash
            );
            return ChainReport::broken(
                Divergence {
                    index,
                    kind: DivergenceKind::PreviousHash,
                    detail,
                },
                index,
            );
        }

        let recomputed = recompute_event_hash(event);
        if event.event_hash != recomputed {
            let detail = format!(
                "{}: expected {}, found {}",
                DivergenceKind::EventHash.message(),
                recomputed,
                event.event_hash
            );
            return ChainReport::broken(
                Divergence {
                    index,
                    kind: DivergenceKind::EventHash,
                    detail,
                },
                index,
            );
        }

        expected_prev = Some(event.event_hash.clone());
    }

    ChainReport::intact(events.len())
}

//! Ledger trait and its in-memory implementation.
//!
//! `InMemoryLedger` is the reference implementation of [`AuditLedger`]. It
//! keeps one hash chain per tenant behind a single `Mutex`, which makes
//! `append` atomic with respect to read-tail, compute-link, write-tail: a
//! race there would corrupt a chain, so writes are serialized globally
//! (simplicity over throughput).
//!
//! Use `export_trail()` to obtain a sealed per-tenant `AuditTrail`, and
//! `verify_tenant()` at any time to confirm a chain has not been tampered
//! with in memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use caretrace_contracts::clock::Clock;
use caretrace_contracts::error::{CoreError, CoreResult};
use caretrace_contracts::identity::TenantId;

use crate::chain::{compute_event_hash, hash_payload, verify_events, ChainReport};
use crate::event::{AuditEvent, AuditEventInput, AuditTrail};

/// Append-only, tamper-evident log of mutating actions.
///
/// There is deliberately no update or delete operation: the ledger grows
/// monotonically, and verification is the only way anything is ever read
/// back out for judgement.
pub trait AuditLedger: Send + Sync {
    /// Append one event to its tenant's chain and return the stored record.
    fn append(&self, input: AuditEventInput) -> CoreResult<AuditEvent>;

    /// All events for a tenant, in chain order. Empty for unknown tenants.
    fn events_for_tenant(&self, tenant_id: &TenantId) -> Vec<AuditEvent>;

    /// The `event_hash` of a tenant chain's tail, or `None` before the
    /// first append.
    fn last_event_hash(&self, tenant_id: &TenantId) -> Option<String>;

    /// Recompute and check a tenant's whole chain.
    fn verify_tenant(&self, tenant_id: &TenantId) -> ChainReport;
}

// ── Internal mutable state ────────────────────────────────────────────────────

/// One tenant's chain: its events plus the cached tail hash.
#[derive(Default)]
pub(crate) struct TenantChain {
    /// All events appended so far, in chain order.
    pub(crate) events: Vec<AuditEvent>,

    /// The `event_hash` of the last appended event, or `None` before the
    /// first append.
    pub(crate) last_hash: Option<String>,
}

// ── Public ledger ─────────────────────────────────────────────────────────────

/// An in-memory, append-only audit ledger with one SHA-256 chain per tenant.
///
/// # Thread safety
///
/// Every operation acquires the internal `Mutex`; the ledger can be shared
/// across threads behind an `Arc<dyn AuditLedger>` without additional
/// synchronization.
pub struct InMemoryLedger {
    clock: Arc<dyn Clock>,
    pub(crate) state: Mutex<HashMap<TenantId, TenantChain>>,
}

impl InMemoryLedger {
    /// Create an empty ledger stamping events from the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(HashMap::new()),
        }
    }

    /// Export a sealed `AuditTrail` for one tenant.
    ///
    /// The `terminal_hash` is the `event_hash` of the last event, or `None`
    /// when the tenant has no events.
    pub fn export_trail(&self, tenant_id: &TenantId) -> AuditTrail {
        let state = self.state.lock().expect("ledger state lock poisoned");
        let (events, terminal_hash) = match state.get(tenant_id) {
            Some(chain) => (chain.events.clone(), chain.last_hash.clone()),
            None => (Vec::new(), None),
        };

        info!(
            tenant_id = %tenant_id,
            event_count = events.len(),
            "audit trail exported"
        );

        AuditTrail {
            tenant_id: tenant_id.clone(),
            events,
            exported_at: self.clock.now(),
            terminal_hash,
        }
    }

    /// Verify every tenant chain. `true` only when all chains are intact.
    pub fn verify_all(&self) -> bool {
        let state = self.state.lock().expect("ledger state lock poisoned");
        state.values().all(|chain| verify_events(&chain.events).valid)
    }
}

// ── AuditLedger impl ──────────────────────────────────────────────────────────

impl AuditLedger for InMemoryLedger {
    /// Append one event to its tenant's hash chain.
    ///
    /// Computes `payload_hash` over the canonicalized payload, then
    /// `event_hash` over all stored fields including the chain tail's hash,
    /// and advances the tail.
    ///
    /// Returns `Err(LedgerAppend)` only if the internal mutex is poisoned,
    /// which cannot happen under normal operation.
    fn append(&self, input: AuditEventInput) -> CoreResult<AuditEvent> {
        let mut state = self.state.lock().map_err(|e| CoreError::LedgerAppend {
            reason: format!("ledger state lock poisoned: {}", e),
        })?;
        let chain = state.entry(input.tenant_id.clone()).or_default();

        let timestamp = self.clock.now();
        let payload_hash = hash_payload(&input.payload);
        let prev_hash = chain.last_hash.clone();
        let event_hash = compute_event_hash(
            &timestamp,
            &input.tenant_id,
            &input.actor,
            input.action,
            &input.resource,
            &payload_hash,
            prev_hash.as_deref(),
        );

        let event = AuditEvent {
            timestamp,
            tenant_id: input.tenant_id,
            actor: input.actor,
            action: input.action,
            resource: input.resource,
            payload_hash,
            prev_hash,
            event_hash: event_hash.clone(),
        };

        debug!(
            tenant_id = %event.tenant_id,
            action = %event.action,
            resource_kind = %event.resource.kind,
            resource_id = %event.resource.id,
            event_hash = %event_hash,
            "audit event appended"
        );

        chain.events.push(event.clone());
        chain.last_hash = Some(event_hash);

        Ok(event)
    }

    fn events_for_tenant(&self, tenant_id: &TenantId) -> Vec<AuditEvent> {
        let state = self.state.lock().expect("ledger state lock poisoned");
        state
            .get(tenant_id)
            .map(|chain| chain.events.clone())
            .unwrap_or_default()
    }

    fn last_event_hash(&self, tenant_id: &TenantId) -> Option<String> {
        let state = self.state.lock().expect("ledger state lock poisoned");
        state.get(tenant_id).and_then(|chain| chain.last_hash.clone())
    }

    fn verify_tenant(&self, tenant_id: &TenantId) -> ChainReport {
        let state = self.state.lock().expect("ledger state lock poisoned");
        match state.get(tenant_id) {
            Some(chain) => verify_events(&chain.events),
            None => verify_events(&[]),
        }
    }
}

//! # caretrace-ledger
//!
//! Immutable, append-only, SHA-256 hash-chained audit trail for the
//! Caretrace compliance core.
//!
//! ## Overview
//!
//! Every mutating action the core performs is appended as an `AuditEvent`
//! to its tenant's chain, linked to the previous event by hash. Tampering
//! with any stored event — even a single byte — breaks the chain and is
//! reported by `verify_events` with the first divergent index and a
//! mismatch kind that distinguishes payload mutation from reordering.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use caretrace_ledger::{AuditLedger, InMemoryLedger};
//!
//! let ledger = InMemoryLedger::new(clock);
//! ledger.append(input)?;
//!
//! let report = ledger.verify_tenant(&tenant_id);
//! assert!(report.valid);
//! let trail = ledger.export_trail(&tenant_id);
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{
    compute_event_hash, hash_payload, recompute_event_hash, verify_events, ChainReport,
    Divergence, DivergenceKind,
};
pub use event::{AuditAction, AuditEvent, AuditEventInput, AuditTrail, ResourceKind, ResourceRef};
pub use memory::{AuditLedger, InMemoryLedger};

// ── Tests ─────────────────────────────────────────────────────────────────────

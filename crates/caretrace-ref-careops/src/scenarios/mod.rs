//! Care-operations reference runtime demo scenarios.
//!
//! Each scenario is a self-contained module that wires up real Caretrace
//! components (evaluator, session engine, synthesizer, provenance guard,
//! audit ledger, migration planner) with mock care-provider data and
//! demonstrates a distinct guarantee.

pub mod contamination_guard;
pub mod full_inspection;
pub mod regulation_migration;
pub mod tamper_audit;

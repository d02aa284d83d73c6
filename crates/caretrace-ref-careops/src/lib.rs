//! # caretrace-ref-careops
//!
//! Care-operations reference runtime for the Caretrace compliance core.
//!
//! Demonstrates four scenarios using mock data:
//!
//! 1. **Full Mock Inspection** — snapshot → evaluation → bounded session →
//!    gap analysis → ranked findings → audit verification → replay.
//! 2. **Audit Tamper Forensics** — payload mutation vs. chain-linkage break,
//!    each localized to its first divergent event.
//! 3. **Contamination Guard** — simulation output refused at construction
//!    and at promotion; doctored provenance exposed by recomputation.
//! 4. **Regulation Migration** — a republished regulation diffed
//!    content-addressed and applied to links non-destructively.
//!
//! All data is hardcoded and fictional. No external systems are contacted.

pub mod mock_data;
pub mod scenarios;

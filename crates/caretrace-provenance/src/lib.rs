//! # caretrace-provenance
//!
//! The provenance guard for the Caretrace compliance core.
//!
//! Mock inspection output and the official regulatory record are separated
//! by construction: [`guard::create_finding`] refuses any origin/domain
//! pairing outside the legal table, [`guard::verify_integrity`] recomputes a
//! record's provenance hash against its stored claim, and
//! [`guard::attempt_promote_to_regulatory`] categorically refuses to move
//! simulated findings into regulatory history.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use caretrace_provenance::guard;
//!
//! let finding = guard::create_finding(input)?;
//! assert!(guard::verify_integrity(&finding));
//!
//! // Always fails for Origin::SystemMock:
//! guard::attempt_promote_to_regulatory(&finding).unwrap_err();
//! ```

pub mod guard;

//! # caretrace-session
//!
//! Event-sourced mock inspection sessions.
//!
//! ## Overview
//!
//! A [`MockInspectionSession`] is the mutable aggregate of the reasoning
//! core: topics are opened, questions and follow-ups asked within the bounds
//! of a [`LogicEvaluation`](caretrace_contracts::evaluation::LogicEvaluation),
//! answers and draft findings recorded, until the session reaches a terminal
//! status. Every successful operation appends one [`SessionEvent`] to the
//! session's ordered log, and [`replay_session`] rebuilds the identical
//! aggregate from that log alone — the property audit reconstruction
//! depends on.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use caretrace_session::{replay_session, MockInspectionSession};
//!
//! let mut session =
//!     MockInspectionSession::start(tenant, snapshot_id, profile_id, evaluation, &clock);
//! let topic = TopicId::new("safeguarding");
//! session.open_topic(topic.clone(), &clock)?;
//! session.ask_question(topic.clone(), "How are concerns escalated?", &clock)?;
//! session.complete(&clock)?;
//!
//! let replayed = replay_session(session.events())?;
//! assert_eq!(replayed, session);
//! ```

pub mod event;
pub mod replay;
pub mod session;
pub mod store;

pub use event::SessionEvent;
pub use replay::replay_session;
pub use session::{MockInspectionSession, SessionStatus, TopicState};
pub use store::SessionStore;

// ── Tests ─────────────────────────────────────────────────────────────────────

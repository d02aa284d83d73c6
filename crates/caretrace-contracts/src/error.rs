//! Error types for the Caretrace reasoning core.
//!
//! All fallible operations in the core return `CoreResult<T>`. Every variant
//! is fatal to the attempted operation and classified by [`CoreError::kind`]
//! into one of four kinds, so callers pattern-match on the kind rather than
//! on a generic exception hierarchy. Nothing in the core catches and ignores
//! one of these; propagation is always upward to the orchestration layer.

use thiserror::Error;

/// The failure classes of the reasoning core.
///
/// Callers that only need to decide presentation (error banner vs. ordinary
/// UI state vs. forensic alert) branch on this instead of on individual
/// variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A domain invariant was violated at construction time. Retrying cannot
    /// fix a logic error, so these are never retried.
    Invariant,
    /// An operation was attempted in a state that does not permit it.
    /// Callers may legitimately present some of these ("no further follow-up
    /// available") as normal UI states rather than errors.
    State,
    /// Stored data failed a hash or chain check. Surfaced with enough detail
    /// to support forensic audit; the core never attempts self-repair.
    Integrity,
    /// Static configuration is missing or malformed.
    Config,
}

/// The unified error type for the Caretrace reasoning core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A finding's origin tag is inconsistent with its reporting domain.
    ///
    /// This is a security boundary, not a warning: simulated output must
    /// never be classifiable as regulatory record.
    #[error("mock contamination: origin '{origin}' may not report into domain '{reporting_domain}'")]
    MockContamination {
        origin: String,
        reporting_domain: String,
    },

    /// A finding was presented without a usable frozen-context reference.
    #[error("finding lacks a frozen context snapshot: {reason}")]
    MissingSnapshotLink { reason: String },

    /// A value could not be serialized in canonical form for hashing.
    #[error("canonical serialization failed: {reason}")]
    Canonicalization { reason: String },

    /// A mutation was attempted on a completed or abandoned session.
    #[error("session '{session_id}' is {status} and accepts no further mutation")]
    SessionTerminal {
        session_id: String,
        status: String,
    },

    /// A question, follow-up, answer, or draft referenced a topic that was
    /// never opened in this session.
    #[error("topic '{topic_id}' has not been opened in this session")]
    TopicNotOpened { topic_id: String },

    /// `open_topic` was called twice for the same topic.
    #[error("topic '{topic_id}' is already open in this session")]
    TopicAlreadyOpened { topic_id: String },

    /// The session-wide question budget is spent.
    #[error("question budget exhausted: session limit is {limit}")]
    QuestionBudgetExhausted { limit: u32 },

    /// The per-topic follow-up budget is spent. The session stays active;
    /// only the follow-up request is refused.
    #[error("no further follow-up available for topic '{topic_id}': limit is {limit}")]
    FollowUpExhausted { topic_id: String, limit: u32 },

    /// A session id was not found in the store.
    #[error("no session with id '{session_id}'")]
    UnknownSession { session_id: String },

    /// A stored event sequence is structurally unreplayable (empty, missing
    /// its start event, or continuing past a terminal status).
    #[error("event log cannot be replayed: {reason}")]
    ReplayGap { reason: String },

    /// Chain verification found a divergence.
    ///
    /// `index` is the first position at which the stored chain and the
    /// recomputed chain disagree; `detail` names the mismatch kind so
    /// payload tampering is distinguishable from reordering.
    #[error("audit chain broken at index {index}: {detail}")]
    ChainIntegrity { index: usize, detail: String },

    /// The ledger could not persist an event.
    ///
    /// Treated as fatal — an action that cannot be audited cannot proceed.
    #[error("audit append failed: {reason}")]
    LedgerAppend { reason: String },

    /// A logic profile or other static input is missing or malformed.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

impl CoreError {
    /// The failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::MockContamination { .. }
            | CoreError::MissingSnapshotLink { .. }
            | CoreError::Canonicalization { .. } => ErrorKind::Invariant,
            CoreError::SessionTerminal { .. }
            | CoreError::TopicNotOpened { .. }
            | CoreError::TopicAlreadyOpened { .. }
            | CoreError::QuestionBudgetExhausted { .. }
            | CoreError::FollowUpExhausted { .. }
            | CoreError::UnknownSession { .. }
            | CoreError::ReplayGap { .. } => ErrorKind::State,
            CoreError::ChainIntegrity { .. } | CoreError::LedgerAppend { .. } => {
                ErrorKind::Integrity
            }
            CoreError::Config { .. } => ErrorKind::Config,
        }
    }
}

/// Convenience alias used throughout the Caretrace crates.
pub type CoreResult<T> = Result<T, CoreError>;

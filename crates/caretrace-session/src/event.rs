//! Ordered session events: the single source of truth for session state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use caretrace_contracts::evaluation::LogicEvaluation;
use caretrace_contracts::finding::DraftFinding;
use caretrace_contracts::identity::{ProfileId, SessionId, SnapshotId, TenantId, TopicId};

/// One entry in a session's append-only event log.
///
/// Events are the only way session state changes: every operation on
/// [`MockInspectionSession`](crate::session::MockInspectionSession) validates
/// its preconditions, records exactly one event, and applies it through the
/// same state-transition code that replay uses. Replaying the log therefore
/// reproduces the live aggregate exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum SessionEvent {
    /// The session was created. Always the first event; carries everything
    /// needed to rebuild the aggregate from the log alone.
    Started {
        session_id: SessionId,
        tenant_id: TenantId,
        snapshot_id: SnapshotId,
        profile_id: ProfileId,
        evaluation: LogicEvaluation,
        at: DateTime<Utc>,
    },
    /// An inspection topic was opened for questioning.
    TopicOpened { topic_id: TopicId, at: DateTime<Utc> },
    /// A primary question was put to the provider within an open topic.
    QuestionAsked {
        topic_id: TopicId,
        question: String,
        at: DateTime<Utc>,
    },
    /// A follow-up probe within an open topic.
    FollowUpAsked {
        topic_id: TopicId,
        prompt: String,
        at: DateTime<Utc>,
    },
    /// The provider's answer on a topic.
    AnswerRecorded {
        topic_id: TopicId,
        answer: String,
        at: DateTime<Utc>,
    },
    /// A draft finding was buffered against the session.
    FindingDrafted {
        draft: DraftFinding,
        at: DateTime<Utc>,
    },
    /// The session reached its normal end.
    Completed { at: DateTime<Utc> },
    /// The session was broken off before completion.
    Abandoned { reason: String, at: DateTime<Utc> },
}

impl SessionEvent {
    /// When the event happened.
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            SessionEvent::Started { at, .. }
            | SessionEvent::TopicOpened { at, .. }
            | SessionEvent::QuestionAsked { at, .. }
            | SessionEvent::FollowUpAsked { at, .. }
            | SessionEvent::AnswerRecorded { at, .. }
            | SessionEvent::FindingDrafted { at, .. }
            | SessionEvent::Completed { at }
            | SessionEvent::Abandoned { at, .. } => *at,
        }
    }

    /// Short lowercase label for logs and replay diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            SessionEvent::Started { .. } => "started",
            SessionEvent::TopicOpened { .. } => "topic-opened",
            SessionEvent::QuestionAsked { .. } => "question-asked",
            SessionEvent::FollowUpAsked { .. } => "follow-up-asked",
            SessionEvent::AnswerRecorded { .. } => "answer-recorded",
            SessionEvent::FindingDrafted { .. } => "finding-drafted",
            SessionEvent::Completed { .. } => "completed",
            SessionEvent::Abandoned { .. } => "abandoned",
        }
    }
}

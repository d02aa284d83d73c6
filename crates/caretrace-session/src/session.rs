//! The mock inspection session aggregate and its state machine.
//!
//! A session moves `Active → { Completed | Abandoned }`; the two end states
//! are terminal and accept no further mutation. Every operation follows the
//! same shape:
//!
//!   validate preconditions → record exactly one [`SessionEvent`] → apply it
//!
//! The apply step is the same code replay uses, so a session rebuilt from
//! its event log is indistinguishable from the live aggregate.
//!
//! Budget rejections are deliberately soft: a refused question or follow-up
//! returns a State-kind error, records no event, and leaves the session
//! `Active` — callers may present "no further follow-up available" as a
//! normal outcome rather than a failure.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use caretrace_contracts::clock::Clock;
use caretrace_contracts::error::{CoreError, CoreResult};
use caretrace_contracts::evaluation::LogicEvaluation;
use caretrace_contracts::finding::{DraftFinding, ReportingDomain};
use caretrace_contracts::identity::{ProfileId, SessionId, SnapshotId, TenantId, TopicId};

use crate::event::SessionEvent;

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    /// Accepting questions, answers, and drafts.
    Active,
    /// Ended normally. Terminal.
    Completed,
    /// Broken off before completion. Terminal.
    Abandoned,
}

impl SessionStatus {
    /// Stable lowercase form, used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Abandoned => "abandoned",
        }
    }

    /// True once the session accepts no further mutation.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Abandoned)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Question and follow-up counters for one opened topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicState {
    /// Primary questions asked on this topic.
    pub questions_asked: u32,
    /// Follow-up probes used on this topic.
    pub follow_ups_used: u32,
}

impl TopicState {
    /// Questions of either kind charged against the session-wide budget.
    pub fn total_questions(self) -> u32 {
        self.questions_asked + self.follow_ups_used
    }
}

/// A mock inspection session: the mutable aggregate of the reasoning core.
///
/// Fields are private; state changes only through the recorded-event
/// operations below. The session always reports into
/// [`ReportingDomain::MockSimulation`] — promotion of its findings into the
/// regulatory domain is refused downstream by the provenance guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockInspectionSession {
    id: SessionId,
    tenant_id: TenantId,
    domain: ReportingDomain,
    snapshot_id: SnapshotId,
    snapshot_hash: String,
    profile_id: ProfileId,
    profile_hash: String,
    evaluation: LogicEvaluation,
    topics: BTreeMap<TopicId, TopicState>,
    events: Vec<SessionEvent>,
    drafts: Vec<DraftFinding>,
    status: SessionStatus,
    started_at: DateTime<Utc>,
}

impl MockInspectionSession {
    /// Start a new session for a tenant.
    ///
    /// The evaluation fixes the session's bounds and already carries the
    /// snapshot and profile hashes it was computed from; the ids pin which
    /// aggregates those hashes describe.
    pub fn start(
        tenant_id: TenantId,
        snapshot_id: SnapshotId,
        profile_id: ProfileId,
        evaluation: LogicEvaluation,
        clock: &dyn Clock,
    ) -> Self {
        let event = SessionEvent::Started {
            session_id: SessionId::new(),
            tenant_id,
            snapshot_id,
            profile_id,
            evaluation,
            at: clock.now(),
        };

        let session = Self::from_started(&event)
            .expect("a freshly built Started event always opens a session");
        info!(
            session_id = %session.id,
            tenant = %session.tenant_id,
            mode = ?session.evaluation.interaction_mode,
            "mock inspection session started"
        );
        session
    }

    /// Build the aggregate from a `Started` event, or `None` for any other
    /// variant. Shared with replay, which is how a log's first event becomes
    /// a session again.
    pub(crate) fn from_started(event: &SessionEvent) -> Option<Self> {
        match event {
            SessionEvent::Started {
                session_id,
                tenant_id,
                snapshot_id,
                profile_id,
                evaluation,
                at,
            } => Some(Self {
                id: *session_id,
                tenant_id: tenant_id.clone(),
                domain: ReportingDomain::MockSimulation,
                snapshot_id: *snapshot_id,
                snapshot_hash: evaluation.snapshot_hash.clone(),
                profile_id: *profile_id,
                profile_hash: evaluation.profile_hash.clone(),
                evaluation: evaluation.clone(),
                topics: BTreeMap::new(),
                events: vec![event.clone()],
                drafts: Vec::new(),
                status: SessionStatus::Active,
                started_at: *at,
            }),
            _ => None,
        }
    }

    // ── Operations ────────────────────────────────────────────────────────────

    /// Open a topic for questioning.
    ///
    /// # Errors
    ///
    /// [`CoreError::SessionTerminal`] on a finished session;
    /// [`CoreError::TopicAlreadyOpened`] if the topic is already open.
    pub fn open_topic(&mut self, topic_id: TopicId, clock: &dyn Clock) -> CoreResult<()> {
        self.ensure_active()?;
        if self.topics.contains_key(&topic_id) {
            return Err(CoreError::TopicAlreadyOpened {
                topic_id: topic_id.to_string(),
            });
        }

        self.record(SessionEvent::TopicOpened {
            topic_id,
            at: clock.now(),
        });
        Ok(())
    }

    /// Ask a primary question on an open topic.
    ///
    /// # Errors
    ///
    /// [`CoreError::SessionTerminal`], [`CoreError::TopicNotOpened`], or
    /// [`CoreError::QuestionBudgetExhausted`] once the session-wide budget
    /// (primary questions plus follow-ups) is spent. A refused question
    /// records no event and leaves the session active.
    pub fn ask_question(
        &mut self,
        topic_id: TopicId,
        question: impl Into<String>,
        clock: &dyn Clock,
    ) -> CoreResult<()> {
        self.ensure_active()?;
        self.ensure_topic_open(&topic_id)?;
        self.ensure_question_budget()?;

        self.record(SessionEvent::QuestionAsked {
            topic_id,
            question: question.into(),
            at: clock.now(),
        });
        Ok(())
    }

    /// Ask a follow-up probe on an open topic.
    ///
    /// Follow-ups draw on the per-topic follow-up allowance first and the
    /// session-wide question budget second; the more specific refusal wins.
    ///
    /// # Errors
    ///
    /// [`CoreError::SessionTerminal`], [`CoreError::TopicNotOpened`],
    /// [`CoreError::FollowUpExhausted`] when the topic's allowance is spent,
    /// or [`CoreError::QuestionBudgetExhausted`] when the session budget is.
    /// A refused follow-up records no event and leaves the session active.
    pub fn ask_follow_up(
        &mut self,
        topic_id: TopicId,
        prompt: impl Into<String>,
        clock: &dyn Clock,
    ) -> CoreResult<()> {
        self.ensure_active()?;
        let state = match self.topics.get(&topic_id) {
            Some(state) => *state,
            None => {
                return Err(CoreError::TopicNotOpened {
                    topic_id: topic_id.to_string(),
                })
            }
        };

        let limit = self.evaluation.max_follow_ups_per_topic;
        if state.follow_ups_used >= limit {
            debug!(
                session_id = %self.id,
                topic = %topic_id,
                limit,
                "follow-up refused, per-topic allowance spent"
            );
            return Err(CoreError::FollowUpExhausted {
                topic_id: topic_id.to_string(),
                limit,
            });
        }
        self.ensure_question_budget()?;

        self.record(SessionEvent::FollowUpAsked {
            topic_id,
            prompt: prompt.into(),
            at: clock.now(),
        });
        Ok(())
    }

    /// Record the provider's answer on an open topic.
    ///
    /// Answers live in the event log only; they change no counters.
    ///
    /// # Errors
    ///
    /// [`CoreError::SessionTerminal`] or [`CoreError::TopicNotOpened`].
    pub fn record_answer(
        &mut self,
        topic_id: TopicId,
        answer: impl Into<String>,
        clock: &dyn Clock,
    ) -> CoreResult<()> {
        self.ensure_active()?;
        self.ensure_topic_open(&topic_id)?;

        self.record(SessionEvent::AnswerRecorded {
            topic_id,
            answer: answer.into(),
            at: clock.now(),
        });
        Ok(())
    }

    /// Buffer a draft finding against an open topic.
    ///
    /// # Errors
    ///
    /// [`CoreError::SessionTerminal`] or [`CoreError::TopicNotOpened`] when
    /// the draft references a topic this session never opened.
    pub fn add_draft_finding(
        &mut self,
        draft: DraftFinding,
        clock: &dyn Clock,
    ) -> CoreResult<()> {
        self.ensure_active()?;
        self.ensure_topic_open(&draft.topic_id)?;

        self.record(SessionEvent::FindingDrafted {
            draft,
            at: clock.now(),
        });
        Ok(())
    }

    /// End the session normally. Terminal.
    ///
    /// # Errors
    ///
    /// [`CoreError::SessionTerminal`] if the session already ended.
    pub fn complete(&mut self, clock: &dyn Clock) -> CoreResult<()> {
        self.ensure_active()?;

        info!(
            session_id = %self.id,
            tenant = %self.tenant_id,
            questions = self.questions_asked_total(),
            drafts = self.drafts.len(),
            "session completed"
        );
        self.record(SessionEvent::Completed { at: clock.now() });
        Ok(())
    }

    /// Break the session off before completion. Terminal.
    ///
    /// # Errors
    ///
    /// [`CoreError::SessionTerminal`] if the session already ended.
    pub fn abandon(&mut self, reason: impl Into<String>, clock: &dyn Clock) -> CoreResult<()> {
        self.ensure_active()?;

        let reason = reason.into();
        info!(session_id = %self.id, reason = %reason, "session abandoned");
        self.record(SessionEvent::Abandoned {
            reason,
            at: clock.now(),
        });
        Ok(())
    }

    // ── Event application ─────────────────────────────────────────────────────

    /// Apply one event's state transition. Total: never fails, never
    /// validates. Validation belongs to the operations (live) and to the
    /// structural checks in replay (stored logs).
    pub(crate) fn apply(&mut self, event: &SessionEvent) {
        match event {
            // Carried by from_started; nothing further to apply.
            SessionEvent::Started { .. } => {}
            SessionEvent::TopicOpened { topic_id, .. } => {
                self.topics.entry(topic_id.clone()).or_default();
            }
            SessionEvent::QuestionAsked { topic_id, .. } => {
                self.topics.entry(topic_id.clone()).or_default().questions_asked += 1;
            }
            SessionEvent::FollowUpAsked { topic_id, .. } => {
                self.topics.entry(topic_id.clone()).or_default().follow_ups_used += 1;
            }
            SessionEvent::AnswerRecorded { .. } => {}
            SessionEvent::FindingDrafted { draft, .. } => {
                self.drafts.push(draft.clone());
            }
            SessionEvent::Completed { .. } => {
                self.status = SessionStatus::Completed;
            }
            SessionEvent::Abandoned { .. } => {
                self.status = SessionStatus::Abandoned;
            }
        }
    }

    /// Apply and append one replayed event. Replay-side twin of `record`.
    pub(crate) fn replay_apply(&mut self, event: SessionEvent) {
        self.apply(&event);
        self.events.push(event);
    }

    fn record(&mut self, event: SessionEvent) {
        debug!(session_id = %self.id, event = event.label(), "session event recorded");
        self.apply(&event);
        self.events.push(event);
    }

    // ── Preconditions ─────────────────────────────────────────────────────────

    fn ensure_active(&self) -> CoreResult<()> {
        if self.status.is_terminal() {
            return Err(CoreError::SessionTerminal {
                session_id: self.id.to_string(),
                status: self.status.to_string(),
            });
        }
        Ok(())
    }

    fn ensure_topic_open(&self, topic_id: &TopicId) -> CoreResult<()> {
        if !self.topics.contains_key(topic_id) {
            return Err(CoreError::TopicNotOpened {
                topic_id: topic_id.to_string(),
            });
        }
        Ok(())
    }

    fn ensure_question_budget(&self) -> CoreResult<()> {
        let limit = self.evaluation.max_total_questions;
        if self.questions_asked_total() >= limit {
            debug!(session_id = %self.id, limit, "question refused, session budget spent");
            return Err(CoreError::QuestionBudgetExhausted { limit });
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Always [`ReportingDomain::MockSimulation`] for sessions created here.
    pub fn domain(&self) -> ReportingDomain {
        self.domain
    }

    pub fn snapshot_id(&self) -> SnapshotId {
        self.snapshot_id
    }

    pub fn snapshot_hash(&self) -> &str {
        &self.snapshot_hash
    }

    pub fn profile_id(&self) -> ProfileId {
        self.profile_id
    }

    pub fn profile_hash(&self) -> &str {
        &self.profile_hash
    }

    /// The directives this session is bounded by.
    pub fn evaluation(&self) -> &LogicEvaluation {
        &self.evaluation
    }

    /// Per-topic counters, keyed by topic id.
    pub fn topics(&self) -> &BTreeMap<TopicId, TopicState> {
        &self.topics
    }

    /// Counters for one topic, if it was opened.
    pub fn topic_state(&self, topic_id: &TopicId) -> Option<TopicState> {
        self.topics.get(topic_id).copied()
    }

    /// The full ordered event log, starting with the `Started` event.
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Draft findings buffered so far, in the order they were added.
    pub fn drafts(&self) -> &[DraftFinding] {
        &self.drafts
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Questions of either kind asked so far, across all topics.
    pub fn questions_asked_total(&self) -> u32 {
        self.topics.values().map(|t| t.total_questions()).sum()
    }

    /// Follow-ups still available on a topic, or `None` if it is not open.
    /// Lets a caller surface "no further follow-up available" without
    /// provoking the error.
    pub fn remaining_follow_ups(&self, topic_id: &TopicId) -> Option<u32> {
        self.topics.get(topic_id).map(|state| {
            self.evaluation
                .max_follow_ups_per_topic
                .saturating_sub(state.follow_ups_used)
        })
    }
}

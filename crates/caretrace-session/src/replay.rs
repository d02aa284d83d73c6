//! Rebuilding a session aggregate from its event log alone.

use caretrace_contracts::error::{CoreError, CoreResult};

use crate::event::SessionEvent;
use crate::session::MockInspectionSession;

/// Rebuild a session from its ordered event log.
///
/// The log must begin with a `Started` event, must not continue past a
/// terminal transition, and must open every topic before questions, answers,
/// or drafts reference it. A log produced by a live session always satisfies
/// these conditions, so replaying it reproduces the live aggregate exactly —
/// counters, drafts, status, and the log itself.
///
/// # Errors
///
/// Returns [`CoreError::ReplayGap`] when the log is structurally broken:
/// empty, missing its start event, carrying a second start event, continuing
/// past a terminal status, or referencing a topic out of order.
pub fn replay_session(events: &[SessionEvent]) -> CoreResult<MockInspectionSession> {
    let (first, rest) = match events.split_first() {
        Some(split) => split,
        None => {
            return Err(CoreError::ReplayGap {
                reason: "event log is empty".to_string(),
            })
        }
    };

    let mut session = match MockInspectionSession::from_started(first) {
        Some(session) => session,
        None => {
            return Err(CoreError::ReplayGap {
                reason: format!(
                    "log does not begin with a start event (found '{}')",
                    first.label()
                ),
            })
        }
    };

    for (offset, event) in rest.iter().enumerate() {
        let index = offset + 1;
        if session.status().is_terminal() {
            return Err(CoreError::ReplayGap {
                reason: format!(
                    "event '{}' at index {index} follows a terminal status",
                    event.label()
                ),
            });
        }
        check_structure(&session, event, index)?;
        session.replay_apply(event.clone());
    }

    Ok(session)
}

/// Structural preconditions a stored event must meet against the state
/// rebuilt so far. Mirrors what the live operations validated, minus the
/// budget checks: budgets refuse events before they are recorded, so a
/// stored log can never violate them.
fn check_structure(
    session: &MockInspectionSession,
    event: &SessionEvent,
    index: usize,
) -> CoreResult<()> {
    let topic_id = match event {
        SessionEvent::Started { .. } => {
            return Err(CoreError::ReplayGap {
                reason: format!("second start event at index {index}"),
            })
        }
        SessionEvent::TopicOpened { topic_id, .. } => {
            if session.topic_state(topic_id).is_some() {
                return Err(CoreError::ReplayGap {
                    reason: format!("topic '{topic_id}' opened twice (index {index})"),
                });
            }
            return Ok(());
        }
        SessionEvent::QuestionAsked { topic_id, .. }
        | SessionEvent::FollowUpAsked { topic_id, .. }
        | SessionEvent::AnswerRecorded { topic_id, .. } => topic_id,
        SessionEvent::FindingDrafted { draft, .. } => &draft.topic_id,
        SessionEvent::Completed { .. } | SessionEvent::Abandoned { .. } => return Ok(()),
    };

    if session.topic_state(topic_id).is_none() {
        return Err(CoreError::ReplayGap {
            reason: format!(
                "event at index {index} references topic '{topic_id}' before it was opened"
            ),
        });
    }
    Ok(())
}

//! Explicit in-memory session repository.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use caretrace_contracts::error::{CoreError, CoreResult};
use caretrace_contracts::identity::{SessionId, TenantId};

use crate::session::MockInspectionSession;

/// In-memory session repository, passed by handle.
///
/// The store is an explicit object owned by the orchestration layer; nothing
/// in the core reaches for a global registry. Sessions are value snapshots:
/// `get` clones, callers mutate their copy and `put` it back.
///
/// # Thread safety
///
/// Every operation acquires the internal `Mutex`; the store can be shared
/// across threads behind an `Arc` without additional synchronization.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, MockInspectionSession>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a session under its own id.
    pub fn put(&self, session: MockInspectionSession) {
        debug!(
            session_id = %session.id(),
            status = %session.status(),
            "session stored"
        );
        self.sessions
            .lock()
            .expect("session store lock poisoned")
            .insert(session.id(), session);
    }

    /// Fetch a copy of a session by id.
    ///
    /// # Errors
    ///
    /// [`CoreError::UnknownSession`] when the id is not present.
    pub fn get(&self, id: SessionId) -> CoreResult<MockInspectionSession> {
        self.sessions
            .lock()
            .expect("session store lock poisoned")
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::UnknownSession {
                session_id: id.to_string(),
            })
    }

    /// All sessions belonging to one tenant, in no particular order.
    pub fn for_tenant(&self, tenant_id: &TenantId) -> Vec<MockInspectionSession> {
        self.sessions
            .lock()
            .expect("session store lock poisoned")
            .values()
            .filter(|session| session.tenant_id() == tenant_id)
            .cloned()
            .collect()
    }

    /// Number of stored sessions across all tenants.
    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .expect("session store lock poisoned")
            .len()
    }

    /// True when no session has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

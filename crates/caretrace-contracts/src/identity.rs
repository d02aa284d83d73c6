//! Identifier newtypes and the actor model.
//!
//! Every aggregate in the Caretrace core is addressed by a dedicated id type
//! so that a session id can never be passed where a finding id is expected.
//! String-backed ids (`TenantId`, `TopicId`, `RegulationId`) are stable,
//! human-assigned identifiers from the hosting platform or the regulation
//! catalog; UUID-backed ids are minted by the core itself.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a care provider organisation (the tenant).
///
/// Assigned by the hosting platform. Every session, finding, and audit event
/// carries the tenant it belongs to; tenants never share mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TenantId(pub String);

/// Stable identifier for an inspection topic in the regulation catalog.
///
/// Example: `TopicId("safeguarding")`. Ordered so that finding tie-breaks
/// ("topic id ascending") are well defined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TopicId(pub String);

/// Stable identifier for a regulation in the catalog (e.g. `"reg-12"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegulationId(pub String);

/// Unique identifier for one frozen context snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotId(pub Uuid);

/// Unique identifier for one version of a logic profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileId(pub Uuid);

/// Unique identifier for one mock inspection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

/// Unique identifier for one finding, assigned at draft time and kept through
/// finalization. Ordered so that finding tie-breaks ("finding id ascending")
/// are well defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FindingId(pub Uuid);

/// Unique identifier for one topic-to-regulation-section link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkId(pub Uuid);

impl TenantId {
    /// Construct a tenant id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl TopicId {
    /// Construct a topic id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl RegulationId {
    /// Construct a regulation id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl SnapshotId {
    /// Create a new, unique snapshot id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl ProfileId {
    /// Create a new, unique profile id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl SessionId {
    /// Create a new, unique session id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FindingId {
    /// Create a new, unique finding id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl LinkId {
    /// Create a new, unique link id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for FindingId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for LinkId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for TopicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for RegulationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for FindingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Actor ─────────────────────────────────────────────────────────────────────

/// Who performed a mutating action.
///
/// A closed enum rather than a free string: "was this produced by the
/// reasoning core or by a person" is answered by pattern matching, never by
/// comparing against a magic `"SYSTEM"` literal. Shared by audit events,
/// session events, and findings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Actor {
    /// The reasoning core itself (e.g. synthesized findings).
    System,
    /// A named human inspector or reviewer.
    Inspector {
        /// The platform identity of the person.
        id: String,
    },
}

impl Actor {
    /// Construct an inspector actor from any string-like identity.
    pub fn inspector(id: impl Into<String>) -> Self {
        Self::Inspector { id: id.into() }
    }

    /// True when the action was taken by the reasoning core.
    pub fn is_system(&self) -> bool {
        matches!(self, Actor::System)
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::System => f.write_str("system"),
            Actor::Inspector { id } => write!(f, "inspector:{id}"),
        }
    }
}

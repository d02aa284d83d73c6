//! Topic-to-regulation-section links and their lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use caretrace_contracts::catalog::SectionRef;
use caretrace_contracts::clock::Clock;
use caretrace_contracts::identity::{LinkId, TopicId};

/// Whether a link is current or has been migrated away from.
///
/// Deprecation is the only transition; there is no deletion. A deprecated
/// link keeps pointing at the section text it was created against, plus
/// forward references to whatever replaced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum LinkStatus {
    /// The link is current.
    Active,
    /// The link was migrated away from and is kept for history.
    Deprecated {
        /// Successor links, empty when the section was removed outright.
        superseded_by: Vec<LinkId>,
        at: DateTime<Utc>,
    },
}

impl LinkStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, LinkStatus::Active)
    }
}

/// One topic-to-section link in the regulation catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulationLink {
    pub id: LinkId,
    pub topic_id: TopicId,
    pub section: SectionRef,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
}

impl RegulationLink {
    /// Create a new active link.
    pub fn new(topic_id: TopicId, section: SectionRef, clock: &dyn Clock) -> Self {
        Self {
            id: LinkId::new(),
            topic_id,
            section,
            status: LinkStatus::Active,
            created_at: clock.now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

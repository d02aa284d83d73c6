//! Frozen provider context.
//!
//! A [`ContextSnapshot`] is the immutable fact set every finding and session
//! refers back to. It is captured once, hashed at construction, and never
//! mutated; downstream records carry its id and hash rather than copies of
//! its content.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::canonical::content_hash;
use crate::clock::Clock;
use crate::error::CoreResult;
use crate::identity::{RegulationId, SnapshotId, TenantId};

/// Regulatory lifecycle state of a care provider.
///
/// A closed enum: the Logic Evaluator keys its rule matching on these
/// variants, so an unknown state is unrepresentable rather than a runtime
/// string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleState {
    PreRegistration,
    NewlyRegistered,
    RoutineCompliance,
    RequiresImprovement,
    SpecialMeasures,
    EnforcementPending,
    Deregistered,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::PreRegistration => "pre-registration",
            LifecycleState::NewlyRegistered => "newly-registered",
            LifecycleState::RoutineCompliance => "routine-compliance",
            LifecycleState::RequiresImprovement => "requires-improvement",
            LifecycleState::SpecialMeasures => "special-measures",
            LifecycleState::EnforcementPending => "enforcement-pending",
            LifecycleState::Deregistered => "deregistered",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable, timestamped fact set about a provider at one instant.
///
/// Fields are private; a snapshot exists only through [`ContextSnapshot::capture`],
/// which normalizes the regulation list and computes `snapshot_hash` over the
/// canonical serialization of the content fields. The opaque id is excluded
/// from the hash, so two snapshots capturing identical content at the same
/// instant carry identical hashes while remaining distinct aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct ContextSnapshot {
    id: SnapshotId,
    tenant_id: TenantId,
    captured_at: DateTime<Utc>,
    lifecycle_state: LifecycleState,
    active_regulations: Vec<RegulationId>,
    attributes: BTreeMap<String, String>,
    snapshot_hash: String,
}

/// The hashed portion of a snapshot. Everything except the opaque id.
#[derive(Serialize)]
struct SnapshotContent<'a> {
    tenant_id: &'a TenantId,
    captured_at: &'a DateTime<Utc>,
    lifecycle_state: LifecycleState,
    active_regulations: &'a [RegulationId],
    attributes: &'a BTreeMap<String, String>,
}

impl ContextSnapshot {
    /// Capture a provider's context at the clock's current instant.
    ///
    /// `active_regulations` is sorted and deduplicated before hashing, so the
    /// caller's iteration order never affects `snapshot_hash`.
    pub fn capture(
        tenant_id: TenantId,
        lifecycle_state: LifecycleState,
        mut active_regulations: Vec<RegulationId>,
        attributes: BTreeMap<String, String>,
        clock: &dyn Clock,
    ) -> CoreResult<Self> {
        active_regulations.sort();
        active_regulations.dedup();
        let captured_at = clock.now();

        let snapshot_hash = content_hash(&SnapshotContent {
            tenant_id: &tenant_id,
            captured_at: &captured_at,
            lifecycle_state,
            active_regulations: &active_regulations,
            attributes: &attributes,
        })?;

        Ok(Self {
            id: SnapshotId::new(),
            tenant_id,
            captured_at,
            lifecycle_state,
            active_regulations,
            attributes,
            snapshot_hash,
        })
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle_state
    }

    pub fn active_regulations(&self) -> &[RegulationId] {
        &self.active_regulations
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Hash of the content fields, lowercase hex.
    pub fn snapshot_hash(&self) -> &str {
        &self.snapshot_hash
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::clock::FixedClock;

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap())
    }

    fn sample_attributes() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("beds".to_string(), "42".to_string()),
            ("region".to_string(), "north-west".to_string()),
        ])
    }

    #[test]
    fn identical_content_yields_identical_hash() {
        let clock = fixed_clock();
        let a = ContextSnapshot::capture(
            TenantId::new("tenant-a"),
            LifecycleState::RoutineCompliance,
            vec![RegulationId::new("reg-12"), RegulationId::new("reg-9")],
            sample_attributes(),
            &clock,
        )
        .unwrap();
        let b = ContextSnapshot::capture(
            TenantId::new("tenant-a"),
            LifecycleState::RoutineCompliance,
            vec![RegulationId::new("reg-12"), RegulationId::new("reg-9")],
            sample_attributes(),
            &clock,
        )
        .unwrap();

        assert_eq!(a.snapshot_hash(), b.snapshot_hash());
        assert_ne!(a.id(), b.id(), "snapshots stay distinct aggregates");
    }

    #[test]
    fn regulation_order_does_not_affect_hash() {
        let clock = fixed_clock();
        let forward = ContextSnapshot::capture(
            TenantId::new("tenant-a"),
            LifecycleState::SpecialMeasures,
            vec![RegulationId::new("reg-9"), RegulationId::new("reg-12")],
            BTreeMap::new(),
            &clock,
        )
        .unwrap();
        let reverse = ContextSnapshot::capture(
            TenantId::new("tenant-a"),
            LifecycleState::SpecialMeasures,
            vec![RegulationId::new("reg-12"), RegulationId::new("reg-9")],
            BTreeMap::new(),
            &clock,
        )
        .unwrap();

        assert_eq!(forward.snapshot_hash(), reverse.snapshot_hash());
        assert_eq!(forward.active_regulations(), reverse.active_regulations());
    }

    #[test]
    fn duplicate_regulations_are_collapsed() {
        let clock = fixed_clock();
        let snapshot = ContextSnapshot::capture(
            TenantId::new("tenant-a"),
            LifecycleState::NewlyRegistered,
            vec![
                RegulationId::new("reg-12"),
                RegulationId::new("reg-12"),
                RegulationId::new("reg-9"),
            ],
            BTreeMap::new(),
            &clock,
        )
        .unwrap();

        assert_eq!(
            snapshot.active_regulations(),
            &[RegulationId::new("reg-12"), RegulationId::new("reg-9")]
        );
    }

    #[test]
    fn different_content_yields_different_hash() {
        let clock = fixed_clock();
        let routine = ContextSnapshot::capture(
            TenantId::new("tenant-a"),
            LifecycleState::RoutineCompliance,
            vec![],
            BTreeMap::new(),
            &clock,
        )
        .unwrap();
        let special = ContextSnapshot::capture(
            TenantId::new("tenant-a"),
            LifecycleState::SpecialMeasures,
            vec![],
            BTreeMap::new(),
            &clock,
        )
        .unwrap();

        assert_ne!(routine.snapshot_hash(), special.snapshot_hash());
    }

    #[test]
    fn snapshot_hash_is_lowercase_hex() {
        let clock = fixed_clock();
        let snapshot = ContextSnapshot::capture(
            TenantId::new("tenant-a"),
            LifecycleState::PreRegistration,
            vec![],
            BTreeMap::new(),
            &clock,
        )
        .unwrap();

        assert_eq!(snapshot.snapshot_hash().len(), 64);
        assert!(snapshot
            .snapshot_hash()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}

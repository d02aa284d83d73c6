//! # caretrace-logic
//!
//! Deterministic, TOML-driven logic profile evaluation for the Caretrace
//! compliance core.
//!
//! ## Overview
//!
//! A [`LogicProfile`] maps regulatory lifecycle states to severity
//! multipliers, interaction directives, and session bounds. [`evaluate`]
//! resolves a profile against a frozen [`ContextSnapshot`](caretrace_contracts::snapshot::ContextSnapshot)
//! into a [`LogicEvaluation`](caretrace_contracts::evaluation::LogicEvaluation):
//! a pure, reproducible decision whose hash binds the directives to both
//! input hashes.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use caretrace_logic::{evaluate, LogicProfile};
//!
//! let profile = LogicProfile::from_file(Path::new("profiles/default.toml"))?;
//! let evaluation = evaluate(&snapshot, &profile);
//! ```
//!
//! ## Rule matching
//!
//! Rules are applied in declaration order; the first rule whose `states`
//! matcher covers the snapshot's lifecycle state wins. When nothing matches,
//! the profile's mandatory `[defaults]` table applies. Sorting by rule id
//! happens only inside the profile hash, so reordering rules never changes
//! the hash — but it can change which rule fires first.
//!
//! This crate also hosts the section-change classification primitives
//! ([`change`]) that the migration planner reads.

pub mod change;
pub mod engine;
pub mod rule;
pub mod score;

pub use change::{
    classify_section_change, diff_catalog, SectionChange, SectionChangeKind, SectionSnapshot,
};
pub use engine::evaluate;
pub use rule::{
    InteractionRule, LogicProfile, ProfileConfig, ProfileDefaults, SeverityRule, StateMatcher,
};
pub use score::{adjusted_impact, composite_from_base, composite_risk};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};

    use caretrace_contracts::clock::FixedClock;
    use caretrace_contracts::error::{CoreError, ErrorKind};
    use caretrace_contracts::evaluation::InteractionMode;
    use caretrace_contracts::identity::{RegulationId, TenantId};
    use caretrace_contracts::snapshot::{ContextSnapshot, LifecycleState};

    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// A profile in the shape the reference deployment uses: heightened
    /// scrutiny hunts contradictions, improvement-needed opens from the
    /// evidence, everything else narrates first.
    const CARE_PROFILE: &str = r#"
        name = "care-defaults"
        version = 1

        [[severity_rules]]
        id = "heightened-scrutiny-scaling"
        description = "Providers under heightened scrutiny are scored more severely"
        states = ["special-measures", "enforcement-pending"]
        multiplier = 2.0

        [[severity_rules]]
        id = "improvement-scaling"
        description = "Improvement-needed providers carry a moderate uplift"
        states = "requires-improvement"
        multiplier = 1.5

        [[interaction_rules]]
        id = "heightened-scrutiny-probing"
        description = "Hunt for contradictions where enforcement is in play"
        states = ["special-measures", "enforcement-pending"]
        mode = "contradiction-hunt"
        contradiction_hunt = true
        max_follow_ups_per_topic = 5
        max_total_questions = 40

        [[interaction_rules]]
        id = "improvement-evidence-first"
        description = "Open from the evidence record for improvement-needed providers"
        states = "requires-improvement"
        mode = "evidence-first"
        contradiction_hunt = false
        max_follow_ups_per_topic = 3
        max_total_questions = 25

        [defaults]
        multiplier = 1.0
        mode = "narrative-first"
        contradiction_hunt = false
        max_follow_ups_per_topic = 3
        max_total_questions = 20
    "#;

    fn snapshot(state: LifecycleState) -> ContextSnapshot {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap());
        ContextSnapshot::capture(
            TenantId::new("willow-lodge"),
            state,
            vec![RegulationId::new("reg-12")],
            BTreeMap::new(),
            &clock,
        )
        .unwrap()
    }

    fn care_profile() -> LogicProfile {
        LogicProfile::from_toml_str(CARE_PROFILE).unwrap()
    }

    // ── 1. determinism ────────────────────────────────────────────────────────

    /// Evaluating the same inputs twice yields byte-identical output,
    /// including the evaluation hash.
    #[test]
    fn test_evaluate_is_deterministic() {
        let snap = snapshot(LifecycleState::SpecialMeasures);
        let profile = care_profile();

        let first = evaluate(&snap, &profile);
        let second = evaluate(&snap, &profile);

        assert_eq!(first, second);
        assert_eq!(first.evaluation_hash, second.evaluation_hash);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap(),
            "serialized evaluations must be byte-identical"
        );
    }

    // ── 2. decision table ─────────────────────────────────────────────────────

    /// Heightened-scrutiny states hunt contradictions with doubled severity.
    #[test]
    fn test_special_measures_hunts_contradictions() {
        let evaluation = evaluate(&snapshot(LifecycleState::SpecialMeasures), &care_profile());

        assert_eq!(evaluation.severity_multiplier, 2.0);
        assert_eq!(evaluation.interaction_mode, InteractionMode::ContradictionHunt);
        assert!(evaluation.contradiction_hunt);
        assert_eq!(evaluation.max_follow_ups_per_topic, 5);
        assert_eq!(evaluation.max_total_questions, 40);
    }

    /// Improvement-needed providers are approached evidence-first.
    #[test]
    fn test_requires_improvement_goes_evidence_first() {
        let evaluation = evaluate(
            &snapshot(LifecycleState::RequiresImprovement),
            &care_profile(),
        );

        assert_eq!(evaluation.severity_multiplier, 1.5);
        assert_eq!(evaluation.interaction_mode, InteractionMode::EvidenceFirst);
        assert!(!evaluation.contradiction_hunt);
        assert_eq!(evaluation.max_total_questions, 25);
    }

    /// A state no rule covers falls back to the explicit defaults — never
    /// to an implicit zero.
    #[test]
    fn test_unmatched_state_applies_explicit_defaults() {
        let evaluation = evaluate(&snapshot(LifecycleState::RoutineCompliance), &care_profile());

        assert_eq!(evaluation.severity_multiplier, 1.0);
        assert_eq!(evaluation.interaction_mode, InteractionMode::NarrativeFirst);
        assert!(!evaluation.contradiction_hunt);
        assert_eq!(evaluation.max_follow_ups_per_topic, 3);
        assert_eq!(evaluation.max_total_questions, 20);
    }

    // ── 3. first-match wins ───────────────────────────────────────────────────

    /// When two rules cover the same state, the one declared first fires,
    /// even if a later rule is more specific.
    #[test]
    fn test_first_match_wins_in_declaration_order() {
        let toml = r#"
            name = "order-probe"
            version = 1

            [[severity_rules]]
            id = "broad-first"
            description = "Catch-all declared first"
            multiplier = 3.0

            [[severity_rules]]
            id = "specific-second"
            description = "Specific rule declared second, never reached"
            states = "special-measures"
            multiplier = 9.9

            [defaults]
            multiplier = 1.0
            mode = "narrative-first"
            contradiction_hunt = false
            max_follow_ups_per_topic = 3
            max_total_questions = 20
        "#;
        let profile = LogicProfile::from_toml_str(toml).unwrap();
        let evaluation = evaluate(&snapshot(LifecycleState::SpecialMeasures), &profile);

        assert_eq!(evaluation.severity_multiplier, 3.0);
    }

    // ── 4. hash stability under reordering ────────────────────────────────────

    /// Reordering rules changes which rule fires first but never changes
    /// the profile hash: hashing sorts by rule id, matching does not.
    #[test]
    fn test_profile_hash_is_stable_under_rule_reordering() {
        let forward = r#"
            name = "reorder-probe"
            version = 1

            [[severity_rules]]
            id = "alpha"
            description = "First in this document"
            multiplier = 3.0

            [[severity_rules]]
            id = "beta"
            description = "Second in this document"
            states = "special-measures"
            multiplier = 9.9

            [defaults]
            multiplier = 1.0
            mode = "narrative-first"
            contradiction_hunt = false
            max_follow_ups_per_topic = 3
            max_total_questions = 20
        "#;
        let reversed = r#"
            name = "reorder-probe"
            version = 1

            [[severity_rules]]
            id = "beta"
            description = "Second in this document"
            states = "special-measures"
            multiplier = 9.9

            [[severity_rules]]
            id = "alpha"
            description = "First in this document"
            multiplier = 3.0

            [defaults]
            multiplier = 1.0
            mode = "narrative-first"
            contradiction_hunt = false
            max_follow_ups_per_topic = 3
            max_total_questions = 20
        "#;

        let a = LogicProfile::from_toml_str(forward).unwrap();
        let b = LogicProfile::from_toml_str(reversed).unwrap();

        assert_eq!(
            a.profile_hash(),
            b.profile_hash(),
            "same rule set must hash identically regardless of order"
        );

        // Match semantics still follow declaration order.
        let snap = snapshot(LifecycleState::SpecialMeasures);
        assert_eq!(evaluate(&snap, &a).severity_multiplier, 3.0);
        assert_eq!(evaluate(&snap, &b).severity_multiplier, 9.9);
    }

    // ── 5. input hash binding ─────────────────────────────────────────────────

    /// The evaluation carries both input hashes, and its own hash changes
    /// when either input changes.
    #[test]
    fn test_evaluation_binds_input_hashes() {
        let profile = care_profile();
        let routine = snapshot(LifecycleState::RoutineCompliance);
        let special = snapshot(LifecycleState::SpecialMeasures);

        let a = evaluate(&routine, &profile);
        assert_eq!(a.snapshot_hash, routine.snapshot_hash());
        assert_eq!(a.profile_hash, profile.profile_hash());

        let b = evaluate(&special, &profile);
        assert_ne!(a.evaluation_hash, b.evaluation_hash);
    }

    // ── 6. configuration failures ─────────────────────────────────────────────

    /// Malformed TOML must produce a `CoreError::Config`.
    #[test]
    fn test_toml_parse_error() {
        let bad_toml = r#"
            this is not valid toml ][[[
        "#;

        match LogicProfile::from_toml_str(bad_toml) {
            Err(err @ CoreError::Config { .. }) => {
                assert_eq!(err.kind(), ErrorKind::Config);
                assert!(err.to_string().contains("failed to parse profile TOML"));
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    /// A non-finite multiplier is rejected at load, keeping every
    /// downstream hash computation total.
    #[test]
    fn test_non_finite_multiplier_rejected() {
        let toml = r#"
            name = "nan-probe"
            version = 1

            [[severity_rules]]
            id = "bad"
            description = "Not representable in canonical JSON"
            multiplier = nan

            [defaults]
            multiplier = 1.0
            mode = "narrative-first"
            contradiction_hunt = false
            max_follow_ups_per_topic = 3
            max_total_questions = 20
        "#;

        match LogicProfile::from_toml_str(toml) {
            Err(CoreError::Config { reason }) => {
                assert!(reason.contains("non-finite"), "unexpected reason: {reason}");
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    /// Duplicate rule ids would make the hash sort ambiguous, so they are
    /// rejected.
    #[test]
    fn test_duplicate_rule_id_rejected() {
        let toml = r#"
            name = "dup-probe"
            version = 1

            [[severity_rules]]
            id = "same"
            description = "First"
            multiplier = 1.0

            [[severity_rules]]
            id = "same"
            description = "Second"
            multiplier = 2.0

            [defaults]
            multiplier = 1.0
            mode = "narrative-first"
            contradiction_hunt = false
            max_follow_ups_per_topic = 3
            max_total_questions = 20
        "#;

        match LogicProfile::from_toml_str(toml) {
            Err(CoreError::Config { reason }) => {
                assert!(reason.contains("duplicate"), "unexpected reason: {reason}");
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    // ── 7. supersession ───────────────────────────────────────────────────────

    /// Superseding keeps the name, bumps the version, issues a fresh id,
    /// and leaves the hash unchanged when the rules are unchanged.
    #[test]
    fn test_supersede_produces_next_version() {
        let v1 = care_profile();
        let same_rules: ProfileConfig = toml::from_str(CARE_PROFILE).unwrap();
        let v2 = v1.supersede(same_rules).unwrap();

        assert_eq!(v2.name(), v1.name());
        assert_eq!(v2.version(), v1.version() + 1);
        assert_ne!(v2.id(), v1.id());
        assert_eq!(
            v2.profile_hash(),
            v1.profile_hash(),
            "hash identifies rule content, not version"
        );

        // Changing a rule in the successor changes the hash.
        let mut changed: ProfileConfig = toml::from_str(CARE_PROFILE).unwrap();
        changed.severity_rules[0].multiplier = 2.5;
        let v3 = v2.supersede(changed).unwrap();
        assert_eq!(v3.version(), v2.version() + 1);
        assert_ne!(v3.profile_hash(), v2.profile_hash());
    }
}

//! Profile evaluation.
//!
//! `evaluate` resolves one [`LogicProfile`] against one [`ContextSnapshot`]
//! into a [`LogicEvaluation`]. It is pure and total: the same inputs always
//! produce the same output (including the evaluation hash), and every
//! lifecycle state resolves to directives — via a matching rule or via the
//! profile's explicit defaults.
//!
//! Resolution policy:
//!
//! 1. Scan severity rules in declaration order; the first rule whose state
//!    matcher covers the snapshot's lifecycle state supplies the multiplier.
//! 2. Scan interaction rules the same way for mode, contradiction-hunt
//!    permission, and the session bounds.
//! 3. Where no rule matches, take the corresponding values from `defaults`.
//!
//! Rules are never re-sorted here — sorting exists only inside the profile
//! hash computation, so hash determinism is decoupled from match-order
//! semantics.

use tracing::debug;

use caretrace_contracts::evaluation::LogicEvaluation;
use caretrace_contracts::snapshot::ContextSnapshot;

use crate::rule::LogicProfile;

/// Resolve `profile` against `snapshot` into deterministic directives.
///
/// # Panics
///
/// Panics if the directive set cannot be canonicalized for hashing — which
/// cannot happen, since profile multipliers are validated finite at load.
pub fn evaluate(snapshot: &ContextSnapshot, profile: &LogicProfile) -> LogicEvaluation {
    let state = snapshot.lifecycle_state();

    debug!(
        tenant_id = %snapshot.tenant_id(),
        lifecycle_state = %state,
        profile = %profile.name(),
        profile_version = profile.version(),
        "evaluating logic profile"
    );

    let severity_match = profile
        .severity_rules()
        .iter()
        .find(|rule| rule.states.matches(state));
    let multiplier = match severity_match {
        Some(rule) => {
            debug!(rule_id = %rule.id, multiplier = rule.multiplier, "severity rule matched");
            rule.multiplier
        }
        None => {
            debug!(
                multiplier = profile.defaults().multiplier,
                "no severity rule matched; applying profile default"
            );
            profile.defaults().multiplier
        }
    };

    let interaction_match = profile
        .interaction_rules()
        .iter()
        .find(|rule| rule.states.matches(state));
    let (mode, contradiction_hunt, max_follow_ups, max_questions) = match interaction_match {
        Some(rule) => {
            debug!(rule_id = %rule.id, mode = %rule.mode, "interaction rule matched");
            (
                rule.mode,
                rule.contradiction_hunt,
                rule.max_follow_ups_per_topic,
                rule.max_total_questions,
            )
        }
        None => {
            let d = profile.defaults();
            debug!(mode = %d.mode, "no interaction rule matched; applying profile defaults");
            (
                d.mode,
                d.contradiction_hunt,
                d.max_follow_ups_per_topic,
                d.max_total_questions,
            )
        }
    };

    LogicEvaluation::bind(
        multiplier,
        max_follow_ups,
        max_questions,
        contradiction_hunt,
        mode,
        snapshot.snapshot_hash().to_string(),
        profile.profile_hash().to_string(),
    )
    .expect("validated directives must always canonicalize")
}

//! Logic Evaluator output.
//!
//! A [`LogicEvaluation`] is the pure result of applying one logic profile to
//! one context snapshot. It is ephemeral: it seeds a session's bounds and
//! interaction mode, and is not persisted beyond the session that requested
//! it. `evaluation_hash` binds the directives to the hashes of both inputs,
//! so a stored evaluation can always be checked against what produced it.

use serde::{Deserialize, Serialize};

use crate::canonical::content_hash;
use crate::error::CoreResult;

/// How a simulated inspection should engage with the provider.
///
/// A bounded enum decision, never free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionMode {
    /// Open with the provider's own account, then probe.
    NarrativeFirst,
    /// Open from the evidence record, asking the provider to fill gaps.
    EvidenceFirst,
    /// Actively probe for contradictions between account and evidence.
    ContradictionHunt,
}

impl InteractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionMode::NarrativeFirst => "narrative-first",
            InteractionMode::EvidenceFirst => "evidence-first",
            InteractionMode::ContradictionHunt => "contradiction-hunt",
        }
    }
}

impl std::fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The directives produced by one profile-against-snapshot evaluation.
///
/// `severity_multiplier` is carried unclamped: only adjusted scores saturate
/// at 100, so an extreme multiplier stays visible here for audit purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicEvaluation {
    pub severity_multiplier: f64,
    pub max_follow_ups_per_topic: u32,
    pub max_total_questions: u32,
    pub contradiction_hunt: bool,
    pub interaction_mode: InteractionMode,
    /// Hash of the snapshot this evaluation was computed against.
    pub snapshot_hash: String,
    /// Hash of the profile this evaluation was computed against.
    pub profile_hash: String,
    /// Binding hash over the directives and both input hashes.
    pub evaluation_hash: String,
}

/// Hash input for `evaluation_hash`: every field except the hash itself.
#[derive(Serialize)]
struct EvaluationContent<'a> {
    severity_multiplier: f64,
    max_follow_ups_per_topic: u32,
    max_total_questions: u32,
    contradiction_hunt: bool,
    interaction_mode: InteractionMode,
    snapshot_hash: &'a str,
    profile_hash: &'a str,
}

impl LogicEvaluation {
    /// Assemble an evaluation, computing its binding hash.
    #[allow(clippy::too_many_arguments)]
    pub fn bind(
        severity_multiplier: f64,
        max_follow_ups_per_topic: u32,
        max_total_questions: u32,
        contradiction_hunt: bool,
        interaction_mode: InteractionMode,
        snapshot_hash: String,
        profile_hash: String,
    ) -> CoreResult<Self> {
        let evaluation_hash = content_hash(&EvaluationContent {
            severity_multiplier,
            max_follow_ups_per_topic,
            max_total_questions,
            contradiction_hunt,
            interaction_mode,
            snapshot_hash: &snapshot_hash,
            profile_hash: &profile_hash,
        })?;
        Ok(Self {
            severity_multiplier,
            max_follow_ups_per_topic,
            max_total_questions,
            contradiction_hunt,
            interaction_mode,
            snapshot_hash,
            profile_hash,
            evaluation_hash,
        })
    }

    /// Recompute the binding hash from the current field values.
    ///
    /// Matches `evaluation_hash` unless a field was altered after binding.
    pub fn recompute_hash(&self) -> CoreResult<String> {
        content_hash(&EvaluationContent {
            severity_multiplier: self.severity_multiplier,
            max_follow_ups_per_topic: self.max_follow_ups_per_topic,
            max_total_questions: self.max_total_questions,
            contradiction_hunt: self.contradiction_hunt,
            interaction_mode: self.interaction_mode,
            snapshot_hash: &self.snapshot_hash,
            profile_hash: &self.profile_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_evaluation() -> LogicEvaluation {
        LogicEvaluation::bind(
            1.5,
            3,
            20,
            true,
            InteractionMode::ContradictionHunt,
            "a".repeat(64),
            "b".repeat(64),
        )
        .unwrap()
    }

    #[test]
    fn bind_is_deterministic() {
        let first = sample_evaluation();
        let second = sample_evaluation();
        assert_eq!(first, second);
        assert_eq!(first.evaluation_hash, second.evaluation_hash);
    }

    #[test]
    fn recompute_matches_bound_hash() {
        let evaluation = sample_evaluation();
        assert_eq!(
            evaluation.recompute_hash().unwrap(),
            evaluation.evaluation_hash
        );
    }

    #[test]
    fn altering_a_directive_is_detectable() {
        let mut evaluation = sample_evaluation();
        evaluation.max_total_questions = 200;
        assert_ne!(
            evaluation.recompute_hash().unwrap(),
            evaluation.evaluation_hash
        );
    }

    #[test]
    fn hash_binds_the_input_hashes() {
        let base = sample_evaluation();
        let other_snapshot = LogicEvaluation::bind(
            1.5,
            3,
            20,
            true,
            InteractionMode::ContradictionHunt,
            "c".repeat(64),
            "b".repeat(64),
        )
        .unwrap();
        assert_ne!(base.evaluation_hash, other_snapshot.evaluation_hash);
    }
}

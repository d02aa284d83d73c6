//! Logic profile types and configuration schema.
//!
//! A `ProfileConfig` is deserialized from TOML and holds two ordered rule
//! lists: severity rules and interaction rules. Rules are evaluated in
//! declaration order — the first matching rule wins. If no rule matches the
//! snapshot's lifecycle state, the profile's mandatory `defaults` apply:
//! there is never an implicit zero.
//!
//! `profile_hash` is computed over the rules after sorting them by id (plus
//! the defaults), so two profiles holding the same rule set in different
//! authoring order hash identically while keeping their declared match
//! order.

use std::path::Path;

use serde::{Deserialize, Serialize};

use caretrace_contracts::canonical::content_hash;
use caretrace_contracts::error::{CoreError, CoreResult};
use caretrace_contracts::evaluation::InteractionMode;
use caretrace_contracts::identity::ProfileId;
use caretrace_contracts::snapshot::LifecycleState;

/// Which lifecycle states a rule applies to.
///
/// In TOML, omit the `states` key to match every state, name one state as a
/// string, or list several:
///
/// ```toml
/// states = "special-measures"
/// states = ["special-measures", "enforcement-pending"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum StateMatcher {
    /// Matches every lifecycle state. The default when `states` is omitted.
    #[default]
    Any,
    One(LifecycleState),
    AnyOf(Vec<LifecycleState>),
}

impl StateMatcher {
    pub fn matches(&self, state: LifecycleState) -> bool {
        match self {
            StateMatcher::Any => true,
            StateMatcher::One(s) => *s == state,
            StateMatcher::AnyOf(states) => states.contains(&state),
        }
    }
}

/// A severity-scaling rule loaded from TOML.
///
/// The first severity rule whose `states` matcher covers the snapshot's
/// lifecycle state supplies the multiplier; subsequent rules are not
/// consulted. The multiplier itself is deliberately unclamped — only
/// adjusted scores saturate — so an extreme value survives into the
/// evaluation for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityRule {
    /// Stable identifier used in logs and for hash-order sorting.
    pub id: String,

    /// Human-readable explanation of what this rule scales.
    pub description: String,

    #[serde(default)]
    pub states: StateMatcher,

    pub multiplier: f64,
}

/// An interaction-directive rule loaded from TOML.
///
/// Supplies the recommended interaction mode, the contradiction-probing
/// permission, and the session bounds for matching lifecycle states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRule {
    /// Stable identifier used in logs and for hash-order sorting.
    pub id: String,

    /// Human-readable explanation of what this rule directs.
    pub description: String,

    #[serde(default)]
    pub states: StateMatcher,

    pub mode: InteractionMode,

    pub contradiction_hunt: bool,

    pub max_follow_ups_per_topic: u32,

    pub max_total_questions: u32,
}

/// The explicit fallback directives, mandatory in every profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDefaults {
    pub multiplier: f64,
    pub mode: InteractionMode,
    pub contradiction_hunt: bool,
    pub max_follow_ups_per_topic: u32,
    pub max_total_questions: u32,
}

/// The top-level structure deserialized from a TOML profile file.
///
/// Example:
/// ```toml
/// name = "care-defaults"
/// version = 1
///
/// [[severity_rules]]
/// id = "special-measures-scaling"
/// description = "Providers in special measures are scored more severely"
/// states = ["special-measures", "enforcement-pending"]
/// multiplier = 2.0
///
/// [defaults]
/// multiplier = 1.0
/// mode = "narrative-first"
/// contradiction_hunt = false
/// max_follow_ups_per_topic = 3
/// max_total_questions = 20
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub name: String,

    pub version: u32,

    /// Ordered severity rules. First match wins.
    #[serde(default)]
    pub severity_rules: Vec<SeverityRule>,

    /// Ordered interaction rules. First match wins.
    #[serde(default)]
    pub interaction_rules: Vec<InteractionRule>,

    pub defaults: ProfileDefaults,
}

/// Hash input for `profile_hash`: the rules in id order, plus the defaults.
///
/// Name, version, and the opaque profile id are excluded: the hash
/// identifies the rule content, so a superseding version with unchanged
/// rules hashes identically to its predecessor.
#[derive(Serialize)]
struct ProfileHashInput<'a> {
    severity_rules: Vec<&'a SeverityRule>,
    interaction_rules: Vec<&'a InteractionRule>,
    defaults: &'a ProfileDefaults,
}

/// A versioned, immutable rule set.
///
/// Construct via [`LogicProfile::from_toml_str`], [`LogicProfile::from_file`],
/// or [`LogicProfile::from_config`]. A profile is never edited in place:
/// [`LogicProfile::supersede`] produces the next version as a new value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicProfile {
    id: ProfileId,
    name: String,
    version: u32,
    severity_rules: Vec<SeverityRule>,
    interaction_rules: Vec<InteractionRule>,
    defaults: ProfileDefaults,
    profile_hash: String,
}

impl LogicProfile {
    /// Parse `s` as TOML and build a profile.
    ///
    /// Returns `CoreError::Config` if the TOML is malformed or the rule set
    /// fails validation.
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        let config: ProfileConfig = toml::from_str(s).map_err(|e| CoreError::Config {
            reason: format!("failed to parse profile TOML: {}", e),
        })?;
        Self::from_config(config)
    }

    /// Read the file at `path` and parse it as a TOML profile.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CoreError::Config {
            reason: format!("failed to read profile file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validate a parsed config and seal it into a profile.
    ///
    /// Validation rules:
    /// - every multiplier (rules and defaults) must be finite;
    /// - rule ids must be unique within their list, since they are the
    ///   sort key for `profile_hash`.
    pub fn from_config(config: ProfileConfig) -> CoreResult<Self> {
        for rule in &config.severity_rules {
            if !rule.multiplier.is_finite() {
                return Err(CoreError::Config {
                    reason: format!(
                        "severity rule '{}' has non-finite multiplier {}",
                        rule.id, rule.multiplier
                    ),
                });
            }
        }
        if !config.defaults.multiplier.is_finite() {
            return Err(CoreError::Config {
                reason: format!(
                    "default multiplier {} is not finite",
                    config.defaults.multiplier
                ),
            });
        }
        check_unique_ids("severity", config.severity_rules.iter().map(|r| &r.id))?;
        check_unique_ids("interaction", config.interaction_rules.iter().map(|r| &r.id))?;

        let profile_hash = compute_profile_hash(
            &config.severity_rules,
            &config.interaction_rules,
            &config.defaults,
        )?;

        Ok(Self {
            id: ProfileId::new(),
            name: config.name,
            version: config.version,
            severity_rules: config.severity_rules,
            interaction_rules: config.interaction_rules,
            defaults: config.defaults,
            profile_hash,
        })
    }

    /// Produce the next version of this profile as a new value.
    ///
    /// The successor keeps this profile's name, bumps the version by one,
    /// and gets a fresh id; the caller supplies the complete new rule set.
    /// The current profile is left untouched.
    pub fn supersede(&self, mut config: ProfileConfig) -> CoreResult<Self> {
        config.name = self.name.clone();
        config.version = self.version + 1;
        Self::from_config(config)
    }

    pub fn id(&self) -> ProfileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Severity rules in declaration (match) order.
    pub fn severity_rules(&self) -> &[SeverityRule] {
        &self.severity_rules
    }

    /// Interaction rules in declaration (match) order.
    pub fn interaction_rules(&self) -> &[InteractionRule] {
        &self.interaction_rules
    }

    pub fn defaults(&self) -> &ProfileDefaults {
        &self.defaults
    }

    /// Hash of the sorted rule content, lowercase hex.
    pub fn profile_hash(&self) -> &str {
        &self.profile_hash
    }
}

fn check_unique_ids<'a>(
    list: &str,
    ids: impl Iterator<Item = &'a String>,
) -> CoreResult<()> {
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(CoreError::Config {
                reason: format!("duplicate {} rule id '{}'", list, id),
            });
        }
    }
    Ok(())
}

fn compute_profile_hash(
    severity_rules: &[SeverityRule],
    interaction_rules: &[InteractionRule],
    defaults: &ProfileDefaults,
) -> CoreResult<String> {
    let mut severity: Vec<&SeverityRule> = severity_rules.iter().collect();
    severity.sort_by(|a, b| a.id.cmp(&b.id));
    let mut interaction: Vec<&InteractionRule> = interaction_rules.iter().collect();
    interaction.sort_by(|a, b| a.id.cmp(&b.id));

    content_hash(&ProfileHashInput {
        severity_rules: severity,
        interaction_rules: interaction,
        defaults,
    })
}

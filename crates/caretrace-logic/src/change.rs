//! Regulation section change classification.
//!
//! When upstream regulation text is revised, the Migration Planner needs to
//! know what happened to every section a finding links to. Sections are
//! compared content-addressed: each [`SectionSnapshot`] carries the hash of
//! its text at one catalog version, and classification is a pure function of
//! where that path and that hash reappear in the next version.

use serde::{Deserialize, Serialize};

use caretrace_contracts::canonical::sha256_hex;
use caretrace_contracts::catalog::SectionRef;

/// One regulation section's identity and content at one catalog version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSnapshot {
    pub section: SectionRef,
    /// SHA-256 (hex) of the section text.
    pub text_hash: String,
}

impl SectionSnapshot {
    pub fn new(section: SectionRef, text: &str) -> Self {
        Self {
            section,
            text_hash: sha256_hex(text),
        }
    }
}

/// What happened to a section between two catalog versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionChangeKind {
    /// Same path, same text.
    Unchanged,
    /// Same path, different text.
    Reworded,
    /// Same text at exactly one different path.
    Renumbered,
    /// Same text reappearing at more than one path.
    Split,
    /// Neither the path nor the text survives.
    Removed,
}

impl SectionChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionChangeKind::Unchanged => "unchanged",
            SectionChangeKind::Reworded => "reworded",
            SectionChangeKind::Renumbered => "renumbered",
            SectionChangeKind::Split => "split",
            SectionChangeKind::Removed => "removed",
        }
    }
}

impl std::fmt::Display for SectionChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified difference for one old section, with the paths its content
/// moved to when it was renumbered or split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionChange {
    pub old: SectionSnapshot,
    pub kind: SectionChangeKind,
    /// Where the content now lives. Populated for `Renumbered` (one entry)
    /// and `Split` (several); empty otherwise.
    pub replacements: Vec<SectionRef>,
}

/// Classify what happened to `old` in the new catalog version.
pub fn classify_section_change(
    old: &SectionSnapshot,
    new_sections: &[SectionSnapshot],
) -> SectionChangeKind {
    if let Some(at_same_path) = new_sections.iter().find(|s| s.section == old.section) {
        if at_same_path.text_hash == old.text_hash {
            return SectionChangeKind::Unchanged;
        }
        return SectionChangeKind::Reworded;
    }

    let relocated = new_sections
        .iter()
        .filter(|s| s.text_hash == old.text_hash)
        .count();
    match relocated {
        0 => SectionChangeKind::Removed,
        1 => SectionChangeKind::Renumbered,
        _ => SectionChangeKind::Split,
    }
}

/// Diff an entire catalog version: classify every old section and collect
/// the replacement paths for relocated content.
pub fn diff_catalog(
    old_sections: &[SectionSnapshot],
    new_sections: &[SectionSnapshot],
) -> Vec<SectionChange> {
    old_sections
        .iter()
        .map(|old| {
            let kind = classify_section_change(old, new_sections);
            let replacements = match kind {
                SectionChangeKind::Renumbered | SectionChangeKind::Split => new_sections
                    .iter()
                    .filter(|s| s.text_hash == old.text_hash)
                    .map(|s| s.section.clone())
                    .collect(),
                _ => Vec::new(),
            };
            SectionChange {
                old: old.clone(),
                kind,
                replacements,
            }
        })
        .collect()
}

//! Evidence gap analysis: what a topic asked for versus what was supplied.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use caretrace_contracts::catalog::{EvidenceRecord, EvidenceType, Topic};
use caretrace_contracts::identity::TopicId;

/// One unmet evidence request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceGap {
    pub evidence_type: EvidenceType,
    /// True when the underlying request was marked required.
    pub required: bool,
    /// The request's minimum count.
    pub expected: u32,
    /// How many records of this type were actually supplied.
    pub supplied: u32,
}

/// The outcome of comparing a topic's evidence hunt against the supplied
/// records. Gaps are held sorted by evidence type, so nothing downstream
/// ever sees supply order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapAnalysis {
    topic_id: TopicId,
    gaps: Vec<EvidenceGap>,
}

impl GapAnalysis {
    pub fn topic_id(&self) -> &TopicId {
        &self.topic_id
    }

    /// All unmet requests, sorted by evidence type.
    pub fn gaps(&self) -> &[EvidenceGap] {
        &self.gaps
    }

    /// True when every request was met.
    pub fn is_clean(&self) -> bool {
        self.gaps.is_empty()
    }

    /// True when any unmet request was marked required.
    pub fn has_required_gaps(&self) -> bool {
        self.gaps.iter().any(|gap| gap.required)
    }

    /// The distinct missing evidence types, sorted. This list feeds the
    /// why-hash, which is why it must never depend on iteration order.
    pub fn missing_types(&self) -> Vec<EvidenceType> {
        let set: BTreeSet<EvidenceType> =
            self.gaps.iter().map(|gap| gap.evidence_type).collect();
        set.into_iter().collect()
    }
}

/// Compare a topic's evidence requests against the supplied records.
///
/// A request is unmet when fewer records of its type were supplied than its
/// `min_count` demands; the resulting gap is required iff the request was.
/// Records of types the topic never asked for are ignored.
pub fn analyze_topic_evidence(topic: &Topic, provided: &[EvidenceRecord]) -> GapAnalysis {
    let mut counts: BTreeMap<EvidenceType, u32> = BTreeMap::new();
    for record in provided {
        *counts.entry(record.evidence_type).or_insert(0) += 1;
    }

    let mut gaps: Vec<EvidenceGap> = topic
        .evidence_requests
        .iter()
        .filter_map(|request| {
            let supplied = counts.get(&request.evidence_type).copied().unwrap_or(0);
            if supplied < request.min_count {
                Some(EvidenceGap {
                    evidence_type: request.evidence_type,
                    required: request.required,
                    expected: request.min_count,
                    supplied,
                })
            } else {
                None
            }
        })
        .collect();
    gaps.sort_by_key(|gap| gap.evidence_type);

    debug!(
        topic = %topic.id,
        gap_count = gaps.len(),
        required = gaps.iter().any(|g| g.required),
        "topic evidence analyzed"
    );

    GapAnalysis {
        topic_id: topic.id.clone(),
        gaps,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use caretrace_contracts::catalog::{
        EvidenceRequest, RegulationScope, SectionPath, SectionRef,
    };
    use caretrace_contracts::identity::RegulationId;

    use super::*;

    fn topic(requests: Vec<EvidenceRequest>) -> Topic {
        Topic {
            id: TopicId::new("medication-management"),
            title: "Medication management".to_string(),
            primary_section: SectionRef::new(
                RegulationId::new("reg-12"),
                SectionPath::new("2.1"),
            ),
            scope: RegulationScope {
                regulation_ids: vec![RegulationId::new("reg-12")],
                include: vec![],
                exclude: vec![],
            },
            evidence_requests: requests,
        }
    }

    fn record(evidence_type: EvidenceType) -> EvidenceRecord {
        EvidenceRecord {
            evidence_type,
            collected_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            identity: "doc-001".to_string(),
        }
    }

    fn request(evidence_type: EvidenceType, required: bool, min_count: u32) -> EvidenceRequest {
        EvidenceRequest {
            evidence_type,
            required,
            min_count,
        }
    }

    #[test]
    fn fully_supplied_topic_is_clean() {
        let topic = topic(vec![
            request(EvidenceType::PolicyDocument, true, 1),
            request(EvidenceType::TrainingRecord, false, 1),
        ]);
        let provided = vec![
            record(EvidenceType::PolicyDocument),
            record(EvidenceType::TrainingRecord),
        ];

        let analysis = analyze_topic_evidence(&topic, &provided);
        assert!(analysis.is_clean());
        assert!(!analysis.has_required_gaps());
        assert!(analysis.missing_types().is_empty());
    }

    #[test]
    fn minimum_counts_are_enforced() {
        let topic = topic(vec![request(EvidenceType::TrainingRecord, true, 2)]);
        let provided = vec![record(EvidenceType::TrainingRecord)];

        let analysis = analyze_topic_evidence(&topic, &provided);
        assert_eq!(analysis.gaps().len(), 1);
        let gap = analysis.gaps()[0];
        assert_eq!(gap.expected, 2);
        assert_eq!(gap.supplied, 1);
        assert!(analysis.has_required_gaps());
    }

    #[test]
    fn optional_gaps_are_not_required() {
        let topic = topic(vec![request(EvidenceType::IncidentLog, false, 1)]);

        let analysis = analyze_topic_evidence(&topic, &[]);
        assert!(!analysis.is_clean());
        assert!(!analysis.has_required_gaps());
    }

    #[test]
    fn unrequested_evidence_is_ignored() {
        let topic = topic(vec![request(EvidenceType::PolicyDocument, true, 1)]);
        let provided = vec![record(EvidenceType::StaffRota)];

        let analysis = analyze_topic_evidence(&topic, &provided);
        assert_eq!(analysis.missing_types(), vec![EvidenceType::PolicyDocument]);
    }

    #[test]
    fn missing_types_are_sorted_regardless_of_request_order() {
        let forward = topic(vec![
            request(EvidenceType::StaffRota, false, 1),
            request(EvidenceType::PolicyDocument, false, 1),
            request(EvidenceType::CarePlan, false, 1),
        ]);
        let reversed = topic(vec![
            request(EvidenceType::CarePlan, false, 1),
            request(EvidenceType::PolicyDocument, false, 1),
            request(EvidenceType::StaffRota, false, 1),
        ]);

        let a = analyze_topic_evidence(&forward, &[]);
        let b = analyze_topic_evidence(&reversed, &[]);
        assert_eq!(a.missing_types(), b.missing_types());
        assert_eq!(a.gaps(), b.gaps());
    }
}

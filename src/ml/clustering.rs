//! Rule-based learner persona assignment and per-cluster aggregates

use crate::ml::stats::mean;
use crate::structs::{Cluster, ClusterSummary, Field, SkillScores, StudentRecord};
use std::collections::BTreeMap;

/// Score at or above which a student is a High Performer
pub const HIGH_PERFORMER_SCORE: f64 = 85.0;
/// Attention or focus below this marks an Attention Seeker
pub const ATTENTION_FLOOR: f64 = 60.0;
/// Score below which a student is a Developing Learner
pub const DEVELOPING_SCORE: f64 = 70.0;

/// Evaluate the persona rules in priority order
///
/// A high score wins over low attention/focus, which wins over a low score.
#[must_use]
pub fn classify(record: &StudentRecord) -> Cluster {
    if record.assessment_score >= HIGH_PERFORMER_SCORE {
        Cluster::HighPerformers
    } else if record.attention < ATTENTION_FLOOR || record.focus < ATTENTION_FLOOR {
        Cluster::AttentionSeekers
    } else if record.assessment_score < DEVELOPING_SCORE {
        Cluster::DevelopingLearners
    } else {
        Cluster::BalancedLearners
    }
}

/// Cluster for every record: pre-assigned tags pass through, the rest are classified
#[must_use]
pub fn assign_clusters(records: &[StudentRecord]) -> Vec<Cluster> {
    records
        .iter()
        .map(|r| r.cluster.unwrap_or_else(|| classify(r)))
        .collect()
}

/// Aggregate count, mean score and mean skills for every non-empty cluster
///
/// `assignments` must be parallel to `records`.
#[must_use]
pub fn cluster_statistics(
    records: &[StudentRecord],
    assignments: &[Cluster],
) -> BTreeMap<u8, ClusterSummary> {
    let mut stats = BTreeMap::new();

    for cluster in Cluster::ALL {
        let members: Vec<&StudentRecord> = records
            .iter()
            .zip(assignments)
            .filter(|(_, &c)| c == cluster)
            .map(|(r, _)| r)
            .collect();

        if members.is_empty() {
            continue;
        }

        let average = |field: Field| {
            let values: Vec<f64> = members.iter().map(|r| r.value(field)).collect();
            mean(&values)
        };
        let average_score = average(Field::AssessmentScore);
        let characteristics = SkillScores::from_fn(average);

        stats.insert(
            cluster.id(),
            ClusterSummary {
                name: cluster.name().to_string(),
                count: members.len(),
                average_score,
                characteristics,
            },
        );
    }

    stats
}

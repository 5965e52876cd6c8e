//! Human-readable key findings for the analytics report

use crate::structs::{Cluster, ClusterSummary};
use std::collections::BTreeMap;

/// Strength bucket for a signed correlation
#[must_use]
pub fn strength_label(r: f64) -> &'static str {
    if r > 0.7 {
        "strong"
    } else if r > 0.4 {
        "moderate"
    } else {
        "weak"
    }
}

/// Build the five fixed-shape findings
///
/// `comprehension_r` and `average_score` are the unrounded values.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn key_findings(
    comprehension_r: f64,
    record_count: usize,
    clusters: &BTreeMap<u8, ClusterSummary>,
    average_score: f64,
) -> Vec<String> {
    let high = clusters.get(&Cluster::HighPerformers.id());
    let high_count = high.map_or(0, |c| c.count);
    let high_average = high.map_or(0.0, |c| c.average_score);
    let high_share = high_count as f64 / record_count as f64 * 100.0;

    vec![
        format!(
            "Comprehension shows {} correlation with assessment scores (r = {comprehension_r:.3})",
            strength_label(comprehension_r)
        ),
        format!("Analysis performed on {record_count} student records"),
        format!(
            "{} distinct learning personas identified through clustering analysis",
            clusters.len()
        ),
        format!(
            "High Performers cluster represents {high_share:.1}% of students with average score of {high_average:.1}"
        ),
        format!("Average assessment score across all students: {average_score:.1}"),
    ]
}

//! Analysis pipeline that orchestrates all analytics computations

use super::clustering::{assign_clusters, cluster_statistics};
use super::correlation::{correlation_matrix, correlations_with_score};
use super::features::feature_importance;
use super::findings::key_findings;
use super::stats::{mean, round_to};
use crate::structs::{
    AnalysisResult, AnalyticsReport, CogError, ColumnStats, Field, ModelPerformance, Overview,
    Result, SkillScores, StudentRecord,
};
use tracing::debug;

/// Run the full analysis over one dataset snapshot
///
/// The input is never mutated; calling twice on the same records yields
/// identical output.
///
/// # Errors
/// Returns `CogError::EmptyDataset` if `records` is empty
pub fn analyze(records: &[StudentRecord]) -> Result<AnalysisResult> {
    if records.is_empty() {
        return Err(CogError::EmptyDataset);
    }

    let averages = Averages::from_records(records);
    let correlations = correlations_with_score(records)?;
    let importance = feature_importance(&correlations);

    let assignments = assign_clusters(records);
    let clusters = cluster_statistics(records, &assignments);
    debug!(
        records = records.len(),
        clusters = clusters.len(),
        "clusters assigned"
    );

    let model_performance = model_performance(correlations.comprehension, averages.assessment_score);
    let findings = key_findings(
        correlations.comprehension,
        records.len(),
        &clusters,
        averages.assessment_score,
    );

    let column_stats = Field::ALL
        .iter()
        .map(|f| ColumnStats::calculate(f.name(), &f.values(records)))
        .collect::<Result<Vec<_>>>()?;
    let correlation = correlation_matrix(records)?;

    let report = AnalyticsReport {
        overview: averages.overview(),
        correlations: correlations.map(|r| round_to(r, 3)),
        model_performance,
        feature_importance: importance,
        clusters,
        key_findings: findings,
    };

    Ok(AnalysisResult {
        report,
        assignments,
        column_stats,
        correlation,
    })
}

/// Heuristic model-quality proxy, not a fitted model
#[must_use]
pub fn model_performance(comprehension_r: f64, average_score: f64) -> ModelPerformance {
    let r = comprehension_r.abs();
    ModelPerformance {
        accuracy: (0.7 + r * 0.3).clamp(0.6, 0.95),
        mse: ((100.0 - average_score) * 0.8).round(),
        r2_score: r.max(0.5),
    }
}

/// Unrounded per-field means
struct Averages {
    skills: SkillScores,
    assessment_score: f64,
}

impl Averages {
    fn from_records(records: &[StudentRecord]) -> Self {
        Self {
            skills: SkillScores::from_fn(|field| mean(&field.values(records))),
            assessment_score: mean(&Field::AssessmentScore.values(records)),
        }
    }

    fn overview(&self) -> Overview {
        Overview {
            average_comprehension: round_to(self.skills.comprehension, 1),
            average_attention: round_to(self.skills.attention, 1),
            average_focus: round_to(self.skills.focus, 1),
            average_retention: round_to(self.skills.retention, 1),
            average_engagement_time: round_to(self.skills.engagement_time, 1),
            average_assessment_score: round_to(self.assessment_score, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::student;
    use crate::structs::Cluster;
    use proptest::prelude::*;

    fn two_students() -> Vec<StudentRecord> {
        vec![
            student("A", [90.0, 90.0, 90.0, 90.0, 95.0, 80.0]),
            student("B", [50.0, 50.0, 50.0, 50.0, 50.0, 30.0]),
        ]
    }

    #[test]
    fn test_two_record_scenario() {
        let result = analyze(&two_students()).expect("analyze");
        let report = &result.report;

        for (_, r) in report.correlations.entries() {
            assert!((r - 1.0).abs() < f64::EPSILON);
        }
        assert!((report.overview.average_comprehension - 70.0).abs() < 1e-9);
        assert!((report.overview.average_assessment_score - 72.5).abs() < 1e-9);
        assert!((report.overview.average_engagement_time - 55.0).abs() < 1e-9);

        // B has attention/focus 50, so the attention rule fires before the score rule
        assert_eq!(
            result.assignments,
            vec![Cluster::HighPerformers, Cluster::AttentionSeekers]
        );

        assert!((report.model_performance.accuracy - 0.95).abs() < 1e-9);
        assert!((report.model_performance.mse - 22.0).abs() < 1e-9);
        assert!((report.model_performance.r2_score - 1.0).abs() < 1e-9);
        assert_eq!(report.key_findings.len(), 5);
        assert_eq!(
            report.key_findings[0],
            "Comprehension shows strong correlation with assessment scores (r = 1.000)"
        );
    }

    #[test]
    fn test_developing_learner_scenario() {
        let records = vec![
            student("A", [90.0, 90.0, 90.0, 90.0, 95.0, 80.0]),
            student("B", [60.0, 60.0, 60.0, 60.0, 50.0, 30.0]),
        ];
        let result = analyze(&records).expect("analyze");

        assert_eq!(
            result.assignments,
            vec![Cluster::HighPerformers, Cluster::DevelopingLearners]
        );
        assert_eq!(
            result.report.clusters.keys().copied().collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn test_attention_rule_beats_score_rule() {
        let records = vec![student("A", [90.0, 55.0, 90.0, 90.0, 80.0, 60.0])];
        let result = analyze(&records).expect("analyze");

        assert_eq!(result.assignments, vec![Cluster::AttentionSeekers]);
        assert_eq!(result.report.clusters[&2].count, 1);
    }

    #[test]
    fn test_constant_scores_scenario() {
        let records = vec![
            student("A", [70.0, 65.0, 80.0, 60.0, 75.0, 40.0]),
            student("B", [70.0, 85.0, 62.0, 90.0, 75.0, 55.0]),
            student("C", [70.0, 75.0, 71.0, 70.0, 75.0, 65.0]),
        ];
        let report = analyze(&records).expect("analyze").report;

        assert_eq!(report.correlations.comprehension, 0.0);
        assert!((report.model_performance.accuracy - 0.7).abs() < 1e-12);
        assert!((report.model_performance.r2_score - 0.5).abs() < 1e-12);
        assert!((report.model_performance.mse - 20.0).abs() < 1e-12);

        // every predictor is uncorrelated with a constant score
        for entry in &report.feature_importance {
            assert!((entry.importance - 0.2).abs() < 1e-12);
        }
    }

    #[test]
    fn test_fractional_constant_score_scenario() {
        let records = vec![
            student("A", [72.3, 65.1, 80.2, 60.4, 72.7, 40.0]),
            student("B", [81.0, 85.7, 62.9, 90.1, 72.7, 55.3]),
            student("C", [64.4, 75.2, 71.8, 70.6, 72.7, 65.1]),
            student("D", [77.7, 58.3, 66.6, 73.2, 72.7, 47.8]),
            student("E", [59.7, 88.9, 91.3, 33.3, 72.7, 81.2]),
            student("F", [90.1, 70.3, 64.5, 85.5, 72.7, 29.9]),
            student("G", [66.6, 61.1, 77.4, 69.8, 72.7, 52.6]),
        ];
        let report = analyze(&records).expect("analyze").report;

        for (_, r) in report.correlations.entries() {
            assert_eq!(r.to_bits(), 0.0f64.to_bits());
        }
        for entry in &report.feature_importance {
            assert!((entry.importance - 0.2).abs() < 1e-12);
        }
        let order: Vec<Field> = report.feature_importance.iter().map(|f| f.feature).collect();
        assert_eq!(order, Field::PREDICTORS.to_vec());
        assert_eq!(report.model_performance.accuracy, 0.7);
        assert_eq!(report.model_performance.r2_score, 0.5);

        let json = serde_json::to_string(&report).expect("serialize");
        assert!(!json.contains("-0.0"));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(analyze(&[]), Err(CogError::EmptyDataset)));
    }

    #[test]
    fn test_correlations_rounded_to_three_places() {
        let records = vec![
            student("A", [72.3, 65.1, 80.2, 60.4, 75.5, 40.0]),
            student("B", [81.0, 85.7, 62.9, 90.1, 88.2, 55.3]),
            student("C", [64.4, 75.2, 71.8, 70.6, 69.9, 65.1]),
            student("D", [77.7, 58.3, 66.6, 73.2, 79.4, 47.8]),
        ];
        let report = analyze(&records).expect("analyze").report;

        for (_, r) in report.correlations.entries() {
            assert!((r * 1000.0 - (r * 1000.0).round()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_column_stats_and_matrix_cover_all_fields() {
        let result = analyze(&two_students()).expect("analyze");

        assert_eq!(result.column_stats.len(), 6);
        assert_eq!(result.column_stats[4].name, "assessment_score");
        assert!((result.column_stats[4].mean - 72.5).abs() < 1e-9);
        assert_eq!(result.correlation.matrix.len(), 6);
    }

    fn arb_record() -> impl Strategy<Value = StudentRecord> {
        (
            prop::array::uniform5(0.0..100.0f64),
            0.0..150.0f64,
            prop::option::of(0u8..4),
        )
            .prop_map(|(skills, engagement, tag)| {
                let [c, a, f, r, s] = skills;
                let mut record = student("P", [c, a, f, r, s, engagement]);
                record.cluster = tag.and_then(Cluster::from_id);
                record
            })
    }

    proptest! {
        #[test]
        fn prop_report_invariants(records in prop::collection::vec(arb_record(), 1..40)) {
            let result = analyze(&records).expect("analyze");
            let report = &result.report;

            for (_, r) in report.correlations.entries() {
                prop_assert!((-1.0..=1.0).contains(&r));
            }

            let total: f64 = report.feature_importance.iter().map(|f| f.importance).sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
            prop_assert!(report.feature_importance.iter().all(|f| f.importance >= 0.0));

            prop_assert_eq!(result.assignments.len(), records.len());
            for (record, cluster) in records.iter().zip(&result.assignments) {
                if let Some(tag) = record.cluster {
                    prop_assert_eq!(tag, *cluster);
                }
            }

            let counted: usize = report.clusters.values().map(|c| c.count).sum();
            prop_assert_eq!(counted, records.len());
            for (&id, summary) in &report.clusters {
                let scores: Vec<f64> = records
                    .iter()
                    .zip(&result.assignments)
                    .filter(|(_, c)| c.id() == id)
                    .map(|(r, _)| r.assessment_score)
                    .collect();
                prop_assert_eq!(summary.count, scores.len());
                prop_assert!((summary.average_score - mean(&scores)).abs() < 1e-9);
            }

            prop_assert!((0.6..=0.95).contains(&report.model_performance.accuracy));
            prop_assert!((0.5..=1.0).contains(&report.model_performance.r2_score));
        }

        #[test]
        fn prop_constant_score_gives_uniform_importance(
            records in prop::collection::vec(arb_record(), 1..30),
            score in 0.0..100.0f64,
        ) {
            let records: Vec<StudentRecord> = records
                .into_iter()
                .map(|mut r| {
                    r.assessment_score = score;
                    r
                })
                .collect();
            let report = analyze(&records).expect("analyze").report;

            for (_, r) in report.correlations.entries() {
                prop_assert_eq!(r.to_bits(), 0.0f64.to_bits());
            }
            for entry in &report.feature_importance {
                prop_assert!((entry.importance - 0.2).abs() < 1e-12);
            }
            prop_assert_eq!(report.model_performance.accuracy, 0.7);
            prop_assert_eq!(report.model_performance.r2_score, 0.5);
        }

        #[test]
        fn prop_analyze_is_idempotent(records in prop::collection::vec(arb_record(), 1..20)) {
            let first = analyze(&records).expect("analyze").report;
            let second = analyze(&records).expect("analyze").report;
            prop_assert_eq!(
                serde_json::to_string(&first).expect("serialize"),
                serde_json::to_string(&second).expect("serialize")
            );
        }
    }
}

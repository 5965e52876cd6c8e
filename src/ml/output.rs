//! Report envelopes and output file writers for the analyze command

use crate::structs::{
    AnalysisResult, AnalyticsReport, ApiResponse, Cluster, ColumnStats, CorrelationMatrix, Result,
    Source, StudentDataset,
};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Error text exposed to callers when analysis fails
pub const ANALYTICS_FAILURE: &str = "Failed to fetch analytics data";

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`
    pub fn ok(data: T, source: Source, record_count: Option<usize>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            source: Some(source),
            record_count,
        }
    }

    /// Failed response with a caller-facing message
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            source: None,
            record_count: None,
        }
    }
}

/// Envelope for a report computed from an uploaded dataset
#[must_use]
pub fn uploaded_response(
    dataset: &StudentDataset,
    report: AnalyticsReport,
) -> ApiResponse<AnalyticsReport> {
    ApiResponse::ok(report, Source::Uploaded, Some(dataset.record_count))
}

/// Envelope for the fixed fallback report
#[must_use]
pub fn mock_response() -> ApiResponse<AnalyticsReport> {
    ApiResponse::ok(super::mock::mock_report(), Source::Mock, None)
}

/// Serialize any value as JSON, pretty unless `compact`
///
/// # Errors
/// Returns error if serialization fails
pub fn to_json<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

/// Build the human readable `summary.txt` content
#[must_use]
pub fn build_summary(dataset: &StudentDataset, result: &AnalysisResult) -> String {
    use std::fmt::Write as _;

    let report = &result.report;
    let mut s = String::new();

    let _ = writeln!(s, "# Student Analytics Summary");
    let _ = writeln!(
        s,
        "Source: {} ({} records, loaded {})",
        dataset.filename, dataset.record_count, dataset.uploaded_at
    );

    let _ = writeln!(s);
    let _ = writeln!(s, "## Overview");
    let o = &report.overview;
    let _ = writeln!(s, "- comprehension: {:.1}", o.average_comprehension);
    let _ = writeln!(s, "- attention: {:.1}", o.average_attention);
    let _ = writeln!(s, "- focus: {:.1}", o.average_focus);
    let _ = writeln!(s, "- retention: {:.1}", o.average_retention);
    let _ = writeln!(s, "- engagement_time: {:.1}", o.average_engagement_time);
    let _ = writeln!(s, "- assessment_score: {:.1}", o.average_assessment_score);

    let _ = writeln!(s);
    let _ = writeln!(s, "## Feature Importance");
    for entry in &report.feature_importance {
        let r = report.correlations.get(entry.feature).unwrap_or_default();
        let _ = writeln!(
            s,
            "- {}: {:.1}% (r = {r:.3})",
            entry.feature.name(),
            entry.importance * 100.0
        );
    }

    let _ = writeln!(s);
    let _ = writeln!(s, "## Learning Personas");
    for (&id, cluster) in &report.clusters {
        let color = Cluster::from_id(id).map_or("gray", Cluster::color);
        let _ = writeln!(
            s,
            "- [{id}] {} ({color}): {} students, average score {:.1}",
            cluster.name, cluster.count, cluster.average_score
        );
    }

    let _ = writeln!(s);
    let _ = writeln!(s, "## Column Statistics");
    for stats in &result.column_stats {
        let _ = writeln!(s, "- {}", stats.summary());
    }

    let _ = writeln!(s);
    let _ = writeln!(s, "## Key Findings");
    for finding in &report.key_findings {
        let _ = writeln!(s, "- {finding}");
    }

    s
}

/// Write `summary.txt`
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_summary(output_dir: &Path, content: &str) -> Result<()> {
    fs::write(output_dir.join("summary.txt"), content)?;
    Ok(())
}

/// Write `report.json` - the response envelope
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_report(output_dir: &Path, response: &ApiResponse<AnalyticsReport>) -> Result<()> {
    let json = to_json(response, false)?;
    fs::write(output_dir.join("report.json"), json)?;
    Ok(())
}

/// Write `clusters.csv` - persona assignment for each student
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_clusters(
    output_dir: &Path,
    dataset: &StudentDataset,
    result: &AnalysisResult,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_dir.join("clusters.csv"))?;
    writer.write_record(["student_id", "cluster", "cluster_name"])?;

    for (student, cluster) in dataset.students.iter().zip(&result.assignments) {
        let id = cluster.id().to_string();
        writer.write_record([student.student_id.as_str(), id.as_str(), cluster.name()])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write `correlation.csv` - full field-by-field correlation matrix
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_correlation(output_dir: &Path, corr: &CorrelationMatrix) -> Result<()> {
    use std::fmt::Write as _;

    let mut content = String::from("field,");
    content.push_str(&corr.names.join(","));
    content.push('\n');

    for (name, row) in corr.names.iter().zip(&corr.matrix) {
        let values: Vec<String> = row.iter().map(|r| format!("{r:.4}")).collect();
        let _ = writeln!(content, "{name},{}", values.join(","));
    }

    fs::write(output_dir.join("correlation.csv"), content)?;
    Ok(())
}

/// Write `stats.json` - descriptive statistics per numeric field
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_stats_json(
    output_dir: &Path,
    dataset: &StudentDataset,
    stats: &[ColumnStats],
) -> Result<()> {
    let output = StatsOutput {
        filename: &dataset.filename,
        uploaded_at: &dataset.uploaded_at,
        record_count: dataset.record_count,
        statistics: stats,
    };

    let json = serde_json::to_string_pretty(&output)?;
    fs::write(output_dir.join("stats.json"), json)?;
    Ok(())
}

#[derive(Serialize)]
struct StatsOutput<'a> {
    filename: &'a str,
    uploaded_at: &'a str,
    record_count: usize,
    statistics: &'a [ColumnStats],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::pipeline::analyze;
    use crate::ml::student;
    use tempfile::TempDir;

    fn dataset() -> StudentDataset {
        let students = vec![
            student("STU0001", [90.0, 90.0, 90.0, 90.0, 95.0, 80.0]),
            student("STU0002", [60.0, 60.0, 60.0, 60.0, 50.0, 30.0]),
        ];
        StudentDataset {
            record_count: students.len(),
            students,
            uploaded_at: "2026-10-19T00:00:00.000Z".into(),
            filename: "students.csv".into(),
        }
    }

    #[test]
    fn test_uploaded_envelope() {
        let data = dataset();
        let result = analyze(&data.students).expect("analyze");
        let response = uploaded_response(&data, result.report);

        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["success"], true);
        assert_eq!(json["source"], "uploaded");
        assert_eq!(json["recordCount"], 2);
        assert!(json.get("error").is_none());
        assert_eq!(json["data"]["clusters"]["1"]["count"], 1);
    }

    #[test]
    fn test_mock_and_failure_envelopes() {
        let json = serde_json::to_value(mock_response()).expect("serialize");
        assert_eq!(json["source"], "mock");
        assert!(json.get("recordCount").is_none());

        let failure: ApiResponse<AnalyticsReport> = ApiResponse::failure(ANALYTICS_FAILURE);
        let json = serde_json::to_value(&failure).expect("serialize");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], ANALYTICS_FAILURE);
        assert!(json.get("data").is_none());
        assert!(json.get("source").is_none());
    }

    #[test]
    fn test_write_all_outputs() {
        let dir = TempDir::new().expect("create temp dir");
        let data = dataset();
        let result = analyze(&data.students).expect("analyze");

        write_summary(dir.path(), &build_summary(&data, &result)).expect("write summary");
        write_clusters(dir.path(), &data, &result).expect("write clusters");
        write_correlation(dir.path(), &result.correlation).expect("write correlation");
        write_stats_json(dir.path(), &data, &result.column_stats).expect("write stats");
        write_report(dir.path(), &uploaded_response(&data, result.report.clone()))
            .expect("write report");

        let summary = fs::read_to_string(dir.path().join("summary.txt")).expect("read");
        assert!(summary.contains("students.csv (2 records"));
        assert!(summary.contains("[1] High Performers (green): 1 students"));
        assert!(summary.contains("Analysis performed on 2 student records"));

        let clusters = fs::read_to_string(dir.path().join("clusters.csv")).expect("read");
        assert!(clusters.starts_with("student_id,cluster,cluster_name\n"));
        assert!(clusters.contains("STU0001,1,High Performers"));
        assert!(clusters.contains("STU0002,3,Developing Learners"));

        let corr = fs::read_to_string(dir.path().join("correlation.csv")).expect("read");
        assert!(corr.starts_with("field,comprehension,attention,focus,retention,assessment_score,engagement_time\n"));
        assert_eq!(corr.lines().count(), 7);

        let stats: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("stats.json")).expect("read"),
        )
        .expect("parse");
        assert_eq!(stats["record_count"], 2);
        assert_eq!(stats["statistics"].as_array().map(Vec::len), Some(6));

        let report: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("report.json")).expect("read"),
        )
        .expect("parse");
        assert_eq!(report["data"]["keyFindings"].as_array().map(Vec::len), Some(5));
    }
}

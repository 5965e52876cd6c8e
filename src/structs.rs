//! Consolidated public types for the cogscope crate
//!
//! This module contains the record schema, the report contract and the error
//! type shared by the CSV boundary, the analytics core and the CLI.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum CogError {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Cannot analyze an empty dataset")]
    EmptyDataset,

    #[error("ML error: {0}")]
    Ml(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CogError>;

// ============================================================================
// Record Types
// ============================================================================

/// Numeric fields carried by every student record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Comprehension,
    Attention,
    Focus,
    Retention,
    AssessmentScore,
    EngagementTime,
}

impl Field {
    /// All numeric fields, in CSV column order
    pub const ALL: [Self; 6] = [
        Self::Comprehension,
        Self::Attention,
        Self::Focus,
        Self::Retention,
        Self::AssessmentScore,
        Self::EngagementTime,
    ];

    /// Fields correlated against `assessment_score`, in report order
    pub const PREDICTORS: [Self; 5] = [
        Self::Comprehension,
        Self::Attention,
        Self::Focus,
        Self::Retention,
        Self::EngagementTime,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Comprehension => "comprehension",
            Self::Attention => "attention",
            Self::Focus => "focus",
            Self::Retention => "retention",
            Self::AssessmentScore => "assessment_score",
            Self::EngagementTime => "engagement_time",
        }
    }

    /// Extract this field as a column, in record order
    #[must_use]
    pub fn values(self, records: &[StudentRecord]) -> Vec<f64> {
        records.iter().map(|r| r.value(self)).collect()
    }
}

/// One of the four fixed learner personas
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Cluster {
    BalancedLearners,
    HighPerformers,
    AttentionSeekers,
    DevelopingLearners,
}

impl Cluster {
    pub const ALL: [Self; 4] = [
        Self::BalancedLearners,
        Self::HighPerformers,
        Self::AttentionSeekers,
        Self::DevelopingLearners,
    ];

    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Self::BalancedLearners => 0,
            Self::HighPerformers => 1,
            Self::AttentionSeekers => 2,
            Self::DevelopingLearners => 3,
        }
    }

    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::BalancedLearners => "Balanced Learners",
            Self::HighPerformers => "High Performers",
            Self::AttentionSeekers => "Attention Seekers",
            Self::DevelopingLearners => "Developing Learners",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::BalancedLearners => {
                "Shows consistent performance across all cognitive areas with balanced strengths."
            }
            Self::HighPerformers => {
                "Demonstrates exceptional performance with high scores in most cognitive areas."
            }
            Self::AttentionSeekers => {
                "May benefit from attention and focus improvement strategies to reach full potential."
            }
            Self::DevelopingLearners => {
                "Shows potential for growth with targeted support in key learning areas."
            }
        }
    }

    /// Badge color used by presentation layers
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::BalancedLearners => "blue",
            Self::HighPerformers => "green",
            Self::AttentionSeekers => "yellow",
            Self::DevelopingLearners => "red",
        }
    }
}

impl From<Cluster> for u8 {
    fn from(cluster: Cluster) -> Self {
        cluster.id()
    }
}

/// A single student row, validated at the CSV boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub name: String,
    pub class: String,
    pub comprehension: f64,
    pub attention: f64,
    pub focus: f64,
    pub retention: f64,
    pub assessment_score: f64,
    pub engagement_time: f64,
    /// Pre-assigned persona, if the source already carried one
    pub cluster: Option<Cluster>,
}

impl StudentRecord {
    #[must_use]
    pub fn value(&self, field: Field) -> f64 {
        match field {
            Field::Comprehension => self.comprehension,
            Field::Attention => self.attention,
            Field::Focus => self.focus,
            Field::Retention => self.retention,
            Field::AssessmentScore => self.assessment_score,
            Field::EngagementTime => self.engagement_time,
        }
    }
}

/// Immutable snapshot of an uploaded dataset
#[derive(Debug, Clone)]
pub struct StudentDataset {
    pub students: Vec<StudentRecord>,
    /// RFC 3339 upload timestamp
    pub uploaded_at: String,
    pub filename: String,
    pub record_count: usize,
}

impl StudentDataset {
    #[must_use]
    pub fn find(&self, student_id: &str) -> Option<&StudentRecord> {
        self.students.iter().find(|s| s.student_id == student_id)
    }
}

// ============================================================================
// Statistics Types
// ============================================================================

/// Descriptive statistics for a numeric column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub iqr: f64,
}

impl ColumnStats {
    /// Format as a summary string
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: n={}, mean={:.2}, std={:.2}, min={:.2}, Q1={:.2}, median={:.2}, Q3={:.2}, max={:.2}, IQR={:.2}",
            self.name, self.count, self.mean, self.std_dev, self.min, self.q1, self.median, self.q3, self.max, self.iqr
        )
    }
}

/// Pairwise Pearson correlations between all numeric fields
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

// ============================================================================
// Report Types
// ============================================================================

/// Per-field averages across the whole dataset, rounded to one decimal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub average_comprehension: f64,
    pub average_attention: f64,
    pub average_focus: f64,
    pub average_retention: f64,
    pub average_engagement_time: f64,
    pub average_assessment_score: f64,
}

/// One value per predictor field
///
/// Used both for correlations against `assessment_score` and for the
/// per-cluster skill averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkillScores {
    pub comprehension: f64,
    pub attention: f64,
    pub focus: f64,
    pub retention: f64,
    pub engagement_time: f64,
}

impl SkillScores {
    /// Build from a per-field function, evaluated in predictor order
    pub fn from_fn(mut f: impl FnMut(Field) -> f64) -> Self {
        Self {
            comprehension: f(Field::Comprehension),
            attention: f(Field::Attention),
            focus: f(Field::Focus),
            retention: f(Field::Retention),
            engagement_time: f(Field::EngagementTime),
        }
    }

    /// Apply `f` to every value
    #[must_use]
    pub fn map(self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self {
            comprehension: f(self.comprehension),
            attention: f(self.attention),
            focus: f(self.focus),
            retention: f(self.retention),
            engagement_time: f(self.engagement_time),
        }
    }

    /// Look up a predictor; `assessment_score` has no slot and yields `None`
    #[must_use]
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::Comprehension => Some(self.comprehension),
            Field::Attention => Some(self.attention),
            Field::Focus => Some(self.focus),
            Field::Retention => Some(self.retention),
            Field::EngagementTime => Some(self.engagement_time),
            Field::AssessmentScore => None,
        }
    }

    /// `(field, value)` pairs in predictor order
    #[must_use]
    pub fn entries(&self) -> [(Field, f64); 5] {
        [
            (Field::Comprehension, self.comprehension),
            (Field::Attention, self.attention),
            (Field::Focus, self.focus),
            (Field::Retention, self.retention),
            (Field::EngagementTime, self.engagement_time),
        ]
    }
}

/// Synthetic model-quality proxy derived from the comprehension correlation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPerformance {
    pub accuracy: f64,
    pub mse: f64,
    pub r2_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: Field,
    pub importance: f64,
}

/// Aggregate statistics for one non-empty cluster
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub name: String,
    pub count: usize,
    pub average_score: f64,
    pub characteristics: SkillScores,
}

/// Full analytics output handed to presentation layers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub overview: Overview,
    pub correlations: SkillScores,
    pub model_performance: ModelPerformance,
    pub feature_importance: Vec<FeatureImportance>,
    /// Keyed by cluster id; empty clusters are absent
    pub clusters: BTreeMap<u8, ClusterSummary>,
    pub key_findings: Vec<String>,
}

/// Everything the pipeline computes for one snapshot
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub report: AnalyticsReport,
    /// Cluster for each input record, in input order
    pub assignments: Vec<Cluster>,
    pub column_stats: Vec<ColumnStats>,
    pub correlation: CorrelationMatrix,
}

// ============================================================================
// Response Types
// ============================================================================

/// Where a report came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Uploaded,
    Mock,
}

/// Envelope wrapping a payload for API-style consumers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<usize>,
}

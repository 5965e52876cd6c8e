//! Feature importance from normalized absolute correlations

use crate::structs::{FeatureImportance, SkillScores};

/// Rank predictors by their share of total absolute correlation
///
/// Weights are non-negative and sum to 1. When every correlation is zero the
/// weights fall back to uniform, in predictor order. Ties keep predictor order.
/// A non-finite correlation is not corrected and yields non-finite weights.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
pub fn feature_importance(correlations: &SkillScores) -> Vec<FeatureImportance> {
    let entries = correlations.entries();
    let total: f64 = entries.iter().map(|(_, r)| r.abs()).sum();

    let mut ranked: Vec<FeatureImportance> = if total != 0.0 {
        entries
            .iter()
            .map(|&(feature, r)| FeatureImportance {
                feature,
                importance: r.abs() / total,
            })
            .collect()
    } else {
        let uniform = 1.0 / entries.len() as f64;
        entries
            .iter()
            .map(|&(feature, _)| FeatureImportance {
                feature,
                importance: uniform,
            })
            .collect()
    };

    // sort_by is stable, so equal weights keep predictor order
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked
}

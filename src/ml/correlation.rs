//! Correlation of student fields against the assessment score

use crate::ml::stats::correlation;
use crate::structs::{CorrelationMatrix, Field, Result, SkillScores, StudentRecord};

/// Pearson correlation of each predictor against `assessment_score`
///
/// Values are unrounded; the report rounds them for display.
///
/// # Errors
/// Returns error if `records` is empty
pub fn correlations_with_score(records: &[StudentRecord]) -> Result<SkillScores> {
    let scores = Field::AssessmentScore.values(records);

    let mut values = [0.0; 5];
    for (slot, field) in values.iter_mut().zip(Field::PREDICTORS) {
        *slot = correlation(&field.values(records), &scores)?;
    }
    let [comprehension, attention, focus, retention, engagement_time] = values;

    Ok(SkillScores {
        comprehension,
        attention,
        focus,
        retention,
        engagement_time,
    })
}

/// Compute the `NxN` correlation matrix between all numeric fields
///
/// # Errors
/// Returns error if `records` is empty
pub fn correlation_matrix(records: &[StudentRecord]) -> Result<CorrelationMatrix> {
    let n = Field::ALL.len();
    let mut matrix = vec![vec![0.0; n]; n];

    let columns: Vec<Vec<f64>> = Field::ALL.iter().map(|f| f.values(records)).collect();

    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = correlation(&columns[i], &columns[j])?;
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        names: Field::ALL.iter().map(|f| f.name().to_string()).collect(),
        matrix,
    })
}

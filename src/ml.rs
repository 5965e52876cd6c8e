pub mod clustering;
pub mod correlation;
pub mod features;
pub mod findings;
pub mod mock;
pub mod output;
pub mod pipeline;
pub mod profile;
pub mod stats;

/// Build a record from `[comprehension, attention, focus, retention, assessment_score, engagement_time]`
#[cfg(test)]
pub(crate) fn student(id: &str, values: [f64; 6]) -> crate::structs::StudentRecord {
    let [comprehension, attention, focus, retention, assessment_score, engagement_time] = values;
    crate::structs::StudentRecord {
        student_id: id.to_string(),
        name: format!("Student {id}"),
        class: "Grade 10A".to_string(),
        comprehension,
        attention,
        focus,
        retention,
        assessment_score,
        engagement_time,
        cluster: None,
    }
}

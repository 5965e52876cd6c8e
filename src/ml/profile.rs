//! Per-student profile: persona, grade, strengths and recommendations

use crate::ml::clustering::classify;
use crate::structs::{Cluster, SkillScores, StudentRecord};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Strength {
    pub skill: &'static str,
    pub level: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub student_id: String,
    pub name: String,
    pub class: String,
    pub assessment_score: f64,
    pub cluster: Cluster,
    pub cluster_name: &'static str,
    pub cluster_description: &'static str,
    pub cluster_color: &'static str,
    pub grade: &'static str,
    pub skills_profile: SkillScores,
    pub strengths: Vec<Strength>,
    pub recommendations: Vec<Recommendation>,
}

impl StudentProfile {
    #[must_use]
    pub fn build(record: &StudentRecord) -> Self {
        let cluster = record.cluster.unwrap_or_else(|| classify(record));
        Self {
            student_id: record.student_id.clone(),
            name: record.name.clone(),
            class: record.class.clone(),
            assessment_score: record.assessment_score,
            cluster,
            cluster_name: cluster.name(),
            cluster_description: cluster.description(),
            cluster_color: cluster.color(),
            grade: letter_grade(record.assessment_score),
            skills_profile: SkillScores::from_fn(|field| record.value(field)),
            strengths: strengths(record),
            recommendations: recommendations(record),
        }
    }
}

#[must_use]
pub fn letter_grade(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "A+",
        s if s >= 85.0 => "A",
        s if s >= 80.0 => "B+",
        s if s >= 75.0 => "B",
        s if s >= 70.0 => "C+",
        s if s >= 65.0 => "C",
        _ => "D",
    }
}

fn strengths(record: &StudentRecord) -> Vec<Strength> {
    let skills = [
        ("Comprehension", record.comprehension),
        ("Attention", record.attention),
        ("Focus", record.focus),
        ("Retention", record.retention),
        ("Engagement", record.engagement_time),
    ];

    skills
        .into_iter()
        .filter_map(|(skill, value)| {
            let level = if value >= 80.0 {
                "Excellent"
            } else if value >= 70.0 {
                "Good"
            } else {
                return None;
            };
            Some(Strength { skill, level, value })
        })
        .collect()
}

fn recommendations(record: &StudentRecord) -> Vec<Recommendation> {
    let rules = [
        (
            record.attention < 60.0,
            Recommendation {
                kind: "attention",
                title: "Improve Attention Skills",
                description: "Consider shorter learning sessions with frequent breaks",
                priority: Priority::High,
            },
        ),
        (
            record.focus < 60.0,
            Recommendation {
                kind: "focus",
                title: "Enhance Focus Techniques",
                description: "Implement mindfulness exercises and distraction-free environments",
                priority: Priority::High,
            },
        ),
        (
            record.comprehension < 70.0,
            Recommendation {
                kind: "comprehension",
                title: "Strengthen Comprehension",
                description: "Use visual aids and interactive learning materials",
                priority: Priority::Medium,
            },
        ),
        (
            record.retention < 70.0,
            Recommendation {
                kind: "retention",
                title: "Improve Memory Retention",
                description: "Practice spaced repetition and active recall techniques",
                priority: Priority::Medium,
            },
        ),
        (
            record.engagement_time < 45.0,
            Recommendation {
                kind: "engagement",
                title: "Increase Engagement",
                description: "Incorporate gamification and interactive elements",
                priority: Priority::Medium,
            },
        ),
    ];

    rules
        .into_iter()
        .filter_map(|(applies, rec)| applies.then_some(rec))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::student;

    #[test]
    fn test_letter_grades() {
        assert_eq!(letter_grade(95.0), "A+");
        assert_eq!(letter_grade(85.0), "A");
        assert_eq!(letter_grade(80.0), "B+");
        assert_eq!(letter_grade(77.0), "B");
        assert_eq!(letter_grade(70.0), "C+");
        assert_eq!(letter_grade(65.0), "C");
        assert_eq!(letter_grade(64.9), "D");
    }

    #[test]
    fn test_struggling_student_profile() {
        let record = student("STU0007", [65.0, 55.0, 58.0, 82.0, 72.0, 40.0]);
        let profile = StudentProfile::build(&record);

        assert_eq!(profile.cluster, Cluster::AttentionSeekers);
        assert_eq!(profile.cluster_name, "Attention Seekers");
        assert_eq!(profile.grade, "C+");

        let kinds: Vec<&str> = profile.recommendations.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec!["attention", "focus", "comprehension", "engagement"]);
        assert_eq!(profile.recommendations[0].priority, Priority::High);
        assert_eq!(profile.recommendations[2].priority, Priority::Medium);

        assert_eq!(profile.strengths.len(), 1);
        assert_eq!(profile.strengths[0].skill, "Retention");
        assert_eq!(profile.strengths[0].level, "Excellent");
    }

    #[test]
    fn test_profile_keeps_existing_tag() {
        let mut record = student("STU0008", [90.0, 85.0, 88.0, 75.0, 92.0, 70.0]);
        record.cluster = Some(Cluster::BalancedLearners);
        let profile = StudentProfile::build(&record);

        assert_eq!(profile.cluster, Cluster::BalancedLearners);
        assert!(profile.recommendations.is_empty());
        assert_eq!(profile.strengths.len(), 5);
        assert_eq!(profile.strengths[3].level, "Good");

        let json = serde_json::to_value(&profile).expect("serialize");
        assert_eq!(json["cluster"], 0);
        assert_eq!(json["clusterName"], "Balanced Learners");
        assert_eq!(json["clusterColor"], "blue");
        assert_eq!(json["skillsProfile"]["engagement_time"], 70.0);
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Activity;

pub const DEFAULT_WEEKLY_HOURS_CAP: u32 = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestScore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sat: Option<TestScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act: Option<TestScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub student_id: String,
    pub current_grade: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intended_major: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa_unweighted: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa_weighted: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curriculum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_hours_cap: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grades_by_subject: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<TestScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<String>>,
}

impl StudentProfile {
    pub fn weekly_hours_cap_or_default(&self) -> u32 {
        self.weekly_hours_cap
            .filter(|cap| *cap > 0)
            .unwrap_or(DEFAULT_WEEKLY_HOURS_CAP)
    }
}

/// Response of `GET /profile/{id}`. A student the backend has never seen
/// comes back as `profile: None` with no activities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileEnvelope {
    #[serde(default)]
    pub profile: Option<StudentProfile>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

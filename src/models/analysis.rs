use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Activity, StudentProfile};

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioAnalyzeRequest {
    pub country_tracks: Vec<String>,
    pub schools: Vec<String>,
    pub deadlines: BTreeMap<String, String>,
    pub weekly_hours_cap: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_profile: Option<StudentProfile>,
    pub portfolio: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationTask {
    pub title: String,
    #[serde(default)]
    pub track: String,
    #[serde(default)]
    pub estimated_hours: f64,
    #[serde(default)]
    pub definition_of_done: Vec<String>,
    #[serde(default)]
    pub micro_coaching: String,
    #[serde(default)]
    pub quick_links: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    pub theme: String,
    pub share: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    #[serde(default)]
    pub impact_total: f64,
    #[serde(default)]
    pub lens_scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub coverage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spike: Option<Spike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lens: Option<String>,
    pub severity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalImprovement {
    pub gap_type: String,
    pub gap_description: String,
    pub severity: f64,
    #[serde(default)]
    pub tasks: Vec<RecommendationTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensImprovement {
    pub lens: String,
    pub current_score: f64,
    #[serde(default)]
    pub improvement_opportunity: String,
    #[serde(default)]
    pub tasks: Vec<RecommendationTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversitySpike {
    pub has_spike: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spike_theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spike_share: Option<f64>,
    #[serde(default)]
    pub coverage_index: f64,
    #[serde(default)]
    pub needs_improvement: bool,
    #[serde(default)]
    pub tasks: Vec<RecommendationTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentPriority {
    pub school_name: String,
    pub alignment_score: f64,
    #[serde(default)]
    pub is_high_alignment: bool,
    #[serde(default)]
    pub priority_tasks: Vec<String>,
    #[serde(default)]
    pub alignment_notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestAnalysis {
    pub school_name: String,
    pub test_policy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid50_scores: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitiveness: Option<String>,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub tasks: Vec<RecommendationTask>,
}

/// The backend's portfolio report. Rendered as-is; nothing here is computed
/// locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    #[serde(default)]
    pub scores: Scores,
    #[serde(default)]
    pub gaps: Vec<Gap>,
    #[serde(default)]
    pub critical_improvements: Vec<CriticalImprovement>,
    #[serde(default)]
    pub lens_improvements: Vec<LensImprovement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diversity_spike: Option<DiversitySpike>,
    #[serde(default)]
    pub alignment_priorities: Vec<AlignmentPriority>,
    #[serde(default)]
    pub standardized_tests: Vec<TestAnalysis>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LensBand {
    Strong,
    Moderate,
    Developing,
    Weak,
}

impl LensBand {
    /// Bands on the backend's 0-10 lens scale.
    pub fn for_score(score: f64) -> Self {
        if score >= 7.0 {
            Self::Strong
        } else if score >= 4.0 {
            Self::Moderate
        } else if score >= 2.0 {
            Self::Developing
        } else {
            Self::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Developing => "developing",
            Self::Weak => "weak",
        }
    }
}

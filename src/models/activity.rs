use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub level: String,
}

/// An extracurricular activity as the backend stores it ("evidence").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub lens: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_of_activity: Option<String>,
    pub role_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_per_week: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awards: Option<Vec<Award>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people_impacted: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_links: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_raw: Option<String>,
}

pub const LENSES: &[&str] = &[
    "Curiosity",
    "Growth",
    "Community",
    "Creativity",
    "Leadership",
    "Achievements",
];

/// Canonical spelling of a lens name, matched case-insensitively.
pub fn normalize_lens(name: &str) -> Option<&'static str> {
    let name = name.trim();
    LENSES.iter().copied().find(|lens| lens.eq_ignore_ascii_case(name))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recommended task opened for step-by-step work. Snapshotted into session
/// storage when opened so the checklist stays stable while it is worked on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningTask {
    pub id: String,
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
    #[serde(rename = "lensName", default, skip_serializing_if = "Option::is_none")]
    pub lens_name: Option<String>,
    #[serde(rename = "gapDescription", default, skip_serializing_if = "Option::is_none")]
    pub gap_description: Option<String>,
}

/// One checklist item. Never stored: rebuilt from `definition_of_done` by
/// position every time a task is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskStep {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub order: u32,
}

/// Persisted progress for one task, in the browser-compatible camelCase shape.
///
/// `current_step` always equals `completed_steps.len()`; every mutation in
/// `db::progress_repo` recomputes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgress {
    pub task_id: String,
    pub completed_steps: Vec<String>,
    pub current_step: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u32>,
}

impl TaskProgress {
    pub fn new(task_id: &str, started_at: DateTime<Utc>) -> Self {
        Self {
            task_id: task_id.to_string(),
            completed_steps: Vec::new(),
            current_step: 0,
            started_at: Some(started_at),
            completed_at: None,
            notes: None,
            time_spent: None,
        }
    }

    pub fn is_completed(&self, step_id: &str) -> bool {
        self.completed_steps.iter().any(|s| s == step_id)
    }
}

//! Learning-task progress. All records live in one JSON map under the local
//! key `task_progress`, keyed by task id; every write rewrites the whole map.

use std::collections::BTreeMap;

use chrono::Utc;
use rusqlite::Connection;
use tracing::{debug, warn};

use crate::db::storage_repo::{self, Scope};
use crate::error::DeskError;
use crate::models::{TaskProgress, TaskStep};

pub const STORAGE_KEY: &str = "task_progress";

pub type ProgressMap = BTreeMap<String, TaskProgress>;

/// Load every progress record. A missing or unreadable blob yields an empty map.
pub fn load_all_progress(conn: &Connection) -> Result<ProgressMap, DeskError> {
    let Some(raw) = storage_repo::get_item(conn, Scope::Local, STORAGE_KEY)? else {
        return Ok(ProgressMap::new());
    };
    match serde_json::from_str::<ProgressMap>(&raw) {
        Ok(map) => Ok(map),
        Err(e) => {
            warn!(error = %e, "stored task progress is unreadable, starting from empty");
            Ok(ProgressMap::new())
        }
    }
}

pub fn load_task_progress(conn: &Connection, task_id: &str) -> Result<Option<TaskProgress>, DeskError> {
    Ok(load_all_progress(conn)?.remove(task_id))
}

pub fn save_task_progress(conn: &Connection, progress: &TaskProgress) -> Result<(), DeskError> {
    let mut all = load_all_progress(conn)?;
    all.insert(progress.task_id.clone(), progress.clone());
    storage_repo::set_json(conn, Scope::Local, STORAGE_KEY, &all)
}

pub fn initialize_progress(conn: &Connection, task_id: &str) -> Result<TaskProgress, DeskError> {
    let progress = TaskProgress::new(task_id, Utc::now());
    save_task_progress(conn, &progress)?;
    debug!(task_id, "initialized task progress");
    Ok(progress)
}

/// Existing progress, or a freshly initialized record.
pub fn load_or_initialize(conn: &Connection, task_id: &str) -> Result<TaskProgress, DeskError> {
    match load_task_progress(conn, task_id)? {
        Some(progress) => Ok(progress),
        None => initialize_progress(conn, task_id),
    }
}

/// Mark a step completed. Creates the record when absent; a step that is
/// already completed leaves storage untouched.
pub fn complete_step(conn: &Connection, task_id: &str, step_id: &str) -> Result<TaskProgress, DeskError> {
    let mut progress = load_task_progress(conn, task_id)?
        .unwrap_or_else(|| TaskProgress::new(task_id, Utc::now()));

    if !progress.is_completed(step_id) {
        progress.completed_steps.push(step_id.to_string());
        progress.current_step = progress.completed_steps.len() as u32;
        save_task_progress(conn, &progress)?;
        debug!(task_id, step_id, "step completed");
    }
    Ok(progress)
}

/// Unmark a step. Without an existing record this is a no-op.
pub fn uncomplete_step(conn: &Connection, task_id: &str, step_id: &str) -> Result<Option<TaskProgress>, DeskError> {
    let Some(mut progress) = load_task_progress(conn, task_id)? else {
        return Ok(None);
    };
    progress.completed_steps.retain(|id| id != step_id);
    progress.current_step = progress.completed_steps.len() as u32;
    save_task_progress(conn, &progress)?;
    debug!(task_id, step_id, "step uncompleted");
    Ok(Some(progress))
}

/// Flip a step's completion. Returns the new record and whether the step is
/// now completed.
pub fn toggle_step(conn: &Connection, task_id: &str, step_id: &str) -> Result<(TaskProgress, bool), DeskError> {
    let was_completed = load_task_progress(conn, task_id)?
        .map(|p| p.is_completed(step_id))
        .unwrap_or(false);

    if was_completed {
        let progress = uncomplete_step(conn, task_id, step_id)?
            .ok_or_else(|| DeskError::storage(format!("progress for '{task_id}' vanished mid-toggle")))?;
        Ok((progress, false))
    } else {
        Ok((complete_step(conn, task_id, step_id)?, true))
    }
}

/// Stamp `completedAt` once every derived step is done; clear it otherwise.
pub fn sync_completion(conn: &Connection, progress: &mut TaskProgress, steps: &[TaskStep]) -> Result<(), DeskError> {
    let all_done = !steps.is_empty() && steps.iter().all(|s| progress.is_completed(&s.id));
    let changed = match (all_done, progress.completed_at.is_some()) {
        (true, false) => {
            progress.completed_at = Some(Utc::now());
            true
        }
        (false, true) => {
            progress.completed_at = None;
            true
        }
        _ => false,
    };
    if changed {
        save_task_progress(conn, progress)?;
    }
    Ok(())
}

pub fn set_notes(conn: &Connection, task_id: &str, notes: Option<&str>) -> Result<TaskProgress, DeskError> {
    let mut progress = load_or_initialize(conn, task_id)?;
    progress.notes = notes.map(str::to_string).filter(|n| !n.trim().is_empty());
    save_task_progress(conn, &progress)?;
    Ok(progress)
}

pub fn add_time_spent(conn: &Connection, task_id: &str, minutes: u32) -> Result<TaskProgress, DeskError> {
    let mut progress = load_or_initialize(conn, task_id)?;
    progress.time_spent = Some(progress.time_spent.unwrap_or(0).saturating_add(minutes));
    save_task_progress(conn, &progress)?;
    Ok(progress)
}

/// Drop a task's record. Returns whether one existed.
pub fn reset_progress(conn: &Connection, task_id: &str) -> Result<bool, DeskError> {
    let mut all = load_all_progress(conn)?;
    let existed = all.remove(task_id).is_some();
    if existed {
        storage_repo::set_json(conn, Scope::Local, STORAGE_KEY, &all)?;
    }
    Ok(existed)
}

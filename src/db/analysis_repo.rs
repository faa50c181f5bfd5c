use rusqlite::Connection;
use tracing::warn;

use crate::db::storage_repo::{self, Scope};
use crate::error::DeskError;
use crate::models::{LearningTask, PortfolioAnalysis};

pub const ANALYSIS_KEY: &str = "portfolio_analysis";
const TASK_PREFIX: &str = "task-";

pub fn cache_portfolio_analysis(conn: &Connection, analysis: &PortfolioAnalysis) -> Result<(), DeskError> {
    storage_repo::set_json(conn, Scope::Local, ANALYSIS_KEY, analysis)
}

/// Last cached analysis. An unreadable cache is logged and treated as absent.
pub fn cached_portfolio_analysis(conn: &Connection) -> Result<Option<PortfolioAnalysis>, DeskError> {
    let Some(raw) = storage_repo::get_item(conn, Scope::Local, ANALYSIS_KEY)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(analysis) => Ok(Some(analysis)),
        Err(e) => {
            warn!(error = %e, "cached portfolio analysis is unreadable");
            Ok(None)
        }
    }
}

pub fn require_portfolio_analysis(conn: &Connection) -> Result<PortfolioAnalysis, DeskError> {
    cached_portfolio_analysis(conn)?.ok_or_else(DeskError::analysis_not_found)
}

fn task_key(task_id: &str) -> String {
    format!("{TASK_PREFIX}{task_id}")
}

/// Snapshot an opened task into session storage.
pub fn store_open_task(conn: &Connection, task: &LearningTask) -> Result<(), DeskError> {
    storage_repo::set_json(conn, Scope::Session, &task_key(&task.id), task)
}

pub fn open_task(conn: &Connection, task_id: &str) -> Result<Option<LearningTask>, DeskError> {
    storage_repo::get_json(conn, Scope::Session, &task_key(task_id))
}

pub fn require_open_task(conn: &Connection, task_id: &str) -> Result<LearningTask, DeskError> {
    open_task(conn, task_id)?.ok_or_else(|| DeskError::task_not_opened(task_id))
}

/// Every opened task snapshot. Entries that no longer decode are skipped.
pub fn list_open_tasks(conn: &Connection) -> Result<Vec<LearningTask>, DeskError> {
    let mut tasks = Vec::new();
    for key in storage_repo::keys_with_prefix(conn, Scope::Session, TASK_PREFIX)? {
        let Some(raw) = storage_repo::get_item(conn, Scope::Session, &key)? else {
            continue;
        };
        match serde_json::from_str::<LearningTask>(&raw) {
            Ok(task) => tasks.push(task),
            Err(e) => warn!(key = %key, error = %e, "skipping unreadable task snapshot"),
        }
    }
    Ok(tasks)
}

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::DeskError;
use crate::learning::steps;
use crate::models::{Essay, LearningTask, TaskProgress, TaskStep};

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &DeskError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn print(v: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
    );
}

/// Serialize a record, rendering `null` if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

pub fn essay_summary(e: &Essay) -> Value {
    json!({
        "id": e.id,
        "title": e.title,
        "status": e.status.as_str(),
        "word_count": e.word_count,
        "word_limit": e.word_limit,
        "college_id": e.college_id,
        "college_name": e.college_name,
        "last_edited": e.last_edited
    })
}

pub fn task_summary(t: &LearningTask) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "lens": t.lens_name,
        "track": t.track,
        "estimated_hours": t.estimated_hours,
        "steps": t.definition_of_done.len()
    })
}

pub fn progress_json(p: &TaskProgress, task_steps: &[TaskStep]) -> Value {
    json!({
        "task_id": p.task_id,
        "completed_steps": p.completed_steps,
        "current_step": p.current_step,
        "total_steps": task_steps.len(),
        "percentage": steps::calculate_progress(steps::completed_count(task_steps, p), task_steps.len()),
        "started_at": p.started_at,
        "completed_at": p.completed_at,
        "notes": p.notes,
        "time_spent": p.time_spent
    })
}

pub fn learning_detail(task: &LearningTask, task_steps: &[TaskStep], progress: &TaskProgress) -> Value {
    let orphaned = steps::orphaned_steps(task_steps, progress);
    json!({
        "task": to_json(task),
        "steps": to_json(&task_steps),
        "current_step": steps::current_step(task_steps).map(|s| s.id.clone()),
        "progress": progress_json(progress, task_steps),
        "orphaned_steps": orphaned
    })
}

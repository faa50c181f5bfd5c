use std::collections::HashMap;

use rusqlite::Connection;
use serde_json::json;
use tracing::{info, warn};

use crate::cli::commands::LearnCommands;
use crate::cli::{report, Context};
use crate::db::{analysis_repo, connection, progress_repo};
use crate::error::DeskError;
use crate::learning::{catalog, steps};
use crate::models::{LearningTask, TaskProgress, TaskStep};
use crate::output;

#[derive(Clone, Copy)]
enum StepAction {
    Toggle,
    Complete,
    Uncomplete,
}

pub fn run(cmd: LearnCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        LearnCommands::Open { task_id } => run_open(&task_id, ctx.json),
        LearnCommands::List => run_list(ctx.json),
        LearnCommands::Show { task_id } => run_show(&task_id, ctx.json),
        LearnCommands::Toggle { task_id, step } => run_step(&task_id, &step, StepAction::Toggle, ctx.json),
        LearnCommands::Complete { task_id, step } => run_step(&task_id, &step, StepAction::Complete, ctx.json),
        LearnCommands::Uncomplete { task_id, step } => {
            run_step(&task_id, &step, StepAction::Uncomplete, ctx.json)
        }
        LearnCommands::Note { task_id, text } => run_note(&task_id, &text, ctx.json),
        LearnCommands::LogTime { task_id, minutes } => run_log_time(&task_id, minutes, ctx.json),
        LearnCommands::Reset { task_id } => run_reset(&task_id, ctx.json),
    };
    report(result, ctx.json)
}

/// Derived steps with completion applied, warning about completed ids that no
/// longer match the checklist.
fn load_steps(task: &LearningTask, progress: &TaskProgress) -> Vec<TaskStep> {
    let mut task_steps = steps::parse_steps(task);
    steps::apply_completion(&mut task_steps, progress);
    let orphaned = steps::orphaned_steps(&task_steps, progress);
    if !orphaned.is_empty() {
        warn!(task_id = %task.id, steps = ?orphaned, "completed steps missing from the checklist");
    }
    task_steps
}

/// Accept `step-N` or a bare `N`.
pub(crate) fn normalize_step_id(raw: &str) -> String {
    let raw = raw.trim();
    if raw.chars().all(|c| c.is_ascii_digit()) && !raw.is_empty() {
        format!("step-{raw}")
    } else {
        raw.to_string()
    }
}

/// Resolve a step reference against the derived steps. Ids already recorded
/// as completed are also accepted when unmarking, so orphans can be cleared.
fn resolve_step(
    raw: &str,
    task_id: &str,
    task_steps: &[TaskStep],
    progress: &TaskProgress,
    action: StepAction,
) -> Result<String, DeskError> {
    let step_id = normalize_step_id(raw);
    let derived = task_steps.iter().any(|s| s.id == step_id);
    let unmarking = match action {
        StepAction::Uncomplete => true,
        StepAction::Toggle => progress.is_completed(&step_id),
        StepAction::Complete => false,
    };
    if derived || (unmarking && progress.is_completed(&step_id)) {
        Ok(step_id)
    } else {
        Err(DeskError::step_not_found(&step_id, task_id))
    }
}

fn print_detail(task: &LearningTask, task_steps: &[TaskStep], progress: &TaskProgress, json_output: bool) {
    if json_output {
        output::json::print(&output::json::success(output::json::learning_detail(
            task, task_steps, progress,
        )));
    } else {
        output::text::print_learning_task(task, task_steps, progress);
    }
}

fn run_open(task_id: &str, json_output: bool) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let analysis = analysis_repo::require_portfolio_analysis(&conn)?;
    let task = catalog::find_task(&analysis, task_id).ok_or_else(|| DeskError::task_not_found(task_id))?;
    analysis_repo::store_open_task(&conn, &task)?;
    let progress = progress_repo::load_or_initialize(&conn, &task.id)?;
    info!(task_id = %task.id, "task opened");

    let task_steps = load_steps(&task, &progress);
    print_detail(&task, &task_steps, &progress, json_output);
    Ok(0)
}

fn run_show(task_id: &str, json_output: bool) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let task = analysis_repo::require_open_task(&conn, task_id)?;
    let progress = progress_repo::load_or_initialize(&conn, task_id)?;
    let task_steps = load_steps(&task, &progress);
    print_detail(&task, &task_steps, &progress, json_output);
    Ok(0)
}

fn apply_step(
    conn: &Connection,
    task: &LearningTask,
    raw_step: &str,
    action: StepAction,
) -> Result<(TaskProgress, String, bool), DeskError> {
    let current = progress_repo::load_or_initialize(conn, &task.id)?;
    let task_steps = steps::parse_steps(task);
    let step_id = resolve_step(raw_step, &task.id, &task_steps, &current, action)?;

    let (mut progress, completed) = match action {
        StepAction::Toggle => progress_repo::toggle_step(conn, &task.id, &step_id)?,
        StepAction::Complete => (progress_repo::complete_step(conn, &task.id, &step_id)?, true),
        StepAction::Uncomplete => {
            let progress = progress_repo::uncomplete_step(conn, &task.id, &step_id)?.unwrap_or(current);
            (progress, false)
        }
    };
    progress_repo::sync_completion(conn, &mut progress, &task_steps)?;
    Ok((progress, step_id, completed))
}

fn run_step(task_id: &str, raw_step: &str, action: StepAction, json_output: bool) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let task = analysis_repo::require_open_task(&conn, task_id)?;
    let (progress, step_id, completed) = apply_step(&conn, &task, raw_step, action)?;
    info!(task_id, step_id = %step_id, completed, "step updated");

    let task_steps = load_steps(&task, &progress);
    if json_output {
        let mut data = output::json::learning_detail(&task, &task_steps, &progress);
        data["step_id"] = json!(step_id);
        data["completed"] = json!(completed);
        output::json::print(&output::json::success(data));
    } else {
        let verb = if completed { "Completed" } else { "Reopened" };
        let title = task_steps
            .iter()
            .find(|s| s.id == step_id)
            .map(|s| s.title.as_str())
            .unwrap_or("(no longer in checklist)");
        println!("{verb} {step_id}: {title}");
        output::text::print_progress_line(&progress, Some(&task_steps));
        if progress.completed_at.is_some() {
            println!("All steps done!");
        } else if let Some(next) = steps::next_step(&task_steps) {
            println!("Next: {} {}", next.id, next.title);
        }
    }
    Ok(0)
}

fn run_note(task_id: &str, text: &str, json_output: bool) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    analysis_repo::require_open_task(&conn, task_id)?;
    let progress = progress_repo::set_notes(&conn, task_id, Some(text))?;

    if json_output {
        output::json::print(&output::json::success(json!({
            "task_id": task_id,
            "notes": progress.notes
        })));
    } else if progress.notes.is_some() {
        println!("Saved notes for {task_id}");
    } else {
        println!("Cleared notes for {task_id}");
    }
    Ok(0)
}

fn run_log_time(task_id: &str, minutes: u32, json_output: bool) -> Result<i32, DeskError> {
    if minutes == 0 {
        return Err(DeskError::validation("Minutes must be greater than zero"));
    }
    let conn = connection::open_db()?;
    analysis_repo::require_open_task(&conn, task_id)?;
    let progress = progress_repo::add_time_spent(&conn, task_id, minutes)?;
    let total = progress.time_spent.unwrap_or(0);

    if json_output {
        output::json::print(&output::json::success(json!({
            "task_id": task_id,
            "added": minutes,
            "time_spent": total
        })));
    } else {
        println!("Logged {minutes} min on {task_id} ({total} min total)");
    }
    Ok(0)
}

fn run_reset(task_id: &str, json_output: bool) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let removed = progress_repo::reset_progress(&conn, task_id)?;
    if removed {
        info!(task_id, "progress reset");
    }

    if json_output {
        output::json::print(&output::json::success(json!({
            "task_id": task_id,
            "reset": removed
        })));
    } else if removed {
        println!("Reset progress for {task_id}");
    } else {
        println!("No progress recorded for {task_id}");
    }
    Ok(0)
}

fn run_list(json_output: bool) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let all = progress_repo::load_all_progress(&conn)?;
    let derived: HashMap<String, Vec<TaskStep>> = analysis_repo::list_open_tasks(&conn)?
        .into_iter()
        .map(|t| {
            let task_steps = steps::parse_steps(&t);
            (t.id, task_steps)
        })
        .collect();

    if json_output {
        let items: Vec<_> = all
            .values()
            .map(|p| match derived.get(&p.task_id) {
                Some(task_steps) => output::json::progress_json(p, task_steps),
                None => output::json::to_json(p),
            })
            .collect();
        output::json::print(&output::json::success(json!(items)));
    } else if all.is_empty() {
        println!("No task progress yet. Use `admitdesk learn open <task-id>`.");
    } else {
        for p in all.values() {
            output::text::print_progress_line(p, derived.get(&p.task_id).map(Vec::as_slice));
        }
    }
    Ok(0)
}

use std::collections::BTreeMap;

use serde_json::json;

use crate::cli::{report, Context};
use crate::db::{analysis_repo, connection, essay_repo, progress_repo};
use crate::error::DeskError;
use crate::learning::steps;
use crate::models::{EssayStatus, LensBand};
use crate::output;

pub fn run(ctx: &Context) -> i32 {
    report(run_inner(ctx), ctx.json)
}

fn run_inner(ctx: &Context) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let essays = essay_repo::list_essays(&conn)?;
    let progress = progress_repo::load_all_progress(&conn)?;
    let open_tasks = analysis_repo::list_open_tasks(&conn)?;
    let analysis = analysis_repo::cached_portfolio_analysis(&conn)?;

    let mut essay_counts: BTreeMap<&str, usize> = [EssayStatus::NotStarted, EssayStatus::InProgress, EssayStatus::Complete]
        .iter()
        .map(|s| (s.as_str(), 0))
        .collect();
    for e in &essays {
        *essay_counts.entry(e.status.as_str()).or_default() += 1;
    }

    // Percentages are only known for tasks opened in this session.
    let tasks: Vec<(String, String, usize, u32)> = open_tasks
        .iter()
        .map(|t| {
            let task_steps = steps::parse_steps(t);
            let done = progress.get(&t.id).map(|p| steps::completed_count(&task_steps, p)).unwrap_or(0);
            (t.id.clone(), t.title.clone(), task_steps.len(), steps::calculate_progress(done, task_steps.len()))
        })
        .collect();
    let finished = progress.values().filter(|p| p.completed_at.is_some()).count();

    if ctx.json {
        let task_items: Vec<_> = tasks
            .iter()
            .map(|(id, title, total, pct)| json!({ "id": id, "title": title, "total_steps": total, "percentage": pct }))
            .collect();
        let headline = analysis.as_ref().map(|a| {
            json!({
                "impact_total": a.scores.impact_total,
                "coverage": a.scores.coverage,
                "lens_scores": a.scores.lens_scores,
                "recommended_tasks": crate::learning::catalog::tasks_from_analysis(a).len()
            })
        });
        output::json::print(&output::json::success(json!({
            "student_id": ctx.student(),
            "api_url": ctx.config.api_url,
            "essays": { "total": essays.len(), "by_status": essay_counts },
            "open_tasks": task_items,
            "tracked_tasks": progress.len(),
            "finished_tasks": finished,
            "analysis": headline
        })));
        return Ok(0);
    }

    println!("Student: {}", ctx.student());
    println!("Backend: {}", ctx.config.api_url);

    println!("\nEssays: {}", essays.len());
    for (status, count) in &essay_counts {
        println!("  {status}: {count}");
    }

    println!("\nLearning: {} tracked, {} finished", progress.len(), finished);
    for (id, title, total, pct) in &tasks {
        println!("  {id} - {title} {pct}% of {total} steps");
    }

    match analysis {
        Some(a) => {
            println!("\nLast evaluation: impact {:.1}, coverage {:.2}", a.scores.impact_total, a.scores.coverage);
            for (lens, score) in &a.scores.lens_scores {
                println!("  {:<13} {:>4.1}  {}", lens, score, LensBand::for_score(*score).as_str());
            }
        }
        None => println!("\nNo portfolio evaluation yet. Run `admitdesk portfolio analyze`."),
    }
    Ok(0)
}

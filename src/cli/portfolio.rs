use std::collections::BTreeMap;

use serde_json::json;
use tracing::info;

use crate::cli::commands::PortfolioCommands;
use crate::cli::{parse_pair, report, Context};
use crate::db::analysis_repo;
use crate::db::connection;
use crate::error::DeskError;
use crate::learning::catalog;
use crate::models::{Activity, PortfolioAnalyzeRequest, StudentProfile};
use crate::output;

const DEFAULT_TRACK: &str = "US";

pub fn run(cmd: PortfolioCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        PortfolioCommands::Analyze {
            schools,
            tracks,
            deadlines,
        } => run_analyze(&schools, &tracks, &deadlines, ctx),
        PortfolioCommands::Show => run_show(ctx.json),
        PortfolioCommands::Tasks => run_tasks(ctx.json),
    };
    report(result, ctx.json)
}

/// Assemble the evaluation request, enforcing the same preconditions the
/// dashboard checks before it lets a student submit.
pub(crate) fn build_request(
    profile: Option<StudentProfile>,
    activities: Vec<Activity>,
    schools: &[String],
    tracks: &[String],
    deadlines: &[String],
) -> Result<PortfolioAnalyzeRequest, DeskError> {
    let profile = profile.ok_or_else(|| {
        DeskError::profile_incomplete("No profile found. Complete your profile first with `admitdesk profile set`")
    })?;
    if activities.is_empty() {
        return Err(DeskError::profile_incomplete(
            "Add at least one activity before requesting an evaluation",
        ));
    }

    let schools: Vec<String> = schools
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if schools.is_empty() {
        return Err(DeskError::validation("At least one --school is required"));
    }

    let mut country_tracks: Vec<String> = tracks
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if country_tracks.is_empty() {
        country_tracks.push(DEFAULT_TRACK.to_string());
    }

    let mut deadline_map = BTreeMap::new();
    for raw in deadlines {
        let (school, date) = parse_pair(raw, "--deadline")?;
        deadline_map.insert(school, date);
    }

    Ok(PortfolioAnalyzeRequest {
        country_tracks,
        schools,
        deadlines: deadline_map,
        weekly_hours_cap: profile.weekly_hours_cap_or_default(),
        student_profile: Some(profile),
        portfolio: activities,
    })
}

fn run_analyze(schools: &[String], tracks: &[String], deadlines: &[String], ctx: &Context) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let client = ctx.client();
    let envelope = client.get_profile(ctx.student())?;
    let request = build_request(envelope.profile, envelope.activities, schools, tracks, deadlines)?;

    let analysis = client.analyze_portfolio(&request)?;
    analysis_repo::cache_portfolio_analysis(&conn, &analysis)?;
    let task_count = catalog::tasks_from_analysis(&analysis).len();
    info!(
        schools = request.schools.len(),
        activities = request.portfolio.len(),
        tasks = task_count,
        "portfolio analyzed"
    );

    if ctx.json {
        output::json::print(&output::json::success(output::json::to_json(&analysis)));
    } else {
        output::text::print_portfolio_report(&analysis);
        println!("\n{task_count} recommended tasks. Use `admitdesk portfolio tasks` to list them.");
    }
    Ok(0)
}

fn run_show(json_output: bool) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let analysis = analysis_repo::require_portfolio_analysis(&conn)?;
    if json_output {
        output::json::print(&output::json::success(output::json::to_json(&analysis)));
    } else {
        output::text::print_portfolio_report(&analysis);
    }
    Ok(0)
}

fn run_tasks(json_output: bool) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let analysis = analysis_repo::require_portfolio_analysis(&conn)?;
    let tasks = catalog::tasks_from_analysis(&analysis);

    if json_output {
        let items: Vec<_> = tasks.iter().map(output::json::task_summary).collect();
        output::json::print(&output::json::success(json!(items)));
    } else {
        output::text::print_task_list(&tasks);
    }
    Ok(0)
}

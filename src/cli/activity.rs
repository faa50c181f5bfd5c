use serde_json::json;
use tracing::info;

use crate::cli::commands::{ActivityArgs, ActivityCommands};
use crate::cli::{report, Context};
use crate::error::DeskError;
use crate::models::{normalize_lens, Activity, Award, LENSES};
use crate::output;

pub fn run(cmd: ActivityCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        ActivityCommands::List => run_list(ctx),
        ActivityCommands::Add(args) => run_add(&args, ctx),
        ActivityCommands::Update { id, fields } => run_update(&id, &fields, ctx),
        ActivityCommands::Remove { id } => run_remove(&id, ctx),
    };
    report(result, ctx.json)
}

fn run_list(ctx: &Context) -> Result<i32, DeskError> {
    let activities = ctx.client().get_activities(ctx.student())?;
    if ctx.json {
        output::json::print(&output::json::success(output::json::to_json(&activities)));
    } else {
        output::text::print_activity_list(&activities);
    }
    Ok(0)
}

fn required<'a>(value: &'a Option<String>, flag: &str) -> Result<&'a str, DeskError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DeskError::validation(format!("{flag} is required")))
}

fn lens_or_err(raw: &str) -> Result<&'static str, DeskError> {
    normalize_lens(raw).ok_or_else(|| {
        DeskError::validation(format!("Unknown lens '{}'. Expected one of: {}", raw, LENSES.join(", ")))
    })
}

fn non_negative(value: Option<f64>, flag: &str) -> Result<Option<f64>, DeskError> {
    match value {
        Some(v) if v < 0.0 || !v.is_finite() => Err(DeskError::validation(format!("{flag} must be zero or more"))),
        other => Ok(other),
    }
}

fn non_empty_list(values: &[String]) -> Option<Vec<String>> {
    let values: Vec<String> = values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    (!values.is_empty()).then_some(values)
}

/// Build a new activity from flags; title, lens, type and role are mandatory.
pub(crate) fn build_activity(id: String, args: &ActivityArgs) -> Result<Activity, DeskError> {
    let mut activity = Activity {
        id,
        title: required(&args.title, "--title")?.to_string(),
        lens: lens_or_err(required(&args.lens, "--lens")?)?.to_string(),
        kind: required(&args.kind, "--type")?.to_string(),
        role_level: required(&args.role_level, "--role-level")?.to_string(),
        ..Activity::default()
    };
    apply_optional(&mut activity, args)?;
    Ok(activity)
}

/// Merge flags onto an existing activity. Only flags that were given change.
pub(crate) fn merge_activity(mut activity: Activity, args: &ActivityArgs) -> Result<Activity, DeskError> {
    if args.title.is_some() {
        activity.title = required(&args.title, "--title")?.to_string();
    }
    if let Some(ref lens) = args.lens {
        activity.lens = lens_or_err(lens)?.to_string();
    }
    if args.kind.is_some() {
        activity.kind = required(&args.kind, "--type")?.to_string();
    }
    if args.role_level.is_some() {
        activity.role_level = required(&args.role_level, "--role-level")?.to_string();
    }
    apply_optional(&mut activity, args)?;
    Ok(activity)
}

fn apply_optional(activity: &mut Activity, args: &ActivityArgs) -> Result<(), DeskError> {
    if let Some(ref area) = args.area {
        activity.area_of_activity = Some(area.trim().to_string()).filter(|a| !a.is_empty());
    }
    if args.start_date.is_some() {
        activity.start_date = args.start_date.clone();
    }
    if args.end_date.is_some() {
        activity.end_date = args.end_date.clone();
    }
    if let Some(h) = non_negative(args.hours_per_week, "--hours-per-week")? {
        activity.hours_per_week = Some(h);
    }
    if let Some(h) = non_negative(args.hours_total, "--hours-total")? {
        activity.hours_total = Some(h);
    }
    if args.team_size.is_some() {
        activity.team_size = args.team_size;
    }
    if args.people_impacted.is_some() {
        activity.people_impacted = args.people_impacted;
    }
    if let Some(levels) = non_empty_list(&args.awards) {
        activity.awards = Some(levels.into_iter().map(|level| Award { level }).collect());
    }
    if let Some(tags) = non_empty_list(&args.tags) {
        activity.theme_tags = Some(tags);
    }
    if let Some(links) = non_empty_list(&args.links) {
        activity.artifact_links = Some(links);
    }
    if let Some(ref description) = args.description {
        activity.description_raw = Some(description.clone());
    }
    Ok(())
}

fn run_add(args: &ActivityArgs, ctx: &Context) -> Result<i32, DeskError> {
    let activity = build_activity(ulid::Ulid::new().to_string(), args)?;
    let saved = ctx.client().add_activity(ctx.student(), &activity)?;
    info!(activity_id = %saved.id, lens = %saved.lens, "activity added");

    if ctx.json {
        output::json::print(&output::json::success(output::json::to_json(&saved)));
    } else {
        println!("Added activity: {} ({})", saved.title, saved.id);
    }
    Ok(0)
}

fn run_update(id: &str, args: &ActivityArgs, ctx: &Context) -> Result<i32, DeskError> {
    let client = ctx.client();
    let current = client
        .get_activities(ctx.student())?
        .into_iter()
        .find(|a| a.id == id)
        .ok_or_else(|| DeskError::activity_not_found(id))?;
    let activity = merge_activity(current, args)?;
    let saved = client.update_activity(ctx.student(), &activity)?;
    info!(activity_id = id, "activity updated");

    if ctx.json {
        output::json::print(&output::json::success(output::json::to_json(&saved)));
    } else {
        println!("Updated activity: {} ({})", saved.title, saved.id);
    }
    Ok(0)
}

fn run_remove(id: &str, ctx: &Context) -> Result<i32, DeskError> {
    ctx.client().delete_activity(ctx.student(), id)?;
    info!(activity_id = id, "activity removed");

    if ctx.json {
        output::json::print(&output::json::success(json!({ "id": id, "removed": true })));
    } else {
        println!("Removed activity {id}");
    }
    Ok(0)
}

use std::collections::BTreeMap;

use serde_json::json;
use tracing::info;

use crate::cli::commands::{ProfileArgs, ProfileCommands};
use crate::cli::{parse_pair, report, Context};
use crate::error::DeskError;
use crate::models::{StudentProfile, TestScore, TestScores};
use crate::output;

pub fn run(cmd: ProfileCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        ProfileCommands::Show => run_show(ctx),
        ProfileCommands::Set(args) => run_set(&args, ctx),
    };
    report(result, ctx.json)
}

fn run_show(ctx: &Context) -> Result<i32, DeskError> {
    let envelope = ctx.client().get_profile(ctx.student())?;

    if ctx.json {
        output::json::print(&output::json::success(json!({
            "student_id": ctx.student(),
            "profile": envelope.profile,
            "activities": envelope.activities
        })));
    } else {
        match envelope.profile {
            Some(ref profile) => output::text::print_profile(ctx.student(), profile),
            None => println!("No profile yet for {}. Use `admitdesk profile set --grade <grade>`.", ctx.student()),
        }
        println!("\nActivities ({}):", envelope.activities.len());
        output::text::print_activity_list(&envelope.activities);
    }
    Ok(0)
}

/// Merge command-line fields onto an existing (or new) profile.
pub(crate) fn merge_profile(
    current: Option<StudentProfile>,
    student_id: &str,
    args: &ProfileArgs,
) -> Result<StudentProfile, DeskError> {
    let mut profile = match current {
        Some(p) => p,
        None => {
            let grade = args
                .grade
                .as_deref()
                .ok_or_else(|| DeskError::validation("Creating a profile requires --grade"))?;
            StudentProfile {
                current_grade: grade.to_string(),
                ..StudentProfile::default()
            }
        }
    };
    profile.student_id = student_id.to_string();

    if let Some(ref grade) = args.grade {
        if grade.trim().is_empty() {
            return Err(DeskError::validation("Grade cannot be empty"));
        }
        profile.current_grade = grade.trim().to_string();
    }
    if let Some(ref major) = args.major {
        profile.intended_major = Some(major.clone()).filter(|m| !m.trim().is_empty());
    }
    for (gpa, slot) in [
        (args.gpa_unweighted, &mut profile.gpa_unweighted),
        (args.gpa_weighted, &mut profile.gpa_weighted),
    ] {
        if let Some(value) = gpa {
            if !(0.0..=6.0).contains(&value) {
                return Err(DeskError::validation(format!("GPA {value} is out of range (0-6)")));
            }
            *slot = Some(value);
        }
    }
    if let Some(ref curriculum) = args.curriculum {
        profile.curriculum = Some(curriculum.clone());
    }
    if let Some(cap) = args.weekly_hours_cap {
        if cap == 0 || cap > 80 {
            return Err(DeskError::validation("Weekly hours cap must be between 1 and 80"));
        }
        profile.weekly_hours_cap = Some(cap);
    }
    if args.sat.is_some() || args.act.is_some() {
        let tests = profile.tests.get_or_insert_with(TestScores::default);
        if let Some(sat) = args.sat {
            if !(400..=1600).contains(&sat) {
                return Err(DeskError::validation("SAT score must be between 400 and 1600"));
            }
            tests.sat = Some(TestScore { score: Some(sat), date: None });
        }
        if let Some(act) = args.act {
            if !(1..=36).contains(&act) {
                return Err(DeskError::validation("ACT score must be between 1 and 36"));
            }
            tests.act = Some(TestScore { score: Some(act), date: None });
        }
    }
    if !args.subject_grades.is_empty() {
        let grades = profile.grades_by_subject.get_or_insert_with(BTreeMap::new);
        for raw in &args.subject_grades {
            let (subject, grade) = parse_pair(raw, "--subject-grade")?;
            grades.insert(subject, grade);
        }
    }
    if !args.constraints.is_empty() {
        profile.constraints = Some(args.constraints.clone());
    }
    Ok(profile)
}

fn run_set(args: &ProfileArgs, ctx: &Context) -> Result<i32, DeskError> {
    let client = ctx.client();
    let current = client.get_profile(ctx.student())?.profile;
    let created = current.is_none();
    let profile = merge_profile(current, ctx.student(), args)?;
    client.update_profile(ctx.student(), &profile)?;
    info!(student = ctx.student(), created, "profile saved");

    if ctx.json {
        output::json::print(&output::json::success(json!({
            "created": created,
            "profile": output::json::to_json(&profile)
        })));
    } else {
        println!("{} profile for {}", if created { "Created" } else { "Updated" }, ctx.student());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_profile_needs_grade() {
        let err = merge_profile(None, "s", &ProfileArgs::default()).unwrap_err();
        assert_eq!(err.code.as_str(), "VALIDATION_ERROR");
    }

    #[test]
    fn merge_keeps_untouched_fields() {
        let current = StudentProfile {
            student_id: "s".into(),
            current_grade: "10".into(),
            intended_major: Some("Biology".into()),
            weekly_hours_cap: Some(6),
            ..StudentProfile::default()
        };
        let args = ProfileArgs {
            grade: Some("11".into()),
            sat: Some(1450),
            subject_grades: vec!["Math=A".into()],
            ..ProfileArgs::default()
        };
        let merged = merge_profile(Some(current), "s", &args).unwrap();
        assert_eq!(merged.current_grade, "11");
        assert_eq!(merged.intended_major.as_deref(), Some("Biology"));
        assert_eq!(merged.weekly_hours_cap, Some(6));
        assert_eq!(merged.tests.unwrap().sat.unwrap().score, Some(1450));
        assert_eq!(merged.grades_by_subject.unwrap()["Math"], "A");
    }

    #[test]
    fn rejects_out_of_range_scores() {
        let args = ProfileArgs {
            grade: Some("12".into()),
            act: Some(40),
            ..ProfileArgs::default()
        };
        assert!(merge_profile(None, "s", &args).is_err());
    }
}

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::json;
use tracing::{info, warn};

use crate::cli::commands::EssayCommands;
use crate::cli::{report, Context};
use crate::db::connection;
use crate::db::essay_repo::{self, NewEssay};
use crate::error::DeskError;
use crate::models::{AnalyzeEssayRequest, Essay, EssayStatus};
use crate::output;

pub fn run(cmd: EssayCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        EssayCommands::Create {
            title,
            prompt,
            word_limit,
            content,
            file,
            college_id,
            college_name,
            doc_url,
        } => read_content(content, file.as_deref()).and_then(|content| {
            let input = NewEssay {
                title: &title,
                prompt: &prompt,
                content: content.as_deref().unwrap_or(""),
                word_limit,
                college_id: college_id.as_deref(),
                college_name: college_name.as_deref(),
                google_doc_url: doc_url.as_deref(),
            };
            run_create(&input, ctx.json)
        }),
        EssayCommands::List => run_list(ctx.json),
        EssayCommands::Show { id } => run_show(&id, ctx.json),
        EssayCommands::Edit {
            id,
            title,
            prompt,
            word_limit,
            content,
            file,
            status,
            doc_url,
        } => read_content(content, file.as_deref()).and_then(|content| {
            let edit = EssayEdit {
                title,
                prompt,
                word_limit,
                content,
                status,
                doc_url,
            };
            run_edit(&id, edit, ctx.json)
        }),
        EssayCommands::Delete { id } => run_delete(&id, ctx.json),
        EssayCommands::Analyze { id } => run_analyze(&id, ctx),
        EssayCommands::Analysis { id } => run_analysis(&id, ctx.json),
    };
    report(result, ctx.json)
}

fn read_content(inline: Option<String>, file: Option<&Path>) -> Result<Option<String>, DeskError> {
    match file {
        Some(path) => fs::read_to_string(path)
            .map(Some)
            .map_err(|e| DeskError::validation(format!("Cannot read {}: {}", path.display(), e))),
        None => Ok(inline),
    }
}

fn run_create(input: &NewEssay, json_output: bool) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let id = ulid::Ulid::new().to_string();
    let essay = essay_repo::create_essay(&conn, &id, input)?;
    info!(essay_id = %essay.id, words = essay.word_count, "essay created");

    if json_output {
        output::json::print(&output::json::success(output::json::to_json(&essay)));
    } else {
        println!("Created essay: {} ({})", essay.title, essay.id);
    }
    Ok(0)
}

/// General essays first, then one group per college name.
fn group_by_college(essays: &[Essay]) -> (Vec<&Essay>, BTreeMap<&str, Vec<&Essay>>) {
    let mut general = Vec::new();
    let mut by_college: BTreeMap<&str, Vec<&Essay>> = BTreeMap::new();
    for essay in essays {
        match essay.college_name.as_deref() {
            Some(name) if !essay.is_general() => by_college.entry(name).or_default().push(essay),
            _ => general.push(essay),
        }
    }
    (general, by_college)
}

fn run_list(json_output: bool) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let essays = essay_repo::list_essays(&conn)?;
    let (general, by_college) = group_by_college(&essays);

    if json_output {
        let colleges: Vec<_> = by_college
            .iter()
            .map(|(name, list)| {
                json!({
                    "college_name": name,
                    "college_id": list.first().and_then(|e| e.college_id.clone()),
                    "essays": list.iter().map(|e| output::json::essay_summary(e)).collect::<Vec<_>>()
                })
            })
            .collect();
        output::json::print(&output::json::success(json!({
            "general": general.iter().map(|e| output::json::essay_summary(e)).collect::<Vec<_>>(),
            "colleges": colleges,
            "total": essays.len()
        })));
    } else if essays.is_empty() {
        println!("No essays yet. Use `admitdesk essay create`.");
    } else {
        if !general.is_empty() {
            println!("General essays:");
            for e in &general {
                output::text::print_essay_line(e);
            }
        }
        for (name, list) in &by_college {
            println!("{name}:");
            for e in list {
                output::text::print_essay_line(e);
            }
        }
    }
    Ok(0)
}

fn run_show(reference: &str, json_output: bool) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let essay = essay_repo::resolve_essay(&conn, reference)?;
    let has_analysis = essay_repo::cached_analysis(&conn, &essay.id)?.is_some();

    if json_output {
        let mut data = output::json::to_json(&essay);
        data["has_analysis"] = json!(has_analysis);
        data["words_over_limit"] = json!(essay.words_over_limit());
        output::json::print(&output::json::success(data));
    } else {
        output::text::print_essay(&essay);
        if has_analysis {
            println!("\n(analysis cached: `admitdesk essay analysis {}`)", essay.id);
        }
    }
    Ok(0)
}

struct EssayEdit {
    title: Option<String>,
    prompt: Option<String>,
    word_limit: Option<u32>,
    content: Option<String>,
    status: Option<String>,
    doc_url: Option<String>,
}

/// Apply an edit. Counts are always recomputed; an explicit status wins over
/// the derived one.
fn apply_edit(essay: &mut Essay, edit: EssayEdit) -> Result<(), DeskError> {
    if let Some(title) = edit.title {
        if title.trim().is_empty() {
            return Err(DeskError::validation("Essay title cannot be empty"));
        }
        essay.title = title.trim().to_string();
    }
    if let Some(prompt) = edit.prompt {
        if prompt.trim().is_empty() {
            return Err(DeskError::validation("Essay prompt cannot be empty"));
        }
        essay.prompt = prompt.trim().to_string();
    }
    if let Some(limit) = edit.word_limit {
        if limit == 0 {
            return Err(DeskError::validation("Word limit must be greater than zero"));
        }
        essay.word_limit = limit;
    }
    if let Some(content) = edit.content {
        essay.content = content.trim().to_string();
    }
    if let Some(url) = edit.doc_url {
        essay.google_doc_url = Some(url.trim().to_string()).filter(|u| !u.is_empty());
    }
    essay.refresh_counts();
    if let Some(raw) = edit.status {
        essay.status = EssayStatus::from_str(&raw).ok_or_else(|| {
            DeskError::validation(format!(
                "Invalid status '{raw}'. Expected not_started, in_progress or complete"
            ))
        })?;
    }
    Ok(())
}

fn run_edit(reference: &str, edit: EssayEdit, json_output: bool) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let mut essay = essay_repo::resolve_essay(&conn, reference)?;
    apply_edit(&mut essay, edit)?;
    essay_repo::save_essay(&conn, &mut essay)?;
    info!(essay_id = %essay.id, words = essay.word_count, status = essay.status.as_str(), "essay saved");

    if json_output {
        output::json::print(&output::json::success(output::json::to_json(&essay)));
    } else {
        println!(
            "Saved essay: {} ({}/{} words, {})",
            essay.title,
            essay.word_count,
            essay.word_limit,
            essay.status.label()
        );
    }
    Ok(0)
}

fn run_delete(reference: &str, json_output: bool) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let essay = essay_repo::resolve_essay(&conn, reference)?;
    essay_repo::delete_essay(&conn, &essay.id)?;
    info!(essay_id = %essay.id, "essay deleted");

    if json_output {
        output::json::print(&output::json::success(json!({ "id": essay.id, "deleted": true })));
    } else {
        println!("Deleted essay: {} ({})", essay.title, essay.id);
    }
    Ok(0)
}

fn run_analyze(reference: &str, ctx: &Context) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let essay = essay_repo::resolve_essay(&conn, reference)?;
    let request = AnalyzeEssayRequest {
        essay_text: essay.content.clone(),
        prompt_text: Some(essay.prompt.clone()),
        target_word_count: Some(essay.word_limit),
        essay_id: Some(essay.id.clone()),
    };
    let mut analysis = ctx.client().analyze_essay_text(&request)?;
    if analysis.essay_id != essay.id {
        warn!(returned = %analysis.essay_id, essay_id = %essay.id, "analysis tagged with another essay id");
        analysis.essay_id = essay.id.clone();
    }
    essay_repo::cache_analysis(&conn, &analysis)?;
    info!(essay_id = %essay.id, score = analysis.overall_score, "essay analyzed");

    if ctx.json {
        output::json::print(&output::json::success(output::json::to_json(&analysis)));
    } else {
        println!("Analysis of \"{}\"", essay.title);
        output::text::print_essay_analysis(&analysis);
    }
    Ok(0)
}

fn run_analysis(reference: &str, json_output: bool) -> Result<i32, DeskError> {
    let conn = connection::open_db()?;
    let essay = essay_repo::resolve_essay(&conn, reference)?;
    let analysis = essay_repo::cached_analysis(&conn, &essay.id)?.ok_or_else(|| {
        DeskError::validation(format!(
            "No analysis cached for '{}'. Run `admitdesk essay analyze {}`",
            essay.title, essay.id
        ))
    })?;

    if json_output {
        output::json::print(&output::json::success(output::json::to_json(&analysis)));
    } else {
        output::text::print_essay_analysis(&analysis);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn essay(content: &str) -> Essay {
        let now = Utc::now();
        let mut e = Essay {
            id: "e1".into(),
            title: "Personal".into(),
            prompt: "Tell us".into(),
            content: content.into(),
            word_limit: 10,
            word_count: 0,
            status: EssayStatus::NotStarted,
            last_edited: now,
            college_id: None,
            college_name: None,
            google_doc_url: None,
            created_at: now,
            updated_at: now,
        };
        e.refresh_counts();
        e
    }

    fn no_edit() -> EssayEdit {
        EssayEdit {
            title: None,
            prompt: None,
            word_limit: None,
            content: None,
            status: None,
            doc_url: None,
        }
    }

    #[test]
    fn edit_recomputes_status_from_content() {
        let mut e = essay("");
        apply_edit(
            &mut e,
            EssayEdit {
                content: Some("a b c d e f g h i".into()),
                ..no_edit()
            },
        )
        .unwrap();
        assert_eq!(e.word_count, 9);
        assert_eq!(e.status, EssayStatus::Complete);

        apply_edit(
            &mut e,
            EssayEdit {
                word_limit: Some(100),
                ..no_edit()
            },
        )
        .unwrap();
        assert_eq!(e.status, EssayStatus::InProgress);
    }

    #[test]
    fn explicit_status_overrides_derived() {
        let mut e = essay("one two");
        apply_edit(
            &mut e,
            EssayEdit {
                status: Some("complete".into()),
                ..no_edit()
            },
        )
        .unwrap();
        assert_eq!(e.status, EssayStatus::Complete);

        let err = apply_edit(
            &mut e,
            EssayEdit {
                status: Some("done".into()),
                ..no_edit()
            },
        )
        .unwrap_err();
        assert_eq!(err.code.as_str(), "VALIDATION_ERROR");
    }

    #[test]
    fn groups_general_before_colleges() {
        let general = essay("");
        let mut college = essay("");
        college.id = "e2".into();
        college.college_id = Some("c1".into());
        college.college_name = Some("State U".into());
        let essays = vec![college, general];
        let (general, by_college) = group_by_college(&essays);
        assert_eq!(general.len(), 1);
        assert_eq!(by_college["State U"].len(), 1);
    }
}

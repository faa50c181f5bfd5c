use chrono::Utc;
use rusqlite::Connection;
use tracing::warn;

use crate::db::storage_repo::{self, Scope};
use crate::error::DeskError;
use crate::models::{Essay, EssayAnalysis, EssayStatus};

pub const ESSAYS_KEY: &str = "essays";
const ANALYSIS_PREFIX: &str = "essay-analysis-";

pub struct NewEssay<'a> {
    pub title: &'a str,
    pub prompt: &'a str,
    pub content: &'a str,
    pub word_limit: u32,
    pub college_id: Option<&'a str>,
    pub college_name: Option<&'a str>,
    pub google_doc_url: Option<&'a str>,
}

pub fn list_essays(conn: &Connection) -> Result<Vec<Essay>, DeskError> {
    Ok(storage_repo::get_json(conn, Scope::Local, ESSAYS_KEY)?.unwrap_or_default())
}

fn write_essays(conn: &Connection, essays: &[Essay]) -> Result<(), DeskError> {
    storage_repo::set_json(conn, Scope::Local, ESSAYS_KEY, &essays)
}

pub fn create_essay(conn: &Connection, id: &str, input: &NewEssay) -> Result<Essay, DeskError> {
    let title = input.title.trim();
    let prompt = input.prompt.trim();
    if title.is_empty() || prompt.is_empty() {
        return Err(DeskError::validation("Essay title and prompt are required"));
    }
    if input.word_limit == 0 {
        return Err(DeskError::validation("Word limit must be greater than zero"));
    }

    let now = Utc::now();
    let mut essay = Essay {
        id: id.to_string(),
        title: title.to_string(),
        prompt: prompt.to_string(),
        content: input.content.trim().to_string(),
        word_limit: input.word_limit,
        word_count: 0,
        status: EssayStatus::NotStarted,
        last_edited: now,
        college_id: input.college_id.map(str::to_string),
        college_name: input.college_name.map(str::to_string),
        google_doc_url: input
            .google_doc_url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string),
        created_at: now,
        updated_at: now,
    };
    essay.refresh_counts();

    let mut essays = list_essays(conn)?;
    essays.push(essay.clone());
    write_essays(conn, &essays)?;
    Ok(essay)
}

/// Resolve an essay by exact id, then by unique id prefix.
pub fn resolve_essay(conn: &Connection, reference: &str) -> Result<Essay, DeskError> {
    let essays = list_essays(conn)?;
    if let Some(essay) = essays.iter().find(|e| e.id == reference) {
        return Ok(essay.clone());
    }
    let matches: Vec<&Essay> = essays.iter().filter(|e| e.id.starts_with(reference)).collect();
    match matches.as_slice() {
        [] => Err(DeskError::essay_not_found(reference)),
        [one] => Ok((*one).clone()),
        many => {
            let candidates: Vec<String> = many.iter().map(|e| format!("{} ({})", e.title, e.id)).collect();
            Err(DeskError::validation(format!(
                "Ambiguous essay reference '{}'. Candidates: {}",
                reference,
                candidates.join(", ")
            )))
        }
    }
}

/// Replace a stored essay, bumping its edit timestamps.
pub fn save_essay(conn: &Connection, essay: &mut Essay) -> Result<(), DeskError> {
    let mut essays = list_essays(conn)?;
    let slot = essays
        .iter_mut()
        .find(|e| e.id == essay.id)
        .ok_or_else(|| DeskError::essay_not_found(&essay.id))?;
    let now = Utc::now();
    essay.updated_at = now;
    essay.last_edited = now;
    *slot = essay.clone();
    write_essays(conn, &essays)
}

pub fn delete_essay(conn: &Connection, id: &str) -> Result<(), DeskError> {
    let mut essays = list_essays(conn)?;
    let before = essays.len();
    essays.retain(|e| e.id != id);
    if essays.len() == before {
        return Err(DeskError::essay_not_found(id));
    }
    write_essays(conn, &essays)?;
    storage_repo::remove_item(conn, Scope::Session, &analysis_key(id))?;
    Ok(())
}

fn analysis_key(essay_id: &str) -> String {
    format!("{ANALYSIS_PREFIX}{essay_id}")
}

pub fn cache_analysis(conn: &Connection, analysis: &EssayAnalysis) -> Result<(), DeskError> {
    storage_repo::set_json(conn, Scope::Session, &analysis_key(&analysis.essay_id), analysis)
}

/// Cached analysis for an essay; an unreadable entry counts as absent.
pub fn cached_analysis(conn: &Connection, essay_id: &str) -> Result<Option<EssayAnalysis>, DeskError> {
    let Some(raw) = storage_repo::get_item(conn, Scope::Session, &analysis_key(essay_id))? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(analysis) => Ok(Some(analysis)),
        Err(e) => {
            warn!(essay_id, error = %e, "cached essay analysis is unreadable");
            Ok(None)
        }
    }
}

use crate::models::{LearningTask, TaskProgress, TaskStep};

/// Slug id for a recommended task: the title reduced to `[a-z0-9-]`, suffixed
/// with the lowercased lens when there is one.
pub fn generate_task_id(title: &str, lens_name: Option<&str>) -> String {
    let mut base = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !base.is_empty() {
                base.push('-');
            }
            pending_dash = false;
            base.push(c);
        } else {
            pending_dash = true;
        }
    }
    match lens_name {
        Some(lens) => format!("{base}-{}", lens.to_lowercase()),
        None => base,
    }
}

/// `"Achievements lens is 0.0/10"` → `"Achievements"`. Descriptions that do
/// not start with `<word> lens` come back unchanged.
pub fn extract_lens_name(gap_description: &str) -> &str {
    let word_end = gap_description
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(gap_description.len());
    if word_end == 0 {
        return gap_description;
    }
    let rest = &gap_description[word_end..];
    let trimmed = rest.trim_start();
    if trimmed.len() < rest.len() && trimmed.starts_with("lens") {
        &gap_description[..word_end]
    } else {
        gap_description
    }
}

/// Steps are positional: `step-1`, `step-2`, ... in checklist order.
pub fn parse_steps(task: &LearningTask) -> Vec<TaskStep> {
    task.definition_of_done
        .iter()
        .enumerate()
        .map(|(index, item)| TaskStep {
            id: format!("step-{}", index + 1),
            title: item.clone(),
            description: None,
            completed: false,
            order: index as u32 + 1,
        })
        .collect()
}

pub fn apply_completion(steps: &mut [TaskStep], progress: &TaskProgress) {
    for step in steps.iter_mut() {
        step.completed = progress.is_completed(&step.id);
    }
}

/// Derived steps the progress record has completed. Orphaned ids do not count.
pub fn completed_count(steps: &[TaskStep], progress: &TaskProgress) -> usize {
    steps.iter().filter(|s| progress.is_completed(&s.id)).count()
}

/// Percentage of steps done, rounded to the nearest whole number.
pub fn calculate_progress(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

pub fn next_step(steps: &[TaskStep]) -> Option<&TaskStep> {
    steps.iter().find(|step| !step.completed)
}

/// Step the learner should focus on: the first open step, or the last step
/// once everything is done.
pub fn current_step(steps: &[TaskStep]) -> Option<&TaskStep> {
    next_step(steps).or_else(|| steps.last())
}

/// Completed step ids that no longer exist in the derived step list. Non-empty
/// when the checklist shrank after progress was recorded.
pub fn orphaned_steps<'a>(steps: &[TaskStep], progress: &'a TaskProgress) -> Vec<&'a str> {
    progress
        .completed_steps
        .iter()
        .filter(|id| !steps.iter().any(|s| &s.id == *id))
        .map(String::as_str)
        .collect()
}

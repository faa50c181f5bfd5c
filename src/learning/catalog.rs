use crate::learning::steps::{extract_lens_name, generate_task_id};
use crate::models::{LearningTask, PortfolioAnalysis, RecommendationTask};

/// Flatten every recommended task in an analysis into learning tasks.
/// Critical improvements take their lens from the gap description; lens
/// improvements carry it directly. Tasks whose generated id repeats an
/// earlier one are dropped.
pub fn tasks_from_analysis(analysis: &PortfolioAnalysis) -> Vec<LearningTask> {
    let mut tasks: Vec<LearningTask> = Vec::new();

    for section in &analysis.critical_improvements {
        let lens = extract_lens_name(&section.gap_description);
        for task in &section.tasks {
            push_unique(&mut tasks, to_learning_task(task, lens, Some(&section.gap_description)));
        }
    }
    for section in &analysis.lens_improvements {
        for task in &section.tasks {
            push_unique(
                &mut tasks,
                to_learning_task(task, &section.lens, Some(&section.improvement_opportunity)),
            );
        }
    }
    tasks
}

pub fn find_task(analysis: &PortfolioAnalysis, task_id: &str) -> Option<LearningTask> {
    tasks_from_analysis(analysis).into_iter().find(|t| t.id == task_id)
}

fn push_unique(tasks: &mut Vec<LearningTask>, task: LearningTask) {
    if !tasks.iter().any(|t| t.id == task.id) {
        tasks.push(task);
    }
}

fn to_learning_task(task: &RecommendationTask, lens: &str, gap: Option<&str>) -> LearningTask {
    LearningTask {
        id: generate_task_id(&task.title, Some(lens)),
        title: task.title.clone(),
        track: task.track.clone(),
        estimated_hours: task.estimated_hours,
        definition_of_done: task.definition_of_done.clone(),
        micro_coaching: task.micro_coaching.clone(),
        quick_links: task.quick_links.clone(),
        lens_name: Some(lens.to_string()),
        gap_description: gap.filter(|g| !g.is_empty()).map(str::to_string),
    }
}

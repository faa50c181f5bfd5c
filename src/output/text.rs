use crate::learning::steps;
use crate::models::{
    score_label, readability_label, Activity, Essay, EssayAnalysis, LearningTask, LensBand, PortfolioAnalysis,
    RecommendationTask, StudentProfile, TaskProgress, TaskStep,
};

fn short_id(id: &str) -> &str {
    &id[..std::cmp::min(8, id.len())]
}

pub fn print_profile(student_id: &str, p: &StudentProfile) {
    println!("Profile: {student_id}");
    println!("  Grade: {}", p.current_grade);
    if let Some(ref major) = p.intended_major {
        println!("  Intended major: {major}");
    }
    match (p.gpa_unweighted, p.gpa_weighted) {
        (Some(u), Some(w)) => println!("  GPA: {u:.2} unweighted / {w:.2} weighted"),
        (Some(u), None) => println!("  GPA: {u:.2} unweighted"),
        (None, Some(w)) => println!("  GPA: {w:.2} weighted"),
        (None, None) => {}
    }
    if let Some(ref curriculum) = p.curriculum {
        println!("  Curriculum: {curriculum}");
    }
    println!("  Weekly hours cap: {}h", p.weekly_hours_cap_or_default());
    if let Some(ref tests) = p.tests {
        if let Some(score) = tests.sat.as_ref().and_then(|t| t.score) {
            println!("  SAT: {score}");
        }
        if let Some(score) = tests.act.as_ref().and_then(|t| t.score) {
            println!("  ACT: {score}");
        }
    }
    if let Some(ref grades) = p.grades_by_subject {
        for (subject, grade) in grades {
            println!("  {subject}: {grade}");
        }
    }
    if let Some(ref constraints) = p.constraints {
        if !constraints.is_empty() {
            println!("  Constraints: {}", constraints.join(", "));
        }
    }
}

pub fn print_activity(a: &Activity) {
    let hours = a
        .hours_per_week
        .map(|h| format!(" {h}h/wk"))
        .unwrap_or_default();
    println!(
        "  [{}] {} ({}) {} / {}{}",
        a.lens,
        a.title,
        short_id(&a.id),
        a.kind,
        a.role_level,
        hours
    );
}

pub fn print_activity_list(activities: &[Activity]) {
    if activities.is_empty() {
        println!("No activities found.");
        return;
    }
    for a in activities {
        print_activity(a);
    }
}

pub fn print_essay_line(e: &Essay) {
    println!(
        "  [{}] {} ({}) {}/{} words",
        e.status.as_str(),
        e.title,
        short_id(&e.id),
        e.word_count,
        e.word_limit
    );
}

pub fn print_essay(e: &Essay) {
    println!("Essay: {} ({})", e.title, e.id);
    if let Some(ref college) = e.college_name {
        println!("  College: {college}");
    }
    println!("  Status: {}", e.status.label());
    println!("  Words: {} / {}", e.word_count, e.word_limit);
    if e.words_over_limit() > 0 {
        println!("  Over by {} words", e.words_over_limit());
    }
    println!("  Reading time: {} min", e.reading_minutes());
    if let Some(ref url) = e.google_doc_url {
        println!("  Google Doc: {url}");
    }
    println!("  Last edited: {}", e.last_edited.format("%Y-%m-%d %H:%M"));
    println!("\nPrompt:\n{}", e.prompt);
    if !e.content.is_empty() {
        println!("\n{}", e.content);
    }
}

pub fn print_essay_analysis(a: &EssayAnalysis) {
    println!("Overall: {:.1}/10 ({})", a.overall_score, score_label(a.overall_score));
    println!(
        "  structure={:.1} content={:.1} tone={:.1} prompt={:.1}",
        a.structure_score, a.content_score, a.tone_score, a.prompt_alignment_score
    );
    println!(
        "  Readability: {:.0} ({})",
        a.readability_score,
        readability_label(a.readability_score)
    );
    match a.target_word_count {
        Some(target) => println!("  Words: {} / {}", a.word_count, target),
        None => println!("  Words: {}", a.word_count),
    }
    if !a.strengths.is_empty() {
        println!("\nStrengths:");
        for s in &a.strengths {
            println!("  + {s}");
        }
    }
    if !a.weaknesses.is_empty() {
        println!("\nWeaknesses:");
        for w in &a.weaknesses {
            println!("  - {w}");
        }
    }
    if !a.suggestions.is_empty() {
        println!("\nSuggestions:");
        let mut suggestions: Vec<_> = a.suggestions.iter().collect();
        suggestions.sort_by_key(|s| s.priority);
        for s in suggestions {
            let location = s.location.as_deref().map(|l| format!(" @ {l}")).unwrap_or_default();
            println!("  [{}/{}]{} {}", s.priority.as_str(), s.kind.as_str(), location, s.explanation);
            if let (Some(current), Some(suggested)) = (&s.current_text, &s.suggested_text) {
                println!("      \"{current}\" -> \"{suggested}\"");
            }
        }
    }
}

fn print_recommendation(t: &RecommendationTask) {
    println!("    * {} ({}, ~{}h)", t.title, t.track, t.estimated_hours);
    for item in &t.definition_of_done {
        println!("        - {item}");
    }
}

pub fn print_portfolio_report(a: &PortfolioAnalysis) {
    let s = &a.scores;
    println!("Impact total: {:.1}", s.impact_total);
    println!("Coverage: {:.2}", s.coverage);
    if let Some(ref spike) = s.spike {
        println!("Spike: {} ({:.0}%)", spike.theme, spike.share * 100.0);
    }
    if !s.lens_scores.is_empty() {
        println!("\nLens scores:");
        for (lens, score) in &s.lens_scores {
            println!("  {:<13} {:>4.1}/10  {}", lens, score, LensBand::for_score(*score).as_str());
        }
    }
    if !a.gaps.is_empty() {
        println!("\nGaps:");
        for g in &a.gaps {
            let lens = g.lens.as_deref().map(|l| format!(" ({l})")).unwrap_or_default();
            println!("  {}{} severity={:.2}", g.kind, lens, g.severity);
        }
    }
    if !a.critical_improvements.is_empty() {
        println!("\nCritical improvements:");
        for c in &a.critical_improvements {
            println!("  {} [severity {:.2}]", c.gap_description, c.severity);
            for t in &c.tasks {
                print_recommendation(t);
            }
        }
    }
    if !a.lens_improvements.is_empty() {
        println!("\nLens improvements:");
        for l in &a.lens_improvements {
            println!("  {} ({:.1}/10): {}", l.lens, l.current_score, l.improvement_opportunity);
            for t in &l.tasks {
                print_recommendation(t);
            }
        }
    }
    if let Some(ref d) = a.diversity_spike {
        println!("\nDiversity & spike:");
        match (&d.spike_theme, d.spike_share) {
            (Some(theme), Some(share)) if d.has_spike => {
                println!("  Spike in {theme} ({:.0}% of impact)", share * 100.0)
            }
            _ => println!("  No clear spike"),
        }
        println!("  Coverage index: {:.2}", d.coverage_index);
        for t in &d.tasks {
            print_recommendation(t);
        }
    }
    if !a.alignment_priorities.is_empty() {
        println!("\nSchool alignment:");
        for p in &a.alignment_priorities {
            let marker = if p.is_high_alignment { " (high)" } else { "" };
            println!("  {}: {:.1}{}", p.school_name, p.alignment_score, marker);
            if !p.alignment_notes.is_empty() {
                println!("    {}", p.alignment_notes);
            }
            for task in &p.priority_tasks {
                println!("    - {task}");
            }
        }
    }
    if !a.standardized_tests.is_empty() {
        println!("\nStandardized tests:");
        for t in &a.standardized_tests {
            println!("  {} [{}]: {}", t.school_name, t.test_policy, t.recommendation);
            if !t.rationale.is_empty() {
                println!("    {}", t.rationale);
            }
            for task in &t.tasks {
                print_recommendation(task);
            }
        }
    }
}

pub fn print_task_list(tasks: &[LearningTask]) {
    if tasks.is_empty() {
        println!("No recommended tasks.");
        return;
    }
    for t in tasks {
        println!(
            "  {} - {} [{}] {} steps",
            t.id,
            t.title,
            t.lens_name.as_deref().unwrap_or("-"),
            t.definition_of_done.len()
        );
    }
}

pub fn print_progress_line(p: &TaskProgress, task_steps: Option<&[TaskStep]>) {
    match task_steps {
        Some(task_steps) => {
            let done = steps::completed_count(task_steps, p);
            println!(
                "  {} {}% ({}/{})",
                p.task_id,
                steps::calculate_progress(done, task_steps.len()),
                done,
                task_steps.len()
            );
        }
        None => println!("  {} {} steps done", p.task_id, p.completed_steps.len()),
    }
}

pub fn print_learning_task(task: &LearningTask, task_steps: &[TaskStep], progress: &TaskProgress) {
    let done = steps::completed_count(task_steps, progress);
    let percentage = steps::calculate_progress(done, task_steps.len());
    println!("Task: {} ({})", task.title, task.id);
    if let Some(ref lens) = task.lens_name {
        println!("  Lens: {lens}");
    }
    if let Some(ref gap) = task.gap_description {
        println!("  Gap: {gap}");
    }
    println!("  Estimated: {}h", task.estimated_hours);
    println!("  Progress: {}% ({}/{})", percentage, done, task_steps.len());
    if let Some(minutes) = progress.time_spent {
        println!("  Time spent: {minutes} min");
    }
    if progress.completed_at.is_some() {
        println!("  Completed!");
    }
    if !task.micro_coaching.is_empty() {
        println!("\n{}", task.micro_coaching);
    }
    println!("\nSteps:");
    let current = steps::next_step(task_steps).map(|s| s.id.as_str());
    for step in task_steps {
        let mark = if step.completed { "x" } else { " " };
        let pointer = if Some(step.id.as_str()) == current { " <- next" } else { "" };
        println!("  [{mark}] {} {}{}", step.id, step.title, pointer);
    }
    let orphaned = steps::orphaned_steps(task_steps, progress);
    if !orphaned.is_empty() {
        println!(
            "\nWarning: completed steps {} no longer match this checklist.",
            orphaned.join(", ")
        );
    }
    if let Some(ref notes) = progress.notes {
        println!("\nNotes:\n{notes}");
    }
    if !task.quick_links.is_empty() {
        println!("\nLinks:");
        for link in &task.quick_links {
            println!("  {link}");
        }
    }
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "admitdesk",
    version,
    about = "College application dashboard: profile, activities, essays and learning tasks",
    after_help = "\
NOTE:
  Data lives in <dir>/.admitdesk/ (or $ADMITDESK_HOME). Run `admitdesk init` first.
  Profile, activities, portfolio scoring and essay analysis are served by the backend
  at --api-url (default http://localhost:8000). Essays and learning progress are local.

EXIT CODES:
  0  Success
  1  Error (validation, storage, backend unavailable, etc.)

STORAGE:
  Local entries (essays, task progress, the last portfolio analysis) persist.
  Session entries (opened tasks, essay analyses) are cleared by `cache clear`."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Student id to act for (overrides config and $ADMITDESK_STUDENT)
    #[arg(long, global = true)]
    pub student: Option<String>,

    /// Backend base URL (overrides config and $ADMITDESK_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize admitdesk in this directory
    Init,

    /// Show or change configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Dashboard overview (offline)
    Status,

    /// Backend connectivity
    #[command(subcommand)]
    Backend(BackendCommands),

    /// Session cache management
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Student profile (backend)
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Extracurricular activities (backend)
    #[command(subcommand)]
    Activity(ActivityCommands),

    /// Essay workspace (local) and essay analysis (backend)
    #[command(subcommand)]
    Essay(EssayCommands),

    /// Portfolio evaluation report
    #[command(subcommand)]
    Portfolio(PortfolioCommands),

    /// Work through recommended tasks step by step
    #[command(subcommand)]
    Learn(LearnCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Set a configuration value
    Set {
        /// One of: api_url, student_id, request_timeout_secs, write_timeout_secs, analyze_timeout_secs
        key: String,
        value: String,
    },
}

#[derive(Subcommand)]
pub enum BackendCommands {
    /// Check that the backend answers /healthz
    Health,
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Clear session storage (opened tasks, essay analyses)
    Clear,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show profile and activity summary
    Show,
    /// Create or update the profile
    #[command(after_help = "\
NOTE:
  Flags are merged onto the current profile. Creating a profile requires --grade.")]
    Set(ProfileArgs),
}

#[derive(Args, Default)]
pub struct ProfileArgs {
    /// Current grade, e.g. 11
    #[arg(long)]
    pub grade: Option<String>,
    #[arg(long)]
    pub major: Option<String>,
    #[arg(long)]
    pub gpa_unweighted: Option<f64>,
    #[arg(long)]
    pub gpa_weighted: Option<f64>,
    #[arg(long)]
    pub curriculum: Option<String>,
    /// Hours per week available for extracurricular work
    #[arg(long)]
    pub weekly_hours_cap: Option<u32>,
    #[arg(long)]
    pub sat: Option<u32>,
    #[arg(long)]
    pub act: Option<u32>,
    /// SUBJECT=GRADE, repeatable
    #[arg(long = "subject-grade")]
    pub subject_grades: Vec<String>,
    /// Replace constraints (repeatable)
    #[arg(long = "constraint")]
    pub constraints: Vec<String>,
}

#[derive(Subcommand)]
pub enum ActivityCommands {
    /// List activities
    List,
    /// Add an activity
    Add(ActivityArgs),
    /// Update an activity (flags are merged onto the stored activity)
    Update {
        id: String,
        #[command(flatten)]
        fields: ActivityArgs,
    },
    /// Remove an activity
    Remove { id: String },
}

#[derive(Args, Default)]
pub struct ActivityArgs {
    #[arg(long)]
    pub title: Option<String>,
    /// Curiosity, Growth, Community, Creativity, Leadership or Achievements
    #[arg(long)]
    pub lens: Option<String>,
    /// Activity type, e.g. club, research, job
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// Role level, e.g. member, lead, founder
    #[arg(long)]
    pub role_level: Option<String>,
    #[arg(long)]
    pub area: Option<String>,
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub end_date: Option<String>,
    #[arg(long)]
    pub hours_per_week: Option<f64>,
    #[arg(long)]
    pub hours_total: Option<f64>,
    #[arg(long)]
    pub team_size: Option<u32>,
    #[arg(long)]
    pub people_impacted: Option<u32>,
    /// Award level, repeatable
    #[arg(long = "award")]
    pub awards: Vec<String>,
    /// Theme tag, repeatable
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Artifact link, repeatable
    #[arg(long = "link")]
    pub links: Vec<String>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Subcommand)]
pub enum EssayCommands {
    /// Create an essay (general unless --college-id is given)
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        prompt: String,
        #[arg(long, default_value_t = crate::models::DEFAULT_WORD_LIMIT)]
        word_limit: u32,
        #[arg(long)]
        content: Option<String>,
        /// Read initial content from a file
        #[arg(long, conflicts_with = "content")]
        file: Option<PathBuf>,
        #[arg(long, requires = "college_name")]
        college_id: Option<String>,
        #[arg(long, requires = "college_id")]
        college_name: Option<String>,
        #[arg(long)]
        doc_url: Option<String>,
    },
    /// List essays grouped by college
    List,
    /// Show an essay
    Show { id: String },
    /// Edit an essay
    #[command(after_help = "\
NOTE:
  Word count and status are recomputed from the content. --status overrides the derived status.")]
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long)]
        word_limit: Option<u32>,
        #[arg(long)]
        content: Option<String>,
        /// Read content from a file
        #[arg(long, conflicts_with = "content")]
        file: Option<PathBuf>,
        /// not_started, in_progress or complete
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        doc_url: Option<String>,
    },
    /// Delete an essay
    Delete { id: String },
    /// Send an essay to the backend for analysis
    Analyze { id: String },
    /// Show the cached analysis of an essay
    Analysis { id: String },
}

#[derive(Subcommand)]
pub enum PortfolioCommands {
    /// Request a portfolio evaluation from the backend and cache it
    #[command(after_help = "\
NOTE:
  Requires a saved profile and at least one activity.
  --deadline takes SCHOOL=DATE and may be repeated.")]
    Analyze {
        /// Target school, repeatable
        #[arg(long = "school")]
        schools: Vec<String>,
        /// Country track, repeatable (default: US)
        #[arg(long = "track")]
        tracks: Vec<String>,
        /// SCHOOL=DATE, repeatable
        #[arg(long = "deadline")]
        deadlines: Vec<String>,
    },
    /// Render the cached evaluation report
    Show,
    /// List recommended tasks with their learning ids
    Tasks,
}

#[derive(Subcommand)]
pub enum LearnCommands {
    /// Open a recommended task for step-by-step work
    Open { task_id: String },
    /// List tasks with recorded progress
    List,
    /// Show a task's steps and progress
    Show { task_id: String },
    /// Toggle a step (step-N or N)
    Toggle { task_id: String, step: String },
    /// Mark a step completed
    Complete { task_id: String, step: String },
    /// Mark a step not completed
    Uncomplete { task_id: String, step: String },
    /// Set notes for a task (empty text clears them)
    Note { task_id: String, text: String },
    /// Add minutes spent on a task
    LogTime { task_id: String, minutes: u32 },
    /// Forget a task's progress
    Reset { task_id: String },
}

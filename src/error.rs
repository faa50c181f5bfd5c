use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    ValidationError,
    EssayNotFound,
    ActivityNotFound,
    TaskNotFound,
    TaskNotOpened,
    StepNotFound,
    AnalysisNotFound,
    ProfileIncomplete,
    BackendUnavailable,
    BackendTimeout,
    BackendError,
    StorageError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::EssayNotFound => "ESSAY_NOT_FOUND",
            Self::ActivityNotFound => "ACTIVITY_NOT_FOUND",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::TaskNotOpened => "TASK_NOT_OPENED",
            Self::StepNotFound => "STEP_NOT_FOUND",
            Self::AnalysisNotFound => "ANALYSIS_NOT_FOUND",
            Self::ProfileIncomplete => "PROFILE_INCOMPLETE",
            Self::BackendUnavailable => "BACKEND_UNAVAILABLE",
            Self::BackendTimeout => "BACKEND_TIMEOUT",
            Self::BackendError => "BACKEND_ERROR",
            Self::StorageError => "STORAGE_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct DeskError {
    pub code: ErrorCode,
    pub message: String,
}

impl DeskError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_initialized() -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            "admitdesk is not initialized. Run `admitdesk init` first.",
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn essay_not_found(reference: &str) -> Self {
        Self::new(ErrorCode::EssayNotFound, format!("Essay not found: {reference}"))
    }

    pub fn activity_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::ActivityNotFound,
            format!("Activity not found: {reference}"),
        )
    }

    pub fn task_not_found(task_id: &str) -> Self {
        Self::new(
            ErrorCode::TaskNotFound,
            format!("No recommended task with id '{task_id}' in the cached analysis"),
        )
    }

    pub fn task_not_opened(task_id: &str) -> Self {
        Self::new(
            ErrorCode::TaskNotOpened,
            format!("Task '{task_id}' is not open. Run `admitdesk learn open {task_id}` first."),
        )
    }

    pub fn step_not_found(step_id: &str, task_id: &str) -> Self {
        Self::new(
            ErrorCode::StepNotFound,
            format!("Task '{task_id}' has no step '{step_id}'"),
        )
    }

    pub fn analysis_not_found() -> Self {
        Self::new(
            ErrorCode::AnalysisNotFound,
            "No cached portfolio analysis. Run `admitdesk portfolio analyze` first.",
        )
    }

    pub fn profile_incomplete(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProfileIncomplete, message)
    }

    pub fn backend_unavailable(url: &str) -> Self {
        Self::new(
            ErrorCode::BackendUnavailable,
            format!("Cannot connect to backend at {url}. Make sure the backend server is running."),
        )
    }

    pub fn backend_timeout(what: &str) -> Self {
        Self::new(
            ErrorCode::BackendTimeout,
            format!("{what} timed out waiting for the backend"),
        )
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BackendError, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }
}

impl From<rusqlite::Error> for DeskError {
    fn from(e: rusqlite::Error) -> Self {
        Self::storage(e.to_string())
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(e: serde_json::Error) -> Self {
        Self::storage(format!("Invalid stored JSON: {e}"))
    }
}

impl From<std::io::Error> for DeskError {
    fn from(e: std::io::Error) -> Self {
        Self::storage(e.to_string())
    }
}

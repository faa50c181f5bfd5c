use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::connection;
use crate::error::DeskError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_STUDENT_ID: &str = "student_123";

/// Settings read from `.admitdesk/config.json`, then overridden by
/// `ADMITDESK_API_URL` / `ADMITDESK_STUDENT`, then by command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    pub api_url: String,
    pub student_id: String,
    pub request_timeout_secs: u64,
    pub write_timeout_secs: u64,
    pub analyze_timeout_secs: u64,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            student_id: DEFAULT_STUDENT_ID.to_string(),
            request_timeout_secs: 30,
            write_timeout_secs: 15,
            analyze_timeout_secs: 60,
        }
    }
}

pub const KEYS: &[&str] = &[
    "api_url",
    "student_id",
    "request_timeout_secs",
    "write_timeout_secs",
    "analyze_timeout_secs",
];

impl DeskConfig {
    /// Effective configuration. Works before `init`: without a data directory
    /// only defaults and environment apply.
    pub fn load() -> Result<Self, DeskError> {
        let mut config = match connection::config_path() {
            Ok(path) => Self::read_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Configuration stored on disk only, without environment overrides.
    pub fn load_file() -> Result<Self, DeskError> {
        Self::read_file(&connection::config_path()?)
    }

    fn read_file(path: &Path) -> Result<Self, DeskError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)
            .map_err(|e| DeskError::validation(format!("Invalid config file {}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = env::var("ADMITDESK_API_URL") {
            if !url.trim().is_empty() {
                self.api_url = url;
            }
        }
        if let Ok(student) = env::var("ADMITDESK_STUDENT") {
            if !student.trim().is_empty() {
                self.student_id = student;
            }
        }
    }

    pub fn with_overrides(mut self, api_url: Option<&str>, student_id: Option<&str>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url.to_string();
        }
        if let Some(student) = student_id {
            self.student_id = student.to_string();
        }
        self
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), DeskError> {
        let parse_secs = |v: &str| -> Result<u64, DeskError> {
            match v.parse::<u64>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(DeskError::validation(format!("{key} must be a positive number of seconds"))),
            }
        };
        match key {
            "api_url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(DeskError::validation("api_url must start with http:// or https://"));
                }
                self.api_url = value.trim_end_matches('/').to_string();
            }
            "student_id" => {
                if value.trim().is_empty() {
                    return Err(DeskError::validation("student_id cannot be empty"));
                }
                self.student_id = value.to_string();
            }
            "request_timeout_secs" => self.request_timeout_secs = parse_secs(value)?,
            "write_timeout_secs" => self.write_timeout_secs = parse_secs(value)?,
            "analyze_timeout_secs" => self.analyze_timeout_secs = parse_secs(value)?,
            _ => {
                return Err(DeskError::validation(format!(
                    "Unknown config key '{key}'. Known keys: {}",
                    KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), DeskError> {
        let path = connection::config_path()?;
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
